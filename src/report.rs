use crate::error::{InsightsError, Result};
use crate::results::{Field, InsightRecord, NOT_AVAILABLE};
use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Records projected into rows and columns
#[derive(Debug, Clone, PartialEq)]
pub struct ResultTable {
    /// Columns present, in fixed field order
    pub columns: Vec<Field>,

    /// One row per record, one cell per column
    pub rows: Vec<Vec<String>>,
}

impl ResultTable {
    pub fn headers(&self) -> Vec<&'static str> {
        self.columns.iter().map(Field::label).collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Project records into a table.
///
/// Columns are the union of fields carried by any record; cells for fields a
/// record lacks hold the sentinel.
pub fn render(records: &[InsightRecord]) -> ResultTable {
    let columns: Vec<Field> = Field::ALL
        .into_iter()
        .filter(|field| records.iter().any(|r| r.has_field(*field)))
        .collect();

    let rows = records
        .iter()
        .map(|record| {
            columns
                .iter()
                .map(|field| {
                    record
                        .get(*field)
                        .map_or_else(|| NOT_AVAILABLE.to_string(), |v| v.to_string())
                })
                .collect()
        })
        .collect();

    ResultTable { columns, rows }
}

impl fmt::Display for ResultTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers = self.headers();
        let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let line = |f: &mut fmt::Formatter<'_>, cells: &[&str]| -> fmt::Result {
            let padded: Vec<String> = cells
                .iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
                .collect();
            writeln!(f, "{}", padded.join(" | ").trim_end())
        };

        line(&mut *f, &headers[..])?;
        let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        writeln!(f, "{}", separator.join("-+-"))?;
        for row in &self.rows {
            let cells: Vec<&str> = row.iter().map(String::as_str).collect();
            line(&mut *f, &cells[..])?;
        }
        Ok(())
    }
}

/// Serialize records as UTF-8 CSV with a header row and no index column.
///
/// With no records the header lists every field.
pub fn export_csv(records: &[InsightRecord]) -> Result<Vec<u8>> {
    let table = render(records);
    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());

    if records.is_empty() {
        writer.write_record(Field::ALL.iter().map(Field::label))?;
    } else {
        writer.write_record(table.headers())?;
    }
    for row in &table.rows {
        writer.write_record(row)?;
    }

    writer
        .into_inner()
        .map_err(|e| InsightsError::Io(e.into_error()))
}

/// Write the CSV export to `path`
pub fn write_csv<P: AsRef<Path>>(records: &[InsightRecord], path: P) -> Result<()> {
    let path = path.as_ref();
    let bytes = export_csv(records)?;

    let mut file = File::create(path)?;
    file.write_all(&bytes)?;
    ::log::info!("Wrote {} rows to {}", records.len(), path.display());
    Ok(())
}
