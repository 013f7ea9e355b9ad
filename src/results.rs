use std::fmt;

/// Placeholder shown wherever a metric could not be extracted
pub const NOT_AVAILABLE: &str = "N/A";

/// A page URL as listed in the sitemap, unvalidated
pub type PageUrl = String;

/// The fixed set of columns an insight record can carry, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Url,
    OverallScore,
    FirstContentfulPaint,
    SpeedIndex,
    LargestContentfulPaint,
    TimeToInteractive,
    TotalBlockingTime,
    CumulativeLayoutShift,
}

impl Field {
    /// All fields in column order
    pub const ALL: [Field; 8] = [
        Field::Url,
        Field::OverallScore,
        Field::FirstContentfulPaint,
        Field::SpeedIndex,
        Field::LargestContentfulPaint,
        Field::TimeToInteractive,
        Field::TotalBlockingTime,
        Field::CumulativeLayoutShift,
    ];

    /// Column header used in the table and the CSV export
    pub fn label(&self) -> &'static str {
        match self {
            Field::Url => "URL",
            Field::OverallScore => "Overall Score",
            Field::FirstContentfulPaint => "First Contentful Paint",
            Field::SpeedIndex => "Speed Index",
            Field::LargestContentfulPaint => "Largest Contentful Paint",
            Field::TimeToInteractive => "Time to Interactive",
            Field::TotalBlockingTime => "Total Blocking Time",
            Field::CumulativeLayoutShift => "Cumulative Layout Shift",
        }
    }

    /// Audit identifier in the scoring response, for audit-backed fields
    pub fn audit_id(&self) -> Option<&'static str> {
        match self {
            Field::FirstContentfulPaint => Some("first-contentful-paint"),
            Field::SpeedIndex => Some("speed-index"),
            Field::LargestContentfulPaint => Some("largest-contentful-paint"),
            Field::TimeToInteractive => Some("interactive"),
            Field::TotalBlockingTime => Some("total-blocking-time"),
            Field::CumulativeLayoutShift => Some("cumulative-layout-shift"),
            Field::Url | Field::OverallScore => None,
        }
    }
}

/// A single extracted value
#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    Score(f64),
    Text(String),
    NotAvailable,
}

impl From<Option<f64>> for MetricValue {
    fn from(value: Option<f64>) -> Self {
        value.map_or(MetricValue::NotAvailable, MetricValue::Score)
    }
}

impl From<Option<String>> for MetricValue {
    fn from(value: Option<String>) -> Self {
        value.map_or(MetricValue::NotAvailable, MetricValue::Text)
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Score(score) => write!(f, "{}", score),
            MetricValue::Text(text) => f.write_str(text),
            MetricValue::NotAvailable => f.write_str(NOT_AVAILABLE),
        }
    }
}

/// The six audit metrics, present only when the response had a result container
#[derive(Debug, Clone, PartialEq)]
pub struct AuditMetrics {
    pub first_contentful_paint: MetricValue,
    pub speed_index: MetricValue,
    pub largest_contentful_paint: MetricValue,
    pub time_to_interactive: MetricValue,
    pub total_blocking_time: MetricValue,
    pub cumulative_layout_shift: MetricValue,
}

impl AuditMetrics {
    /// Value for an audit-backed field
    pub fn get(&self, field: Field) -> Option<&MetricValue> {
        match field {
            Field::FirstContentfulPaint => Some(&self.first_contentful_paint),
            Field::SpeedIndex => Some(&self.speed_index),
            Field::LargestContentfulPaint => Some(&self.largest_contentful_paint),
            Field::TimeToInteractive => Some(&self.time_to_interactive),
            Field::TotalBlockingTime => Some(&self.total_blocking_time),
            Field::CumulativeLayoutShift => Some(&self.cumulative_layout_shift),
            Field::Url | Field::OverallScore => None,
        }
    }
}

/// Why a record was degraded to sentinel values
#[derive(Debug, Clone, PartialEq)]
pub struct PartialInsightFailure {
    pub reason: String,
}

impl PartialInsightFailure {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Performance insights for one page URL
#[derive(Debug, Clone, PartialEq)]
pub struct InsightRecord {
    /// URL that was scored
    pub url: PageUrl,

    /// Performance category score (0.0 to 1.0)
    pub overall_score: MetricValue,

    /// Audit metrics, absent when the response had no result container
    pub audits: Option<AuditMetrics>,

    /// Set when the scoring call did not yield a usable result container
    pub failure: Option<PartialInsightFailure>,
}

impl InsightRecord {
    /// Create a record from a usable scoring result
    pub fn new(url: PageUrl, overall_score: MetricValue, audits: AuditMetrics) -> Self {
        Self {
            url,
            overall_score,
            audits: Some(audits),
            failure: None,
        }
    }

    /// Create a degraded record holding only the URL and a sentinel score
    pub fn unavailable(url: PageUrl, failure: PartialInsightFailure) -> Self {
        Self {
            url,
            overall_score: MetricValue::NotAvailable,
            audits: None,
            failure: Some(failure),
        }
    }

    /// Value of a field, or `None` when the record does not carry that field at all
    pub fn get(&self, field: Field) -> Option<MetricValue> {
        match field {
            Field::Url => Some(MetricValue::Text(self.url.clone())),
            Field::OverallScore => Some(self.overall_score.clone()),
            other => self.audits.as_ref().and_then(|a| a.get(other)).cloned(),
        }
    }

    /// Whether the record carries the given field
    pub fn has_field(&self, field: Field) -> bool {
        match field {
            Field::Url | Field::OverallScore => true,
            _ => self.audits.is_some(),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.failure.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_value_display() {
        assert_eq!(MetricValue::Score(0.93).to_string(), "0.93");
        assert_eq!(MetricValue::Text("1.2 s".to_string()).to_string(), "1.2 s");
        assert_eq!(MetricValue::NotAvailable.to_string(), NOT_AVAILABLE);
    }

    #[test]
    fn test_unavailable_record_has_no_audit_fields() {
        let record = InsightRecord::unavailable(
            "https://ex.com/a".to_string(),
            PartialInsightFailure::new("missing lighthouseResult"),
        );
        assert!(record.is_degraded());
        assert_eq!(record.get(Field::OverallScore), Some(MetricValue::NotAvailable));
        assert_eq!(
            record.get(Field::Url),
            Some(MetricValue::Text("https://ex.com/a".to_string()))
        );
        for field in &Field::ALL[2..] {
            assert!(!record.has_field(*field));
            assert_eq!(record.get(*field), None);
        }
    }

    #[test]
    fn test_audit_ids_cover_metric_fields() {
        let audit_fields: Vec<_> = Field::ALL.iter().filter(|f| f.audit_id().is_some()).collect();
        assert_eq!(audit_fields.len(), 6);
        assert_eq!(Field::TimeToInteractive.audit_id(), Some("interactive"));
    }
}
