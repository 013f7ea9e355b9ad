use clap::Parser;
use sitemap_insights::utils::truncate_url;
use sitemap_insights::{BatchProgress, Insights, InsightRecord, render, write_csv};
use std::process::ExitCode;

mod args;
use args::{Args, env_api_key};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_warning() => {
            ::log::warn!("{}", e);
            eprintln!("Warning: {}", e);
            ExitCode::from(2)
        }
        Err(e) => {
            ::log::error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args) -> sitemap_insights::Result<()> {
    let config = args.build_config(env_api_key())?;
    let output = config.output.clone();

    ::log::info!("Starting insights run for sitemap: {}", args.sitemap_url);
    let insights = Insights::new(args.sitemap_url.as_str()).with_config(config);

    // Start the batch and get a receiver for progress events
    let mut rx = insights.generate().await?;

    let start_time = std::time::Instant::now();
    let mut records: Vec<InsightRecord> = Vec::new();

    while let Some(progress) = rx.recv().await {
        report_progress(&progress);
        records = progress.records;
    }

    let duration = start_time.elapsed();
    ::log::info!(
        "Scoring complete - processed {} URLs in {:.2} seconds",
        records.len(),
        duration.as_secs_f64()
    );

    if !args.no_table {
        println!();
        print!("{}", render(&records));
    }

    write_csv(&records, &output)?;
    println!("Saved {} rows to {}", records.len(), output.display());
    Ok(())
}

// Print the row produced by the latest step
fn report_progress(progress: &BatchProgress) {
    let table = render(&progress.records);
    let Some(row) = table.rows.last() else {
        return;
    };

    let url = truncate_url(&row[0], 60);
    let score = row.get(1).map(String::as_str).unwrap_or_default();
    let note = match progress.latest().and_then(|r| r.failure.as_ref()) {
        Some(failure) => format!(" ({})", failure.reason),
        None => String::new(),
    };
    println!(
        "[{}/{}] {} score={}{}",
        progress.index, progress.total, url, score, note
    );
}
