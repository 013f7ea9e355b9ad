use clap::Parser;
use sitemap_insights::{Insights, export_csv};
use std::error::Error;
use std::io::Write;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Sitemap to score
    #[arg(short, long)]
    url: String,

    /// Path to JSON configuration file
    #[arg(short, long)]
    config_file: Option<String>,

    /// API key (overrides the configuration file)
    #[arg(short, long)]
    api_key: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize logger
    env_logger::init();

    let args = Args::parse();
    let mut insights = Insights::new(args.url);

    if let Some(config_file) = args.config_file {
        eprintln!("Loading configuration from file: {}", config_file);
        insights = insights.with_config_file(config_file)?;
    }
    if let Some(api_key) = args.api_key {
        insights = insights.with_api_key(api_key);
    }

    // Drive the batch in-line instead of through a channel
    let mut runner = insights.runner()?;
    let urls = insights.urls().await?;
    eprintln!("Scoring {} URLs from {}", urls.len(), insights.sitemap_url());

    let records = runner
        .run(&urls, |progress| {
            eprintln!("{}/{}", progress.index, progress.total);
        })
        .await?;

    // CSV goes to stdout so it can be piped
    std::io::stdout().write_all(&export_csv(&records)?)?;
    Ok(())
}
