use clap::Parser;
use sitemap_insights::InsightsConfig;
use sitemap_insights::config::API_KEY_ENV;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sitemap-insights")]
#[command(about = "Score every page listed in a sitemap with PageSpeed Insights")]
#[command(version)]
pub struct Args {
    /// Sitemap location (https:// is assumed when no scheme is given)
    pub sitemap_url: String,

    /// PageSpeed Insights API key (falls back to PAGESPEED_API_KEY, then the config file)
    #[arg(short = 'k', long)]
    pub api_key: Option<String>,

    /// Path to a JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// CSV file to write
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Override the scoring service endpoint
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Skip printing the final results table
    #[arg(long)]
    pub no_table: bool,
}

impl Args {
    /// Build the effective configuration: file, then environment, then flags
    pub fn build_config(
        &self,
        env_api_key: Option<String>,
    ) -> sitemap_insights::Result<InsightsConfig> {
        let mut config = match &self.config {
            Some(path) => {
                ::log::info!("Loading configuration from file: {}", path.display());
                InsightsConfig::from_file(path)?
            }
            None => InsightsConfig::default(),
        };

        config = config.with_env_api_key(env_api_key);

        if let Some(key) = &self.api_key {
            config.api_key = Some(key.clone());
        }
        if let Some(output) = &self.output {
            config.output = output.clone();
        }
        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint.clone();
        }

        Ok(config)
    }
}

/// Read the API key from the environment
pub fn env_api_key() -> Option<String> {
    std::env::var(API_KEY_ENV).ok()
}
