// Re-export modules
pub mod batch;
pub mod config;
pub mod error;
pub mod insights;
pub mod report;
pub mod results;
pub mod sitemap;
pub mod utils;

// Re-export commonly used types for convenience
pub use batch::{BatchProgress, BatchRunner, BatchState};
pub use config::{Credential, InsightsConfig};
pub use error::{InsightsError, Result};
pub use insights::InsightClient;
pub use report::{ResultTable, export_csv, render, write_csv};
pub use results::{Field, InsightRecord, MetricValue, NOT_AVAILABLE, PageUrl};

use reqwest::Client;
use std::path::Path;
use tokio::sync::mpsc;

/// Main builder wiring sitemap extraction to a scoring batch
pub struct Insights {
    sitemap_url: String,
    config: InsightsConfig,
}

impl Insights {
    /// Create a new builder for the given sitemap location
    pub fn new(sitemap_url: impl Into<String>) -> Self {
        Self {
            sitemap_url: sitemap_url.into(),
            config: InsightsConfig::default(),
        }
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: InsightsConfig) -> Self {
        self.config = config;
        self
    }

    /// Load configuration from a file
    pub fn with_config_file(self, path: impl AsRef<Path>) -> Result<Self> {
        let config = InsightsConfig::from_file(path)?;
        Ok(self.with_config(config))
    }

    /// Set the API key for the scoring service
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config.api_key = Some(api_key.into());
        self
    }

    /// Point the scoring requests at a different endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.endpoint = endpoint.into();
        self
    }

    pub fn sitemap_url(&self) -> &str {
        &self.sitemap_url
    }

    fn http_client(&self) -> Result<Client> {
        Ok(Client::builder()
            .user_agent(self.config.user_agent.as_str())
            .build()?)
    }

    /// Fetch the sitemap and return its URLs in document order
    pub async fn urls(&self) -> Result<Vec<PageUrl>> {
        let client = self.http_client()?;
        sitemap::fetch_urls(&client, &self.sitemap_url).await
    }

    /// Build a batch runner; fails if no credential is configured
    pub fn runner(&self) -> Result<BatchRunner> {
        let credential = self.config.credential()?;
        let client = InsightClient::new(self.http_client()?, &self.config.endpoint)?;
        Ok(BatchRunner::new(client, credential))
    }

    /// Validate configuration, extract the sitemap URLs and start the batch.
    ///
    /// Returns a receiver yielding one progress event per scored URL.
    pub async fn generate(self) -> Result<mpsc::Receiver<BatchProgress>> {
        // Configuration problems must surface before any network traffic
        let runner = self.runner()?;
        let urls = self.urls().await?;
        runner.spawn(urls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    #[tokio::test]
    async fn test_generate_requires_credential_before_fetching() {
        let mut server = mockito::Server::new_async().await;
        let sitemap = server
            .mock("GET", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let err = Insights::new(format!("{}/sitemap.xml", server.url()))
            .generate()
            .await
            .unwrap_err();
        assert!(matches!(err, InsightsError::Configuration(_)));
        sitemap.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_failure_makes_no_scoring_calls() {
        let mut server = mockito::Server::new_async().await;
        let _sitemap = server
            .mock("GET", "/sitemap.xml")
            .with_status(404)
            .create_async()
            .await;
        let scoring = server
            .mock("GET", "/runPagespeed")
            .match_query(Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let err = Insights::new(format!("{}/sitemap.xml", server.url()))
            .with_api_key("secret")
            .with_endpoint(format!("{}/runPagespeed", server.url()))
            .generate()
            .await
            .unwrap_err();

        assert!(matches!(err, InsightsError::FetchFailed { status: 404, .. }));
        scoring.assert_async().await;
    }

    #[tokio::test]
    async fn test_generate_scores_every_sitemap_url() {
        let mut server = mockito::Server::new_async().await;
        let _sitemap = server
            .mock("GET", "/sitemap.xml")
            .with_status(200)
            .with_header("content-type", "application/xml")
            .with_body(
                "<urlset><url><loc>https://ex.com/a</loc></url><url><loc>https://ex.com/b</loc></url></urlset>",
            )
            .create_async()
            .await;
        let scoring = server
            .mock("GET", "/runPagespeed")
            .match_query(Matcher::UrlEncoded("key".into(), "secret".into()))
            .with_status(200)
            .with_body(
                r#"{"lighthouseResult":{"categories":{"performance":{"score":0.93}},"audits":{"speed-index":{"displayValue":"1.2 s"}}}}"#,
            )
            .expect(2)
            .create_async()
            .await;

        let mut rx = Insights::new(format!("{}/sitemap.xml", server.url()))
            .with_api_key("secret")
            .with_endpoint(format!("{}/runPagespeed", server.url()))
            .generate()
            .await
            .unwrap();

        let mut records = Vec::new();
        while let Some(progress) = rx.recv().await {
            records = progress.records;
        }

        scoring.assert_async().await;
        let urls: Vec<_> = records.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(urls, vec!["https://ex.com/a", "https://ex.com/b"]);

        let table = render(&records);
        assert_eq!(table.rows[0][1], "0.93");
        assert_eq!(table.rows[0][3], "1.2 s");
        assert_eq!(table.rows[0][2], NOT_AVAILABLE);
    }
}
