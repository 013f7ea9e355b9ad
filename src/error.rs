use thiserror::Error;

/// Errors surfaced by the fetch / extract / batch / export pipeline.
///
/// A single URL's scoring failure is not an error: it becomes a degraded
/// record instead.
#[derive(Debug, Error)]
pub enum InsightsError {
    /// Missing credential or unusable configuration, detected at startup
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The sitemap request returned a non-success status
    #[error("Failed to fetch sitemap {url}: HTTP {status}")]
    FetchFailed { url: String, status: u16 },

    /// Transport level failure (DNS, TLS, connection reset, ...)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The sitemap parsed but contained no `loc` elements
    #[error("No URLs found in sitemap {url}")]
    EmptySitemap { url: String },

    /// A batch was started with an empty URL list
    #[error("No URLs to process")]
    NoUrlsToProcess,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl InsightsError {
    /// Create a configuration error
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Whether this error only warrants a warning rather than a failure report
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::EmptySitemap { .. } | Self::NoUrlsToProcess)
    }
}

/// Result type alias using InsightsError.
pub type Result<T> = std::result::Result<T, InsightsError>;
