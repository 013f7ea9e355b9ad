use crate::error::{InsightsError, Result};
use serde::Deserialize;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Environment variable consulted for the scoring service API key
pub const API_KEY_ENV: &str = "PAGESPEED_API_KEY";

/// Configuration for the sitemap insights run
#[derive(Debug, Clone, Deserialize)]
pub struct InsightsConfig {
    /// API key for the scoring service
    #[serde(default)]
    pub api_key: Option<String>,

    /// Scoring service endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Where the CSV export is written
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Default value for endpoint
fn default_endpoint() -> String {
    "https://www.googleapis.com/pagespeedonline/v5/runPagespeed".to_string()
}

/// Default export filename
fn default_output() -> PathBuf {
    PathBuf::from("pagespeed_insights.csv")
}

/// Default value for user_agent
fn default_user_agent() -> String {
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for InsightsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: default_endpoint(),
            output: default_output(),
            user_agent: default_user_agent(),
        }
    }
}

impl InsightsConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut file = File::open(path).map_err(|e| {
            InsightsError::configuration(format!("cannot open {}: {}", path.display(), e))
        })?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| InsightsError::configuration(format!("invalid config: {}", e)))
    }

    /// Override the API key from the environment if it is set and non-empty
    pub fn with_env_api_key(mut self, value: Option<String>) -> Self {
        if let Some(key) = value.filter(|k| !k.trim().is_empty()) {
            self.api_key = Some(key);
        }
        self
    }

    /// Resolve the credential, failing if none was configured
    pub fn credential(&self) -> Result<Credential> {
        match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(Credential::new(key)),
            _ => Err(InsightsError::configuration(format!(
                "no API key configured; pass --api-key, set {} or add \"api_key\" to the config file",
                API_KEY_ENV
            ))),
        }
    }
}

/// API key for the scoring service, passed explicitly to every query
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

// Keep keys out of logs
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}
