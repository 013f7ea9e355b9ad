use crate::config::Credential;
use crate::error::{InsightsError, Result};
use crate::results::{AuditMetrics, Field, InsightRecord, MetricValue, PartialInsightFailure};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use url::Url;

/// Raw scoring response. Every field is optional and type mismatches are
/// treated as absent.
#[derive(Debug, Default, Deserialize)]
pub struct PageSpeedResponse {
    #[serde(rename = "lighthouseResult", default, deserialize_with = "lenient_object")]
    pub lighthouse_result: Option<LighthouseResult>,

    #[serde(default, deserialize_with = "lenient_object")]
    pub error: Option<ApiError>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LighthouseResult {
    #[serde(default, deserialize_with = "lenient_object")]
    pub categories: Option<Categories>,

    #[serde(default, deserialize_with = "lenient_object")]
    pub audits: Option<HashMap<String, serde_json::Value>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Categories {
    #[serde(default, deserialize_with = "lenient_object")]
    pub performance: Option<Category>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Category {
    #[serde(default, deserialize_with = "lenient")]
    pub score: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Audit {
    #[serde(rename = "displayValue", default, deserialize_with = "lenient")]
    pub display_value: Option<String>,
}

/// Error payload the service returns instead of a result
#[derive(Debug, Default, Deserialize)]
pub struct ApiError {
    #[serde(default, deserialize_with = "lenient")]
    pub code: Option<u16>,

    #[serde(default, deserialize_with = "lenient")]
    pub message: Option<String>,
}

/// Deserialize a value if it has the expected shape, otherwise `None`
fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}

/// Like [`lenient`], but only JSON objects are accepted.
///
/// Derived struct impls also accept arrays positionally, which would turn
/// `[...]` into data.
fn lenient_object<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(object_as(value))
}

fn object_as<T: DeserializeOwned>(value: serde_json::Value) -> Option<T> {
    if value.is_object() {
        T::deserialize(value).ok()
    } else {
        None
    }
}

impl LighthouseResult {
    fn performance_score(&self) -> Option<f64> {
        self.categories
            .as_ref()
            .and_then(|c| c.performance.as_ref())
            .and_then(|p| p.score)
    }

    fn display_value(&self, audit_id: &str) -> Option<String> {
        let raw = self.audits.as_ref()?.get(audit_id)?;
        object_as::<Audit>(raw.clone())?.display_value
    }

    fn audit(&self, field: Field) -> MetricValue {
        field
            .audit_id()
            .and_then(|id| self.display_value(id))
            .into()
    }
}

impl PageSpeedResponse {
    /// Parse a response body; non-JSON bodies are reported as a failure reason
    pub fn from_body(body: &str) -> std::result::Result<Self, String> {
        let value: serde_json::Value = serde_json::from_str(body)
            .map_err(|e| format!("response is not valid JSON: {}", e))?;
        object_as(value).ok_or_else(|| "response is not a JSON object".to_string())
    }

    /// Convert into the record for `url`
    pub fn into_record(self, url: &str) -> InsightRecord {
        let Some(result) = self.lighthouse_result else {
            let reason = match self.error {
                Some(ApiError {
                    message: Some(message),
                    code,
                }) => match code {
                    Some(code) => format!("service error {}: {}", code, message),
                    None => format!("service error: {}", message),
                },
                _ => "response has no lighthouseResult".to_string(),
            };
            return InsightRecord::unavailable(url.to_string(), PartialInsightFailure::new(reason));
        };

        let audits = AuditMetrics {
            first_contentful_paint: result.audit(Field::FirstContentfulPaint),
            speed_index: result.audit(Field::SpeedIndex),
            largest_contentful_paint: result.audit(Field::LargestContentfulPaint),
            time_to_interactive: result.audit(Field::TimeToInteractive),
            total_blocking_time: result.audit(Field::TotalBlockingTime),
            cumulative_layout_shift: result.audit(Field::CumulativeLayoutShift),
        };

        InsightRecord::new(url.to_string(), result.performance_score().into(), audits)
    }
}

/// Issues scoring requests for single page URLs
#[derive(Debug, Clone)]
pub struct InsightClient {
    http: Client,
    endpoint: Url,
}

impl InsightClient {
    /// Create a client for the given endpoint
    pub fn new(http: Client, endpoint: &str) -> Result<Self> {
        let endpoint = Url::parse(endpoint).map_err(|e| {
            InsightsError::configuration(format!("invalid endpoint {:?}: {}", endpoint, e))
        })?;
        Ok(Self { http, endpoint })
    }

    /// Build the request URL carrying `url` and `key` query parameters
    pub fn request_url(&self, page_url: &str, credential: &Credential) -> Url {
        let mut request = self.endpoint.clone();
        request
            .query_pairs_mut()
            .append_pair("url", page_url)
            .append_pair("key", credential.expose());
        request
    }

    /// Score a single page. Never fails: problems become a degraded record.
    pub async fn query(&self, page_url: &str, credential: &Credential) -> InsightRecord {
        ::log::debug!("Requesting insights for {}", page_url);

        match self.fetch_body(page_url, credential).await {
            Ok(body) => match PageSpeedResponse::from_body(&body) {
                Ok(response) => {
                    let record = response.into_record(page_url);
                    if let Some(failure) = &record.failure {
                        ::log::warn!("Incomplete insights for {}: {}", page_url, failure.reason);
                    }
                    record
                }
                Err(reason) => degraded(page_url, reason),
            },
            Err(reason) => degraded(page_url, reason),
        }
    }

    async fn fetch_body(
        &self,
        page_url: &str,
        credential: &Credential,
    ) -> std::result::Result<String, String> {
        let response = self
            .http
            .get(self.request_url(page_url, credential))
            .send()
            .await
            // Strip the URL so the key never reaches the logs
            .map_err(|e| format!("request failed: {}", e.without_url()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| format!("failed to read response: {}", e.without_url()))?;

        if !status.is_success() {
            // Error payloads still carry a useful message
            if let Ok(parsed) = PageSpeedResponse::from_body(&body) {
                if let Some(ApiError {
                    message: Some(message),
                    ..
                }) = parsed.error
                {
                    return Err(format!("HTTP {}: {}", status.as_u16(), message));
                }
            }
            return Err(format!("HTTP {}", status.as_u16()));
        }

        Ok(body)
    }
}

fn degraded(page_url: &str, reason: String) -> InsightRecord {
    ::log::warn!("Insights unavailable for {}: {}", page_url, reason);
    InsightRecord::unavailable(page_url.to_string(), PartialInsightFailure::new(reason))
}
