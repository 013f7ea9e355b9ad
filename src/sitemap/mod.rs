pub mod html;
pub mod xml;

#[cfg(test)]
mod tests;

use crate::error::{InsightsError, Result};
use crate::results::PageUrl;
use crate::utils::normalize_url;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;

/// Markup flavour of a fetched sitemap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SitemapFormat {
    /// XML sitemap or sitemap index
    Xml,
    /// HTML page (or anything declared as HTML)
    Html,
}

impl SitemapFormat {
    /// Determines the format from the declared content type, then the body itself
    pub fn detect(content_type: Option<&str>, body: &str) -> Self {
        if let Some(ct) = content_type {
            let ct = ct.to_ascii_lowercase();
            if ct.contains("html") {
                ::log::debug!("Classifying as HTML by content type: {}", ct);
                return SitemapFormat::Html;
            }
            if ct.contains("xml") {
                ::log::debug!("Classifying as XML by content type: {}", ct);
                return SitemapFormat::Xml;
            }
        }

        let head: String = body
            .trim_start()
            .chars()
            .take(64)
            .collect::<String>()
            .to_ascii_lowercase();
        if head.starts_with("<!doctype html") || head.starts_with("<html") {
            SitemapFormat::Html
        } else {
            SitemapFormat::Xml
        }
    }
}

/// A fetched sitemap, alive only between fetching and extraction
#[derive(Debug, Clone)]
pub struct SitemapDocument {
    /// URL the document was fetched from (after normalization)
    pub url: String,

    /// Declared `Content-Type`, if the server sent one
    pub content_type: Option<String>,

    /// Raw response body
    pub body: String,
}

impl SitemapDocument {
    pub fn new(url: String, content_type: Option<String>, body: String) -> Self {
        Self {
            url,
            content_type,
            body,
        }
    }

    pub fn format(&self) -> SitemapFormat {
        SitemapFormat::detect(self.content_type.as_deref(), &self.body)
    }
}

/// Fetches the sitemap at `url`, assuming `https://` when no scheme is given.
///
/// A single GET with the client's defaults; non-success statuses become
/// [`InsightsError::FetchFailed`].
pub async fn fetch_and_parse(client: &Client, url: &str) -> Result<SitemapDocument> {
    let url = normalize_url(url);
    ::log::info!("Fetching sitemap: {}", url);

    let response = client.get(&url).send().await?;
    let status = response.status();
    if !status.is_success() {
        ::log::error!("Sitemap request to {} returned {}", url, status);
        return Err(InsightsError::FetchFailed {
            url,
            status: status.as_u16(),
        });
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = response.text().await?;
    ::log::debug!(
        "Fetched {} bytes from {} ({:?})",
        body.len(),
        url,
        content_type
    );

    Ok(SitemapDocument::new(url, content_type, body))
}

/// Collects the text of every `loc` element, in document order.
///
/// No filtering or deduplication is applied. An empty result is reported as
/// [`InsightsError::EmptySitemap`].
pub fn extract_urls(doc: &SitemapDocument) -> Result<Vec<PageUrl>> {
    let urls = match doc.format() {
        SitemapFormat::Xml => match xml::parse(&doc.body) {
            Ok(urls) => urls,
            Err(e) => {
                ::log::warn!(
                    "Sitemap {} is not well-formed XML ({}), retrying as HTML",
                    doc.url,
                    e
                );
                html::parse(&doc.body)
            }
        },
        SitemapFormat::Html => html::parse(&doc.body),
    };

    if urls.is_empty() {
        ::log::warn!("No <loc> elements found in {}", doc.url);
        return Err(InsightsError::EmptySitemap {
            url: doc.url.clone(),
        });
    }

    ::log::info!("Extracted {} URLs from {}", urls.len(), doc.url);
    Ok(urls)
}

/// Fetch a sitemap and extract its URLs in one step
pub async fn fetch_urls(client: &Client, url: &str) -> Result<Vec<PageUrl>> {
    let doc = fetch_and_parse(client, url).await?;
    extract_urls(&doc)
}
