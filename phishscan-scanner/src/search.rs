use crate::document::Document;
use crate::error::{Result, ScanError};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://html.duckduckgo.com/html/";
pub const DEFAULT_RESULT_SELECTOR: &str = "a.result__a";

/// Asks a web search engine whether it knows a URL.
#[derive(Debug, Clone)]
pub struct SearchClient {
    client: Client,
    endpoint: Url,
    result_selector: String,
}

impl SearchClient {
    pub fn new(endpoint: &str, result_selector: &str, timeout: Duration) -> Result<Self> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| ScanError::InvalidUrl(format!("search endpoint {}: {}", endpoint, e)))?;

        let client = Client::builder()
            .user_agent("Mozilla/5.0 (compatible; Phishscan/0.1)")
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint,
            result_selector: result_selector.to_string(),
        })
    }

    /// True when the result page lists at least one hit for `url`.
    pub async fn is_indexed(&self, url: &str) -> Result<bool> {
        let body = self
            .client
            .get(self.endpoint.clone())
            .query(&[("q", url)])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let hits = Document::parse(&body).count_css(&self.result_selector)?;
        debug!("Search index lookup for {}: {} result(s)", url, hits);
        Ok(hits >= 1)
    }
}
