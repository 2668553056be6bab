use crate::error::{Result, ScanError};
use reqwest::header::LOCATION;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 5;
pub const MAX_REDIRECTS: usize = 10;

const USER_AGENT: &str = "Phishscan/0.1 (https://github.com/trapdoorsec/phishscan)";

/// One redirect response passed through on the way to the final page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectHop {
    pub url: String,
    pub status_code: u16,
}

/// What a single page fetch produced.
#[derive(Debug)]
pub enum FetchOutcome {
    /// Final response was 200
    Success {
        body: String,
        history: Vec<RedirectHop>,
    },
    /// A response arrived but its final status was not 200
    NonSuccess { status_code: u16 },
    /// Timeout, DNS failure, refused connection, unusable URL...
    Transport(ScanError),
}

#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new() -> Result<Self> {
        Self::with_timeout(Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        // Redirects are followed by hand so each hop can be recorded
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .connect_timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self { client })
    }

    /// GET `url`, following redirects. Never returns an error: transport
    /// failures are reported through [`FetchOutcome::Transport`].
    pub async fn fetch(&self, url: &str) -> FetchOutcome {
        match self.follow(url).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Fetch failed for {}: {}", url, e);
                FetchOutcome::Transport(e)
            }
        }
    }

    async fn follow(&self, url: &str) -> Result<FetchOutcome> {
        let mut current =
            Url::parse(url).map_err(|e| ScanError::InvalidUrl(format!("{}: {}", url, e)))?;
        let mut history = Vec::new();

        loop {
            debug!("Fetching {}", current);
            let response = self.client.get(current.clone()).send().await?;
            let status = response.status();

            if status.is_redirection()
                && let Some(location) = response
                    .headers()
                    .get(LOCATION)
                    .and_then(|v| v.to_str().ok())
            {
                if history.len() >= MAX_REDIRECTS {
                    return Err(ScanError::TooManyRedirects(url.to_string()));
                }

                let next = current
                    .join(location)
                    .map_err(|e| ScanError::InvalidUrl(format!("{}: {}", location, e)))?;
                debug!("  -> {} redirects to {}", status.as_u16(), next);
                history.push(RedirectHop {
                    url: current.to_string(),
                    status_code: status.as_u16(),
                });
                current = next;
                continue;
            }

            if status == StatusCode::OK {
                let body = response.text().await?;
                return Ok(FetchOutcome::Success { body, history });
            }

            debug!("Non-200 response {} for {}", status.as_u16(), current);
            return Ok(FetchOutcome::NonSuccess {
                status_code: status.as_u16(),
            });
        }
    }
}
