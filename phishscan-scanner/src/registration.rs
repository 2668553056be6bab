// Domain registration lookup over RDAP

use crate::error::{Result, ScanError};
use chrono::{DateTime, Utc};
use reqwest::Client;
use reqwest::header::ACCEPT;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use url::{Host, Url};

pub const DEFAULT_RDAP_ENDPOINT: &str = "https://rdap.org/";
pub const DEFAULT_REGISTRATION_TIMEOUT_SECS: u64 = 10;

/// Creation and expiration dates of a registered domain.
///
/// Only ever built with both dates present; a registry answer missing either
/// one is treated as no record at all.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegistrationRecord {
    pub creation_date: DateTime<Utc>,
    pub expiration_date: DateTime<Utc>,
    /// Registry response exactly as received
    pub raw: String,
}

#[derive(Debug, Deserialize)]
struct RdapDomain {
    #[serde(default)]
    events: Vec<RdapEvent>,
}

#[derive(Debug, Deserialize)]
struct RdapEvent {
    #[serde(rename = "eventAction")]
    action: String,
    #[serde(rename = "eventDate")]
    date: String,
}

impl RegistrationRecord {
    pub fn new(creation_date: DateTime<Utc>, expiration_date: DateTime<Utc>) -> Self {
        Self {
            creation_date,
            expiration_date,
            raw: String::new(),
        }
    }

    /// Build a record from an RDAP domain object.
    pub fn from_rdap(raw: &str) -> Result<Self> {
        let domain: RdapDomain = serde_json::from_str(raw)
            .map_err(|e| ScanError::ParseError(format!("malformed RDAP response: {}", e)))?;

        Ok(Self {
            creation_date: find_event(&domain.events, "registration")?,
            expiration_date: find_event(&domain.events, "expiration")?,
            raw: raw.to_string(),
        })
    }
}

fn find_event(events: &[RdapEvent], action: &str) -> Result<DateTime<Utc>> {
    let event = events
        .iter()
        .find(|e| e.action.eq_ignore_ascii_case(action))
        .ok_or_else(|| ScanError::MissingData(format!("no '{}' event in RDAP record", action)))?;

    DateTime::parse_from_rfc3339(&event.date)
        .map(|date| date.with_timezone(&Utc))
        .map_err(|e| ScanError::ParseError(format!("bad {} date '{}': {}", action, event.date, e)))
}

/// Name to query for a URL authority: userinfo, port and a leading `www.`
/// are dropped.
pub fn registrable_name(domain: &str) -> Option<String> {
    let host = domain.rsplit('@').next().unwrap_or(domain);
    let host = if host.starts_with('[') {
        // bracketed IPv6 literal, keep as is up to the closing bracket
        host.split_inclusive(']').next().unwrap_or(host)
    } else {
        host.split(':').next().unwrap_or(host)
    };
    let host = host.trim_end_matches('.').to_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);

    if host.is_empty() {
        return None;
    }
    // registries index IDNs by their ASCII form
    Some(
        Host::parse(host)
            .map(|parsed| parsed.to_string())
            .unwrap_or_else(|_| host.to_string()),
    )
}

#[derive(Debug, Clone)]
pub struct RdapClient {
    client: Client,
    endpoint: Url,
}

impl RdapClient {
    pub fn new() -> Result<Self> {
        Self::with_endpoint(
            DEFAULT_RDAP_ENDPOINT,
            Duration::from_secs(DEFAULT_REGISTRATION_TIMEOUT_SECS),
        )
    }

    pub fn with_endpoint(endpoint: &str, timeout: Duration) -> Result<Self> {
        let mut endpoint = Url::parse(endpoint)
            .map_err(|e| ScanError::InvalidUrl(format!("RDAP endpoint {}: {}", endpoint, e)))?;
        if !endpoint.path().ends_with('/') {
            let path = format!("{}/", endpoint.path());
            endpoint.set_path(&path);
        }

        // Bootstrap services answer with a redirect to the authoritative registry
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self { client, endpoint })
    }

    pub async fn lookup(&self, domain: &str) -> Result<RegistrationRecord> {
        let name = registrable_name(domain)
            .ok_or_else(|| ScanError::MissingData("empty domain".to_string()))?;
        let url = self
            .endpoint
            .join(&format!("domain/{}", name))
            .map_err(|e| ScanError::InvalidUrl(format!("{}: {}", name, e)))?;

        debug!("Looking up registration for {} at {}", name, url);
        let raw = self
            .client
            .get(url)
            .header(ACCEPT, "application/rdap+json")
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        RegistrationRecord::from_rdap(&raw)
    }
}
