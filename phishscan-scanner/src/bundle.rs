use crate::document::Document;
use crate::fetch::{FetchOutcome, RedirectHop};
use crate::registration::RegistrationRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// Body substituted when the server answered with anything but 200
pub const NON_200_PLACEHOLDER: &str = "Default Response Content";
/// Body substituted when no response arrived at all
pub const TRANSPORT_FAILURE_PLACEHOLDER: &str = "Failed to fetch URL";

pub const NON_200_STATUS: u16 = 408;
pub const TRANSPORT_FAILURE_STATUS: u16 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FetchStatus {
    Ok,
    TimeoutOrError,
    Non200,
}

impl FetchStatus {
    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            FetchStatus::Ok => None,
            FetchStatus::TimeoutOrError => Some(TRANSPORT_FAILURE_PLACEHOLDER),
            FetchStatus::Non200 => Some(NON_200_PLACEHOLDER),
        }
    }
}

/// Everything known about one URL once fetching and lookups are done.
///
/// Every field is populated: failed fetches carry a placeholder body and the
/// minimal fallback document, failed lookups leave `registration` and
/// `search_indexed` empty.
#[derive(Debug)]
pub struct ResolvedBundle {
    pub url: String,
    /// URL authority (`user@host:port`), empty when the URL does not parse
    pub domain: String,
    pub fetch_status: FetchStatus,
    pub status_code: u16,
    pub body_text: String,
    pub response_history: Vec<RedirectHop>,
    pub registration: Option<RegistrationRecord>,
    /// `None` when the search engine could not be asked
    pub search_indexed: Option<bool>,
    pub document: Document,
    pub resolved_at: DateTime<Utc>,
}

impl ResolvedBundle {
    pub fn new(
        url: &str,
        outcome: FetchOutcome,
        registration: Option<RegistrationRecord>,
        search_indexed: Option<bool>,
        resolved_at: DateTime<Utc>,
    ) -> Self {
        let url = url.trim().to_string();
        let domain = extract_domain(&url);

        let (fetch_status, status_code, body_text, response_history, document) = match outcome {
            FetchOutcome::Success { body, history } => {
                let document = Document::parse(&body);
                (FetchStatus::Ok, 200, body, history, document)
            }
            FetchOutcome::NonSuccess { .. } => (
                FetchStatus::Non200,
                NON_200_STATUS,
                NON_200_PLACEHOLDER.to_string(),
                Vec::new(),
                Document::fallback(),
            ),
            FetchOutcome::Transport(_) => (
                FetchStatus::TimeoutOrError,
                TRANSPORT_FAILURE_STATUS,
                TRANSPORT_FAILURE_PLACEHOLDER.to_string(),
                Vec::new(),
                Document::fallback(),
            ),
        };

        Self {
            url,
            domain,
            fetch_status,
            status_code,
            body_text,
            response_history,
            registration,
            search_indexed,
            document,
            resolved_at,
        }
    }

    pub fn is_fetched(&self) -> bool {
        self.fetch_status == FetchStatus::Ok
    }
}

/// Authority component of `url` exactly as written: userinfo, host and
/// port keep their case, IDN hosts stay unencoded and default ports stay.
///
/// Returns an empty string when the URL cannot be parsed.
pub fn extract_domain(url: &str) -> String {
    if Url::parse(url).is_err() {
        return String::new();
    }

    let Some((_, rest)) = url.split_once("://") else {
        return String::new();
    };
    let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    rest[..end].to_string()
}
