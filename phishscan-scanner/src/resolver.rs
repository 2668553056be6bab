use crate::bundle::{ResolvedBundle, extract_domain};
use crate::error::Result;
use crate::fetch::{DEFAULT_FETCH_TIMEOUT_SECS, Fetcher};
use crate::registration::{
    DEFAULT_RDAP_ENDPOINT, DEFAULT_REGISTRATION_TIMEOUT_SECS, RdapClient, RegistrationRecord,
};
use crate::search::{DEFAULT_RESULT_SELECTOR, DEFAULT_SEARCH_ENDPOINT, SearchClient};
use chrono::Utc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Settings for the three external lookups made per URL
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    pub fetch_timeout: Duration,
    pub registration_timeout: Duration,
    pub rdap_endpoint: String,
    pub search_endpoint: String,
    pub search_result_selector: String,
    pub search_enabled: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            registration_timeout: Duration::from_secs(DEFAULT_REGISTRATION_TIMEOUT_SECS),
            rdap_endpoint: DEFAULT_RDAP_ENDPOINT.to_string(),
            search_endpoint: DEFAULT_SEARCH_ENDPOINT.to_string(),
            search_result_selector: DEFAULT_RESULT_SELECTOR.to_string(),
            search_enabled: true,
        }
    }
}

impl ResolverConfig {
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn with_registration_timeout(mut self, timeout: Duration) -> Self {
        self.registration_timeout = timeout;
        self
    }

    pub fn with_rdap_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.rdap_endpoint = endpoint.into();
        self
    }

    pub fn with_search_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.search_endpoint = endpoint.into();
        self
    }

    pub fn with_search_result_selector(mut self, selector: impl Into<String>) -> Self {
        self.search_result_selector = selector.into();
        self
    }

    pub fn with_search_enabled(mut self, enabled: bool) -> Self {
        self.search_enabled = enabled;
        self
    }
}

/// Turns a URL into a [`ResolvedBundle`].
///
/// Each call is independent: the HTTP clients hold no per-URL state, so one
/// resolver can serve concurrent analyses.
#[derive(Debug, Clone)]
pub struct Resolver {
    fetcher: Fetcher,
    registry: RdapClient,
    search: Option<SearchClient>,
}

impl Resolver {
    pub fn new() -> Result<Self> {
        Self::with_config(ResolverConfig::default())
    }

    pub fn with_config(config: ResolverConfig) -> Result<Self> {
        let fetcher = Fetcher::with_timeout(config.fetch_timeout)?;
        let registry = RdapClient::with_endpoint(&config.rdap_endpoint, config.registration_timeout)?;
        let search = if config.search_enabled {
            Some(SearchClient::new(
                &config.search_endpoint,
                &config.search_result_selector,
                config.fetch_timeout,
            )?)
        } else {
            None
        };

        Ok(Self {
            fetcher,
            registry,
            search,
        })
    }

    /// Fetch the page, look up the registration record and the search index.
    /// Every failure degrades to a documented fallback; this never errors.
    pub async fn resolve(&self, url: &str) -> ResolvedBundle {
        let url = url.trim();
        info!("Resolving {}", url);

        let outcome = self.fetcher.fetch(url).await;
        let domain = extract_domain(url);
        let registration = self.lookup_registration(&domain).await;
        let search_indexed = self.lookup_search(url).await;

        let bundle = ResolvedBundle::new(url, outcome, registration, search_indexed, Utc::now());
        debug!(
            "Resolved {} (status {}, registration {}, {} redirect(s))",
            bundle.url,
            bundle.status_code,
            if bundle.registration.is_some() { "present" } else { "absent" },
            bundle.response_history.len()
        );
        bundle
    }

    async fn lookup_registration(&self, domain: &str) -> Option<RegistrationRecord> {
        if domain.is_empty() {
            debug!("No domain to look up");
            return None;
        }

        match self.registry.lookup(domain).await {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Registration lookup failed for {}: {}", domain, e);
                None
            }
        }
    }

    async fn lookup_search(&self, url: &str) -> Option<bool> {
        let search = self.search.as_ref()?;
        match search.is_indexed(url).await {
            Ok(indexed) => Some(indexed),
            Err(e) => {
                warn!("Search index lookup failed for {}: {}", url, e);
                None
            }
        }
    }
}
