// The 30 heuristic scorers, in feature-vector order

use crate::signal::{Fault, Signal};
use crate::vector::FEATURE_COUNT;
use chrono::Datelike;
use once_cell::sync::Lazy;
use phishscan_scanner::ResolvedBundle;
use phishscan_scanner::registration::RegistrationRecord;
use regex::Regex;
use std::net::IpAddr;
use tracing::debug;
use url::{Host, Url};

pub type ScoreResult = Result<Signal, Fault>;

/// How a scorer computes its signal.
#[derive(Clone, Copy)]
pub enum Rule {
    /// Pure string/number checks that cannot fail
    Infallible(fn(&ResolvedBundle) -> Signal),
    /// Depends on fetched, parsed or looked-up data; a fault yields `fault_default`
    Fallible {
        run: fn(&ResolvedBundle) -> ScoreResult,
        fault_default: Signal,
    },
}

#[derive(Clone, Copy)]
pub struct Scorer {
    pub name: &'static str,
    pub rule: Rule,
}

impl std::fmt::Debug for Scorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scorer").field("name", &self.name).finish()
    }
}

impl Scorer {
    const fn infallible(name: &'static str, run: fn(&ResolvedBundle) -> Signal) -> Self {
        Self {
            name,
            rule: Rule::Infallible(run),
        }
    }

    const fn fallible(
        name: &'static str,
        run: fn(&ResolvedBundle) -> ScoreResult,
        fault_default: Signal,
    ) -> Self {
        Self {
            name,
            rule: Rule::Fallible { run, fault_default },
        }
    }

    /// Raw outcome, with faults left visible
    pub fn try_evaluate(&self, bundle: &ResolvedBundle) -> ScoreResult {
        match self.rule {
            Rule::Infallible(run) => Ok(run(bundle)),
            Rule::Fallible { run, .. } => run(bundle),
        }
    }

    pub fn evaluate(&self, bundle: &ResolvedBundle) -> Signal {
        match self.rule {
            Rule::Infallible(run) => run(bundle),
            Rule::Fallible { run, fault_default } => run(bundle).unwrap_or_else(|fault| {
                debug!(
                    "Scorer '{}' faulted ({}), using default {}",
                    self.name,
                    fault,
                    fault_default.value()
                );
                fault_default
            }),
        }
    }

    pub fn fault_default(&self) -> Option<Signal> {
        match self.rule {
            Rule::Infallible(_) => None,
            Rule::Fallible { fault_default, .. } => Some(fault_default),
        }
    }
}

/// Scorer registry. Position in this table is the feature-vector index.
pub static SCORERS: [Scorer; FEATURE_COUNT] = [
    Scorer::fallible("literal_ip_host", literal_ip_host, Signal::Safe),
    Scorer::infallible("url_length", url_length),
    Scorer::infallible("known_shortener", known_shortener),
    Scorer::infallible("at_symbol", at_symbol),
    Scorer::infallible("double_slash_redirect", double_slash_redirect),
    Scorer::infallible("hyphen_in_domain", hyphen_in_domain),
    Scorer::infallible("subdomain_count", subdomain_count),
    Scorer::infallible("https_scheme", https_scheme),
    Scorer::fallible("registration_span", registration_span, Signal::Phishing),
    Scorer::fallible("favicon_domain_match", favicon_domain_match, Signal::Phishing),
    Scorer::infallible("non_standard_port", non_standard_port),
    Scorer::infallible("https_in_domain", https_in_domain),
    Scorer::fallible("external_media_density", external_media_density, Signal::Safe),
    Scorer::fallible("anchor_density", anchor_density, Signal::Safe),
    Scorer::fallible("script_link_density", script_link_density, Signal::Safe),
    Scorer::fallible("form_action_density", form_action_density, Signal::Safe),
    Scorer::infallible("mail_link_pattern", mail_link_pattern),
    Scorer::infallible("body_registration_mismatch", body_registration_mismatch),
    Scorer::fallible("redirect_chain_length", redirect_chain_length, Signal::Safe),
    Scorer::fallible("status_bar_tampering", status_bar_tampering, Signal::Safe),
    Scorer::fallible("right_click_disabled", right_click_disabled, Signal::Safe),
    Scorer::fallible("popup_usage", popup_usage, Signal::Safe),
    Scorer::fallible("iframe_usage", iframe_usage, Signal::Safe),
    Scorer::fallible("domain_age", domain_age, Signal::Phishing),
    Scorer::infallible("registration_presence", registration_presence),
    Scorer::infallible("traffic_rank", traffic_rank),
    Scorer::infallible("page_rank", page_rank),
    Scorer::fallible("search_index_presence", search_index_presence, Signal::Phishing),
    Scorer::infallible("inbound_link_density", inbound_link_density),
    Scorer::infallible("stats_report", stats_report),
];

static SHORTENER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"bit\.ly|goo\.gl|tinyurl|t\.co|is\.gd|cli\.gs").expect("valid shortener pattern")
});

// A character class, not an alternation: any of these characters matches.
static MAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[mail\(\)|mailto:?]").expect("valid mail pattern"));

static MOUSEOVER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<script>.+onmouseover.+</script>").expect("valid mouseover pattern")
});

static RIGHT_CLICK_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"event.button ?== ?2").expect("valid right-click pattern"));

static POPUP_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"alert\(").expect("valid popup pattern"));

static IFRAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<iframe>|<frameBorder>").expect("valid iframe pattern"));

const LONG_URL: usize = 75;
const MEDIUM_URL: usize = 54;
const DENSITY_LIMIT: usize = 10;
const FORM_LIMIT: usize = 5;
const MAX_REDIRECT_HOPS: usize = 2;
const INBOUND_LINK_MINIMUM: usize = 5;

fn registration(bundle: &ResolvedBundle) -> Result<&RegistrationRecord, Fault> {
    bundle
        .registration
        .as_ref()
        .ok_or_else(|| Fault::Absent("no registration record".to_string()))
}

fn fetched_body(bundle: &ResolvedBundle) -> Result<&str, Fault> {
    if bundle.is_fetched() {
        Ok(&bundle.body_text)
    } else {
        Err(Fault::Network(format!(
            "page not fetched (status {})",
            bundle.status_code
        )))
    }
}

// 1
pub fn literal_ip_host(bundle: &ResolvedBundle) -> ScoreResult {
    if bundle.url.parse::<IpAddr>().is_ok() {
        return Ok(Signal::Phishing);
    }

    let parsed = Url::parse(&bundle.url).map_err(|e| Fault::Parse(e.to_string()))?;
    Ok(Signal::flag(matches!(
        parsed.host(),
        Some(Host::Ipv4(_)) | Some(Host::Ipv6(_))
    )))
}

// 2
pub fn url_length(bundle: &ResolvedBundle) -> Signal {
    match bundle.url.chars().count() {
        len if len > LONG_URL => Signal::Phishing,
        len if len >= MEDIUM_URL => Signal::Neutral,
        _ => Signal::Safe,
    }
}

// 3
pub fn known_shortener(bundle: &ResolvedBundle) -> Signal {
    Signal::flag(SHORTENER_PATTERN.is_match(&bundle.url))
}

// 4
pub fn at_symbol(bundle: &ResolvedBundle) -> Signal {
    Signal::flag(bundle.url.contains('@'))
}

// 5
pub fn double_slash_redirect(bundle: &ResolvedBundle) -> Signal {
    let position = bundle
        .url
        .rfind("//")
        .map(|byte_index| bundle.url[..byte_index].chars().count());
    Signal::flag(position.is_some_and(|p| p > 6))
}

// 6
pub fn hyphen_in_domain(bundle: &ResolvedBundle) -> Signal {
    Signal::flag(bundle.domain.contains('-'))
}

// 7
pub fn subdomain_count(bundle: &ResolvedBundle) -> Signal {
    match bundle.domain.matches('.').count() {
        dots if dots > 2 => Signal::Phishing,
        2 => Signal::Neutral,
        _ => Signal::Safe,
    }
}

// 8
pub fn https_scheme(bundle: &ResolvedBundle) -> Signal {
    if bundle.url.starts_with("https") {
        Signal::Safe
    } else {
        Signal::Phishing
    }
}

// 9
pub fn registration_span(bundle: &ResolvedBundle) -> ScoreResult {
    let record = registration(bundle)?;
    let created = record.creation_date;
    let expires = record.expiration_date;

    let months = (expires.year() - created.year()) * 12
        + (expires.month() as i32 - created.month() as i32);
    Ok(if months >= 12 {
        Signal::Safe
    } else {
        Signal::Phishing
    })
}

// 10
pub fn favicon_domain_match(bundle: &ResolvedBundle) -> ScoreResult {
    let hrefs = bundle.document.link_hrefs()?;
    Ok(if hrefs.iter().any(|href| href.contains(&bundle.domain)) {
        Signal::Safe
    } else {
        Signal::Phishing
    })
}

// 11
pub fn non_standard_port(bundle: &ResolvedBundle) -> Signal {
    Signal::flag(bundle.domain.contains(':'))
}

// 12
pub fn https_in_domain(bundle: &ResolvedBundle) -> Signal {
    Signal::flag(bundle.domain.contains("https"))
}

// 13
pub fn external_media_density(bundle: &ResolvedBundle) -> ScoreResult {
    Ok(Signal::flag(bundle.document.media_count()? > DENSITY_LIMIT))
}

// 14
pub fn anchor_density(bundle: &ResolvedBundle) -> ScoreResult {
    Ok(Signal::flag(
        bundle.document.anchors_with_href()? > DENSITY_LIMIT,
    ))
}

// 15
pub fn script_link_density(bundle: &ResolvedBundle) -> ScoreResult {
    Ok(Signal::flag(
        bundle.document.script_sources_count()? > DENSITY_LIMIT,
    ))
}

// 16
pub fn form_action_density(bundle: &ResolvedBundle) -> ScoreResult {
    Ok(Signal::flag(bundle.document.form_actions_count()? > FORM_LIMIT))
}

// 17
pub fn mail_link_pattern(bundle: &ResolvedBundle) -> Signal {
    Signal::flag(MAIL_PATTERN.is_match(&bundle.url))
}

// 18
//
// Compares the page body against the raw registry answer. The two are
// practically never equal, so a fetched page almost always scores -1.
pub fn body_registration_mismatch(bundle: &ResolvedBundle) -> Signal {
    if !bundle.is_fetched() {
        return Signal::Safe;
    }

    let raw_record = bundle.registration.as_ref().map(|r| r.raw.as_str());
    Signal::flag(raw_record != Some(bundle.body_text.as_str()))
}

// 19
pub fn redirect_chain_length(bundle: &ResolvedBundle) -> ScoreResult {
    fetched_body(bundle)?;
    Ok(Signal::flag(
        bundle.response_history.len() > MAX_REDIRECT_HOPS,
    ))
}

// 20
pub fn status_bar_tampering(bundle: &ResolvedBundle) -> ScoreResult {
    Ok(Signal::flag(MOUSEOVER_PATTERN.is_match(fetched_body(bundle)?)))
}

// 21
pub fn right_click_disabled(bundle: &ResolvedBundle) -> ScoreResult {
    Ok(Signal::flag(
        RIGHT_CLICK_PATTERN.is_match(fetched_body(bundle)?),
    ))
}

// 22
pub fn popup_usage(bundle: &ResolvedBundle) -> ScoreResult {
    Ok(Signal::flag(POPUP_PATTERN.is_match(fetched_body(bundle)?)))
}

// 23
pub fn iframe_usage(bundle: &ResolvedBundle) -> ScoreResult {
    Ok(Signal::flag(IFRAME_PATTERN.is_match(fetched_body(bundle)?)))
}

// 24
pub fn domain_age(bundle: &ResolvedBundle) -> ScoreResult {
    let record = registration(bundle)?;
    let age_years = bundle.resolved_at.year() - record.creation_date.year();
    Ok(if age_years > 1 {
        Signal::Safe
    } else {
        Signal::Phishing
    })
}

// 25
pub fn registration_presence(bundle: &ResolvedBundle) -> Signal {
    if bundle.registration.is_some() {
        Signal::Safe
    } else {
        Signal::Phishing
    }
}

// 26: no traffic ranking source is available
pub fn traffic_rank(_bundle: &ResolvedBundle) -> Signal {
    Signal::Phishing
}

// 27: placeholder
pub fn page_rank(_bundle: &ResolvedBundle) -> Signal {
    Signal::Phishing
}

// 28
pub fn search_index_presence(bundle: &ResolvedBundle) -> ScoreResult {
    match bundle.search_indexed {
        Some(true) => Ok(Signal::Safe),
        Some(false) => Ok(Signal::Phishing),
        None => Err(Fault::Network("search index unavailable".to_string())),
    }
}

// 29
pub fn inbound_link_density(bundle: &ResolvedBundle) -> Signal {
    let anchors = bundle.document.anchors_with_href().unwrap_or(0);
    if anchors > INBOUND_LINK_MINIMUM {
        Signal::Safe
    } else {
        Signal::Phishing
    }
}

// 30: placeholder
pub fn stats_report(_bundle: &ResolvedBundle) -> Signal {
    Signal::Safe
}
