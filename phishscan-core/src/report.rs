// Text rendering of an analyzed URL

use crate::scorers::SCORERS;
use crate::vector::FeatureVector;
use phishscan_scanner::ResolvedBundle;

const DIVIDER: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

/// Generate a feature report for one bundle and its vector
pub fn generate_feature_report(bundle: &ResolvedBundle, vector: &FeatureVector) -> String {
    let mut report = String::new();
    report.push_str(DIVIDER);
    report.push_str("\n\n");
    report.push_str("# Summary:\n");
    report.push_str(&format!("  URL: {}\n", bundle.url));
    report.push_str(&format!(
        "  Domain: {}\n",
        if bundle.domain.is_empty() {
            "(none)"
        } else {
            &bundle.domain
        }
    ));

    // Color code based on fetch outcome
    let status_str = if bundle.is_fetched() {
        format!("\x1b[32m{}\x1b[0m", bundle.status_code) // Green
    } else {
        format!("\x1b[31m{}\x1b[0m", bundle.status_code) // Red
    };
    report.push_str(&format!(
        "  Fetch: {:?} ({})\n",
        bundle.fetch_status, status_str
    ));
    report.push_str(&format!("  Redirects: {}\n", bundle.response_history.len()));

    match bundle.registration {
        Some(ref record) => report.push_str(&format!(
            "  Registration: created {}, expires {}\n",
            record.creation_date.format("%Y-%m-%d"),
            record.expiration_date.format("%Y-%m-%d")
        )),
        None => report.push_str("  Registration: absent\n"),
    }

    let search = match bundle.search_indexed {
        Some(true) => "indexed",
        Some(false) => "not indexed",
        None => "unknown",
    };
    report.push_str(&format!("  Search index: {}\n", search));

    report.push('\n');
    report.push_str(DIVIDER);
    report.push_str("\n\n");
    report.push_str("## Features\n");

    for (index, (scorer, signal)) in SCORERS.iter().zip(vector.signals()).enumerate() {
        let value = match signal.value() {
            -1 => format!("\x1b[31m{}\x1b[0m", signal), // Red
            0 => format!("\x1b[33m{}\x1b[0m", signal),  // Yellow
            _ => format!("\x1b[32m{}\x1b[0m", signal),  // Green
        };
        report.push_str(&format!("  {:>2}. {:<28} {}\n", index + 1, scorer.name, value));
    }

    let suspicious = vector.signals().iter().filter(|s| s.value() < 0).count();
    report.push_str(&format!(
        "\n  {} of {} signals phishing-indicative\n",
        suspicious,
        vector.len()
    ));

    report
}
