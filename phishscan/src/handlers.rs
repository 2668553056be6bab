use anyhow::{Context, Result, bail};
use clap::ArgMatches;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use phishscan_core::report::generate_feature_report;
use phishscan_core::{AnalyzeRequest, Analyzer, Classifier, LogisticModel, assemble};
use phishscan_scanner::{Resolver, ResolverConfig};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, warn};
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_args(args: &ArgMatches) -> Self {
        match args.get_one::<String>("format").map(String::as_str) {
            Some("json") => OutputFormat::Json,
            _ => OutputFormat::Text,
        }
    }
}

// Helper functions for URL intake

/// Load URLs from either a file or a single URL argument
pub fn load_urls_from_source(
    url: Option<&String>,
    hosts_file: Option<&PathBuf>,
) -> Result<Vec<String>, String> {
    if let Some(hosts_file_path) = hosts_file {
        load_urls_from_file(hosts_file_path)
    } else if let Some(url) = url {
        parse_url_line(url)
            .map(|url| vec![url])
            .ok_or_else(|| "No URL provided".to_string())
    } else {
        Err("Either --url or --hosts-file must be provided".to_string())
    }
}

/// Load URLs from a file, one per line. Blank lines and `#` comments are skipped.
pub fn load_urls_from_file(path: &Path) -> Result<Vec<String>, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read hosts file {}: {}", path.display(), e))?;

    let urls: Vec<String> = content.lines().filter_map(parse_url_line).collect();

    if urls.is_empty() {
        return Err(format!("No valid URLs found in {}", path.display()));
    }

    Ok(urls)
}

/// Trim a line; `None` for blanks and comments. Lines that are not URLs are
/// kept, since malformed input is itself scored.
pub fn parse_url_line(line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    if Url::parse(line).is_err() {
        warn!("'{}' is not a well-formed URL, scoring it anyway", line);
    }
    Some(line.to_string())
}

pub fn resolver_config_from_args(args: &ArgMatches) -> ResolverConfig {
    let mut config = ResolverConfig::default();

    if let Some(secs) = args.get_one::<u64>("timeout") {
        config = config.with_fetch_timeout(Duration::from_secs(*secs));
    }
    if let Some(secs) = args.get_one::<u64>("registration-timeout") {
        config = config.with_registration_timeout(Duration::from_secs(*secs));
    }
    if let Some(endpoint) = args.get_one::<String>("rdap-endpoint") {
        config = config.with_rdap_endpoint(endpoint);
    }
    if let Some(endpoint) = args.get_one::<String>("search-endpoint") {
        config = config.with_search_endpoint(endpoint);
    }

    config.with_search_enabled(!args.get_flag("no-search"))
}

/// Load the model once at startup. A model that fails to load leaves the
/// analyzer without one, and every request reports it.
pub fn load_classifier(path: &str) -> Option<Arc<dyn Classifier>> {
    let expanded = shellexpand::tilde(path);
    match LogisticModel::load(Path::new(expanded.as_ref())) {
        Ok(model) => Some(Arc::new(model)),
        Err(e) => {
            error!("Error loading model from {}: {}", expanded, e);
            None
        }
    }
}

fn load_urls(args: &ArgMatches) -> Result<Vec<String>> {
    let url = args.get_one::<String>("url");
    let hosts_file = args.get_one::<PathBuf>("hosts-file");
    load_urls_from_source(url, hosts_file).map_err(anyhow::Error::msg)
}

fn spinner() -> Result<ProgressBar> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.enable_steady_tick(Duration::from_millis(100));
    Ok(spinner)
}

/// Banner goes to stderr, keeping stdout for results
pub fn print_banner() {
    eprintln!("{}", "═".repeat(60).bright_blue().bold());
    eprintln!(
        "{} {}",
        "  PHISHSCAN".bright_white().bold(),
        env!("CARGO_PKG_VERSION").bright_black()
    );
    eprintln!("{}", "═".repeat(60).bright_blue().bold());
    eprintln!();
}

pub async fn handle_analyze(sub_matches: &ArgMatches) -> Result<()> {
    let format = OutputFormat::from_args(sub_matches);
    let urls = load_urls(sub_matches)?;

    let resolver = Resolver::with_config(resolver_config_from_args(sub_matches))
        .context("Failed to build HTTP clients")?;
    let classifier = sub_matches
        .get_one::<String>("model")
        .and_then(|path| load_classifier(path));
    let analyzer = Analyzer::new(resolver, classifier);

    let mut failures = 0;
    for url in &urls {
        let progress = spinner()?;
        progress.set_message(format!("Analyzing {}", url));
        let result = analyzer.analyze(&AnalyzeRequest::for_url(url.as_str())).await;
        progress.finish_and_clear();

        match (result, format) {
            (Ok(response), OutputFormat::Json) => {
                println!("{}", serde_json::to_string(&response)?);
            }
            (Ok(response), OutputFormat::Text) => {
                let verdict = if response.prediction.starts_with("Safe") {
                    response.prediction.green().bold()
                } else {
                    response.prediction.red().bold()
                };
                println!("{} {} → {}", "✓".green().bold(), response.url, verdict);
            }
            (Err(e), OutputFormat::Json) => {
                failures += 1;
                println!("{}", serde_json::to_string(&e.to_body())?);
            }
            (Err(e), OutputFormat::Text) => {
                failures += 1;
                let body = e.to_body();
                match body.details {
                    Some(details) => eprintln!(
                        "{} {} [{}] {}: {}",
                        "✗".red().bold(),
                        url,
                        e.status_code(),
                        body.error,
                        details
                    ),
                    None => eprintln!(
                        "{} {} [{}] {}",
                        "✗".red().bold(),
                        url,
                        e.status_code(),
                        body.error
                    ),
                }
            }
        }
    }

    if failures > 0 {
        bail!("{} of {} URL(s) could not be analyzed", failures, urls.len());
    }
    Ok(())
}

pub async fn handle_features(sub_matches: &ArgMatches) -> Result<()> {
    let format = OutputFormat::from_args(sub_matches);
    let urls = load_urls(sub_matches)?;

    let resolver = Resolver::with_config(resolver_config_from_args(sub_matches))
        .context("Failed to build HTTP clients")?;

    for url in &urls {
        let progress = spinner()?;
        progress.set_message(format!("Resolving {}", url));
        let bundle = resolver.resolve(url).await;
        progress.finish_and_clear();

        let vector = assemble(&bundle)?;
        match format {
            OutputFormat::Json => {
                let line = serde_json::json!({
                    "url": bundle.url,
                    "features": vector,
                });
                println!("{}", line);
            }
            OutputFormat::Text => print!("{}", generate_feature_report(&bundle, &vector)),
        }
    }

    Ok(())
}
