use phishscan::commands::command_argument_builder;
use phishscan::handlers::*;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::NamedTempFile;

#[test]
fn test_parse_url_line_with_scheme() {
    let result = parse_url_line("  https://example.com/login \n");
    assert_eq!(result, Some("https://example.com/login".to_string()));
}

#[test]
fn test_parse_url_line_skips_blanks_and_comments() {
    assert_eq!(parse_url_line(""), None);
    assert_eq!(parse_url_line("   "), None);
    assert_eq!(parse_url_line("# suspicious campaign, 2024"), None);
}

#[test]
fn test_parse_url_line_keeps_malformed_input() {
    let result = parse_url_line("not a valid url!!!");
    assert_eq!(result, Some("not a valid url!!!".to_string()));
}

#[test]
fn test_load_urls_from_file() -> Result<(), Box<dyn std::error::Error>> {
    let mut temp_file = NamedTempFile::new()?;
    writeln!(temp_file, "# reported this week")?;
    writeln!(temp_file, "https://example.com")?;
    writeln!(temp_file)?; // Empty line
    writeln!(temp_file, "  http://192.168.0.1/paypal/login  ")?;
    writeln!(temp_file, "https://bit.ly/3xyz")?;

    let path = PathBuf::from(temp_file.path());
    let urls = load_urls_from_file(&path)?;

    assert_eq!(urls.len(), 3);
    assert_eq!(urls[0], "https://example.com");
    assert_eq!(urls[1], "http://192.168.0.1/paypal/login");
    assert_eq!(urls[2], "https://bit.ly/3xyz");

    Ok(())
}

#[test]
fn test_load_urls_from_file_empty() {
    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(temp_file).unwrap();
    writeln!(temp_file, "   ").unwrap();
    writeln!(temp_file, "# nothing here").unwrap();

    let path = PathBuf::from(temp_file.path());
    let result = load_urls_from_file(&path);

    assert!(result.is_err());
    assert!(result.unwrap_err().contains("No valid URLs"));
}

#[test]
fn test_load_urls_from_missing_file() {
    let path = PathBuf::from("/nonexistent/urls.txt");
    let result = load_urls_from_file(&path);
    assert!(result.unwrap_err().contains("Failed to read hosts file"));
}

#[test]
fn test_load_urls_from_source_single_url() {
    let url = "https://example.com/".to_string();
    let result = load_urls_from_source(Some(&url), None).unwrap();

    assert_eq!(result, vec!["https://example.com/".to_string()]);
}

#[test]
fn test_load_urls_from_source_no_input() {
    let result = load_urls_from_source(None, None);
    assert!(result.is_err());
    assert!(
        result
            .unwrap_err()
            .contains("Either --url or --hosts-file must be provided")
    );
}

#[test]
fn test_analyze_requires_model_and_target() {
    let missing_model =
        command_argument_builder().try_get_matches_from(["phishscan", "analyze", "-u", "https://a.b/"]);
    assert!(missing_model.is_err());

    let missing_target = command_argument_builder().try_get_matches_from([
        "phishscan", "analyze", "--model", "model.json",
    ]);
    assert!(missing_target.is_err());

    let both = command_argument_builder().try_get_matches_from([
        "phishscan",
        "features",
        "-u",
        "https://a.b/",
        "-H",
        "urls.txt",
    ]);
    assert!(both.is_err());
}

#[test]
fn test_resolver_config_defaults() {
    let matches = command_argument_builder()
        .try_get_matches_from(["phishscan", "features", "-u", "https://example.com/"])
        .unwrap();
    let (name, sub_matches) = matches.subcommand().unwrap();
    assert_eq!(name, "features");

    let config = resolver_config_from_args(sub_matches);
    assert_eq!(config.fetch_timeout, Duration::from_secs(5));
    assert_eq!(config.registration_timeout, Duration::from_secs(10));
    assert_eq!(config.rdap_endpoint, "https://rdap.org/");
    assert!(config.search_enabled);
    assert_eq!(OutputFormat::from_args(sub_matches), OutputFormat::Text);
}

#[test]
fn test_resolver_config_from_flags() {
    let matches = command_argument_builder()
        .try_get_matches_from([
            "phishscan",
            "analyze",
            "-u",
            "https://example.com/",
            "--model",
            "~/models/phish.json",
            "--timeout",
            "2",
            "--registration-timeout",
            "3",
            "--rdap-endpoint",
            "http://127.0.0.1:8080/rdap/",
            "--no-search",
            "--format",
            "json",
        ])
        .unwrap();
    let (_, sub_matches) = matches.subcommand().unwrap();

    let config = resolver_config_from_args(sub_matches);
    assert_eq!(config.fetch_timeout, Duration::from_secs(2));
    assert_eq!(config.registration_timeout, Duration::from_secs(3));
    assert_eq!(config.rdap_endpoint, "http://127.0.0.1:8080/rdap/");
    assert!(!config.search_enabled);
    assert_eq!(OutputFormat::from_args(sub_matches), OutputFormat::Json);
}

#[test]
fn test_load_classifier() {
    let mut model_file = NamedTempFile::new().unwrap();
    let weights = vec![0.1; 30];
    write!(
        model_file,
        "{}",
        serde_json::json!({ "weights": weights, "bias": 0.0 })
    )
    .unwrap();

    let path = model_file.path().to_str().unwrap();
    assert!(load_classifier(path).is_some());
    assert!(load_classifier("/nonexistent/model.json").is_none());
}
