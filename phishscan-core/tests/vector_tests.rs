// Tests for feature vector assembly

use chrono::{TimeZone, Utc};
use phishscan_core::scorers::SCORERS;
use phishscan_core::signal::Signal;
use phishscan_core::vector::{FEATURE_COUNT, FeatureVector, assemble, assemble_with};
use phishscan_core::ExtractionError;
use phishscan_scanner::bundle::TRANSPORT_FAILURE_PLACEHOLDER;
use phishscan_scanner::registration::RegistrationRecord;
use phishscan_scanner::{
    FetchOutcome, FetchStatus, ResolvedBundle, Resolver, ResolverConfig, ScanError,
};
use std::time::Duration;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

const EXAMPLE_PAGE: &str = r#"<html>
<head>
    <title>Example Domain</title>
    <link rel="icon" href="https://example.com/favicon.ico">
</head>
<body>
    <h1>Example Domain</h1>
    <a href="https://example.com/about">About</a>
    <a href="https://www.iana.org/domains/example">More information...</a>
</body>
</html>"#;

fn example_bundle() -> ResolvedBundle {
    let registration = RegistrationRecord::new(
        Utc.with_ymd_and_hms(2020, 1, 10, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2022, 1, 10, 0, 0, 0).unwrap(),
    );

    ResolvedBundle::new(
        "https://example.com/",
        FetchOutcome::Success {
            body: EXAMPLE_PAGE.to_string(),
            history: Vec::new(),
        },
        Some(registration),
        Some(true),
        Utc.with_ymd_and_hms(2026, 1, 15, 0, 0, 0).unwrap(),
    )
}

fn failed_bundle(url: &str) -> ResolvedBundle {
    ResolvedBundle::new(
        url,
        FetchOutcome::Transport(ScanError::Other("dns failure".to_string())),
        None,
        None,
        Utc.with_ymd_and_hms(2026, 1, 15, 0, 0, 0).unwrap(),
    )
}

// ============================================================================
// Assembly
// ============================================================================

#[test]
fn test_registry_has_one_scorer_per_feature() {
    assert_eq!(SCORERS.len(), FEATURE_COUNT);
}

#[test]
fn test_pinned_vector_for_example_page() {
    let vector = assemble(&example_bundle()).unwrap();

    assert_eq!(
        vector.values(),
        vec![
            1, 1, 1, 1, 1, 1, 1, 1, 1, 1, // 1-10
            1, 1, 1, 1, 1, 1, -1, -1, 1, 1, // 11-20
            1, 1, 1, 1, 1, -1, -1, 1, -1, 1, // 21-30
        ]
    );

    // https, registration span, hyphen, anchor density
    assert_eq!(vector[7], Signal::Safe);
    assert_eq!(vector[8], Signal::Safe);
    assert_eq!(vector[5], Signal::Safe);
    assert_eq!(vector[13], Signal::Safe);
}

#[test]
fn test_vector_is_always_complete_and_ternary() {
    let bundles = vec![
        example_bundle(),
        failed_bundle("https://example.com/"),
        failed_bundle(""),
        failed_bundle("http://192.168.0.1/login"),
        ResolvedBundle::new(
            "https://example.com/",
            FetchOutcome::NonSuccess { status_code: 404 },
            None,
            None,
            Utc::now(),
        ),
    ];

    for bundle in &bundles {
        let vector = assemble(bundle).unwrap();
        assert_eq!(vector.len(), FEATURE_COUNT);
        assert!(vector.values().iter().all(|v| (-1..=1).contains(v)));
    }
}

#[test]
fn test_assembly_is_deterministic() {
    let bundle = example_bundle();
    assert_eq!(assemble(&bundle).unwrap(), assemble(&bundle).unwrap());
}

#[tokio::test]
async fn test_resolve_and_assemble_twice_against_stable_site() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/login"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html")
                .set_body_string(
                    r#"<html><head><link rel="icon" href="/favicon.ico"></head>
                    <body><form action="/post"></form><a href="/a">a</a>
                    <script>alert("verify your account")</script></body></html>"#,
                ),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rdap/domain/127.0.0.1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"events": [
                {"eventAction": "registration", "eventDate": "2025-11-02T00:00:00Z"},
                {"eventAction": "expiration", "eventDate": "2026-05-02T00:00:00Z"}
            ]}"#,
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body><a class="result__a" href="/r">hit</a></body></html>"#,
        ))
        .mount(&mock_server)
        .await;

    let resolver = Resolver::with_config(
        ResolverConfig::default()
            .with_fetch_timeout(Duration::from_secs(2))
            .with_registration_timeout(Duration::from_secs(2))
            .with_rdap_endpoint(format!("{}/rdap/", mock_server.uri()))
            .with_search_endpoint(format!("{}/search", mock_server.uri())),
    )
    .unwrap();
    let url = format!("{}/old", mock_server.uri());

    let first = resolver.resolve(&url).await;
    let first_vector = assemble(&first).unwrap();
    let second = resolver.resolve(&url).await;
    let second_vector = assemble(&second).unwrap();

    assert_eq!(first_vector, second_vector);

    // every lookup succeeded, so the externally sourced signals are real values
    assert_eq!(first.fetch_status, FetchStatus::Ok);
    assert_eq!(first.response_history.len(), 1);
    assert!(first.registration.is_some());
    assert_eq!(first.search_indexed, Some(true));
    assert_eq!(first_vector[8], Signal::Phishing); // six-month registration
    assert_eq!(first_vector[10], Signal::Phishing); // explicit port
    assert_eq!(first_vector[21], Signal::Phishing); // alert(
    assert_eq!(first_vector[27], Signal::Safe); // indexed
}

#[test]
fn test_short_scorer_set_is_rejected() {
    let result = assemble_with(&SCORERS[..29], &example_bundle());

    match result {
        Err(ExtractionError::Length { expected, actual }) => {
            assert_eq!(expected, 30);
            assert_eq!(actual, 29);
        }
        other => panic!("expected length error, got {:?}", other),
    }
}

// ============================================================================
// Degraded Resolution
// ============================================================================

#[test]
fn test_transport_failure_uses_fallback_behaviour() {
    let bundle = failed_bundle("https://example.com/");
    assert_eq!(bundle.fetch_status, FetchStatus::TimeoutOrError);
    assert_eq!(bundle.body_text, TRANSPORT_FAILURE_PLACEHOLDER);

    let vector = assemble(&bundle).unwrap();

    // document-density scorers 13-16 on the minimal document
    for index in 12..16 {
        assert_eq!(vector[index], Signal::Safe, "scorer {}", index + 1);
    }
    // redirect and body-pattern scorers 19-23 fall back
    for index in 18..23 {
        assert_eq!(vector[index], Signal::Safe, "scorer {}", index + 1);
    }
}

#[test]
fn test_absent_registration_forces_defaults() {
    let vector = assemble(&failed_bundle("https://example.com/")).unwrap();

    assert_eq!(vector[8], Signal::Phishing);
    assert_eq!(vector[23], Signal::Phishing);
    assert_eq!(vector[24], Signal::Phishing);
}

#[test]
fn test_scorers_are_independent() {
    let long_url = format!("https://example.com/{}", "a".repeat(60));
    assert_eq!(long_url.len(), 80);

    let vector = assemble(&failed_bundle(&long_url)).unwrap();
    assert_eq!(vector[1], Signal::Phishing);
    assert_eq!(vector[0], Signal::Safe);

    let ip_vector = assemble(&failed_bundle("http://192.168.0.1/login")).unwrap();
    assert_eq!(ip_vector[0], Signal::Phishing);
    assert_eq!(ip_vector[1], Signal::Safe);
}

// ============================================================================
// FeatureVector
// ============================================================================

#[test]
fn test_feature_vector_serialization() {
    let vector = assemble(&example_bundle()).unwrap();
    let json = serde_json::to_string(&vector).unwrap();
    assert!(json.starts_with("[1,1,"));

    let back: FeatureVector = serde_json::from_str(&json).unwrap();
    assert_eq!(back, vector);

    assert!(serde_json::from_str::<FeatureVector>("[1,1,1]").is_err());
}

#[test]
fn test_feature_vector_numeric_form() {
    let vector = assemble(&example_bundle()).unwrap();
    let numeric = vector.to_f64();

    assert_eq!(numeric.len(), FEATURE_COUNT);
    assert_eq!(numeric[16], -1.0);
    assert_eq!(numeric[29], 1.0);
}
