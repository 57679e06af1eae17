//! Tests for the HTTP FHIR client against a mock FHIR server
mod common;

use common::bundle_json;
use fhirtime_core::ServerConfig;
use fhirtime_harness::{
    BenchmarkDriver, CacheControlPolicy, CollectingSink, FhirClient, RequestLogger, ResponseTimer,
    SearchTransport, TimerPhase, TransportError,
};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn server_config(validate_server: bool) -> ServerConfig {
    ServerConfig {
        timeout_secs: 5,
        connect_timeout_secs: 2,
        validate_server,
        ..ServerConfig::default()
    }
}

async fn mount_metadata(server: &MockServer, expected: u64) {
    Mock::given(method("GET"))
        .and(path("/fhir/metadata"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "resourceType": "CapabilityStatement",
            "status": "active"
        })))
        .expect(expected)
        .mount(server)
        .await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_search_parses_bundle_and_sends_no_store() {
    let server = MockServer::start().await;
    mount_metadata(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/fhir/Patient"))
        .and(query_param("family", "SMITH"))
        .and(header("cache-control", "no-store"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(bundle_json(&[("Smith", "John"), ("Smith", "Adam")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let base = format!("{}/fhir", server.uri());
    let records = tokio::task::spawn_blocking(move || {
        let client = FhirClient::new(&base, &server_config(true)).unwrap();
        let directive = CacheControlPolicy::default().build(true);
        client.search("SMITH", &directive)
    })
    .await
    .unwrap()
    .unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[1].names[0].first_given(), Some("Adam"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_cached_search_sends_no_cache_control_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/fhir/Patient"))
        .respond_with(ResponseTemplate::new(200).set_body_json(bundle_json(&[])))
        .mount(&server)
        .await;

    let base = format!("{}/fhir", server.uri());
    tokio::task::spawn_blocking(move || {
        let client = FhirClient::new(&base, &server_config(false)).unwrap();
        client.search("JONES", &CacheControlPolicy::default().build(false))
    })
    .await
    .unwrap()
    .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("cache-control").is_none());
    assert_eq!(
        requests[0]
            .headers
            .get("accept")
            .and_then(|v| v.to_str().ok()),
        Some("application/fhir+json")
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_capability_fetch_is_the_handshake() {
    let server = MockServer::start().await;
    mount_metadata(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/fhir/Patient"))
        .respond_with(ResponseTemplate::new(200).set_body_json(bundle_json(&[("Doe", "Jane")])))
        .expect(3)
        .mount(&server)
        .await;

    let base = format!("{}/fhir", server.uri());
    let (phase, observations, reports) = tokio::task::spawn_blocking(move || {
        let sink = Arc::new(CollectingSink::new());
        let timer = Arc::new(ResponseTimer::new(1).unwrap().with_sink(sink.clone()));
        let mut client = FhirClient::new(&base, &server_config(true)).unwrap();
        client.register_observer(Arc::new(RequestLogger));
        client.register_observer(timer.clone());

        for _ in 0..3 {
            client.search("DOE", &CacheControlPolicy::default().build(false)).unwrap();
        }
        (timer.phase(), timer.observations(), sink.len())
    })
    .await
    .unwrap();

    assert_eq!(phase, TimerPhase::Accumulating);
    assert_eq!(observations, 3);
    assert_eq!(reports, 3);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_without_validation_first_search_is_the_handshake() {
    let server = MockServer::start().await;
    mount_metadata(&server, 0).await;
    Mock::given(method("GET"))
        .and(path("/fhir/Patient"))
        .respond_with(ResponseTemplate::new(200).set_body_json(bundle_json(&[])))
        .expect(2)
        .mount(&server)
        .await;

    let base = format!("{}/fhir", server.uri());
    let observations = tokio::task::spawn_blocking(move || {
        let timer = Arc::new(ResponseTimer::new(5).unwrap());
        let mut client = FhirClient::new(&base, &server_config(false)).unwrap();
        client.register_observer(timer.clone());

        client.search("A", &CacheControlPolicy::default().build(false)).unwrap();
        client.search("B", &CacheControlPolicy::default().build(false)).unwrap();
        timer.observations()
    })
    .await
    .unwrap();

    assert_eq!(observations, 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_error_status_is_observed_and_returned() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/fhir/Patient"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let base = format!("{}/fhir", server.uri());
    let (result, phase) = tokio::task::spawn_blocking(move || {
        let timer = Arc::new(ResponseTimer::new(1).unwrap());
        let mut client = FhirClient::new(&base, &server_config(false)).unwrap();
        client.register_observer(timer.clone());

        let result = client.search("SMITH", &CacheControlPolicy::default().build(false));
        (result, timer.phase())
    })
    .await
    .unwrap();

    match result {
        Err(TransportError::Status { status, url }) => {
            assert_eq!(status, 500);
            assert!(url.ends_with("/fhir/Patient?family=SMITH"));
        }
        other => panic!("Expected Status error, got {:?}", other),
    }
    assert_eq!(phase, TimerPhase::Accumulating);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_non_bundle_body_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/fhir/Patient"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let base = format!("{}/fhir", server.uri());
    let result = tokio::task::spawn_blocking(move || {
        let client = FhirClient::new(&base, &server_config(false)).unwrap();
        client.search("SMITH", &CacheControlPolicy::default().build(false))
    })
    .await
    .unwrap();

    assert!(matches!(result, Err(TransportError::Malformed(_))));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_failed_capability_fetch_is_not_repeated() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/fhir/metadata"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/fhir/Patient"))
        .respond_with(ResponseTemplate::new(200).set_body_json(bundle_json(&[("Smith", "John")])))
        .expect(6)
        .mount(&server)
        .await;

    let base = format!("{}/fhir", server.uri());
    let (summary, observations, reports) = tokio::task::spawn_blocking(move || {
        let sink = Arc::new(CollectingSink::new());
        let timer = Arc::new(ResponseTimer::new(2).unwrap().with_sink(sink.clone()));
        let mut client = FhirClient::new(&base, &server_config(true)).unwrap();
        client.register_observer(timer.clone());

        let driver = BenchmarkDriver::new(client, CacheControlPolicy::default())
            .with_settle_delay(Duration::ZERO);
        let summary = driver.run(3, 2, &["SMITH", "JONES"]).unwrap();
        (summary, timer.observations(), sink.len())
    })
    .await
    .unwrap();

    assert_eq!(summary.total_failures(), 0);
    assert_eq!(summary.total_calls(), 6);
    // the 404 was the handshake; every search is a steady-state observation
    assert_eq!(observations, 6);
    assert_eq!(reports, 3);

    let metadata_requests = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path() == "/fhir/metadata")
        .count();
    assert_eq!(metadata_requests, 1);
}

#[test]
fn test_unreachable_server() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let client = FhirClient::new(&format!("http://127.0.0.1:{}/fhir", port), &server_config(true))
        .unwrap();
    let result = client.search("SMITH", &CacheControlPolicy::default().build(false));

    assert!(
        matches!(result, Err(TransportError::Connect(_)) | Err(TransportError::Request(_))),
        "unexpected result: {:?}",
        result
    );
}
