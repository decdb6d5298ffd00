//! Integration tests for source resolution against a mock HTTP server

use std::fs;
use tempfile::TempDir;
use wiremock::{
    matchers::{header, header_exists, method, path},
    Mock, MockServer, ResponseTemplate,
};

use sdk::types::SourceCategory;
use session_report::config::DataSourcesConfig;
use session_report::sources::{
    default_specs, HttpFetcher, SourceOutcome, SourceResolver, SourceSpec,
};
use session_report::staging::StagingArea;

fn data_sources(server: &MockServer) -> DataSourcesConfig {
    DataSourcesConfig {
        program_url: Some(format!("{}/program.html", server.uri())),
        lightning_talks_url: Some(format!("{}/talks.csv", server.uri())),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_url_override_beats_conventional_file() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/remote_attendees.csv"))
        .respond_with(ResponseTemplate::new(200).set_body_string("name\nRemote Person\n"))
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("attendees.csv"), "name\nLocal Person\n").unwrap();
    let staging = StagingArea::reset(temp.path().join("data")).unwrap();
    let resolver = SourceResolver::new(HttpFetcher::new().unwrap(), temp.path());

    let url = format!("{}/remote_attendees.csv", server.uri());
    let spec = SourceSpec::optional(SourceCategory::Attendees, Some(&url));
    let outcome = resolver.resolve(&spec, &staging).await.unwrap();

    assert_eq!(
        outcome,
        SourceOutcome::Resolved {
            origin: url,
            bytes: 19
        }
    );
    assert_eq!(
        staging.read_text(SourceCategory::Attendees).unwrap().as_deref(),
        Some("name\nRemote Person\n")
    );
}

#[tokio::test]
async fn test_failed_url_override_does_not_fall_back() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("notes.txt"), "local notes").unwrap();
    let staging = StagingArea::reset(temp.path().join("data")).unwrap();
    let resolver = SourceResolver::new(HttpFetcher::new().unwrap(), temp.path());

    let url = format!("{}/missing_notes.txt", server.uri());
    let spec = SourceSpec::optional(SourceCategory::Notes, Some(&url));
    let outcome = resolver.resolve(&spec, &staging).await.unwrap();

    assert!(!outcome.is_resolved());
    assert!(!staging.contains(SourceCategory::Notes));
}

#[tokio::test]
async fn test_http_errors_are_not_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/program.html"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/talks.csv"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let staging = StagingArea::reset(temp.path().join("data")).unwrap();
    let resolver = SourceResolver::new(HttpFetcher::new().unwrap(), temp.path());

    let specs = default_specs(&data_sources(&server), None, None);
    let report = resolver.resolve_all(&specs, &staging).await.unwrap();

    assert_eq!(report.resolved_count(), 0);
    assert_eq!(report.unavailable_count(), 4);
    match report.outcome(SourceCategory::Program) {
        Some(SourceOutcome::Unavailable { reason }) => assert!(reason.contains("404")),
        other => panic!("unexpected program outcome: {:?}", other),
    }
    assert_eq!(staging.entry_count().unwrap(), 0);
}

#[tokio::test]
async fn test_fetch_sends_browser_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/program.html"))
        .and(header_exists("user-agent"))
        .and(header("accept-language", "en-US,en;q=0.9"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::new().unwrap();
    let bytes = fetcher
        .fetch(&format!("{}/program.html", server.uri()))
        .await
        .unwrap();

    assert_eq!(bytes, b"<html></html>");

    let requests = server.received_requests().await.unwrap();
    let agent = requests[0]
        .headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .unwrap();
    assert!(agent.starts_with("Mozilla/5.0"));
}

#[tokio::test]
async fn test_resolve_all_stages_one_file_per_category() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/program.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>Program</html>"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/talks.csv"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Title,Session\nA,B\n"))
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("registrants.csv"), "name\nR\n").unwrap();
    fs::write(temp.path().join("meeting_notes.pdf"), b"%PDF-1.4").unwrap();
    fs::write(temp.path().join("notes.txt"), "plain notes").unwrap();
    let staging = StagingArea::reset(temp.path().join("data")).unwrap();
    let resolver = SourceResolver::new(HttpFetcher::new().unwrap(), temp.path());

    let specs = default_specs(&data_sources(&server), None, None);
    let report = resolver.resolve_all(&specs, &staging).await.unwrap();

    assert_eq!(report.resolved_count(), 4);
    assert_eq!(staging.entry_count().unwrap(), 4);
    assert_eq!(
        staging.read_text(SourceCategory::Notes).unwrap().as_deref(),
        Some("plain notes")
    );
    assert_eq!(
        staging.read_text(SourceCategory::Attendees).unwrap().as_deref(),
        Some("name\nR\n")
    );
}
