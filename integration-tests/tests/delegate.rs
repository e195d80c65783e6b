use integration_tests::harness::{LogFixture, TestServer};
use logscout_core::engine::{LogSource, RemoteDelegate, RequestScope};
use logscout_core::model::{SearchRequest, TailOutcome, TailRequest};
use pretty_assertions::assert_eq;
use tokio::runtime::Runtime;

fn delegate() -> RemoteDelegate {
    let client = reqwest::Client::builder()
        .danger_accept_invalid_certs(true)
        .build()
        .unwrap();
    RemoteDelegate::new(client, "lv")
}

#[test]
fn delegate_answers_match_the_peer_engine() {
    // Arrange
    let peer = TestServer::start("peer-b");
    let logs = LogFixture::new();
    let app = logs.write("app.log", &["ok", "NEEDLE found", "ok"]);
    let req = SearchRequest {
        value: "needle".to_string(),
        logs: vec![app.clone()],
        hosts: vec![peer.base_url().to_string()],
        ..SearchRequest::default()
    };
    let rt = Runtime::new().unwrap();

    // Act
    let results = rt
        .block_on(delegate().grep(&RequestScope::default(), peer.base_url(), &req))
        .unwrap();

    // Assert
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].lines, vec!["NEEDLE found".to_string()]);
    assert_eq!(results[0].log_file, app);
}

#[test]
fn delegated_tail_honours_not_modified() {
    // Arrange
    let peer = TestServer::start("peer-c");
    let logs = LogFixture::new();
    let app = logs.write("app.log", &["a", "b"]);
    let mut req = TailRequest {
        host: peer.base_url().to_string(),
        log: app,
        ..TailRequest::default()
    };
    let rt = Runtime::new().unwrap();
    let scope = RequestScope::default();

    // Act
    let first = rt.block_on(delegate().tail(&scope, &req)).unwrap();
    let TailOutcome::Modified(first) = first else {
        panic!("expected content on first tail");
    };
    req.modtime = first.modtime;
    let second = rt.block_on(delegate().tail(&scope, &req)).unwrap();

    // Assert
    assert_eq!(first.lines, vec!["a".to_string(), "b".to_string()]);
    assert_eq!(second, TailOutcome::NotModified);
}

#[test]
fn peer_client_errors_keep_their_status() {
    // Arrange
    let peer = TestServer::start("peer-d");
    let req = TailRequest {
        host: peer.base_url().to_string(),
        log: String::new(),
        ..TailRequest::default()
    };
    let rt = Runtime::new().unwrap();

    // Act
    let err = rt
        .block_on(delegate().tail(&RequestScope::default(), &req))
        .unwrap_err();

    // Assert
    assert_eq!(err.status_code(), http::StatusCode::BAD_REQUEST);
}
