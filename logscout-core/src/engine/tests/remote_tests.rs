use crate::engine::{FORWARDED_HEADER, LogSource, RemoteDelegate, RequestScope, api_url};
use crate::error::ScoutError;
use crate::model::{Endpoint, SearchRequest, TailOutcome, TailRequest};
use http::{HeaderMap, HeaderValue};
use pretty_assertions::assert_eq;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Answers one request with `response` and hands back the raw request text.
async fn fake_peer(response: &'static str) -> (String, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut raw = Vec::new();
        let mut buf = [0u8; 4096];

        loop {
            let n = stream.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            raw.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&raw).to_string();
            if let Some(end) = text.find("\r\n\r\n") {
                let content_length = text[..end]
                    .lines()
                    .find_map(|l| {
                        let (k, v) = l.split_once(':')?;
                        k.eq_ignore_ascii_case("content-length")
                            .then(|| v.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if raw.len() >= end + 4 + content_length {
                    break;
                }
            }
        }

        stream.write_all(response.as_bytes()).await.unwrap();
        stream.shutdown().await.unwrap();
        let _ = tx.send(String::from_utf8_lossy(&raw).to_string());
    });

    (format!("http://{addr}"), rx)
}

fn delegate() -> RemoteDelegate {
    RemoteDelegate::new(reqwest::Client::new(), "lv")
}

#[test]
fn api_url_adds_prefix_to_bare_hosts() {
    assert_eq!(
        api_url("web2:8443", "lv", Endpoint::Search),
        "https://web2:8443/lv/search"
    );
    assert_eq!(
        api_url("http://web2/", "lv", Endpoint::TailLog),
        "http://web2/lv/tail-log"
    );
}

#[test]
fn api_url_keeps_existing_path_and_endpoint() {
    assert_eq!(
        api_url("https://web2/api", "lv", Endpoint::Stats),
        "https://web2/api/stats"
    );
    assert_eq!(
        api_url("https://web2/lv/errors", "lv", Endpoint::Errors),
        "https://web2/lv/errors"
    );
}

#[tokio::test]
async fn grep_forwards_headers_and_decodes_results() {
    // Arrange
    let (host, captured) = fake_peer(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 56\r\n\r\n\
         [{\"logfile\":\"/a.log\",\"lines\":[\"x\"],\"host\":\"p\",\"time\":3}]",
    )
    .await;
    let mut headers = HeaderMap::new();
    headers.insert("authorization", HeaderValue::from_static("Bearer t"));
    headers.insert("host", HeaderValue::from_static("caller"));
    let scope = RequestScope::from_headers(headers);
    let req = SearchRequest {
        value: "x".to_string(),
        logs: vec!["/a.log".to_string()],
        hosts: vec![host.clone(), "other".to_string()],
        ..SearchRequest::default()
    };

    // Act
    let results = delegate().grep(&scope, &host, &req).await.unwrap();

    // Assert
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].lines, vec!["x".to_string()]);

    let raw = captured.await.unwrap().to_lowercase();
    assert!(raw.starts_with("post /lv/search "));
    assert!(raw.contains("authorization: bearer t"));
    assert!(raw.contains(&format!("{FORWARDED_HEADER}: 1")));
    assert!(!raw.contains("host: caller"));
    assert!(raw.contains("\"hosts\":[\"http://127.0.0.1"));
    assert!(!raw.contains("other"));
}

#[tokio::test]
async fn peer_error_status_is_carried() {
    // Arrange
    let (host, _captured) = fake_peer(
        "HTTP/1.1 404 Not Found\r\nContent-Type: application/json\r\nContent-Length: 36\r\n\r\n\
         {\"message\":\"no such log\",\"code\":404}",
    )
    .await;
    let req = SearchRequest {
        value: "x".to_string(),
        logs: vec!["/a.log".to_string()],
        hosts: vec![host.clone()],
        ..SearchRequest::default()
    };

    // Act
    let err = delegate()
        .grep(&RequestScope::default(), &host, &req)
        .await
        .unwrap_err();

    // Assert
    match err {
        ScoutError::Delegate {
            status, message, ..
        } => {
            assert_eq!(status, Some(404));
            assert_eq!(message, "no such log");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn undecodable_body_is_a_delegate_error_without_status() {
    // Arrange
    let (host, _captured) =
        fake_peer("HTTP/1.1 200 OK\r\nContent-Length: 8\r\n\r\nnot json").await;
    let req = SearchRequest {
        value: "x".to_string(),
        logs: vec!["/a.log".to_string()],
        hosts: vec![host.clone()],
        ..SearchRequest::default()
    };

    // Act
    let err = delegate()
        .grep(&RequestScope::default(), &host, &req)
        .await
        .unwrap_err();

    // Assert
    assert!(matches!(err, ScoutError::Delegate { status: None, .. }));
    assert_eq!(err.status_code(), http::StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn peer_not_modified_maps_to_not_modified() {
    // Arrange
    let (host, _captured) = fake_peer("HTTP/1.1 304 Not Modified\r\n\r\n").await;
    let req = TailRequest {
        host: host.clone(),
        log: "/a.log".to_string(),
        log_structure: None,
        modtime: 42,
    };

    // Act
    let outcome = delegate().tail(&RequestScope::default(), &req).await.unwrap();

    // Assert
    assert_eq!(outcome, TailOutcome::NotModified);
}

#[tokio::test]
async fn unreachable_peer_is_a_delegate_error() {
    // Arrange
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let host = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);
    let req = TailRequest {
        host,
        log: "/a.log".to_string(),
        ..TailRequest::default()
    };

    // Act
    let result = delegate().tail(&RequestScope::default(), &req).await;

    // Assert
    assert!(matches!(result, Err(ScoutError::Delegate { .. })));
}
