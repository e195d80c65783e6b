use integration_tests::harness::{LogFixture, TestServer};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::fs::File;
use std::time::{Duration, SystemTime};

#[test]
fn search_greps_local_logs_case_insensitively() {
    // Arrange
    let server = TestServer::start("node-search");
    let logs = LogFixture::new();
    let app = logs.write("app.log", &["t1|a|r1|INFO|svc|started", "t2|a|r2|ERROR|svc|Failed"]);
    let other = logs.write("other.log", &["nothing to see"]);

    // Act
    let res = server
        .post(
            "search",
            &json!({
                "value": "failed",
                "logs": [app, other],
                "hosts": ["node-search"],
                "application": "billing",
                "env": "uat"
            }),
        )
        .send()
        .expect("request failed");

    // Assert
    assert_eq!(res.status(), 200);
    let body: Value = res.json().unwrap();
    let results = body.as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["logfile"], app.as_str());
    assert_eq!(results[0]["lines"], json!(["t2|a|r2|ERROR|svc|Failed"]));
    assert_eq!(results[0]["host"], "node-search");
    assert_eq!(results[1]["lines"], json!([]));
}

#[test]
fn search_without_value_is_rejected() {
    // Arrange
    let server = TestServer::start("node-search-empty");

    // Act
    let res = server
        .post("search", &json!({"value": "", "logs": ["/x.log"], "hosts": ["localhost"]}))
        .send()
        .expect("request failed");

    // Assert
    assert_eq!(res.status(), 400);
}

#[test]
fn missing_file_is_reported_per_result() {
    // Arrange
    let server = TestServer::start("node-search-missing");
    let logs = LogFixture::new();
    let missing = logs.path("gone.log").to_string_lossy().into_owned();

    // Act
    let res = server
        .post("search", &json!({"value": "x", "logs": [missing], "hosts": ["localhost"]}))
        .send()
        .expect("request failed");

    // Assert
    assert_eq!(res.status(), 200);
    let body: Value = res.json().unwrap();
    assert_eq!(body[0]["error"]["code"], 500);
}

#[test]
fn list_logs_is_newest_first() {
    // Arrange
    let server = TestServer::start("node-list");
    let logs = LogFixture::new();
    let base = SystemTime::now() - Duration::from_secs(600);
    for (name, offset) in [("b.log", 20), ("a.log", 10), ("c.log", 30)] {
        logs.write(name, &["x"]);
        File::options()
            .write(true)
            .open(logs.path(name))
            .unwrap()
            .set_modified(base + Duration::from_secs(offset))
            .unwrap();
    }

    // Act
    let res = server
        .post(
            "list-logs",
            &json!({"logs": [logs.path("a.log")], "hosts": ["localhost"]}),
        )
        .send()
        .expect("request failed");

    // Assert
    let body: Vec<Value> = res.json().unwrap();
    let names: Vec<_> = body
        .iter()
        .map(|d| d["name"].as_str().unwrap().rsplit('/').next().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["c.log", "b.log", "a.log"]);
    assert_eq!(body[0]["host"], "localhost");
}

#[test]
fn download_sends_attachment() {
    // Arrange
    let server = TestServer::start("node-download");
    let logs = LogFixture::new();
    let app = logs.write("app.log", &["line one", "line two"]);

    // Act
    let res = server
        .post("download-log", &json!({"host": "localhost", "log": app}))
        .send()
        .expect("request failed");

    // Assert
    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["content-type"], "application/octet-stream");
    assert_eq!(
        res.headers()["content-disposition"],
        "attachment; filename=\"app.log\""
    );
    assert_eq!(res.text().unwrap(), "line one\nline two\n");
}
