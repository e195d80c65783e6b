use integration_tests::harness::{LogFixture, TestServer};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

const COLUMNS: &str = r#"{"date":0,"user":1,"reqid":2,"level":3,"message":5}"#;

fn columns() -> Value {
    serde_json::from_str(COLUMNS).unwrap()
}

fn sample(logs: &LogFixture) -> String {
    logs.write(
        "app.log",
        &[
            "2021/03/04 10:00|alice|r1|ERROR|svc|boom",
            "2021/03/04 10:00|alice|r1|ERROR|svc|boom wrapped",
            "2021/03/04 10:01|alice|r2|WARN|svc|slow",
            "2021/03/04 10:02|bob|r3|INFO|svc|fine",
            "broken line",
        ],
    )
}

#[test]
fn stats_counts_each_request_once() {
    // Arrange
    let server = TestServer::start("node-stats");
    let logs = LogFixture::new();
    let app = sample(&logs);

    // Act
    let res = server
        .post(
            "stats",
            &json!({"host": "localhost", "log": app, "logStructure": columns()}),
        )
        .send()
        .expect("request failed");

    // Assert
    assert_eq!(res.status(), 200);
    let body: Value = res.json().unwrap();
    assert_eq!(body["alice"]["levels"]["ERROR"], 1);
    assert_eq!(body["alice"]["counter"], 2);
    assert_eq!(body["alice"]["errors"], json!([{"reqid": "r1", "date": "2021/03/04 10:00"}]));
    assert_eq!(body["alice"]["lastTime"], "2021/03/04 10:01");
    assert_eq!(body["bob"]["levels"]["INFO"], 1);
}

#[test]
fn stats_without_structure_is_rejected() {
    // Arrange
    let server = TestServer::start("node-stats-400");
    let logs = LogFixture::new();
    let app = sample(&logs);

    // Act
    let res = server
        .post("stats", &json!({"host": "localhost", "log": app}))
        .send()
        .expect("request failed");

    // Assert
    assert_eq!(res.status(), 400);
}

#[test]
fn errors_pages_most_recent_first() {
    // Arrange
    let server = TestServer::start("node-errors");
    let logs = LogFixture::new();
    let app = sample(&logs);

    // Act
    let res = server
        .post(
            "errors",
            &json!({"host": "localhost", "log": app, "logStructure": columns(), "from": 0, "size": 1}),
        )
        .send()
        .expect("request failed");

    // Assert
    let body: Value = res.json().unwrap();
    assert_eq!(body["pagination"], json!({"total": 2, "from": 0, "size": 1}));
    assert_eq!(body["errors"][0]["reqid"], "r2");
    assert_eq!(body["errors"][0]["level"], "WARN");
}

#[test]
fn collect_stats_spans_rotated_files() {
    // Arrange
    let server = TestServer::start("node-collect");
    let logs = LogFixture::new();
    let app = sample(&logs);
    logs.write(
        "app.log.1",
        &[
            "2021/03/04 08:00|carol|r9|ERROR|svc|x",
            "2021/03/03 08:00|carol|r8|ERROR|svc|other day",
        ],
    );

    // Act
    let res = server
        .post(
            "collect-stats",
            &json!({"logPath": app, "logStructure": columns(), "date": "2021/03/04"}),
        )
        .send()
        .expect("request failed");

    // Assert
    assert_eq!(res.status(), 200);
    let body: Value = res.json().unwrap();
    assert_eq!(body["totalRequests"], 4);
    assert_eq!(body["users"]["carol"], json!({"ERROR": 1}));
    assert_eq!(body["users"]["alice"], json!({"ERROR": 1, "WARN": 1}));
}
