use integration_tests::harness::{LogFixture, TestServer};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

#[test]
fn tail_then_poll_with_known_modtime() {
    // Arrange
    let server = TestServer::start("node-tail");
    let logs = LogFixture::new();
    let app = logs.write("app.log", &["one", "two", "\u{1b}[0;31mthree\u{1b}[0m"]);

    // Act
    let first = server
        .post("tail-log", &json!({"host": "node-tail", "log": app}))
        .send()
        .expect("request failed");
    let first_status = first.status();
    let body: Value = first.json().unwrap();
    let poll = server
        .post(
            "tail",
            &json!({"host": "node-tail", "log": app, "modtime": body["modtime"]}),
        )
        .send()
        .expect("request failed");

    // Assert
    assert_eq!(first_status, 200);
    assert_eq!(body["lines"], json!(["one", "two", "three"]));
    assert_eq!(body["host"], "node-tail");
    assert_eq!(poll.status(), 304);
    assert!(poll.bytes().unwrap().is_empty());
}

#[test]
fn tail_of_missing_file_is_server_error() {
    // Arrange
    let server = TestServer::start("node-tail-missing");
    let logs = LogFixture::new();

    // Act
    let res = server
        .post(
            "tail",
            &json!({"host": "localhost", "log": logs.path("none.log")}),
        )
        .send()
        .expect("request failed");

    // Assert
    assert_eq!(res.status(), 500);
    let body: Value = res.json().unwrap();
    assert_eq!(body["code"], 500);
}
