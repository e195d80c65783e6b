use crate::cli::QueryCmd;
use crate::cli::query::execute;
use crate::engine::{LocalEngine, LocalityResolver, RemoteDelegate};
use crate::logging::OutputMode;
use crate::search::Orchestrator;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;

fn local_orchestrator() -> Orchestrator {
    Orchestrator::with_sources(
        LocalityResolver::new(Some("cli-host".to_string())),
        Arc::new(LocalEngine::default()),
        Arc::new(RemoteDelegate::new(reqwest::Client::new(), "lv")),
        Duration::from_secs(5),
    )
}

#[tokio::test]
async fn grep_prints_results_as_json() {
    // Arrange
    let dir = tempdir().unwrap();
    let log = dir.path().join("app.log");
    std::fs::write(&log, "alpha\nBETA\ngamma\n").unwrap();
    let cmd = QueryCmd::Grep {
        value: "beta".to_string(),
        logs: vec![log.to_string_lossy().into_owned()],
        hosts: vec!["localhost".to_string()],
    };
    let mut out = Vec::new();

    // Act
    execute(&local_orchestrator(), cmd, OutputMode::Raw, &mut out)
        .await
        .unwrap();

    // Assert
    let json: Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(json[0]["lines"][0], "BETA");
    assert_eq!(json[0]["host"], "localhost");
}

#[tokio::test]
async fn errors_uses_parsed_column_map() {
    // Arrange
    let dir = tempdir().unwrap();
    let log = dir.path().join("app.log");
    std::fs::write(
        &log,
        "t1|ann|r1|ERROR|svc|boom\nt2|ann|r2|INFO|svc|fine\nt3|ann|r3|WARN|svc|slow\n",
    )
    .unwrap();
    let cmd = QueryCmd::Errors {
        log: log.to_string_lossy().into_owned(),
        columns: "date=0,user=1,reqid=2,level=3,message=5".parse().unwrap(),
        host: "localhost".to_string(),
        from: 0,
        size: 10,
    };
    let mut out = Vec::new();

    // Act
    execute(&local_orchestrator(), cmd, OutputMode::Pretty, &mut out)
        .await
        .unwrap();

    // Assert
    let json: Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(json["pagination"]["total"], 2);
    assert_eq!(json["errors"][0]["reqid"], "r3");
    assert_eq!(json["errors"][1]["message"], "boom");
}

#[tokio::test]
async fn not_modified_tail_prints_nothing() {
    // Arrange
    let dir = tempdir().unwrap();
    let log = dir.path().join("app.log");
    std::fs::write(&log, "x\n").unwrap();
    let cmd = QueryCmd::Tail {
        log: log.to_string_lossy().into_owned(),
        host: "localhost".to_string(),
        since: i64::MAX,
    };
    let mut out = Vec::new();

    // Act
    execute(&local_orchestrator(), cmd, OutputMode::Raw, &mut out)
        .await
        .unwrap();

    // Assert
    assert!(out.is_empty());
}
