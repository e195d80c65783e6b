use super::{columns, line, write_log};
use crate::stats::error_page;
use pretty_assertions::assert_eq;
use tempfile::tempdir;

fn twelve_errors() -> Vec<String> {
    let mut lines = Vec::new();
    for i in 0..12 {
        lines.push(line(&format!("t{i:02}"), "u", &format!("r{i:02}"), "ERROR", "failed"));
        lines.push(line(&format!("t{i:02}"), "u", &format!("i{i:02}"), "INFO", "noise"));
    }
    lines
}

#[tokio::test]
async fn first_page_is_most_recent_first() {
    // Arrange
    let dir = tempdir().unwrap();
    let path = write_log(dir.path(), "app.log", &twelve_errors());

    // Act
    let page = error_page(&path, &columns(), 0, 10).await.unwrap();

    // Assert
    assert_eq!(page.errors.len(), 10);
    assert_eq!(page.pagination.total, 12);
    assert_eq!(page.errors[0].request_id, "r11");
    assert_eq!(page.errors[9].request_id, "r02");
}

#[tokio::test]
async fn last_partial_page() {
    // Arrange
    let dir = tempdir().unwrap();
    let path = write_log(dir.path(), "app.log", &twelve_errors());

    // Act
    let page = error_page(&path, &columns(), 1, 10).await.unwrap();

    // Assert
    let ids: Vec<_> = page.errors.iter().map(|e| e.request_id.as_str()).collect();
    assert_eq!(ids, vec!["r01", "r00"]);
}

#[tokio::test]
async fn out_of_range_page_is_empty() {
    // Arrange
    let dir = tempdir().unwrap();
    let path = write_log(dir.path(), "app.log", &twelve_errors());

    // Act
    let page = error_page(&path, &columns(), 3, 4).await.unwrap();

    // Assert
    assert!(page.errors.is_empty());
    assert_eq!(page.pagination.total, 12);
    assert_eq!(page.pagination.from, 3);
    assert_eq!(page.pagination.size, 4);
}

#[tokio::test]
async fn zero_size_page_is_empty() {
    // Arrange
    let dir = tempdir().unwrap();
    let path = write_log(dir.path(), "app.log", &twelve_errors());

    // Act
    let page = error_page(&path, &columns(), 0, 0).await.unwrap();

    // Assert
    assert!(page.errors.is_empty());
    assert_eq!(page.pagination.total, 12);
}

#[tokio::test]
async fn retried_error_appears_once_but_warning_of_same_request_is_kept() {
    // Arrange
    let dir = tempdir().unwrap();
    let path = write_log(
        dir.path(),
        "app.log",
        &[
            line("t1", "u", "r1", "WARN", "slow"),
            line("t2", "u", "r1", "ERROR", "failed"),
            line("t3", "u", "r1", "\x1b[31mERROR\x1b[0m", "failed again"),
        ],
    );

    // Act
    let page = error_page(&path, &columns(), 0, 10).await.unwrap();

    // Assert
    let levels: Vec<_> = page.errors.iter().map(|e| e.level.as_str()).collect();
    assert_eq!(levels, vec!["ERROR", "WARN"]);
    assert_eq!(page.errors[0].message, "failed");
}
