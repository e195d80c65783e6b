mod error_index_tests;

use crate::model::LogColumnMap;
use std::path::{Path, PathBuf};

pub(super) fn columns() -> LogColumnMap {
    LogColumnMap {
        timestamp: 0,
        user: 1,
        request_id: 2,
        level: 3,
        message: 5,
        date_format: None,
    }
}

pub(super) fn line(date: &str, user: &str, reqid: &str, level: &str, message: &str) -> String {
    format!("{date}|{user}|{reqid}|{level}|svc|{message}")
}

pub(super) fn write_log(dir: &Path, name: &str, lines: &[String]) -> PathBuf {
    let path = dir.join(name);
    let mut body = lines.join("\n");
    body.push('\n');
    std::fs::write(&path, body).unwrap();
    path
}
