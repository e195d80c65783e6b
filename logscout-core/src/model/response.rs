use crate::error::{ErrorBody, ScoutError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Outcome of one (host, log) unit of work.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(rename = "logfile")]
    pub log_file: String,
    #[serde(default)]
    pub lines: Vec<String>,
    #[serde(default)]
    pub host: String,
    /// Elapsed wall-clock time in milliseconds.
    #[serde(default)]
    pub time: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl SearchResult {
    pub fn failed(host: &str, log_file: &str, error: &ScoutError) -> Self {
        Self {
            log_file: log_file.to_string(),
            lines: Vec::new(),
            host: host.to_string(),
            time: 0,
            error: Some(error.to_body()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TailResult {
    #[serde(rename = "logfile")]
    pub log_file: String,
    pub lines: Vec<String>,
    #[serde(default)]
    pub host: String,
    pub time: u64,
    /// File modification time (Unix ms) at the moment of the read.
    pub modtime: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TailOutcome {
    Modified(TailResult),
    NotModified,
}

/// One file discovered by a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogDescriptor {
    pub name: String,
    pub size: u64,
    /// Unix ms.
    pub modtime: i64,
    #[serde(default)]
    pub host: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestRef {
    #[serde(rename = "reqid")]
    pub request_id: String,
    pub date: String,
}

/// Per-user aggregate produced by `stats`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStat {
    #[serde(rename = "lastTime")]
    pub last_time: String,
    pub counter: u64,
    pub levels: BTreeMap<String, u64>,
    pub errors: Vec<RequestRef>,
    pub warnings: Vec<RequestRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    #[serde(rename = "reqid")]
    pub request_id: String,
    pub date: String,
    pub user: String,
    pub level: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub total: usize,
    pub from: usize,
    pub size: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPage {
    pub errors: Vec<ErrorRecord>,
    pub pagination: Pagination,
}

/// `user -> level -> count` across every rotated file, plus distinct request keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectedStats {
    pub users: BTreeMap<String, BTreeMap<String, u64>>,
    #[serde(rename = "totalRequests")]
    pub total_requests: u64,
}

pub type UserStats = BTreeMap<String, UserStat>;
