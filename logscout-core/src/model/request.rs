use crate::error::ScoutError;
use crate::model::LogColumnMap;
use serde::{Deserialize, Serialize};

/// Grep `value` in every log of every host.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub logs: Vec<String>,
    #[serde(default)]
    pub hosts: Vec<String>,

    // Carried for operators' logs; no filtering semantics.
    #[serde(rename = "application", default, skip_serializing_if = "Option::is_none")]
    pub application_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<String>,
    #[serde(rename = "FromTime", default, skip_serializing_if = "Option::is_none")]
    pub from_time: Option<i64>,
    #[serde(rename = "ToTime", default, skip_serializing_if = "Option::is_none")]
    pub to_time: Option<i64>,
}

impl SearchRequest {
    pub fn validate(&self) -> Result<(), ScoutError> {
        if self.value.trim().is_empty() {
            return Err(ScoutError::client("search value must not be empty"));
        }
        require_non_empty("hosts", &self.hosts)?;
        require_non_empty("logs", &self.logs)
    }

    /// The same request narrowed to a single host, as sent to a peer.
    pub fn for_host(&self, host: &str) -> Self {
        Self {
            hosts: vec![host.to_string()],
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListLogsRequest {
    #[serde(default)]
    pub logs: Vec<String>,
    #[serde(default)]
    pub hosts: Vec<String>,
}

impl ListLogsRequest {
    pub fn validate(&self) -> Result<(), ScoutError> {
        require_non_empty("hosts", &self.hosts)?;
        require_non_empty("logs", &self.logs)
    }

    pub fn for_host(&self, host: &str) -> Self {
        Self {
            logs: self.logs.clone(),
            hosts: vec![host.to_string()],
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TailRequest {
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub log: String,
    #[serde(rename = "logStructure", default, skip_serializing_if = "Option::is_none")]
    pub log_structure: Option<LogColumnMap>,
    /// Last modification time the caller has seen (Unix ms); 0 means "always read".
    #[serde(default)]
    pub modtime: i64,
}

impl TailRequest {
    pub fn validate(&self) -> Result<(), ScoutError> {
        require_target(&self.host, &self.log)?;
        if let Some(map) = &self.log_structure {
            map.validate()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DownloadRequest {
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub log: String,
}

impl DownloadRequest {
    pub fn validate(&self) -> Result<(), ScoutError> {
        require_target(&self.host, &self.log)
    }

    /// File name offered to the client in `Content-Disposition`.
    pub fn file_name(&self) -> String {
        std::path::Path::new(&self.log)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.log.clone())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatsRequest {
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub log: String,
    #[serde(rename = "logStructure", default, skip_serializing_if = "Option::is_none")]
    pub log_structure: Option<LogColumnMap>,
}

impl StatsRequest {
    pub fn validate(&self) -> Result<(), ScoutError> {
        require_target(&self.host, &self.log)?;
        require_structure(self.log_structure.as_ref()).map(|_| ())
    }

    pub fn columns(&self) -> Result<&LogColumnMap, ScoutError> {
        structure(self.log_structure.as_ref())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorsRequest {
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub log: String,
    #[serde(rename = "logStructure", default, skip_serializing_if = "Option::is_none")]
    pub log_structure: Option<LogColumnMap>,
    /// Zero-based page number.
    #[serde(default)]
    pub from: usize,
    #[serde(default)]
    pub size: usize,
}

impl ErrorsRequest {
    pub fn validate(&self) -> Result<(), ScoutError> {
        require_target(&self.host, &self.log)?;
        require_structure(self.log_structure.as_ref()).map(|_| ())
    }

    pub fn columns(&self) -> Result<&LogColumnMap, ScoutError> {
        structure(self.log_structure.as_ref())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectStatsRequest {
    #[serde(rename = "logPath", default)]
    pub log_path: String,
    #[serde(rename = "logStructure", default, skip_serializing_if = "Option::is_none")]
    pub log_structure: Option<LogColumnMap>,
    /// Substring every counted timestamp must contain, e.g. `2021/03/04`.
    #[serde(default)]
    pub date: String,
}

impl CollectStatsRequest {
    pub fn validate(&self) -> Result<(), ScoutError> {
        if self.log_path.trim().is_empty() {
            return Err(ScoutError::client("logPath must not be empty"));
        }
        require_structure(self.log_structure.as_ref()).map(|_| ())
    }

    pub fn columns(&self) -> Result<&LogColumnMap, ScoutError> {
        structure(self.log_structure.as_ref())
    }
}

fn require_non_empty(name: &str, values: &[String]) -> Result<(), ScoutError> {
    if values.iter().all(|v| v.trim().is_empty()) {
        return Err(ScoutError::client(format!("{name} must not be empty")));
    }
    Ok(())
}

fn require_target(host: &str, log: &str) -> Result<(), ScoutError> {
    if host.trim().is_empty() {
        return Err(ScoutError::client("host must not be empty"));
    }
    if log.trim().is_empty() {
        return Err(ScoutError::client("log must not be empty"));
    }
    Ok(())
}

fn structure(map: Option<&LogColumnMap>) -> Result<&LogColumnMap, ScoutError> {
    map.ok_or_else(|| ScoutError::client("logStructure is required"))
}

fn require_structure(map: Option<&LogColumnMap>) -> Result<&LogColumnMap, ScoutError> {
    let map = structure(map)?;
    map.validate()?;
    Ok(map)
}
