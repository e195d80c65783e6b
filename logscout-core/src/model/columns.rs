use crate::error::ScoutError;
use chrono::NaiveDateTime;
use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Column layout of a `|`-delimited log file.
///
/// Indices are zero-based positions after splitting a line on `|`. A line
/// with fewer fields than [`LogColumnMap::min_tokens`] is malformed and is
/// skipped by every scanner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogColumnMap {
    #[serde(rename = "date")]
    pub timestamp: usize,
    pub user: usize,
    #[serde(rename = "reqid")]
    pub request_id: usize,
    pub level: usize,
    pub message: usize,

    /// Optional chrono strftime pattern for the timestamp column.
    #[serde(
        rename = "dateFormat",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub date_format: Option<String>,
}

impl LogColumnMap {
    /// Smallest field count a line needs so that every referenced column exists.
    pub fn min_tokens(&self) -> usize {
        [
            self.timestamp,
            self.user,
            self.request_id,
            self.level,
            self.message,
        ]
        .into_iter()
        .max()
        .unwrap_or_default()
            + 1
    }

    /// Checked once at request entry; scanners assume a valid map.
    pub fn validate(&self) -> Result<(), ScoutError> {
        let columns = [
            ("date", self.timestamp),
            ("user", self.user),
            ("reqid", self.request_id),
            ("level", self.level),
            ("message", self.message),
        ];

        for (i, (name, idx)) in columns.iter().enumerate() {
            if let Some((other, _)) = columns[i + 1..].iter().find(|(_, o)| o == idx) {
                return Err(ScoutError::client(format!(
                    "log structure columns '{name}' and '{other}' both point at index {idx}"
                )));
            }
        }

        if let Some(fmt) = &self.date_format {
            if StrftimeItems::new(fmt).any(|item| matches!(item, Item::Error)) {
                return Err(ScoutError::client(format!(
                    "invalid dateFormat pattern '{fmt}'"
                )));
            }
        }

        Ok(())
    }

    pub fn parse_timestamp(&self, raw: &str) -> Option<NaiveDateTime> {
        let fmt = self.date_format.as_deref()?;
        NaiveDateTime::parse_from_str(raw.trim(), fmt).ok()
    }
}

/// Parses `date=0,user=1,reqid=2,level=3,message=5[,format=...]`.
impl FromStr for LogColumnMap {
    type Err = ScoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut timestamp = None;
        let mut user = None;
        let mut request_id = None;
        let mut level = None;
        let mut message = None;
        let mut date_format = None;

        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = part
                .split_once('=')
                .ok_or_else(|| ScoutError::client(format!("expected key=value, got '{part}'")))?;

            if key == "format" {
                date_format = Some(value.to_string());
                continue;
            }

            let idx: usize = value
                .parse()
                .map_err(|_| ScoutError::client(format!("column '{key}' is not an index: '{value}'")))?;

            match key {
                "date" => timestamp = Some(idx),
                "user" => user = Some(idx),
                "reqid" => request_id = Some(idx),
                "level" => level = Some(idx),
                "message" => message = Some(idx),
                other => return Err(ScoutError::client(format!("unknown column '{other}'"))),
            }
        }

        let require = |name: &str, v: Option<usize>| {
            v.ok_or_else(|| ScoutError::client(format!("missing column '{name}'")))
        };

        let map = LogColumnMap {
            timestamp: require("date", timestamp)?,
            user: require("user", user)?,
            request_id: require("reqid", request_id)?,
            level: require("level", level)?,
            message: require("message", message)?,
            date_format,
        };
        map.validate()?;
        Ok(map)
    }
}
