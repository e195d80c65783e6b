use crate::error::ScoutResult;
use crate::model::{ErrorPage, ErrorRecord, LogColumnMap, Pagination};
use crate::stats::scan_file;
use crate::tokenize::LogLine;
use ahash::AHashSet;
use std::path::Path;

/// Pages through the ERROR/WARN/WARNING lines of `path`, most recent first.
///
/// `from` is a page number, so the slice is `[from * size, from * size + size)`.
/// A window past the end yields an empty page, never an error.
pub async fn error_page(
    path: &Path,
    columns: &LogColumnMap,
    from: usize,
    size: usize,
) -> ScoutResult<ErrorPage> {
    let mut index = ErrorIndex::default();
    scan_file(path, columns, |line| index.push(&line)).await?;
    Ok(index.page(from, size))
}

/// Error and warning records keyed by (reqid, level), first occurrence wins.
#[derive(Debug, Default)]
pub struct ErrorIndex {
    records: Vec<ErrorRecord>,
    seen: AHashSet<(String, String)>,
}

impl ErrorIndex {
    pub fn push(&mut self, line: &LogLine<'_>) {
        if !(line.is_error() || line.is_warning()) {
            return;
        }
        if !self
            .seen
            .insert((line.request_id.to_string(), line.level.clone()))
        {
            return;
        }

        self.records.push(ErrorRecord {
            request_id: line.request_id.to_string(),
            date: line.timestamp.to_string(),
            user: line.user.to_string(),
            level: line.level.clone(),
            message: line.message.to_string(),
        });
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn page(mut self, from: usize, size: usize) -> ErrorPage {
        let total = self.records.len();
        let pagination = Pagination { total, from, size };

        self.records.reverse();

        let start = from.saturating_mul(size);
        let end = start.saturating_add(size).min(total);
        let errors = if start < end {
            self.records.drain(start..end).collect()
        } else {
            Vec::new()
        };

        ErrorPage { errors, pagination }
    }
}
