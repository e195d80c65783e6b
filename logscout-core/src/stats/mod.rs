//! Per-user counters, the error/warning index and multi-file collection.
//!
//! All three scans share the same rules: malformed lines are skipped, levels
//! are colour-free and upper-cased, and a logical event is counted once per
//! dedup key. A read error fails the whole call.

mod collect;
mod error_index;
mod user_stats;

#[cfg(test)]
mod tests;

pub use collect::{collect_stats, rotated_files};
pub use error_index::{ErrorIndex, error_page};
pub use user_stats::{UserStatsAggregator, user_stats};

use crate::error::{ScoutError, ScoutResult};
use crate::model::LogColumnMap;
use crate::scan::LineScanner;
use crate::tokenize::{LogLine, tokenize};
use std::path::Path;

/// Feeds every well-formed line of `path` to `visit`, in file order.
pub(crate) async fn scan_file<F>(path: &Path, columns: &LogColumnMap, mut visit: F) -> ScoutResult<()>
where
    F: FnMut(LogLine<'_>),
{
    let mut scanner = LineScanner::open(path).await?;

    loop {
        let line = scanner.next_line().await.map_err(|e| {
            ScoutError::io(format!("error while scanning file {}", path.display()), e)
        })?;
        let Some(line) = line else {
            return Ok(());
        };
        if let Some(tokens) = tokenize(&line, columns) {
            visit(tokens);
        }
    }
}
