use crate::error::ScoutResult;
use crate::model::{LogColumnMap, RequestRef, UserStat, UserStats};
use crate::stats::scan_file;
use crate::tokenize::LogLine;
use ahash::AHashSet;
use std::path::Path;

pub async fn user_stats(path: &Path, columns: &LogColumnMap) -> ScoutResult<UserStats> {
    let mut agg = UserStatsAggregator::default();
    scan_file(path, columns, |line| agg.push(&line)).await?;
    Ok(agg.finish())
}

/// Builds `user -> UserStat`, counting each (reqid, level, user) once.
#[derive(Debug, Default)]
pub struct UserStatsAggregator {
    users: UserStats,
    seen: AHashSet<(String, String, String)>,
}

impl UserStatsAggregator {
    pub fn push(&mut self, line: &LogLine<'_>) {
        if line.user.is_empty() {
            return;
        }

        let stat = self.users.entry(line.user.to_string()).or_default();

        let key = (
            line.request_id.to_string(),
            line.level.clone(),
            line.user.to_string(),
        );
        if !self.seen.insert(key) {
            return;
        }

        stat.last_time = line.timestamp.to_string();
        stat.counter += 1;
        *stat.levels.entry(line.level.clone()).or_default() += 1;

        let reference = || RequestRef {
            request_id: line.request_id.to_string(),
            date: line.timestamp.to_string(),
        };
        if line.is_error() {
            stat.errors.push(reference());
        } else if line.is_warning() {
            stat.warnings.push(reference());
        }
    }

    /// Most recent error and warning first.
    pub fn finish(mut self) -> UserStats {
        for stat in self.users.values_mut() {
            stat.errors.reverse();
            stat.warnings.reverse();
        }
        self.users
    }
}

impl UserStat {
    pub fn level_count(&self, level: &str) -> u64 {
        self.levels.get(level).copied().unwrap_or_default()
    }
}
