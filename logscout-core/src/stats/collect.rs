use crate::error::{ScoutError, ScoutResult};
use crate::model::{CollectedStats, LogColumnMap};
use crate::stats::scan_file;
use crate::tokenize::LogLine;
use ahash::AHashSet;
use glob::Pattern;
use std::path::{Path, PathBuf};
use tokio::task::JoinSet;

type StatKey = (String, String, String);

/// Aggregates `user -> level -> count` over `log` and its rotated siblings,
/// counting only lines whose timestamp matches `date`.
///
/// Files are scanned concurrently; their keys are merged in path order so the
/// first occurrence of a key is the same on every run.
pub async fn collect_stats(
    log: &Path,
    columns: &LogColumnMap,
    date: &str,
) -> ScoutResult<CollectedStats> {
    let paths = rotated_files(log).await?;
    tracing::info!(log = %log.display(), files = paths.len(), date, "collecting stats");

    let mut tasks = JoinSet::new();
    for (idx, path) in paths.into_iter().enumerate() {
        let columns = columns.clone();
        let date = date.to_string();
        tasks.spawn(async move {
            let res = first_occurrences(&path, &columns, &date).await;
            (idx, res)
        });
    }

    let mut per_file = Vec::with_capacity(tasks.len());
    while let Some(joined) = tasks.join_next().await {
        let (idx, res) = joined
            .map_err(|e| ScoutError::io("stats task failed", std::io::Error::other(e)))?;
        per_file.push((idx, res?));
    }
    per_file.sort_by_key(|(idx, _)| *idx);

    let mut out = CollectedStats::default();
    let mut seen: AHashSet<StatKey> = AHashSet::new();

    for (_, keys) in per_file {
        for key in keys {
            if seen.contains(&key) {
                continue;
            }
            let (_, level, user) = &key;
            *out.users
                .entry(user.clone())
                .or_default()
                .entry(level.clone())
                .or_default() += 1;
            seen.insert(key);
        }
    }

    out.total_requests = seen.len() as u64;
    Ok(out)
}

/// Immediate files next to `log` whose name contains its base name minus `.log`.
///
/// `/var/log/app.log` matches `app.log`, `app.log.1` and `app-2021-03-04.log`.
pub async fn rotated_files(log: &Path) -> ScoutResult<Vec<PathBuf>> {
    let dir = match log.parent() {
        Some(d) if !d.as_os_str().is_empty() => d.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let meta = tokio::fs::metadata(&dir)
        .await
        .map_err(|e| ScoutError::io(format!("could not open dir {}", dir.display()), e))?;
    if !meta.is_dir() {
        return Err(ScoutError::client(format!("{} is not a directory", dir.display())));
    }

    let base = log
        .file_name()
        .map(|n| n.to_string_lossy().replacen(".log", "", 1))
        .unwrap_or_default();

    let pattern = format!(
        "{}/*{}*",
        Pattern::escape(&dir.to_string_lossy()),
        Pattern::escape(&base)
    );

    let entries = glob::glob(&pattern)
        .map_err(|e| ScoutError::client(format!("invalid log path pattern '{pattern}': {e}")))?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .filter(|p| p.is_file())
        .collect();
    paths.sort();
    Ok(paths)
}

async fn first_occurrences(
    path: &Path,
    columns: &LogColumnMap,
    date: &str,
) -> ScoutResult<Vec<StatKey>> {
    let mut seen: AHashSet<StatKey> = AHashSet::new();
    let mut keys = Vec::new();

    scan_file(path, columns, |line| {
        if line.user.is_empty() || !matches_date(&line, columns, date) {
            return;
        }
        let key = (
            line.request_id.to_string(),
            line.level.clone(),
            line.user.to_string(),
        );
        if seen.insert(key.clone()) {
            keys.push(key);
        }
    })
    .await?;

    Ok(keys)
}

fn matches_date(line: &LogLine<'_>, columns: &LogColumnMap, date: &str) -> bool {
    if line.timestamp.contains(date) {
        return true;
    }
    columns
        .parse_timestamp(line.timestamp)
        .map(|ts| ts.format("%Y-%m-%d").to_string() == date)
        .unwrap_or(false)
}
