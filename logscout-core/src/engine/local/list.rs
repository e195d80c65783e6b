use crate::engine::LocalEngine;
use crate::error::{ScoutError, ScoutResult};
use crate::model::LogDescriptor;
use crate::scan::unix_millis;
use std::path::{Path, PathBuf};
use tokio::task::JoinSet;

impl LocalEngine {
    /// Lists the immediate files of every directory that holds one of `paths`.
    ///
    /// Each distinct directory is read by its own task. A directory that cannot
    /// be read is skipped; the call fails only if none could be read.
    pub async fn list_logs(&self, paths: &[String], host: &str) -> ScoutResult<Vec<LogDescriptor>> {
        let dirs = parent_dirs(paths);
        let mut tasks = JoinSet::new();

        for dir in dirs.iter().cloned() {
            let host = host.to_string();
            tasks.spawn(async move {
                let res = list_dir(&dir, &host).await;
                (dir, res)
            });
        }

        let mut logs = Vec::new();
        let mut first_error = None;
        let mut listed = 0usize;

        while let Some(joined) = tasks.join_next().await {
            let (dir, res) = joined.map_err(|e| {
                ScoutError::io("directory listing task failed", std::io::Error::other(e))
            })?;
            match res {
                Ok(found) => {
                    listed += 1;
                    logs.extend(found);
                }
                Err(e) => {
                    tracing::warn!(dir = %dir.display(), error = %e, "could not list directory");
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) if listed == 0 => Err(e),
            _ => Ok(logs),
        }
    }
}

/// Distinct parent directories, in first-seen order.
pub(crate) fn parent_dirs(paths: &[String]) -> Vec<PathBuf> {
    let mut out: Vec<PathBuf> = Vec::with_capacity(paths.len());
    for p in paths {
        let dir = match Path::new(p).parent() {
            Some(d) if !d.as_os_str().is_empty() => d.to_path_buf(),
            _ => PathBuf::from("."),
        };
        if !out.contains(&dir) {
            out.push(dir);
        }
    }
    out
}

async fn list_dir(dir: &Path, host: &str) -> ScoutResult<Vec<LogDescriptor>> {
    let io_err = |e| ScoutError::io(format!("could not read dir {}", dir.display()), e);

    let mut entries = tokio::fs::read_dir(dir).await.map_err(io_err)?;
    let mut out = Vec::new();

    while let Some(entry) = entries.next_entry().await.map_err(io_err)? {
        let Ok(meta) = entry.metadata().await else {
            continue;
        };
        if !meta.is_file() {
            continue;
        }
        out.push(LogDescriptor {
            name: entry.path().to_string_lossy().into_owned(),
            size: meta.len(),
            modtime: meta.modified().map(unix_millis).unwrap_or_default(),
            host: host.to_string(),
        });
    }

    Ok(out)
}
