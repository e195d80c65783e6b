use crate::engine::LocalEngine;
use crate::error::{ScoutError, ScoutResult};
use crate::model::{TailOutcome, TailResult};
use crate::scan::unix_millis;
use crate::tokenize::strip_ansi;
use std::io::SeekFrom;
use std::path::Path;
use std::time::Instant;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

impl LocalEngine {
    pub async fn tail_file(&self, path: &Path) -> ScoutResult<TailOutcome> {
        self.tail_if_newer(path, 0).await
    }

    /// Reads the last window of `path` unless it has not changed since `since` (Unix ms).
    ///
    /// The "not modified" answer is decided from metadata alone; no content is read.
    pub async fn tail_if_newer(&self, path: &Path, since: i64) -> ScoutResult<TailOutcome> {
        let start = Instant::now();
        let io_err = |what: &str, e| ScoutError::io(format!("{what} {}", path.display()), e);

        let mut file = File::open(path)
            .await
            .map_err(|e| io_err("could not open file", e))?;
        let meta = file
            .metadata()
            .await
            .map_err(|e| io_err("could not stat file", e))?;

        let modtime = meta.modified().map(unix_millis).unwrap_or_default();
        if since >= modtime {
            return Ok(TailOutcome::NotModified);
        }

        let size = meta.len();
        // Start one byte early so a window beginning exactly on a line keeps that line.
        let (offset, partial_first_line) = if size > self.tail_window {
            (size - self.tail_window - 1, true)
        } else {
            (0, false)
        };

        file.seek(SeekFrom::Start(offset))
            .await
            .map_err(|e| io_err("could not seek file", e))?;
        let mut bytes = Vec::with_capacity((size - offset) as usize);
        file.take(size - offset)
            .read_to_end(&mut bytes)
            .await
            .map_err(|e| io_err("could not read file", e))?;

        let body: &[u8] = if partial_first_line {
            match bytes.iter().position(|b| *b == b'\n') {
                Some(i) => &bytes[i + 1..],
                None => &[],
            }
        } else {
            &bytes
        };

        let lines = String::from_utf8_lossy(body)
            .split('\n')
            .map(|l| strip_ansi(l.trim_end_matches('\r')).into_owned())
            .filter(|l| !l.trim().is_empty())
            .collect();

        Ok(TailOutcome::Modified(TailResult {
            log_file: path.to_string_lossy().into_owned(),
            lines,
            host: String::new(),
            time: start.elapsed().as_millis() as u64,
            modtime,
        }))
    }
}
