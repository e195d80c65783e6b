mod grep;
mod list;
mod tail;

pub use grep::GrepOutcome;

use crate::engine::{LogSource, RequestScope};
use crate::error::{ScoutError, ScoutResult};
use crate::model::{
    DownloadRequest, ErrorPage, ErrorsRequest, ListLogsRequest, LogDescriptor, SearchRequest,
    SearchResult, StatsRequest, TailOutcome, TailRequest, UserStats,
};
use crate::stats;
use async_trait::async_trait;
use bytes::Bytes;
use std::path::Path;
use std::time::Instant;

pub const DEFAULT_TAIL_WINDOW_KB: u64 = 16;

/// Reads log files on this host.
#[derive(Debug, Clone)]
pub struct LocalEngine {
    tail_window: u64,
}

impl Default for LocalEngine {
    fn default() -> Self {
        Self::new(DEFAULT_TAIL_WINDOW_KB)
    }
}

impl LocalEngine {
    pub fn new(tail_window_kb: u64) -> Self {
        Self {
            tail_window: tail_window_kb.max(1) * 1024,
        }
    }

    pub fn tail_window_bytes(&self) -> u64 {
        self.tail_window
    }

    pub async fn download_file(&self, path: &Path) -> ScoutResult<Bytes> {
        tokio::fs::read(path)
            .await
            .map(Bytes::from)
            .map_err(|e| ScoutError::io(format!("could not read file {}", path.display()), e))
    }
}

#[async_trait]
impl LogSource for LocalEngine {
    async fn grep(
        &self,
        scope: &RequestScope,
        host: &str,
        req: &SearchRequest,
    ) -> ScoutResult<Vec<SearchResult>> {
        let mut out = Vec::with_capacity(req.logs.len());

        for log in &req.logs {
            tracing::info!(
                request_id = %scope.request_id.0,
                host,
                log = %log,
                value = %req.value,
                "local grep"
            );
            let start = Instant::now();
            let GrepOutcome { lines, error } = self.grep_file(Path::new(log), &req.value).await;

            if let Some(e) = &error {
                tracing::warn!(host, log = %log, error = %e, "grep failed");
            }

            out.push(SearchResult {
                log_file: log.clone(),
                lines,
                host: host.to_string(),
                time: start.elapsed().as_millis() as u64,
                error: error.map(|e| e.to_body()),
            });
        }

        Ok(out)
    }

    async fn tail(&self, scope: &RequestScope, req: &TailRequest) -> ScoutResult<TailOutcome> {
        tracing::info!(request_id = %scope.request_id.0, log = %req.log, modtime = req.modtime, "local tail");

        let outcome = self.tail_if_newer(Path::new(&req.log), req.modtime).await?;
        Ok(match outcome {
            TailOutcome::Modified(mut res) => {
                res.host = req.host.clone();
                TailOutcome::Modified(res)
            }
            TailOutcome::NotModified => TailOutcome::NotModified,
        })
    }

    async fn list(
        &self,
        scope: &RequestScope,
        host: &str,
        req: &ListLogsRequest,
    ) -> ScoutResult<Vec<LogDescriptor>> {
        tracing::info!(request_id = %scope.request_id.0, host, "local list");
        self.list_logs(&req.logs, host).await
    }

    async fn download(&self, scope: &RequestScope, req: &DownloadRequest) -> ScoutResult<Bytes> {
        tracing::info!(request_id = %scope.request_id.0, log = %req.log, "local download");
        self.download_file(Path::new(&req.log)).await
    }

    async fn stats(&self, scope: &RequestScope, req: &StatsRequest) -> ScoutResult<UserStats> {
        tracing::info!(request_id = %scope.request_id.0, log = %req.log, "local stats");
        stats::user_stats(Path::new(&req.log), req.columns()?).await
    }

    async fn errors(&self, scope: &RequestScope, req: &ErrorsRequest) -> ScoutResult<ErrorPage> {
        tracing::info!(
            request_id = %scope.request_id.0,
            log = %req.log,
            from = req.from,
            size = req.size,
            "local errors"
        );
        stats::error_page(Path::new(&req.log), req.columns()?, req.from, req.size).await
    }
}
