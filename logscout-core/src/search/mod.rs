//! Fans one logical request out to its target hosts and merges the answers.
//!
//! Every host gets exactly one unit of work, bounded by the request's
//! cancellation token and the configured unit timeout. A unit that fails,
//! times out, is cancelled or panics still yields its results (carrying the
//! error), so the merged answer always has one entry per host and log.


use crate::ctx::ScoutContext;
use crate::engine::{LocalEngine, Locality, LocalityResolver, LogSource, RemoteDelegate, RequestScope};
use crate::error::{ScoutError, ScoutResult};
use crate::model::{
    CollectStatsRequest, CollectedStats, DownloadRequest, ErrorPage, ErrorsRequest,
    ListLogsRequest, LogDescriptor, SearchRequest, SearchResult, StatsRequest, TailOutcome,
    TailRequest, UserStats,
};
use crate::stats;
use bytes::Bytes;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;

#[derive(Clone)]
pub struct Orchestrator {
    locality: LocalityResolver,
    local: Arc<dyn LogSource>,
    remote: Arc<dyn LogSource>,
    unit_timeout: Duration,
}

impl Orchestrator {
    pub fn new(ctx: &ScoutContext) -> Self {
        let local = LocalEngine::new(ctx.config.engine.tail_window_kb);
        let remote = RemoteDelegate::new(ctx.http.clone(), ctx.config.delegate.api_prefix.clone());

        Self::with_sources(
            ctx.locality.clone(),
            Arc::new(local),
            Arc::new(remote),
            ctx.config.fanout.unit_timeout(),
        )
    }

    pub fn with_sources(
        locality: LocalityResolver,
        local: Arc<dyn LogSource>,
        remote: Arc<dyn LogSource>,
        unit_timeout: Duration,
    ) -> Self {
        Self {
            locality,
            local,
            remote,
            unit_timeout,
        }
    }

    /// A request that came from a peer always runs here, so peers never bounce work.
    pub fn locate(&self, scope: &RequestScope, host: &str) -> Locality {
        if scope.forwarded {
            Locality::Local
        } else {
            self.locality.classify(host)
        }
    }

    fn source(&self, scope: &RequestScope, host: &str) -> Arc<dyn LogSource> {
        match self.locate(scope, host) {
            Locality::Local => Arc::clone(&self.local),
            Locality::Remote => Arc::clone(&self.remote),
        }
    }

    pub async fn search(
        &self,
        scope: &RequestScope,
        req: &SearchRequest,
    ) -> ScoutResult<Vec<SearchResult>> {
        req.validate()?;
        let hosts = targets(&req.hosts);

        tracing::info!(
            request_id = %scope.request_id.0,
            hosts = hosts.len(),
            logs = req.logs.len(),
            application = req.application_id.as_deref().unwrap_or_default(),
            env = req.env.as_deref().unwrap_or_default(),
            from_time = req.from_time,
            to_time = req.to_time,
            "search"
        );

        let mut tasks = JoinSet::new();
        for (idx, host) in hosts.iter().enumerate() {
            let source = self.source(scope, host);
            let scope = scope.clone();
            let host = host.clone();
            let req = req.clone();
            let timeout = self.unit_timeout;

            tasks.spawn(async move {
                let start = Instant::now();
                let res = run_unit(&scope, timeout, source.grep(&scope, &host, &req)).await;
                let elapsed = start.elapsed().as_millis() as u64;

                let results = match res {
                    Ok(results) => results,
                    Err(e) => {
                        tracing::warn!(host = %host, error = %e, elapsed_ms = elapsed, "search unit failed");
                        failed_results(&host, &req.logs, &e, elapsed)
                    }
                };
                (idx, results)
            });
        }

        let mut slots: Vec<Option<Vec<SearchResult>>> = vec![None; hosts.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((idx, results)) => slots[idx] = Some(results),
                Err(e) => tracing::error!(error = %e, "search unit aborted"),
            }
        }

        let merged = slots
            .into_iter()
            .zip(&hosts)
            .flat_map(|(slot, host)| {
                slot.unwrap_or_else(|| {
                    let err = ScoutError::io("search unit aborted", std::io::Error::other("task aborted"));
                    failed_results(host, &req.logs, &err, 0)
                })
            })
            .collect();

        Ok(merged)
    }

    /// Merged listing of every host, most recently modified first.
    pub async fn list(
        &self,
        scope: &RequestScope,
        req: &ListLogsRequest,
    ) -> ScoutResult<Vec<LogDescriptor>> {
        req.validate()?;
        let hosts = targets(&req.hosts);

        let mut tasks = JoinSet::new();
        for host in hosts {
            let source = self.source(scope, &host);
            let scope = scope.clone();
            let req = req.clone();
            let timeout = self.unit_timeout;

            tasks.spawn(async move {
                let res = run_unit(&scope, timeout, source.list(&scope, &host, &req)).await;
                (host, res)
            });
        }

        let mut logs = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((_, Ok(found))) => logs.extend(found),
                Ok((host, Err(e))) => {
                    tracing::warn!(host = %host, error = %e, "list unit failed");
                }
                Err(e) => tracing::error!(error = %e, "list unit aborted"),
            }
        }

        logs.sort_by(|a, b| b.modtime.cmp(&a.modtime));
        Ok(logs)
    }

    pub async fn tail(&self, scope: &RequestScope, req: &TailRequest) -> ScoutResult<TailOutcome> {
        req.validate()?;
        let source = self.source(scope, &req.host);
        self.single(scope, "tail", &req.host, source.tail(scope, req))
            .await
    }

    pub async fn download(&self, scope: &RequestScope, req: &DownloadRequest) -> ScoutResult<Bytes> {
        req.validate()?;
        let source = self.source(scope, &req.host);
        self.single(scope, "download", &req.host, source.download(scope, req))
            .await
    }

    pub async fn stats(&self, scope: &RequestScope, req: &StatsRequest) -> ScoutResult<UserStats> {
        req.validate()?;
        let source = self.source(scope, &req.host);
        self.single(scope, "stats", &req.host, source.stats(scope, req))
            .await
    }

    pub async fn errors(&self, scope: &RequestScope, req: &ErrorsRequest) -> ScoutResult<ErrorPage> {
        req.validate()?;
        let source = self.source(scope, &req.host);
        self.single(scope, "errors", &req.host, source.errors(scope, req))
            .await
    }

    /// Always local: the path names files on this host.
    pub async fn collect_stats(
        &self,
        scope: &RequestScope,
        req: &CollectStatsRequest,
    ) -> ScoutResult<CollectedStats> {
        req.validate()?;
        let columns = req.columns()?;
        let fut = stats::collect_stats(Path::new(&req.log_path), columns, &req.date);
        self.single(scope, "collect-stats", "localhost", fut).await
    }

    async fn single<T, F>(&self, scope: &RequestScope, op: &str, host: &str, fut: F) -> ScoutResult<T>
    where
        F: Future<Output = ScoutResult<T>>,
    {
        let start = Instant::now();
        let res = run_unit(scope, self.unit_timeout, fut).await;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match &res {
            Ok(_) => tracing::debug!(request_id = %scope.request_id.0, op, host, elapsed_ms, "done"),
            Err(e) => tracing::warn!(request_id = %scope.request_id.0, op, host, elapsed_ms, error = %e, "failed"),
        }
        res
    }
}

/// Bounds one unit of work by the request's cancellation and `timeout`.
async fn run_unit<T, F>(scope: &RequestScope, timeout: Duration, fut: F) -> ScoutResult<T>
where
    F: Future<Output = ScoutResult<T>>,
{
    tokio::select! {
        _ = scope.cancel.cancelled() => Err(ScoutError::Cancelled),
        res = tokio::time::timeout(timeout, fut) => {
            res.unwrap_or(Err(ScoutError::TimedOut { after: timeout }))
        }
    }
}

fn targets(hosts: &[String]) -> Vec<String> {
    hosts
        .iter()
        .map(|h| h.trim())
        .filter(|h| !h.is_empty())
        .map(str::to_string)
        .collect()
}

fn failed_results(host: &str, logs: &[String], err: &ScoutError, elapsed: u64) -> Vec<SearchResult> {
    logs.iter()
        .map(|log| SearchResult {
            time: elapsed,
            ..SearchResult::failed(host, log, err)
        })
        .collect()
}
