use crate::api::reply::{Reply, send_error, send_method_not_allowed, send_not_found};
use crate::ctx::ScoutContext;
use crate::engine::RequestScope;
use crate::error::{ScoutError, ScoutResult};
use crate::model::{
    CollectStatsRequest, DownloadRequest, Endpoint, ErrorsRequest, ListLogsRequest, SearchRequest,
    StatsRequest, TailOutcome, TailRequest,
};
use crate::search::Orchestrator;
use bytes::{Bytes, BytesMut};
use http::Method;
use pingora::prelude::Session;
use serde::de::DeserializeOwned;
use std::time::Instant;

const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Resolves `path` to an endpoint under `/<prefix>/`.
pub fn route(path: &str, prefix: &str) -> Option<Endpoint> {
    let prefix = prefix.trim_matches('/');
    let rest = path.strip_prefix('/')?;
    let rest = if prefix.is_empty() {
        rest
    } else {
        rest.strip_prefix(prefix)?.strip_prefix('/')?
    };
    rest.trim_end_matches('/').parse().ok()
}

pub struct ApiHandler {
    orchestrator: Orchestrator,
    prefix: String,
}

impl ApiHandler {
    pub fn new(ctx: &ScoutContext) -> Self {
        Self {
            orchestrator: Orchestrator::new(ctx),
            prefix: ctx.config.delegate.api_prefix.clone(),
        }
    }

    pub(crate) async fn handle(&self, session: &mut Session) -> pingora::Result<bool> {
        let start = Instant::now();
        let method = session.req_header().method.clone();
        let path = session.req_header().uri.path().to_owned();

        let status = match route(&path, &self.prefix) {
            None => send_not_found(session, &path).await?,
            Some(Endpoint::Health) => Reply::Text("OK").write(session).await?,
            Some(_) if method != Method::POST => send_method_not_allowed(session, "POST").await?,
            Some(endpoint) => {
                let scope = RequestScope::from_headers(session.req_header().headers.clone());
                let result = match read_body(session).await {
                    Ok(body) => self.dispatch(endpoint, &scope, &body).await,
                    Err(e) => Err(e),
                };
                match result {
                    Ok(reply) => reply.write(session).await?,
                    Err(e) => send_error(session, &e).await?,
                }
            }
        };

        tracing::info!(
            method = %method,
            path = %path,
            status = status.as_u16(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "api request"
        );
        Ok(true)
    }

    async fn dispatch(
        &self,
        endpoint: Endpoint,
        scope: &RequestScope,
        body: &[u8],
    ) -> ScoutResult<Reply> {
        let orch = &self.orchestrator;

        match endpoint {
            Endpoint::Health => Ok(Reply::Text("OK")),
            Endpoint::Search => {
                let req: SearchRequest = decode(body)?;
                Reply::json(&orch.search(scope, &req).await?)
            }
            Endpoint::Tail | Endpoint::TailLog => {
                let req: TailRequest = decode(body)?;
                match orch.tail(scope, &req).await? {
                    TailOutcome::Modified(res) => Reply::json(&res),
                    TailOutcome::NotModified => Ok(Reply::NotModified),
                }
            }
            Endpoint::ListLogs => {
                let req: ListLogsRequest = decode(body)?;
                Reply::json(&orch.list(scope, &req).await?)
            }
            Endpoint::DownloadLog => {
                let req: DownloadRequest = decode(body)?;
                let bytes = orch.download(scope, &req).await?;
                Ok(Reply::Download {
                    file_name: req.file_name(),
                    bytes,
                })
            }
            Endpoint::Stats => {
                let req: StatsRequest = decode(body)?;
                Reply::json(&orch.stats(scope, &req).await?)
            }
            Endpoint::Errors => {
                let req: ErrorsRequest = decode(body)?;
                Reply::json(&orch.errors(scope, &req).await?)
            }
            Endpoint::CollectStats => {
                let req: CollectStatsRequest = decode(body)?;
                Reply::json(&orch.collect_stats(scope, &req).await?)
            }
        }
    }
}

pub(crate) fn decode<T: DeserializeOwned>(body: &[u8]) -> ScoutResult<T> {
    serde_json::from_slice(body).map_err(|e| ScoutError::client(format!("invalid request body: {e}")))
}

async fn read_body(session: &mut Session) -> ScoutResult<Bytes> {
    let mut body = BytesMut::new();
    loop {
        let chunk = session.read_request_body().await.map_err(|e| {
            ScoutError::io("could not read request body", std::io::Error::other(e.to_string()))
        })?;
        let Some(chunk) = chunk else {
            return Ok(body.freeze());
        };
        if body.len() + chunk.len() > MAX_BODY_BYTES {
            return Err(ScoutError::client("request body too large"));
        }
        body.extend_from_slice(&chunk);
    }
}
