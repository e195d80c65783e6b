use crate::engine::{FORWARDED_HEADER, LogSource, REQUEST_ID_HEADER, RequestScope};
use crate::error::{ErrorBody, ScoutError, ScoutResult};
use crate::model::{
    DownloadRequest, Endpoint, ErrorPage, ErrorsRequest, ListLogsRequest, LogDescriptor,
    SearchRequest, SearchResult, StatsRequest, TailOutcome, TailRequest, UserStats,
};
use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, HeaderValue, StatusCode, header};
use serde::Serialize;
use serde::de::DeserializeOwned;

pub const DEFAULT_API_PREFIX: &str = "lv";

// Never forwarded; reqwest sets its own.
const HOP_BY_HOP: [&str; 11] = [
    "host",
    "content-length",
    "transfer-encoding",
    "connection",
    "content-type",
    "accept-encoding",
    "keep-alive",
    "upgrade",
    "te",
    "trailer",
    "proxy-connection",
];

/// Builds the peer URL for `endpoint`.
///
/// `host` may be a bare name (`web2:8443`), a base URL (`https://web2`) or a
/// full endpoint URL. Scheme-less hosts get `https://`; a host without a path
/// gets the API prefix; a URL that already ends with the endpoint is kept.
pub fn api_url(host: &str, api_prefix: &str, endpoint: Endpoint) -> String {
    let ep = endpoint.as_str();
    let host = host.trim();

    let base = if host.contains("://") {
        host.to_string()
    } else {
        format!("https://{host}")
    };

    if base.ends_with(&format!("/{ep}")) {
        return base;
    }

    let authority_start = base.find("://").map(|i| i + 3).unwrap_or(0);
    let has_path = base[authority_start..].trim_end_matches('/').contains('/');
    let base = base.trim_end_matches('/');
    let prefix = api_prefix.trim_matches('/');

    if has_path || prefix.is_empty() {
        format!("{base}/{ep}")
    } else {
        format!("{base}/{prefix}/{ep}")
    }
}

/// Re-issues a request to the peer that owns the target host.
#[derive(Debug, Clone)]
pub struct RemoteDelegate {
    client: reqwest::Client,
    api_prefix: String,
}

enum PeerReply {
    Body(Bytes),
    NotModified,
}

impl RemoteDelegate {
    pub fn new(client: reqwest::Client, api_prefix: impl Into<String>) -> Self {
        Self {
            client,
            api_prefix: api_prefix.into(),
        }
    }

    pub fn url(&self, host: &str, endpoint: Endpoint) -> String {
        api_url(host, &self.api_prefix, endpoint)
    }

    async fn post<B: Serialize + ?Sized>(
        &self,
        scope: &RequestScope,
        host: &str,
        endpoint: Endpoint,
        body: &B,
    ) -> ScoutResult<PeerReply> {
        let url = self.url(host, endpoint);
        tracing::info!(request_id = %scope.request_id.0, url = %url, "delegating to peer");

        let resp = self
            .client
            .post(&url)
            .headers(forward_headers(scope))
            .json(body)
            .send()
            .await
            .map_err(|e| ScoutError::delegate(&url, e.status().map(|s| s.as_u16()), e.to_string()))?;

        let status = resp.status();
        if status == StatusCode::NOT_MODIFIED {
            return Ok(PeerReply::NotModified);
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| ScoutError::delegate(&url, Some(status.as_u16()), e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&bytes)
                .map(|b| b.message)
                .unwrap_or_else(|_| String::from_utf8_lossy(&bytes).into_owned());
            tracing::warn!(url = %url, status = status.as_u16(), error = %message, "peer call failed");
            return Err(ScoutError::delegate(url, Some(status.as_u16()), message));
        }

        Ok(PeerReply::Body(bytes))
    }

    async fn post_json<B: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        scope: &RequestScope,
        host: &str,
        endpoint: Endpoint,
        body: &B,
    ) -> ScoutResult<R> {
        match self.post(scope, host, endpoint, body).await? {
            PeerReply::Body(bytes) => decode(&self.url(host, endpoint), &bytes),
            PeerReply::NotModified => Err(ScoutError::delegate(
                self.url(host, endpoint),
                Some(StatusCode::NOT_MODIFIED.as_u16()),
                "unexpected 304 from peer",
            )),
        }
    }
}

fn decode<R: DeserializeOwned>(url: &str, bytes: &[u8]) -> ScoutResult<R> {
    serde_json::from_slice(bytes)
        .map_err(|e| ScoutError::delegate(url, None, format!("could not decode response: {e}")))
}

fn forward_headers(scope: &RequestScope) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(scope.headers.len() + 2);
    for (name, value) in scope.headers.iter() {
        if HOP_BY_HOP.contains(&name.as_str()) {
            continue;
        }
        headers.append(name.clone(), value.clone());
    }

    headers.insert(FORWARDED_HEADER, HeaderValue::from_static("1"));
    if let Ok(v) = HeaderValue::from_str(&scope.request_id.0) {
        headers.insert(REQUEST_ID_HEADER, v);
    }
    headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
    headers
}

#[async_trait]
impl LogSource for RemoteDelegate {
    async fn grep(
        &self,
        scope: &RequestScope,
        host: &str,
        req: &SearchRequest,
    ) -> ScoutResult<Vec<SearchResult>> {
        self.post_json(scope, host, Endpoint::Search, &req.for_host(host))
            .await
    }

    async fn tail(&self, scope: &RequestScope, req: &TailRequest) -> ScoutResult<TailOutcome> {
        let url = self.url(&req.host, Endpoint::TailLog);
        match self.post(scope, &req.host, Endpoint::TailLog, req).await? {
            PeerReply::Body(bytes) => decode(&url, &bytes).map(TailOutcome::Modified),
            PeerReply::NotModified => Ok(TailOutcome::NotModified),
        }
    }

    async fn list(
        &self,
        scope: &RequestScope,
        host: &str,
        req: &ListLogsRequest,
    ) -> ScoutResult<Vec<LogDescriptor>> {
        self.post_json(scope, host, Endpoint::ListLogs, &req.for_host(host))
            .await
    }

    async fn download(&self, scope: &RequestScope, req: &DownloadRequest) -> ScoutResult<Bytes> {
        match self.post(scope, &req.host, Endpoint::DownloadLog, req).await? {
            PeerReply::Body(bytes) => Ok(bytes),
            PeerReply::NotModified => Ok(Bytes::new()),
        }
    }

    async fn stats(&self, scope: &RequestScope, req: &StatsRequest) -> ScoutResult<UserStats> {
        self.post_json(scope, &req.host, Endpoint::Stats, req).await
    }

    async fn errors(&self, scope: &RequestScope, req: &ErrorsRequest) -> ScoutResult<ErrorPage> {
        self.post_json(scope, &req.host, Endpoint::Errors, req).await
    }
}
