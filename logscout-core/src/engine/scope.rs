use http::HeaderMap;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Set on every delegated call; a request carrying it is never delegated again.
pub const FORWARDED_HEADER: &str = "x-logscout-forwarded";
pub const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Debug, Clone, Eq, Hash, PartialEq)]
pub struct RequestId(pub String);

impl Default for RequestId {
    fn default() -> Self {
        RequestId(Uuid::new_v4().to_string())
    }
}

impl From<&str> for RequestId {
    fn from(s: &str) -> Self {
        RequestId(s.to_owned())
    }
}

/// Per-request state threaded through every unit of work.
#[derive(Debug, Clone, Default)]
pub struct RequestScope {
    pub request_id: RequestId,
    /// Inbound headers, forwarded verbatim (minus hop-by-hop) to peers.
    pub headers: HeaderMap,
    pub cancel: CancellationToken,
    /// The request arrived from a peer's delegate.
    pub forwarded: bool,
}

impl RequestScope {
    pub fn from_headers(headers: HeaderMap) -> Self {
        let request_id = headers
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(RequestId::from)
            .unwrap_or_default();
        let forwarded = headers.contains_key(FORWARDED_HEADER);

        Self {
            request_id,
            headers,
            cancel: CancellationToken::new(),
            forwarded,
        }
    }
}
