//! The capability every log location offers, and its two implementations.
//!
//! [`LocalEngine`] reads files on this host; [`RemoteDelegate`] re-issues the
//! same request to the peer that owns the files. Both return the same shapes,
//! so the orchestrator never cares which one answered.

mod local;
mod locality;
mod remote;
mod scope;

#[cfg(test)]
mod tests;

pub use local::{DEFAULT_TAIL_WINDOW_KB, GrepOutcome, LocalEngine};
pub use locality::{Locality, LocalityResolver};
pub use remote::{DEFAULT_API_PREFIX, RemoteDelegate, api_url};
pub use scope::{FORWARDED_HEADER, REQUEST_ID_HEADER, RequestId, RequestScope};

use crate::error::ScoutResult;
use crate::model::{
    DownloadRequest, ErrorPage, ErrorsRequest, ListLogsRequest, LogDescriptor, SearchRequest,
    SearchResult, StatsRequest, TailOutcome, TailRequest, UserStats,
};
use async_trait::async_trait;
use bytes::Bytes;

#[async_trait]
pub trait LogSource: Send + Sync {
    /// One result per requested log, all tagged with `host`.
    async fn grep(
        &self,
        scope: &RequestScope,
        host: &str,
        req: &SearchRequest,
    ) -> ScoutResult<Vec<SearchResult>>;

    async fn tail(&self, scope: &RequestScope, req: &TailRequest) -> ScoutResult<TailOutcome>;

    /// Unsorted; ordering is the caller's concern.
    async fn list(
        &self,
        scope: &RequestScope,
        host: &str,
        req: &ListLogsRequest,
    ) -> ScoutResult<Vec<LogDescriptor>>;

    async fn download(&self, scope: &RequestScope, req: &DownloadRequest) -> ScoutResult<Bytes>;

    async fn stats(&self, scope: &RequestScope, req: &StatsRequest) -> ScoutResult<UserStats>;

    async fn errors(&self, scope: &RequestScope, req: &ErrorsRequest) -> ScoutResult<ErrorPage>;
}
