use crate::api::ApiHandler;
use crate::ctx::ScoutContext;
use async_trait::async_trait;
use pingora::prelude::{HttpPeer, ProxyHttp, Session};
use pingora::{Custom, Error};

pub struct ApiGateway {
    handler: ApiHandler,
}

impl ApiGateway {
    pub fn new(ctx: &ScoutContext) -> Self {
        Self {
            handler: ApiHandler::new(ctx),
        }
    }
}

#[async_trait]
impl ProxyHttp for ApiGateway {
    type CTX = ();

    fn new_ctx(&self) -> Self::CTX {}

    async fn upstream_peer(
        &self,
        _session: &mut Session,
        _ctx: &mut Self::CTX,
    ) -> pingora::Result<Box<HttpPeer>> {
        // Every request is answered in request_filter.
        Err(Error::new(Custom("ApiGateway attempted to proxy upstream (bug)")))
    }

    async fn request_filter(
        &self,
        session: &mut Session,
        _ctx: &mut Self::CTX,
    ) -> pingora::Result<bool> {
        self.handler.handle(session).await
    }
}
