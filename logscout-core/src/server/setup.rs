use crate::api::ApiGateway;
use crate::conf::ScoutConfig;
use crate::ctx::ScoutContext;
use anyhow::{Error, Result, anyhow};
use pingora::prelude::*;
use pingora::server::Server;
use pingora::server::configuration::ServerConf;

/// Run the Pingora server with the given configuration.
pub fn run(config: ScoutConfig) -> Result<()> {
    let ctx = ScoutContext::new(config)?;
    let server = build_pingora_server(&ctx)?;

    tracing::info!(
        listen = %ctx.config.server.listen,
        hostname = ctx.locality.hostname().unwrap_or("<unresolved>"),
        "logscout listening"
    );

    // run_forever blocks the main thread as intended
    server.run_forever();
}

/// Build the Pingora server.
pub fn build_pingora_server(ctx: &ScoutContext) -> Result<Server, Error> {
    let mut server = if let Some(threads) = ctx.config.server.threads {
        tracing::debug!(
            threads,
            "Creating Pingora server with overridden worker threads"
        );
        let mut conf =
            ServerConf::new().ok_or_else(|| anyhow!("could not construct pingora server configuration"))?;
        conf.threads = threads;
        Server::new_with_opt_and_conf(None, conf)
    } else {
        // "None" is required here to truly tell Pingora to use its default settings.
        Server::new(None)?
    };

    server.bootstrap();

    let gateway = ApiGateway::new(ctx);

    let mut svc = http_proxy_service(&server.configuration, gateway);
    svc.add_tcp(&ctx.config.server.listen);

    server.add_service(svc);

    Ok(server)
}
