use crate::conf::ScoutConfig;
use crate::engine::LocalityResolver;
use anyhow::Context;
use std::sync::Arc;

/// Process-wide collaborators, built once and handed to every component.
#[derive(Debug, Clone)]
pub struct ScoutContext {
    pub config: Arc<ScoutConfig>,
    pub locality: LocalityResolver,
    pub http: reqwest::Client,
}

impl ScoutContext {
    pub fn new(config: ScoutConfig) -> anyhow::Result<Self> {
        let locality = LocalityResolver::from_system(config.locality.hostname.clone());
        Self::with_locality(config, locality)
    }

    /// Peer certificates are not verified: every peer is another logscout
    /// instance on the internal network.
    pub fn with_locality(config: ScoutConfig, locality: LocalityResolver) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(true)
            .timeout(config.delegate.timeout())
            .build()
            .context("failed to build peer HTTP client")?;

        Ok(Self {
            config: Arc::new(config),
            locality,
            http,
        })
    }
}
