use crate::conf::ConfigError;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Top-level `logscout.toml`. Every section may be omitted.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoutConfig {
    pub server: ServerConfig,
    pub locality: LocalityConfig,
    pub engine: EngineConfig,
    pub delegate: DelegateConfig,
    pub fanout: FanoutConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub listen: String,

    /// Optional number of worker threads - default is decided by Pingora.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:8080".to_string(),
            threads: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct LocalityConfig {
    /// Identity used instead of the kernel hostname.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub tail_window_kb: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { tail_window_kb: 16 }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct DelegateConfig {
    pub timeout_ms: u64,
    pub api_prefix: String,
}

impl Default for DelegateConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 30_000,
            api_prefix: crate::engine::DEFAULT_API_PREFIX.to_string(),
        }
    }
}

impl DelegateConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct FanoutConfig {
    /// Upper bound for one host's (or one file's) unit of work.
    pub unit_timeout_ms: u64,
}

impl Default for FanoutConfig {
    fn default() -> Self {
        Self {
            unit_timeout_ms: 60_000,
        }
    }
}

impl FanoutConfig {
    pub fn unit_timeout(&self) -> Duration {
        Duration::from_millis(self.unit_timeout_ms)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl ScoutConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.listen_addr()?;

        if self.engine.tail_window_kb == 0 {
            return Err(ConfigError::invalid("engine.tail_window_kb", "must be greater than 0"));
        }
        if self.delegate.timeout_ms == 0 {
            return Err(ConfigError::invalid("delegate.timeout_ms", "must be greater than 0"));
        }
        if self.fanout.unit_timeout_ms == 0 {
            return Err(ConfigError::invalid("fanout.unit_timeout_ms", "must be greater than 0"));
        }
        if self.server.threads == Some(0) {
            return Err(ConfigError::invalid("server.threads", "must be greater than 0"));
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.server
            .listen
            .parse()
            .map_err(|e| ConfigError::invalid("server.listen", format!("{e}")))
    }
}
