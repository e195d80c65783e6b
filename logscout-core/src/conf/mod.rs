mod error;
mod loader;
mod types;


pub use error::ConfigError;
pub use loader::{ENV_HOSTNAME, ENV_LOG_FILE, load_config, parse_config};
pub use types::{
    DelegateConfig, EngineConfig, FanoutConfig, LocalityConfig, LoggingConfig, ScoutConfig,
    ServerConfig,
};
