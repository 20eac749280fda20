//! Service configuration.
//!
//! Configuration is layered: built-in defaults, then an optional TOML file,
//! then `PURL_RESOLVER_`-prefixed environment variables (`__` separates nested
//! keys, e.g. `PURL_RESOLVER_SERVER__PORT=9090`).

use std::{path::Path, time::Duration};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "PURL_RESOLVER_";

/// Top level configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
}

/// HTTP server configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to listen on.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// How long in-flight requests may take to drain after shutdown is requested.
    #[serde(default = "default_shutdown_timeout_secs")]
    pub shutdown_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            shutdown_timeout_secs: default_shutdown_timeout_secs(),
        }
    }
}

impl ServerConfig {
    /// The `host:port` pair to bind.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// The graceful shutdown deadline.
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_shutdown_timeout_secs() -> u64 {
    5
}

impl Config {
    /// Build the layered configuration.
    ///
    /// A missing file at `path` is not an error; defaults and the environment
    /// still apply.
    pub fn figment(path: impl AsRef<Path>) -> Figment {
        let path = path.as_ref();
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if path.exists() {
            tracing::debug!(path = %path.display(), "loading configuration file");
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load the layered configuration.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, figment::Error> {
        Self::figment(path).extract()
    }
}
