//! Configuration module
//!
//! Loads settings from an optional `spa-server.toml` file plus
//! `SPA_SERVER`-prefixed environment variables, with built-in defaults
//! so the server runs with no configuration at all.

use serde::Deserialize;
use std::net::SocketAddr;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub site: SiteConfig,
    pub logging: LoggingConfig,
}

/// Listener configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Static site configuration
#[derive(Debug, Deserialize, Clone)]
pub struct SiteConfig {
    /// Root directory all file paths are resolved against
    pub root: String,
    /// Files tried, in order, when a directory is requested
    pub index_files: Vec<String>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub access_log: bool,
    /// Access log format: "common" or "combined"
    pub access_log_format: String,
}

impl Config {
    /// Load configuration from the default `spa-server.toml` location
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("spa-server")
    }

    /// Load configuration from the specified file path (without extension).
    /// The file is optional; defaults apply for anything not set.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("SPA_SERVER"))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8000)?
            .set_default("site.root", ".")?
            .set_default("site.index_files", vec!["index.html", "index.htm"])?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "common")?
            .build()?;

        settings.try_deserialize()
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address '{}:{}': {e}", self.server.host, self.server.port))
    }
}
