//! Configuration management for Marquee
//!
//! Settings come from a TOML file (~/.config/marquee/config.toml by default),
//! then environment overrides, then command-line flags.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::api::backend::DEFAULT_BACKEND_URL;

pub const ENV_OMDB_KEY: &str = "OMDB_API_KEY";
pub const ENV_TMDB_KEY: &str = "TMDB_API_KEY";
pub const ENV_PORT: &str = "PORT";
pub const ENV_BACKEND_URL: &str = "MARQUEE_BACKEND_URL";

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("OMDb API key missing: set OMDB_API_KEY or omdb_api_key in the config file")]
    MissingOmdbKey,

    #[error("Could not read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid listen address {0}")]
    InvalidAddress(String),
}

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// OMDb key, required by `serve`
    pub omdb_api_key: Option<String>,
    /// TMDB v3 key or v4 read token; enables cast photos
    pub tmdb_api_key: Option<String>,
    /// Backend used by the TUI and CLI one-shots
    pub backend_url: Option<String>,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Timeout for each upstream provider request
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            request_timeout_secs: 30,
        }
    }
}

impl Config {
    /// Default config file path (~/.config/marquee/config.toml)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("marquee").join("config.toml"))
    }

    /// Load config from `path` (or the default path), falling back to defaults.
    ///
    /// Environment overrides are applied on top.
    pub fn load(path: Option<&Path>) -> Self {
        let path = path.map(Path::to_path_buf).or_else(Self::path);

        let config = match path {
            Some(ref p) if p.exists() => Self::from_file(p).unwrap_or_else(|e| {
                warn!(error = %e, "using default configuration");
                Self::default()
            }),
            Some(ref p) => {
                debug!(path = %p.display(), "no config file, using defaults");
                Self::default()
            }
            None => Self::default(),
        };

        config.with_env(|name| std::env::var(name).ok())
    }

    /// Parse a config file without env overrides
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply environment overrides using `lookup` to read variables.
    ///
    /// Empty values count as unset.
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = get(ENV_OMDB_KEY) {
            self.omdb_api_key = Some(key);
        }
        if let Some(key) = get(ENV_TMDB_KEY) {
            self.tmdb_api_key = Some(key);
        }
        if let Some(url) = get(ENV_BACKEND_URL) {
            self.backend_url = Some(url);
        }
        if let Some(port) = get(ENV_PORT) {
            match port.trim().parse::<u16>() {
                Ok(port) => self.server.port = port,
                Err(_) => warn!(value = %port, "ignoring invalid {}", ENV_PORT),
            }
        }
        self
    }

    /// OMDb key, or an error when it is missing or blank
    pub fn omdb_key(&self) -> Result<&str, ConfigError> {
        self.omdb_api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingOmdbKey)
    }

    /// TMDB key when configured
    pub fn tmdb_key(&self) -> Option<&str> {
        self.tmdb_api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    pub fn backend_url(&self) -> &str {
        self.backend_url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or(DEFAULT_BACKEND_URL)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs.max(1))
    }

    /// Listen address for `serve`
    pub fn listen_addr(&self) -> Result<std::net::SocketAddr, ConfigError> {
        let raw = format!("{}:{}", self.server.host, self.server.port);
        raw.parse().map_err(|_| ConfigError::InvalidAddress(raw))
    }
}
