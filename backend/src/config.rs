//! Service configuration.
//!
//! Configuration is read from an optional TOML file and then overridden by
//! environment variables. Every field has a default, so the service starts
//! with no configuration at all.
//!
//! # Environment Variables
//! - `EDX_CONFIG`: Path to a TOML configuration file
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8000)
//! - `EDX_SCRATCH_DIR`: Directory for request-scoped scratch files (default: OS temp dir)
//! - `EDX_LOG_DIR`: Directory for the daily failure logs (default: ./Loggs)
//! - `EDX_FORBIDDEN_MARKER`: Substring that fails validation (default: invalid)
//! - `EDX_MAX_BODY_BYTES`: Maximum request body size (default: 50 MiB)
//! - `EDX_BODY_TIMEOUT_SECS`: Maximum time to receive a request body (default: 30)

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Error raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("{var} must be {expected}, got {value:?}")]
    InvalidEnv {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Configuration for the ingest service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub scratch_dir: PathBuf,
    pub log_dir: PathBuf,
    pub forbidden_marker: String,
    pub tabular_suffix: String,
    /// Columns a file must declare in its header; empty disables the check.
    pub required_columns: Vec<String>,
    pub max_body_bytes: usize,
    pub body_timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            scratch_dir: env::temp_dir(),
            log_dir: PathBuf::from("./Loggs"),
            forbidden_marker: "invalid".to_string(),
            tabular_suffix: ".txt".to_string(),
            required_columns: Vec::new(),
            max_body_bytes: 50 * 1024 * 1024,
            body_timeout_secs: 30,
        }
    }
}

impl ServiceConfig {
    /// Load configuration from a TOML file. Missing keys take their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_str = path.as_ref().display().to_string();
        let content = fs::read_to_string(path.as_ref()).map_err(|source| ConfigError::Read {
            path: path_str.clone(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path_str,
            source,
        })
    }

    /// Load configuration the way the server binary does.
    ///
    /// Uses `EDX_CONFIG` when set, otherwise the first `edx.toml` found in the
    /// current or `backend/` directory, otherwise defaults. Environment
    /// variables are applied last.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match env::var("EDX_CONFIG") {
            Ok(path) => Self::from_file(path)?,
            Err(_) => {
                let search_paths = [PathBuf::from("edx.toml"), PathBuf::from("backend/edx.toml")];
                match search_paths.iter().find(|p| p.exists()) {
                    Some(path) => Self::from_file(path)?,
                    None => Self::default(),
                }
            }
        };
        config.apply_env()?;
        Ok(config)
    }

    /// Override fields from environment variables.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(host) = env::var("HOST") {
            self.host = host;
        }
        if let Ok(port) = env::var("PORT") {
            self.port = port.parse().map_err(|_| ConfigError::InvalidEnv {
                var: "PORT",
                expected: "a valid port number",
                value: port,
            })?;
        }
        if let Ok(dir) = env::var("EDX_SCRATCH_DIR") {
            self.scratch_dir = PathBuf::from(dir);
        }
        if let Ok(dir) = env::var("EDX_LOG_DIR") {
            self.log_dir = PathBuf::from(dir);
        }
        if let Ok(marker) = env::var("EDX_FORBIDDEN_MARKER") {
            self.forbidden_marker = marker;
        }
        if let Ok(bytes) = env::var("EDX_MAX_BODY_BYTES") {
            self.max_body_bytes = bytes.parse().map_err(|_| ConfigError::InvalidEnv {
                var: "EDX_MAX_BODY_BYTES",
                expected: "a byte count",
                value: bytes,
            })?;
        }
        if let Ok(secs) = env::var("EDX_BODY_TIMEOUT_SECS") {
            self.body_timeout_secs = secs.parse().map_err(|_| ConfigError::InvalidEnv {
                var: "EDX_BODY_TIMEOUT_SECS",
                expected: "a number of seconds",
                value: secs,
            })?;
        }
        Ok(())
    }

    /// Bind address as `host:port`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn body_timeout(&self) -> Duration {
        Duration::from_secs(self.body_timeout_secs)
    }
}
