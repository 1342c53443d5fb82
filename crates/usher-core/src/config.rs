// Copyright 2026 The Usher Authors
// SPDX-License-Identifier: Apache-2.0

//! Configuration management for usher.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Main configuration for an usher process.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Director configuration.
    pub director: DirectorConfig,
    /// Storage-node configuration.
    pub storage: StorageConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
    /// Metrics configuration.
    pub metrics: MetricsConfig,
}

impl Config {
    /// Loads the configuration from a TOML file, or the defaults when no
    /// path is given.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Loads the configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(Error::Io)?;
        Self::parse(&content)
    }

    /// Parses the configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string cannot be parsed.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind the server to.
    pub bind: SocketAddr,
    /// Maximum request body size in bytes. Only the storage node accepts
    /// bodies; the director redirects before any payload transfer.
    pub max_body_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".parse().expect("valid default address"),
            max_body_size: 1024 * 1024 * 1024, // 1 GiB
        }
    }
}

/// Director configuration: placement counts and probing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectorConfig {
    /// Path to the YAML topology file, re-read on every request.
    pub topology_file: PathBuf,
    /// Number of regions each object is placed in.
    pub region_count: usize,
    /// Number of replica nodes per selected region.
    pub replica_count: usize,
    /// Optional salt folded into the object key hash, making placement
    /// harder to predict from outside.
    pub salt: Option<String>,
    /// Per-probe time budget in milliseconds.
    pub probe_timeout_ms: u64,
}

impl Default for DirectorConfig {
    fn default() -> Self {
        Self {
            topology_file: PathBuf::from("topology.yml"),
            region_count: 2,
            replica_count: 2,
            salt: None,
            probe_timeout_ms: 1000,
        }
    }
}

impl DirectorConfig {
    /// The per-probe time budget.
    #[must_use]
    pub const fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }
}

/// Storage-node configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding stored object files.
    pub data_dir: PathBuf,
    /// Directory for in-flight uploads (defaults to `data_dir/.tmp`).
    pub temp_dir: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { data_dir: PathBuf::from("data"), temp_dir: None }
    }
}

impl StorageConfig {
    /// The effective temp directory.
    #[must_use]
    pub fn temp_dir(&self) -> PathBuf {
        self.temp_dir.clone().unwrap_or_else(|| self.data_dir.join(".tmp"))
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default log filter when `RUST_LOG` is not set.
    pub level: String,
    /// Log output format.
    pub format: LogFormat,
    /// Whether to emit an access log line per HTTP request.
    pub log_requests: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: LogFormat::Pretty, log_requests: true }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable output.
    #[default]
    Pretty,
    /// Newline-delimited JSON.
    Json,
}

/// Metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Whether to install the Prometheus exporter.
    pub enabled: bool,
    /// Address the exporter binds to.
    pub bind: String,
    /// Port the exporter binds to.
    pub port: u16,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: false, bind: "127.0.0.1".to_string(), port: 9090 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.bind.port(), 8080);
        assert_eq!(config.director.region_count, 2);
        assert_eq!(config.director.replica_count, 2);
        assert!(config.director.salt.is_none());
        assert_eq!(config.director.probe_timeout(), Duration::from_millis(1000));
        assert_eq!(config.storage.temp_dir(), PathBuf::from("data/.tmp"));
        assert!(!config.metrics.enabled);
    }

    #[test]
    fn test_parse_overrides() {
        let config = Config::parse(
            r#"
            [server]
            bind = "0.0.0.0:9500"

            [director]
            topology_file = "/etc/usher/topology.yml"
            region_count = 3
            replica_count = 1
            salt = "pepper"
            probe_timeout_ms = 250

            [logging]
            level = "debug"
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.bind.port(), 9500);
        assert_eq!(config.director.region_count, 3);
        assert_eq!(config.director.replica_count, 1);
        assert_eq!(config.director.salt.as_deref(), Some("pepper"));
        assert_eq!(config.director.probe_timeout(), Duration::from_millis(250));
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_parse_rejects_malformed_toml() {
        let err = Config::parse("[server\nbind = ").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_explicit_temp_dir_wins() {
        let config = Config::parse(
            r#"
            [storage]
            data_dir = "/srv/usher"
            temp_dir = "/tmp/usher"
            "#,
        )
        .unwrap();
        assert_eq!(config.storage.temp_dir(), PathBuf::from("/tmp/usher"));
    }
}
