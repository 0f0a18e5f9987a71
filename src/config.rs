//! Configuration for jigctl
//!
//! Centralized configuration with sensible defaults. Values can be loaded
//! from a TOML file and then overridden from the command line.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{JigError, Result};

/// Default UDP port of the jig
pub const DEFAULT_PORT: u16 = 8888;

/// Default address of the Teensy on the bench network
pub const DEFAULT_JIG_IP: &str = "192.168.1.177";

/// Default client receive timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// Datagram buffer size on both ends
pub const DEFAULT_BUFFER_SIZE: usize = 1024;

/// Number of history lines kept by the interactive client
pub const DEFAULT_HISTORY_LEN: usize = 1000;

/// Main configuration for a jigctl client or server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Server Configuration
    // -------------------------------------------------------------------------
    /// UDP address the server binds to
    pub listen_addr: String,

    // -------------------------------------------------------------------------
    // Client Configuration
    // -------------------------------------------------------------------------
    /// Address of the jig (host:port)
    pub server_addr: String,

    /// Reply timeout (milliseconds)
    pub recv_timeout_ms: u64,

    /// History file of the interactive client
    pub history_file: Option<PathBuf>,

    /// Max lines kept in the history file
    pub history_len: usize,

    // -------------------------------------------------------------------------
    // Shared
    // -------------------------------------------------------------------------
    /// Receive buffer size; one datagram must fit
    pub recv_buffer_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: format!("0.0.0.0:{}", DEFAULT_PORT),
            server_addr: format!("{}:{}", DEFAULT_JIG_IP, DEFAULT_PORT),
            recv_timeout_ms: DEFAULT_TIMEOUT.as_millis() as u64,
            history_file: default_history_file(),
            history_len: DEFAULT_HISTORY_LEN,
            recv_buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Load a config from a TOML file. Missing keys keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
            .map_err(|e| JigError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Parse a config from TOML text
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| JigError::Config(e.to_string()))
    }

    /// Serialize this config as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| JigError::Config(e.to_string()))
    }

    pub fn recv_timeout(&self) -> Duration {
        Duration::from_millis(self.recv_timeout_ms)
    }
}

/// `~/.client_history`, if a home directory exists
fn default_history_file() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".client_history"))
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Start from an existing config (e.g. one loaded from a file)
    pub fn from_config(config: Config) -> Self {
        Self { config }
    }

    /// Set the UDP address the server binds to
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the jig address the client talks to
    pub fn server_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.server_addr = addr.into();
        self
    }

    /// Set the client reply timeout (in milliseconds)
    pub fn recv_timeout_ms(mut self, ms: u64) -> Self {
        self.config.recv_timeout_ms = ms;
        self
    }

    /// Set the datagram receive buffer size (in bytes)
    pub fn recv_buffer_size(mut self, size: usize) -> Self {
        self.config.recv_buffer_size = size;
        self
    }

    pub fn history_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.history_file = Some(path.into());
        self
    }

    pub fn history_len(mut self, len: usize) -> Self {
        self.config.history_len = len;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_bench_setup() {
        let config = Config::default();
        assert_eq!(config.server_addr, "192.168.1.177:8888");
        assert_eq!(config.listen_addr, "0.0.0.0:8888");
        assert_eq!(config.recv_timeout(), Duration::from_secs(2));
        assert_eq!(config.recv_buffer_size, 1024);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = Config::from_toml("server_addr = \"10.0.0.5:9000\"\n").unwrap();
        assert_eq!(config.server_addr, "10.0.0.5:9000");
        assert_eq!(config.recv_timeout_ms, 2000);
        assert_eq!(config.history_len, DEFAULT_HISTORY_LEN);
    }

    #[test]
    fn bad_toml_is_config_error() {
        let err = Config::from_toml("recv_timeout_ms = \"soon\"").unwrap_err();
        assert!(matches!(err, JigError::Config(_)));
    }
}
