//! Server configuration
//!
//! Read from a TOML file, then overridden by environment variables. A missing
//! file is not an error: every field has a default.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Secret used when nothing else is configured; fine for local runs only
pub const DEV_JWT_SECRET: &str = "seatdesk-dev-secret-change-me";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub bind_addr: String,
    pub jwt_secret: String,
    pub log_filter: String,
    pub cors_permissive: bool,
    /// Lifetime of tokens issued by the `token` command
    pub token_ttl_hours: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:5000".into(),
            jwt_secret: DEV_JWT_SECRET.into(),
            log_filter: "info".into(),
            cors_permissive: true,
            token_ttl_hours: 8,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

impl Config {
    /// Load from `SEATDESK_CONFIG` (default `seatdesk.toml`) plus env overrides
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("SEATDESK_CONFIG").unwrap_or_else(|_| "seatdesk.toml".into());
        Ok(Self::from_path(Path::new(&path))?.with_overrides(|key| std::env::var(key).ok()))
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Apply `SEATDESK_BIND_ADDR`, `SEATDESK_JWT_SECRET` and `RUST_LOG`
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(addr) = lookup("SEATDESK_BIND_ADDR") {
            self.bind_addr = addr;
        }
        if let Some(secret) = lookup("SEATDESK_JWT_SECRET") {
            self.jwt_secret = secret;
        }
        if let Some(filter) = lookup("RUST_LOG") {
            self.log_filter = filter;
        }
        self
    }

    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }
}
