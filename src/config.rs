//! API connection configuration.
//!
//! Precedence: command-line flags, then `SUBTRACK_HOST`/`SUBTRACK_TOKEN`
//! environment variables (a `.env` file is honored), then the TOML config
//! file under the platform config directory.

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use log::warn;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    pub host: Option<String>,
    pub token: Option<String>,
}

impl Config {
    pub fn load() -> Self {
        // Load .env if present so env vars can come from it.
        dotenvy::dotenv().ok();

        let mut config = Self::from_file().unwrap_or_default();
        if let Ok(host) = std::env::var("SUBTRACK_HOST") {
            config.host = Some(host);
        }
        if let Ok(token) = std::env::var("SUBTRACK_TOKEN") {
            config.token = Some(token);
        }
        config
    }

    fn config_file() -> Option<PathBuf> {
        Some(dirs::config_dir()?.join("subtrack-cli").join("config.toml"))
    }

    fn from_file() -> Option<Self> {
        let path = Self::config_file()?;
        let content = std::fs::read_to_string(&path).ok()?;
        match toml::from_str(&content) {
            Ok(config) => Some(config),
            Err(e) => {
                warn!("ignoring malformed config file {}: {e}", path.display());
                None
            }
        }
    }

    /// Resolve the API host, preferring an explicit flag.
    pub fn resolve_host(&self, flag: Option<String>) -> Result<String> {
        flag.or_else(|| self.host.clone()).ok_or_else(|| {
            anyhow!("no API host configured; pass --host or set SUBTRACK_HOST")
        })
    }

    pub fn resolve_token(&self, flag: Option<String>) -> Option<String> {
        flag.or_else(|| self.token.clone())
    }
}
