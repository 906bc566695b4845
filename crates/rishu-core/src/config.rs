use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::query::Provider;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RishuConfig {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub query: QueryConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the recommendation service; `/recommend` is appended.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Connect-only limit: it bounds opening the TCP connection. Once
    /// connected, a request has no timeout and is never cancelled.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Provider preselected when the app starts.
    #[serde(default)]
    pub default_provider: Provider,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}
fn default_connect_timeout() -> u64 {
    10
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            connect_timeout_seconds: default_connect_timeout(),
        }
    }
}

impl RishuConfig {
    /// Load config from ~/.config/rishu/config.toml, creating defaults if missing.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load config from `path`, writing defaults there if it does not exist.
    pub fn load_from(path: &Path) -> crate::error::Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path).map_err(|e| {
                crate::error::RishuError::Config(format!("Failed to read config: {e}"))
            })?;
            let config: RishuConfig = toml::from_str(&contents).map_err(|e| {
                crate::error::RishuError::Config(format!("Failed to parse config: {e}"))
            })?;
            Ok(config)
        } else {
            let config = RishuConfig::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Save config to the default location.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self).map_err(|e| {
            crate::error::RishuError::Config(format!("Failed to serialize config: {e}"))
        })?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Get the config file path.
    pub fn config_path() -> crate::error::Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            crate::error::RishuError::Config("Could not determine config directory".into())
        })?;
        Ok(config_dir.join("rishu").join("config.toml"))
    }
}
