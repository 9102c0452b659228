use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: "http://localhost:8080/api".to_string(),
        }
    }
}

/// Poll cadences per feed, in seconds.
///
/// The backend caches upstream responses and enforces its own rate budget,
/// so the defaults stay well inside 20 requests/minute even with all feeds
/// registered.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FeedsConfig {
    pub quotes_interval_secs: u64,
    pub limits_interval_secs: u64,
    pub history_interval_secs: u64,
}

impl Default for FeedsConfig {
    fn default() -> Self {
        FeedsConfig {
            quotes_interval_secs: 90,
            limits_interval_secs: 30,
            history_interval_secs: 300,
        }
    }
}

impl FeedsConfig {
    pub fn quotes_interval(&self) -> Duration {
        Duration::from_secs(self.quotes_interval_secs)
    }

    pub fn limits_interval(&self) -> Duration {
        Duration::from_secs(self.limits_interval_secs)
    }

    pub fn history_interval(&self) -> Duration {
        Duration::from_secs(self.history_interval_secs)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct WatchConfig {
    /// Seconds between dashboard redraws.
    pub redraw_secs: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        WatchConfig { redraw_secs: 5 }
    }
}

impl WatchConfig {
    pub fn redraw_interval(&self) -> Duration {
        Duration::from_secs(self.redraw_secs)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub feeds: FeedsConfig,
    #[serde(default)]
    pub watch: WatchConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("in", "codito", "cryptick")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}
