use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const BACKEND_URL_ENV: &str = "PAPERLIGHT_BACKEND_URL";

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub backend: BackendConfig,
    pub layout: LayoutConfig,
}

/// Where the explanation and paper services live.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub url: String,
    pub explain_path: String,
    pub paper_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Windows narrower than this (px) get the bottom drawer instead of the side panel.
    pub compact_breakpoint: i32,
    /// How often the UI thread checks for a finished lookup.
    pub poll_interval_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:5000".to_string(),
            explain_path: "/prompt_about_text".to_string(),
            paper_path: "/get_paper_body".to_string(),
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            compact_breakpoint: 768,
            poll_interval_ms: 100,
        }
    }
}

impl BackendConfig {
    pub fn explain_url(&self) -> String {
        join_url(&self.url, &self.explain_path)
    }

    pub fn paper_url(&self) -> String {
        join_url(&self.url, &self.paper_path)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

impl AppConfig {
    /// Load `~/.config/paperlight/config.toml`, then apply the environment override.
    /// Falls back to defaults when the file is missing or broken.
    pub fn load() -> Self {
        let path = Self::config_path();
        let mut config = match Self::read_from(&path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(ConfigError::Io(_)) => {
                log::debug!("No config file at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                log::warn!("{} at {}, using defaults", e, path.display());
                Self::default()
            }
        };

        if let Ok(url) = std::env::var(BACKEND_URL_ENV)
            && !url.trim().is_empty()
        {
            config.backend.url = url;
        }

        config
    }

    fn read_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("paperlight").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }
}
