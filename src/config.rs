//! Configuration handling for the TUI

use crate::api::DEFAULT_BASE_URL;
use crate::state::ROWS_PER_PAGE_OPTIONS;
use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding the API base URL
pub const API_URL_ENV: &str = "TICKETDESK_API_URL";

/// Request timeout when none is configured
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// User configuration for the TUI
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct TuiConfig {
    /// Base URL of the ticket API
    pub api_base_url: Option<String>,
    /// Rows shown per page in the ticket list
    pub rows_per_page: Option<usize>,
    /// HTTP request timeout in seconds
    pub request_timeout_secs: Option<u64>,
}

/// Effective settings after applying defaults and the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_base_url: String,
    pub rows_per_page: usize,
    pub request_timeout: Duration,
}

impl TuiConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("io", "ticketdesk", "ticketdesk")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from the user config file
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from `path`, falling back to defaults when absent
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let config: TuiConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to `path`
    #[allow(dead_code)]
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Resolve effective settings, reading the override from the environment
    pub fn settings(&self) -> Settings {
        self.resolve(std::env::var(API_URL_ENV).ok())
    }

    /// Resolve effective settings with an explicit base URL override
    pub fn resolve(&self, env_url: Option<String>) -> Settings {
        let api_base_url = env_url
            .filter(|url| !url.trim().is_empty())
            .or_else(|| self.api_base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let rows_per_page = self
            .rows_per_page
            .filter(|rows| ROWS_PER_PAGE_OPTIONS.contains(rows))
            .unwrap_or(ROWS_PER_PAGE_OPTIONS[0]);

        let timeout_secs = self
            .request_timeout_secs
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Settings {
            api_base_url,
            rows_per_page,
            request_timeout: Duration::from_secs(timeout_secs),
        }
    }
}
