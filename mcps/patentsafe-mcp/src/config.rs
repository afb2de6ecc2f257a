//! Configuration loading for patentsafe-mcp
//!
//! Connection parameters (base URL, token) come from the command line or
//! environment. Tuning knobs are loaded from:
//! 1. Environment variable PATENTSAFE_CONFIG_PATH
//! 2. ~/.config/patentsafe-mcp.toml
//! 3. Default values

use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;

use crate::types::PsError;

/// Resolved server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// PatentSafe base URL, without trailing slash
    pub base_url: String,
    /// Personal authentication token (Bearer)
    pub auth_token: String,
    /// Documents per search result page
    pub page_size: usize,
    /// Maximum characters returned for a single tool response
    pub max_response_chars: usize,
    /// HTTP request timeout
    pub timeout_seconds: u64,
}

/// Tuning values read from the optional TOML file
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub page_size: Option<usize>,
    pub max_response_chars: Option<usize>,
    pub timeout_seconds: Option<u64>,
}

fn default_page_size() -> usize {
    10
}

fn default_max_response_chars() -> usize {
    500_000
}

fn default_timeout_seconds() -> u64 {
    30
}

impl Config {
    /// Build the configuration from connection parameters plus the
    /// optional tuning file.
    pub fn load(base_url: String, auth_token: String) -> Result<Self> {
        let file = match Self::find_config_path() {
            Some(path) if path.exists() => {
                tracing::info!("Loading config from: {}", path.display());
                let content = std::fs::read_to_string(&path)?;
                toml::from_str(&content)?
            }
            _ => FileConfig::default(),
        };

        Ok(Self::with_file(base_url, auth_token, file)?)
    }

    /// Merge connection parameters with file-level tuning
    pub fn with_file(
        base_url: String,
        auth_token: String,
        file: FileConfig,
    ) -> Result<Self, PsError> {
        // Validate early so a typo'd URL fails at startup, not per-request
        url::Url::parse(&base_url).map_err(|_| PsError::InvalidUrl)?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token,
            page_size: file.page_size.unwrap_or_else(default_page_size),
            max_response_chars: file
                .max_response_chars
                .unwrap_or_else(default_max_response_chars),
            timeout_seconds: file.timeout_seconds.unwrap_or_else(default_timeout_seconds),
        })
    }

    fn find_config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("PATENTSAFE_CONFIG_PATH") {
            return Some(PathBuf::from(path));
        }

        if let Ok(home) = std::env::var("HOME") {
            return Some(
                PathBuf::from(home)
                    .join(".config")
                    .join("patentsafe-mcp.toml"),
            );
        }

        None
    }
}
