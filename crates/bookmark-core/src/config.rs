//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/bookmark/config.toml)
//! 3. Environment variables (BOOKMARK_* prefix)
//!
//! Environment variables take precedence over config file values.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

/// Environment variable prefix
const ENV_PREFIX: &str = "BOOKMARK";

/// Default per-attempt fetch timeout in seconds
pub const DEFAULT_FETCH_TIMEOUT: u64 = 20;

/// Default retry budget beyond the first attempt
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default cap on redirects followed by the fetcher itself
pub const DEFAULT_MAX_REDIRECTS: u32 = 10;

/// Wayback Machine availability endpoint
pub const DEFAULT_AVAILABILITY_URL: &str = "http://archive.org/wayback/available";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Flat file holding one bookmark per line
    #[serde(default = "default_bookmark_file")]
    pub bookmark_file: PathBuf,

    /// Total timeout for a single fetch attempt, in seconds
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,

    /// Retries allowed after the initial fetch attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Redirects the fetcher follows on its own before giving up
    #[serde(default = "default_max_redirects")]
    pub max_redirects: u32,

    /// Let the HTTP client follow redirects transparently
    #[serde(default = "default_follow_redirects")]
    pub follow_redirects: bool,

    /// User-Agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Availability lookup endpoint
    #[serde(default = "default_availability_url")]
    pub availability_url: String,

    /// Log file path (logs go to stderr when unset)
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bookmark_file: default_bookmark_file(),
            fetch_timeout_secs: default_fetch_timeout(),
            max_retries: default_max_retries(),
            max_redirects: default_max_redirects(),
            follow_redirects: default_follow_redirects(),
            user_agent: default_user_agent(),
            availability_url: default_availability_url(),
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration from default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (BOOKMARK_FILE, BOOKMARK_FETCH_TIMEOUT, BOOKMARK_MAX_RETRIES)
    /// 2. Config file (~/.config/bookmark/config.toml or BOOKMARK_CONFIG)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration, preferring a path given on the command line
    pub fn load_with_cli_override(cli_path: Option<&PathBuf>) -> Result<Self> {
        match cli_path {
            Some(path) => Self::load_from_path(path),
            None => Self::load(),
        }
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        // BOOKMARK_FILE
        if let Ok(val) = std::env::var(format!("{}_FILE", ENV_PREFIX)) {
            if !val.is_empty() {
                self.bookmark_file = PathBuf::from(val);
            }
        }

        // BOOKMARK_FETCH_TIMEOUT
        if let Ok(val) = std::env::var(format!("{}_FETCH_TIMEOUT", ENV_PREFIX)) {
            match val.parse() {
                Ok(secs) => self.fetch_timeout_secs = secs,
                Err(_) => warn!("ignoring invalid {}_FETCH_TIMEOUT: {:?}", ENV_PREFIX, val),
            }
        }

        // BOOKMARK_MAX_RETRIES
        if let Ok(val) = std::env::var(format!("{}_MAX_RETRIES", ENV_PREFIX)) {
            match val.parse() {
                Ok(n) => self.max_retries = n,
                Err(_) => warn!("ignoring invalid {}_MAX_RETRIES: {:?}", ENV_PREFIX, val),
            }
        }
    }

    /// Get the config file path
    ///
    /// Can be overridden with BOOKMARK_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("bookmark")
            .join("config.toml")
    }

    /// Per-attempt fetch timeout
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

/// `$HOME/.bookmark`
fn default_bookmark_file() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".bookmark")
}

fn default_fetch_timeout() -> u64 {
    DEFAULT_FETCH_TIMEOUT
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

fn default_max_redirects() -> u32 {
    DEFAULT_MAX_REDIRECTS
}

fn default_follow_redirects() -> bool {
    true
}

fn default_user_agent() -> String {
    format!("bookmark/{}", env!("CARGO_PKG_VERSION"))
}

fn default_availability_url() -> String {
    DEFAULT_AVAILABILITY_URL.to_string()
}
