//! Configuration file and environment overrides.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client-side password rules. All off by default.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct PasswordRulesConfig {
    #[serde(default)]
    pub min_length: Option<usize>,
    #[serde(default)]
    pub require_uppercase: bool,
    #[serde(default)]
    pub require_digit: bool,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Base path every request and redirect is resolved against
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub password_rules: PasswordRulesConfig,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_timeout_secs(),
            log_level: default_log_level(),
            password_rules: PasswordRulesConfig::default(),
        }
    }
}

/// Default config location: ~/.userform/config.toml
pub fn config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".userform")
        .join("config.toml")
}

impl Config {
    /// Load from the default location. A missing file yields defaults.
    pub fn load() -> Result<Self> {
        let path = config_path();
        let mut cfg = if path.exists() {
            Self::read_file(&path)?
        } else {
            Self::default()
        };
        cfg.apply_env();
        Ok(cfg)
    }

    /// Load from an explicit path, which must exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut cfg = Self::read_file(path)?;
        cfg.apply_env();
        Ok(cfg)
    }

    fn read_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("Invalid config {}", path.display()))
    }

    /// USERFORM_BASE_URL and USERFORM_TIMEOUT_SECS take precedence over the file.
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("USERFORM_BASE_URL") {
            if !url.is_empty() {
                self.base_url = url;
            }
        }
        if let Some(secs) = std::env::var("USERFORM_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            self.request_timeout_secs = secs;
        }
    }

    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        if self.base_url.trim().is_empty() {
            errors.push("base_url must not be empty".to_string());
        } else if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            errors.push(format!(
                "base_url '{}' must start with http:// or https://",
                self.base_url
            ));
        }
        if self.request_timeout_secs == 0 {
            errors.push("request_timeout_secs must be greater than 0".to_string());
        }
        if self.password_rules.min_length == Some(0) {
            errors.push("password_rules.min_length must be greater than 0".to_string());
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
