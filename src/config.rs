//! Wizard configuration.
//!
//! Settings come from the user config file, then `CWIZ_*` environment
//! variables, then command-line flags; later sources win.
use crate::model::WizardMode;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Current schema version for `config.json`.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;
/// Request timeout when the config does not set one.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENV_CONFIG_PATH: &str = "CWIZ_CONFIG";
pub const ENV_BACKEND_URL: &str = "CWIZ_BACKEND_URL";
pub const ENV_DEV_MODE: &str = "CWIZ_DEV_MODE";
pub const ENV_GITHUB_TOKEN: &str = "CWIZ_GITHUB_TOKEN";

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Resolved settings for one invocation.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct WizardConfig {
    pub schema_version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend_url: Option<String>,
    /// Hosted identity API; the public endpoint when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_api_url: Option<String>,
    /// Explicit dev-mode setting; unset defers to the backend's env config.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dev_mode: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<WizardMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            schema_version: CONFIG_SCHEMA_VERSION,
            backend_url: None,
            github_api_url: None,
            dev_mode: None,
            mode: None,
            github_token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Values given on the command line.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub backend_url: Option<String>,
    pub dev_mode: Option<bool>,
    pub github_token: Option<String>,
    pub mode: Option<WizardMode>,
}

/// `config.json` location: `$CWIZ_CONFIG`, else `<config_dir>/cwiz/config.json`.
pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(ENV_CONFIG_PATH) {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|dir| dir.join("cwiz").join("config.json"))
}

pub fn load_config(path: &Path) -> Result<WizardConfig> {
    let bytes = fs::read(path).with_context(|| format!("read config {}", path.display()))?;
    let config: WizardConfig = serde_json::from_slice(&bytes)
        .with_context(|| format!("parse config JSON {}", path.display()))?;
    Ok(config)
}

/// Load a config file if one exists.
pub fn load_config_optional(path: &Path) -> Result<Option<WizardConfig>> {
    if !path.is_file() {
        return Ok(None);
    }
    load_config(path).map(Some)
}

pub fn validate_config(config: &WizardConfig) -> Result<()> {
    if config.schema_version != CONFIG_SCHEMA_VERSION {
        return Err(anyhow!(
            "unsupported config schema_version {}",
            config.schema_version
        ));
    }
    for (label, url) in [
        ("backend_url", config.backend_url.as_deref()),
        ("github_api_url", config.github_api_url.as_deref()),
    ] {
        if let Some(url) = url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(anyhow!("{label} must be an http(s) URL (got {url:?})"));
            }
        }
    }
    if config.timeout_secs == 0 {
        return Err(anyhow!("timeout_secs must be greater than zero"));
    }
    Ok(())
}

fn parse_flag(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(anyhow!("{name} must be true or false (got {other:?})")),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Layer environment values over a config; `lookup` is `std::env::var` in practice.
pub fn apply_env(
    mut config: WizardConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<WizardConfig> {
    if let Some(url) = non_empty(lookup(ENV_BACKEND_URL)) {
        config.backend_url = Some(url);
    }
    if let Some(flag) = non_empty(lookup(ENV_DEV_MODE)) {
        config.dev_mode = Some(parse_flag(ENV_DEV_MODE, &flag)?);
    }
    if let Some(token) = non_empty(lookup(ENV_GITHUB_TOKEN)) {
        config.github_token = Some(token);
    }
    Ok(config)
}

pub fn apply_overrides(mut config: WizardConfig, overrides: &ConfigOverrides) -> WizardConfig {
    if let Some(url) = &overrides.backend_url {
        config.backend_url = Some(url.clone());
    }
    if let Some(flag) = overrides.dev_mode {
        config.dev_mode = Some(flag);
    }
    if let Some(token) = &overrides.github_token {
        config.github_token = Some(token.clone());
    }
    if let Some(mode) = overrides.mode {
        config.mode = Some(mode);
    }
    config
}

/// Resolve file, environment and flags into one validated config.
pub fn resolve_config(overrides: &ConfigOverrides) -> Result<WizardConfig> {
    let from_file = match config_path() {
        Some(path) => load_config_optional(&path)?,
        None => None,
    };
    let config = apply_env(from_file.unwrap_or_default(), |key| std::env::var(key).ok())?;
    let config = apply_overrides(config, overrides);
    validate_config(&config)?;
    Ok(config)
}
