//! Configuration loading and asset folder resolution
//!
//! Resolution priority for every setting: command-line argument, then
//! environment variable, then TOML config file, then compiled default.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::PathBuf;
use tracing::{info, warn};

/// Environment variable naming the custom asset folder
pub const ASSET_FOLDER_ENV: &str = "CUEFX_ASSET_FOLDER";

/// Environment variable carrying the generation service credential
pub const API_KEY_ENV: &str = "CUEFX_API_KEY";

/// Accepted duration range of the generation service, seconds
pub const DURATION_RANGE_SECONDS: (f64, f64) = (1.0, 22.0);

/// Optional settings read from the TOML config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Custom folder holding generated assets
    pub asset_folder: Option<String>,
    /// Generation service credential
    pub api_key: Option<String>,
    /// Generation endpoint override (testing / self-hosted gateways)
    pub endpoint: Option<String>,
    /// Default clip duration when the user sets none
    pub default_duration_seconds: Option<f64>,
    /// How strongly the prompt steers generation (0.0 - 1.0)
    pub prompt_influence: Option<f64>,
}

impl TomlConfig {
    /// Load the config file from the platform config directory.
    ///
    /// A missing file is not an error; it yields the empty config.
    pub fn load() -> Result<Self> {
        let path = match config_file_path() {
            Some(p) if p.exists() => p,
            _ => return Ok(Self::default()),
        };

        let content = std::fs::read_to_string(&path)?;
        let config: TomlConfig = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Invalid config file {}: {}", path.display(), e)))?;

        info!(path = %path.display(), "Loaded TOML config");
        Ok(config)
    }
}

/// Get the config file path for the platform (`<config dir>/cuefx/config.toml`)
fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("cuefx").join("config.toml"))
}

/// Resolve the custom asset folder, if any.
///
/// Priority: CLI argument, environment variable, TOML config. Returns `None`
/// when no custom folder is configured; the caller falls back to the
/// conventional search roots.
pub fn resolve_asset_folder(cli_arg: Option<&str>, toml_config: &TomlConfig) -> Option<PathBuf> {
    if let Some(path) = cli_arg {
        return Some(PathBuf::from(path));
    }

    if let Ok(path) = std::env::var(ASSET_FOLDER_ENV) {
        if !path.is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    toml_config.asset_folder.as_ref().map(PathBuf::from)
}

/// Resolve the generation service credential.
///
/// Priority: environment variable, then TOML config. Warns when both are set
/// since that usually means a stale key is shadowing the intended one.
pub fn resolve_api_key(toml_config: &TomlConfig) -> Result<String> {
    let env_key = std::env::var(API_KEY_ENV).ok().filter(|k| !k.trim().is_empty());
    let toml_key = toml_config
        .api_key
        .as_ref()
        .filter(|k| !k.trim().is_empty());

    if env_key.is_some() && toml_key.is_some() {
        warn!(
            "API key found in both {} and the config file; using the environment variable",
            API_KEY_ENV
        );
    }

    if let Some(key) = env_key {
        info!("API key loaded from environment variable");
        return Ok(key);
    }

    if let Some(key) = toml_key {
        info!("API key loaded from TOML config");
        return Ok(key.clone());
    }

    Err(Error::Config(format!(
        "Generation service API key not configured. Set {} or add api_key to the config file.",
        API_KEY_ENV
    )))
}

/// Clamp a configured duration into the range the service accepts
pub fn clamp_duration_seconds(requested: f64) -> f64 {
    requested.clamp(DURATION_RANGE_SECONDS.0, DURATION_RANGE_SECONDS.1)
}

/// Clamp prompt influence into 0.0 - 1.0
pub fn clamp_influence(requested: f64) -> f64 {
    requested.clamp(0.0, 1.0)
}
