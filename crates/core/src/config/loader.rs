//! Loader for `.mesh/config.toml`.

use crate::config::error::{ConfigError, ConfigResult};
use crate::config::models::AppConfig;
use mesh_protocol::config_models::GlobalConfig;
use std::path::Path;

/// Environment variable overriding `directory_url`.
pub const DIRECTORY_URL_ENV: &str = "MESH_DIRECTORY_URL";

/// Loads configuration for the project at `root`.
///
/// Reads `<root>/.mesh/config.toml` and then applies the
/// `MESH_DIRECTORY_URL` environment variable on top.
///
/// # Returns
///
/// Defaults when `.mesh/` or the file is missing.
///
/// # Errors
///
/// Returns `ConfigError` if:
/// - The file exists but cannot be read
/// - The file is not valid TOML or has wrongly typed keys
/// - The bridge command is empty or its timeout is zero
pub fn load_config(root: &Path) -> ConfigResult<AppConfig> {
    load_config_with_env(root, std::env::var(DIRECTORY_URL_ENV).ok())
}

/// Same as [`load_config`], with the environment override passed in.
pub fn load_config_with_env(root: &Path, directory_url: Option<String>) -> ConfigResult<AppConfig> {
    let config_path = root.join(".mesh").join("config.toml");

    let mut config = if config_path.exists() {
        let content =
            std::fs::read_to_string(&config_path).map_err(|source| ConfigError::FileRead {
                path: config_path.clone(),
                source,
            })?;

        let global: GlobalConfig =
            toml::from_str(&content).map_err(|source| ConfigError::TomlParse {
                path: config_path.clone(),
                source,
            })?;

        validate(&global, &config_path)?;
        tracing::debug!(path = %config_path.display(), "loaded config");

        AppConfig {
            global,
            source: Some(config_path),
        }
    } else {
        AppConfig::default()
    };

    if let Some(url) = directory_url.filter(|url| !url.trim().is_empty()) {
        tracing::debug!(%url, "directory url overridden by {}", DIRECTORY_URL_ENV);
        config.global.directory_url = url;
    }

    Ok(config)
}

fn validate(global: &GlobalConfig, path: &Path) -> ConfigResult<()> {
    let invalid = |reason: &str| ConfigError::InvalidConfig {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    };

    if global.bridge.command.trim().is_empty() {
        return Err(invalid("bridge.command must not be empty"));
    }
    if global.bridge.timeout_secs == 0 {
        return Err(invalid("bridge.timeout_secs must be greater than zero"));
    }
    Ok(())
}
