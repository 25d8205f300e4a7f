//! Loaded configuration.

use mesh_protocol::config_models::GlobalConfig;
use std::path::PathBuf;

/// Settings resolved from `.mesh/config.toml` and the environment.
///
/// # Example
///
/// ```rust,no_run
/// use mesh_core::config::loader::load_config;
/// use std::path::Path;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("."))?;
/// println!("Directory at {}", config.global.directory_url);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    pub global: GlobalConfig,

    /// File the settings came from, `None` when running on defaults.
    pub source: Option<PathBuf>,
}
