//! Configuration loading.
//!
//! Settings live in `.mesh/config.toml` under the project root. Every key
//! is optional, and a missing file means defaults.

pub mod error;
pub mod loader;
pub mod models;

pub use error::{ConfigError, ConfigResult};
pub use loader::{load_config, DIRECTORY_URL_ENV};
pub use models::AppConfig;
