//! Global configuration models for `.mesh/config.toml`.
//!
//! This module defines the structure of the configuration file shared by
//! the `mesh` binary and the services it starts. Every section is optional;
//! absent keys fall back to the defaults below.

use serde::Deserialize;
use serde::Serialize;
use ts_rs::TS;

/// Directory address used when nothing else is configured.
pub const DEFAULT_DIRECTORY_URL: &str = "http://localhost:8080";

/// Represents global settings from `.mesh/config.toml`.
///
/// # Example
///
/// ```toml
/// # .mesh/config.toml
/// directory_url = "http://directory.internal:8080"
///
/// [directory]
/// port = 8080
///
/// [bridge]
/// command = "opengoat"
/// args = ["agent", "run", "{agent}", "--message", "{prompt}"]
/// timeout_secs = 120
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
#[serde(default)]
pub struct GlobalConfig {
    /// Directory service that clients register with and discover through.
    pub directory_url: String,

    /// Bind settings for `mesh directory`.
    pub directory: DirectoryConfig,

    /// Bind and backend settings for `mesh bridge`.
    pub bridge: BridgeConfig,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            directory_url: DEFAULT_DIRECTORY_URL.to_string(),
            directory: DirectoryConfig::default(),
            bridge: BridgeConfig::default(),
        }
    }
}

/// Where the directory service listens.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
#[serde(default)]
pub struct DirectoryConfig {
    pub host: String,
    pub port: u16,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// Task router gateway settings.
///
/// `args` is a template: each argument has `{agent}` and `{prompt}`
/// substituted before the backend is spawned. No shell is involved.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
#[serde(default)]
pub struct BridgeConfig {
    pub host: String,
    pub port: u16,

    /// Backend program, looked up on `PATH`.
    pub command: String,

    pub args: Vec<String>,

    /// Hard wall-clock limit for a single backend run.
    pub timeout_secs: u64,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 9101,
            command: "opengoat".to_string(),
            args: ["agent", "run", "{agent}", "--message", "{prompt}"]
                .into_iter()
                .map(String::from)
                .collect(),
            timeout_secs: 120,
        }
    }
}
