pub mod agent;
pub mod services;

use color_eyre::eyre::{eyre, Result};
use serde_json::Value;

/// Split a comma separated capability list, dropping blanks.
pub fn parse_capabilities(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|cap| !cap.is_empty())
        .map(String::from)
        .collect()
}

/// Parse a JSON argument given on the command line.
pub fn parse_input(raw: &str) -> Result<Value> {
    serde_json::from_str(raw).map_err(|e| eyre!("Invalid JSON for input: {e}"))
}

/// Resolves when Ctrl-C is pressed.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

pub fn print_json(value: &impl serde::Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
