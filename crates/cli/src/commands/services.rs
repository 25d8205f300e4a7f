//! Long-running services and the offline router preview.

use crate::commands::{parse_input, print_json, shutdown_signal};
use color_eyre::eyre::{Result, WrapErr};
use colored::Colorize;
use mesh_core::directory::DirectoryService;
use mesh_core::executor::CommandExecutor;
use mesh_core::registry::RegistryStore;
use mesh_core::router::{build_prompt, TaskRouter};
use mesh_protocol::config_models::GlobalConfig;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;

pub async fn directory(config: &GlobalConfig, host: Option<String>, port: Option<u16>) -> Result<()> {
    let host = host.unwrap_or_else(|| config.directory.host.clone());
    let port = port.unwrap_or(config.directory.port);

    let listener = TcpListener::bind((host.as_str(), port))
        .await
        .wrap_err_with(|| format!("Failed to bind {host}:{port}"))?;

    println!("{} Directory running on http://{host}:{port}", "✓".green());
    DirectoryService::new(Arc::new(RegistryStore::new()))
        .serve_with_shutdown(listener, shutdown_signal())
        .await?;
    Ok(())
}

pub async fn bridge(config: &GlobalConfig, host: Option<String>, port: Option<u16>) -> Result<()> {
    let host = host.unwrap_or_else(|| config.bridge.host.clone());
    let port = port.unwrap_or(config.bridge.port);

    if !CommandExecutor::is_available(&config.bridge.command) {
        tracing::warn!(
            command = %config.bridge.command,
            "backend not found on PATH; tasks will fail to launch"
        );
    }

    let listener = TcpListener::bind((host.as_str(), port))
        .await
        .wrap_err_with(|| format!("Failed to bind {host}:{port}"))?;

    let router = TaskRouter::new(&config.bridge, Arc::new(CommandExecutor::new()));

    println!("{} Bridge running on http://{host}:{port}", "✓".green());
    println!(
        "  Routes tasks to `{}` (timeout {}s)",
        config.bridge.command, config.bridge.timeout_secs
    );
    router.serve_with_shutdown(listener, shutdown_signal()).await?;
    Ok(())
}

/// Print the routing decision and the backend invocation without running it.
pub fn route(config: &GlobalConfig, action: &str, input_json: Option<&str>) -> Result<()> {
    let input = match input_json {
        Some(raw) => parse_input(raw)?,
        None => Value::Object(Default::default()),
    };

    let router = TaskRouter::new(&config.bridge, Arc::new(CommandExecutor::new()));
    let target = router.classify(action, &input);
    let prompt = build_prompt(action, &input);
    let request = router.backend_request(&target.agent_id, &prompt);

    print_json(&json!({
        "agent": target.agent_id,
        "name": target.name,
        "prompt": prompt,
        "command": request.command,
        "args": request.args,
    }))
}
