//! Agent-side commands: talking to the directory and to peers.

use crate::commands::{parse_capabilities, parse_input, print_json, shutdown_signal};
use color_eyre::eyre::{Result, WrapErr};
use colored::Colorize;
use mesh_core::client::AgentClient;
use mesh_core::server::{AgentServer, EchoHandler};
use mesh_protocol::agent_models::AgentList;
use mesh_protocol::config_models::GlobalConfig;
use std::time::Duration;
use tokio::net::TcpListener;

/// Client used for one-off queries that do not act as a registered agent.
fn anonymous_client(config: &GlobalConfig, agent_id: &str, name: &str) -> AgentClient {
    AgentClient::new(agent_id, name, Vec::new(), config.directory_url.as_str())
}

pub async fn register(
    config: &GlobalConfig,
    agent_id: String,
    name: String,
    capabilities: &str,
    endpoint: &str,
) -> Result<()> {
    let mut client = AgentClient::new(
        agent_id,
        name,
        parse_capabilities(capabilities),
        config.directory_url.as_str(),
    );
    let response = client.register(endpoint).await?;
    println!("{} Registered {}", "✓".green(), response.agent_id.bold());
    Ok(())
}

pub async fn discover(config: &GlobalConfig, capabilities: &str, all: bool) -> Result<()> {
    let client = anonymous_client(config, "cli-discover", "CLI Discover");
    let wanted = parse_capabilities(capabilities);

    if all {
        let agents = client.discover_all(&wanted).await?;
        return print_json(&AgentList { agents });
    }

    match client.discover(&wanted).await? {
        Some(record) => print_json(&record),
        None => {
            println!("{}", "No agents found".yellow());
            Ok(())
        }
    }
}

pub async fn list(config: &GlobalConfig) -> Result<()> {
    let client = anonymous_client(config, "cli-list", "CLI List");
    let agents = client.list_agents().await?;
    print_json(&AgentList { agents })
}

pub async fn get(config: &GlobalConfig, agent_id: &str) -> Result<()> {
    let client = anonymous_client(config, "cli-get", "CLI Get");
    let record = client.get_agent(agent_id).await?;
    print_json(&record)
}

pub async fn send(
    config: &GlobalConfig,
    target_agent: &str,
    action: &str,
    input_json: &str,
    timeout_secs: Option<u64>,
) -> Result<()> {
    let input = parse_input(input_json)?;
    let client = anonymous_client(config, "cli-sender", "CLI Sender");

    let response = client
        .send_task_with_deadline(
            target_agent,
            action,
            input,
            timeout_secs.map(Duration::from_secs),
        )
        .await?;
    print_json(&response)
}

/// Bind, register the endpoint, then answer tasks with the echo handler.
pub async fn serve(
    config: &GlobalConfig,
    agent_id: String,
    name: String,
    capabilities: &str,
    port: u16,
) -> Result<()> {
    let capabilities = parse_capabilities(capabilities);
    let server = AgentServer::new(agent_id.as_str(), name.as_str(), capabilities.clone(), port);
    server.handle_task(EchoHandler);

    let listener = TcpListener::bind(("0.0.0.0", port))
        .await
        .wrap_err_with(|| format!("Failed to bind port {port}"))?;

    let mut client = AgentClient::new(agent_id, name, capabilities, config.directory_url.as_str());
    client
        .register(&server.endpoint())
        .await
        .wrap_err("Failed to register with the directory")?;

    println!("{}", "Starting agent server...".bold());
    println!("  Agent ID: {}", server.agent_id());
    println!("  Name: {}", server.name());
    println!("  Capabilities: {}", server.capabilities().join(", "));
    println!("  Endpoint: {}", server.endpoint().cyan());
    println!("\nServer running. Press Ctrl+C to stop.");

    server.serve_with_shutdown(listener, shutdown_signal()).await?;
    Ok(())
}
