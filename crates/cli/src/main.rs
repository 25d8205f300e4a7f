mod commands;

use clap::{Parser, Subcommand};
use color_eyre::eyre::WrapErr;
use mesh_core::config::load_config;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "mesh")]
#[command(about = "Agent directory, discovery and task routing", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory URL (overrides config and MESH_DIRECTORY_URL)
    #[arg(short, long, global = true)]
    directory: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Register an agent with the directory
    Register {
        agent_id: String,
        name: String,
        /// Comma-separated capabilities
        capabilities: String,
        endpoint: String,
    },

    /// Find agents by capability
    Discover {
        /// Comma-separated capabilities to search
        capabilities: String,

        /// Print every match instead of the first
        #[arg(long)]
        all: bool,
    },

    /// List all registered agents
    List,

    /// Show one registered agent
    Get { agent_id: String },

    /// Send a task to an agent
    Send {
        target_agent: String,
        action: String,
        /// Task input as a JSON string
        input_json: String,

        /// Give up after this many seconds
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Run an echo agent, registering it first
    Serve {
        agent_id: String,
        name: String,
        /// Comma-separated capabilities
        capabilities: String,
        port: u16,
    },

    /// Run the directory service
    Directory {
        /// Host to bind to (overrides config directory.host)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config directory.port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Run the task router gateway
    Bridge {
        /// Host to bind to (overrides config bridge.host)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config bridge.port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Show where the router would send a task, without running it
    Route {
        action: String,
        /// Task input as a JSON string
        input_json: Option<String>,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let cwd = std::env::current_dir().wrap_err("Failed to resolve current directory")?;
    let mut config = load_config(&cwd)?.global;
    if let Some(url) = cli.directory {
        config.directory_url = url;
    }

    match cli.command {
        Commands::Register {
            agent_id,
            name,
            capabilities,
            endpoint,
        } => {
            commands::agent::register(&config, agent_id, name, &capabilities, &endpoint).await?;
        }
        Commands::Discover { capabilities, all } => {
            commands::agent::discover(&config, &capabilities, all).await?;
        }
        Commands::List => {
            commands::agent::list(&config).await?;
        }
        Commands::Get { agent_id } => {
            commands::agent::get(&config, &agent_id).await?;
        }
        Commands::Send {
            target_agent,
            action,
            input_json,
            timeout,
        } => {
            commands::agent::send(&config, &target_agent, &action, &input_json, timeout).await?;
        }
        Commands::Serve {
            agent_id,
            name,
            capabilities,
            port,
        } => {
            commands::agent::serve(&config, agent_id, name, &capabilities, port).await?;
        }
        Commands::Directory { host, port } => {
            commands::services::directory(&config, host, port).await?;
        }
        Commands::Bridge { host, port } => {
            commands::services::bridge(&config, host, port).await?;
        }
        Commands::Route { action, input_json } => {
            commands::services::route(&config, &action, input_json.as_deref())?;
        }
    }

    Ok(())
}
