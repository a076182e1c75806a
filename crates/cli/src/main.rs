use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use nodedoc_engine::{EngineConfig, OperationValidator, SuggestionEngine};
use nodedoc_mcp::{McpHttpServer, McpToolServices, resolve_bind_address};
use nodedoc_registry::{NodeCatalog, RegistryConfig, expand_tilde};
use serde::Serialize;
use tracing::info;

#[derive(Parser)]
#[command(name = "nodedoc")]
#[command(version)]
#[command(about = "Suggest valid operations for misconfigured workflow nodes", long_about = None)]
struct Cli {
    /// Node catalog JSON file (overrides `catalog_path` from the config file)
    #[arg(long, global = true, env = "NODEDOC_CATALOG_PATH", value_name = "FILE")]
    catalog: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the MCP tools over streamable HTTP on a loopback address
    Serve {
        /// Loopback address to bind, port 0 picks a free port
        #[arg(long, default_value = "127.0.0.1:0")]
        bind: String,
    },

    /// Suggest operations for an invalid value
    Suggest {
        #[arg(value_name = "NODE_TYPE")]
        node_type: String,

        #[arg(value_name = "OPERATION")]
        operation: String,

        #[arg(long)]
        resource: Option<String>,

        /// Maximum number of suggestions
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        limit: Option<u64>,
    },

    /// Check an operation and explain why it is invalid
    Validate {
        #[arg(value_name = "NODE_TYPE")]
        node_type: String,

        #[arg(value_name = "OPERATION")]
        operation: String,

        #[arg(long)]
        resource: Option<String>,
    },

    /// List the normalized operations of a node
    Operations {
        #[arg(value_name = "NODE_TYPE")]
        node_type: String,

        #[arg(long)]
        resource: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let catalog = Arc::new(load_catalog(cli.catalog.as_deref())?);
    let engine = Arc::new(SuggestionEngine::new(catalog.clone(), EngineConfig::load()));

    match cli.command {
        Commands::Serve { bind } => serve(catalog, engine, &bind).await,
        Commands::Suggest {
            node_type,
            operation,
            resource,
            limit,
        } => {
            let limit = limit.map(usize::try_from).transpose().context("--limit is too large")?;
            print_json(&engine.find_similar_operations(&node_type, &operation, resource.as_deref(), limit))
        }
        Commands::Validate {
            node_type,
            operation,
            resource,
        } => {
            let validator = OperationValidator::new(engine);
            print_json(&validator.check(&node_type, &operation, resource.as_deref()))
        }
        Commands::Operations { node_type, resource } => {
            let operations = engine
                .get_node_operations(&node_type, resource.as_deref())
                .with_context(|| format!("cannot read operations for {node_type}"))?;
            print_json(&operations)
        }
    }
}

fn init_tracing() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_catalog(cli_path: Option<&str>) -> Result<NodeCatalog> {
    let path = resolve_catalog_path(cli_path, &RegistryConfig::load())?;
    NodeCatalog::load(&path).with_context(|| format!("failed to load node catalog from {}", path.display()))
}

fn resolve_catalog_path(cli_path: Option<&str>, config: &RegistryConfig) -> Result<PathBuf> {
    if let Some(path) = cli_path.filter(|path| !path.trim().is_empty()) {
        return Ok(expand_tilde(path));
    }
    match &config.catalog_path {
        Some(path) => Ok(path.clone()),
        None => bail!("no node catalog configured; pass --catalog, set NODEDOC_CATALOG_PATH, or set catalog_path in the config file"),
    }
}

async fn serve(catalog: Arc<NodeCatalog>, engine: Arc<SuggestionEngine>, bind: &str) -> Result<()> {
    let address = resolve_bind_address(Some(bind))?;
    let services = Arc::new(McpToolServices::new(catalog, engine));
    let running = McpHttpServer::new(address, services).start().await?;
    info!(url = %format!("http://{}/mcp", running.bound_address()), "nodedoc MCP server ready; press Ctrl-C to stop");

    tokio::signal::ctrl_c().await.context("failed to listen for Ctrl-C")?;
    info!(connected_clients = running.connected_clients(), "shutting down");
    running.stop().await
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
