//! Darul Ifta CLI
//!
//! Runs the HTTP server or an operator command against the request store.

use anyhow::Context;
use clap::Parser;
use ifta_server::cli::{Cli, Command};
use ifta_server::{commands, init_tracing, open_store, start_server, ServerConfig};
use std::path::Path;
use std::sync::Arc;

const DEFAULT_CONFIG_FILE: &str = "ifta.toml";

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    init_tracing(&config.logging.level);

    let command = cli.command.unwrap_or(Command::Serve);
    if let Command::Serve = command {
        return start_server(config).await.context("server failed");
    }

    let store = Arc::new(open_store(&config)?);
    let mut out = std::io::stdout().lock();
    match command {
        Command::Review(args) => commands::execute_review(args, &store, &mut out)?,
        Command::Recent(args) => {
            commands::execute_recent(args, &store, &config.listing, &mut out)?
        }
        Command::Search(args) => {
            commands::execute_search(args, &store, &config.listing, &mut out)?
        }
        Command::Status(args) => commands::execute_status(args, &store, &mut out)?,
        Command::Serve => {}
    }
    Ok(())
}

fn load_config(explicit: Option<&Path>) -> anyhow::Result<ServerConfig> {
    let config = match explicit {
        Some(path) => ServerConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            ServerConfig::from_file(DEFAULT_CONFIG_FILE)
                .with_context(|| format!("loading {}", DEFAULT_CONFIG_FILE))?
        }
        None => ServerConfig::default(),
    };
    Ok(config.with_env_overrides()?)
}
