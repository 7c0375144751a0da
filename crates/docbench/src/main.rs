//! Command-line entry point for docbench.

use anyhow::Context;
use clap::{Parser, Subcommand};
use docbench::{ConfigOverrides, init_logging, resolve_config, seed};
use docbench_store::connect;
use log::info;
use std::path::PathBuf;

/// Command-line options for docbench.
#[derive(Parser)]
#[command(name = "docbench", version, about = "Document store insert and query demos")]
struct Cli {
    /// Optional path to a docbench.json5 config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Store connection string (memory://, file://DIR, sqlite://PATH)
    #[arg(long, global = true)]
    uri: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the HTTP endpoints
    Serve {
        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,
    },
    /// Insert one bulk batch of records and exit
    Seed {
        /// Number of records to insert
        #[arg(long)]
        count: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();
    let cwd = std::env::current_dir().context("failed to resolve current working directory")?;
    let mut overrides = ConfigOverrides {
        config_path: cli.config,
        uri: cli.uri,
        ..ConfigOverrides::default()
    };
    match &cli.command {
        Command::Serve { port } => overrides.port = *port,
        Command::Seed { count } => overrides.seed_count = *count,
    }
    let config = resolve_config(&cwd, &overrides).context("failed to load config")?;

    match cli.command {
        Command::Serve { .. } => {
            docbench_server::serve(&config)
                .await
                .context("server exited with an error")?;
        }
        Command::Seed { .. } => {
            let count = config.seed.count;
            info!("connecting to store (uri={})", config.store.uri);
            let store = connect(&config.store).context("failed to connect to store")?;
            seed(store.as_ref(), count)
                .await
                .context("seed failed")?;
        }
    }
    Ok(())
}
