//! Switchboard CLI entry point.
//!
//! Commands:
//! - `init`  : write a starter bootstrap config and sample settings
//! - `serve` : start the HTTP gateway
//! - `check` : diagnose configuration and settings-store health

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "switchboard",
    about = "Demo chat backend with live-switchable model configuration",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter bootstrap config and sample settings document
    Init {
        /// Directory to write into
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },

    /// Start the HTTP gateway server
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Diagnose configuration and settings-store health
    Check,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Init { dir } => commands::init::run(&dir).await?,
        Commands::Serve { port } => commands::serve::run(port).await?,
        Commands::Check => commands::check::run().await?,
    }

    Ok(())
}
