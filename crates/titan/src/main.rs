//! Titan CLI - discover, order, and activate Titan extensions
//!
//! This is the main entry point for the titan command-line interface.

mod cli;
mod commands;
mod output;
mod version;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Version(args) => commands::version::run(args),
        Commands::List(args) => commands::list::run(args, &cli.root),
        Commands::Order(args) => commands::order::run(args, &cli.root),
        Commands::Bootstrap(args) => commands::bootstrap::run(args, &cli.root, cli.verbose).await,
    }
}

/// Initialize tracing with appropriate verbosity
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}
