//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// Titan - extension discovery and activation
#[derive(Parser, Debug)]
#[command(name = "titan")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Project directory to scan
    #[arg(short, long, global = true, default_value = ".", env = "TITAN_ROOT")]
    pub root: Utf8PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show version information
    Version(VersionArgs),

    /// List discovered extensions
    List(ListArgs),

    /// Show the activation order
    Order(OrderArgs),

    /// Activate every extension and summarize the namespace
    Bootstrap(BootstrapArgs),
}

// Version command
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

// List command
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

// Order command
#[derive(Args, Debug)]
pub struct OrderArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

// Bootstrap command
#[derive(Args, Debug)]
pub struct BootstrapArgs {
    /// Interpreter used to run entry modules
    #[arg(long, default_value = titan_extensions::loader::DEFAULT_INTERPRETER)]
    pub interpreter: String,

    /// Extra interpreter arguments placed before the module path
    #[arg(long = "interpreter-arg", value_name = "ARG")]
    pub interpreter_args: Vec<String>,
}
