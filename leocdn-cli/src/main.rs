//! LEO CDN CLI - Command-line interface
//!
//! Runs caching-strategy simulations over precomputed workloads.

mod commands;

use std::path::PathBuf;

use clap::Parser;
use leocdn_core::tracing_setup::{CliLogLevel, init_tracing};

#[derive(Parser)]
#[command(name = "leocdn")]
#[command(about = "Compare CDN caching strategies in a LEO satellite network")]
#[command(version)]
struct Cli {
    /// Console log level
    #[arg(long, value_enum, default_value_t = CliLogLevel::Info, global = true)]
    log_level: CliLogLevel,

    /// Directory for the full trace of the run
    #[arg(long, global = true)]
    logs_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: commands::Commands,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_tracing_level(), cli.logs_dir.as_deref())?;

    commands::handle_command(cli.command).await
}
