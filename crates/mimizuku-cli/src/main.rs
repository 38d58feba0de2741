//! Mimizuku CLI main entry point

use anyhow::Result;
use clap::Parser;
use mimizuku_cli::commands::{Cli, CommandExecutor};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over --verbose
    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with_writer(std::io::stderr)
        .init();

    let executor = CommandExecutor::new();
    let result = executor.execute(cli.command)?;

    if result.success {
        std::process::exit(0);
    } else {
        eprintln!("{}", result.message);
        std::process::exit(1);
    }
}
