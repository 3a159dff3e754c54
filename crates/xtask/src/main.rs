//! Development tasks for the sky workspace
//!
//! This binary provides development utilities using the cargo-xtask pattern.
//! Run with: `cargo xtask <command>`

mod commands;
mod dirs;

use anyhow::Result;
use clap::Parser;
use commands::CheckData;

/// Development tasks for the sky workspace
#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Development tools for sky game data", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Parse every data file in a directory and report warnings
    CheckData(CheckData),
}

fn main() -> Result<()> {
    // Load .env file if it exists (for SKY_DATA_DIR and RUST_LOG)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::CheckData(cmd) => cmd.execute(),
    }
}
