//! Parse a data directory and report per-file results
//!
//! Every matching file is parsed with the same grammar the game uses.
//! Warnings are logged through `tracing` with the offending node's trace.

use anyhow::Result;
use clap::Parser;
use console::style;
use std::path::PathBuf;

use sky_data::{ConfigLoader, DataLoader, LoaderConfig, TracingSink};

use crate::dirs;

/// Parse every data file in a directory and report warnings
#[derive(Parser, Debug)]
pub struct CheckData {
    /// Data directory (defaults to $SKY_DATA_DIR, then ./data)
    #[arg(value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Loader configuration TOML (extensions, recursion depth)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Exit with an error if any file produced warnings
    #[arg(long)]
    deny_warnings: bool,
}

impl CheckData {
    pub fn execute(self) -> Result<()> {
        let config = match &self.config {
            Some(path) => ConfigLoader::load(path)?,
            None => LoaderConfig::default(),
        };
        let data_dir = dirs::data_dir(self.dir);
        tracing::info!(dir = %data_dir.display(), extensions = ?config.extensions, "checking data");

        let loader = DataLoader::new(data_dir, config);
        let files = loader.load_all_with(&mut TracingSink)?;

        println!(
            "{} {}",
            style("Data Directory:").bold().cyan(),
            loader.root().display()
        );
        println!();

        let mut nodes = 0;
        let mut warnings = 0;
        for file in &files {
            let relative = file.path.strip_prefix(loader.root()).unwrap_or(&file.path);
            let status = if file.diagnostics == 0 {
                style("ok").green()
            } else {
                style("warn").yellow().bold()
            };
            println!(
                "  {}  {}  {} nodes, {} warnings",
                status,
                relative.display(),
                file.data.node_count(),
                file.diagnostics
            );
            nodes += file.data.node_count();
            warnings += file.diagnostics;
        }

        println!();
        println!(
            "{} {} files, {} nodes, {} warnings",
            style("Total:").bold().cyan(),
            files.len(),
            nodes,
            warnings
        );

        if self.deny_warnings && warnings > 0 {
            anyhow::bail!("{} warnings in {}", warnings, loader.root().display());
        }
        Ok(())
    }
}
