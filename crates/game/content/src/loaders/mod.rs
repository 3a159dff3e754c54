//! Loaders for reading data files from disk.
//!
//! [`ConfigLoader`] reads the TOML [`LoaderConfig`] that decides which files
//! belong to a data directory, and [`DataLoader`] walks the directory and
//! parses every matching file into a [`DataFile`](crate::DataFile).

pub mod config;
pub mod files;

pub use config::{ConfigLoader, LoaderConfig};
pub use files::{DataLoader, LoadedFile};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
