//! Data directory resolution

use std::path::PathBuf;

/// Environment variable naming the default data directory.
pub const DATA_DIR_ENV: &str = "SKY_DATA_DIR";

/// Directory used when neither an argument nor `SKY_DATA_DIR` is given.
const FALLBACK_DATA_DIR: &str = "./data";

/// Resolve the data directory: explicit argument, then `SKY_DATA_DIR`, then `./data`.
pub fn data_dir(explicit: Option<PathBuf>) -> PathBuf {
    explicit
        .or_else(|| std::env::var_os(DATA_DIR_ENV).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(FALLBACK_DATA_DIR))
}
