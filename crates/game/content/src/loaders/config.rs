//! Data directory configuration loader.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Which files under a data directory are parsed.
///
/// Every field is optional in TOML; missing fields take their defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// File extensions (without the dot) that hold data.
    pub extensions: Vec<String>,
    /// Descend into subdirectories.
    pub recursive: bool,
    /// Deepest subdirectory level to visit; `None` means unlimited.
    pub max_depth: Option<usize>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["txt".to_owned()],
            recursive: true,
            max_depth: None,
        }
    }
}

impl LoaderConfig {
    /// Does `path` have one of the configured extensions?
    pub fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|extension| extension.to_str())
            .is_some_and(|extension| self.extensions.iter().any(|wanted| wanted == extension))
    }

    /// May the walk enter a directory `depth` levels below the root?
    pub fn allows_depth(&self, depth: usize) -> bool {
        if !self.recursive {
            return depth == 0;
        }
        self.max_depth.is_none_or(|max| depth <= max)
    }
}

/// Loader for data directory configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the TOML file containing a LoaderConfig
    pub fn load(path: &Path) -> LoadResult<LoaderConfig> {
        let content = read_file(path)?;
        let config: LoaderConfig = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse loader config TOML: {}", e))?;

        tracing::debug!(path = %path.display(), ?config, "loaded loader config");
        Ok(config)
    }
}
