//! Data directory walker.

use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::loaders::{LoadResult, LoaderConfig, read_file};
use crate::node::DataFile;
use crate::trace::{CountingSink, DiagnosticSink, TracingSink};

/// One parsed file from a data directory.
#[derive(Clone, Debug)]
pub struct LoadedFile {
    pub path: PathBuf,
    pub data: DataFile,
    /// Number of warnings the parser reported for this file.
    pub diagnostics: usize,
}

impl DataFile {
    /// Reads and parses the file at `path`, logging warnings through `tracing`.
    pub fn load(path: &Path) -> LoadResult<Self> {
        let text = read_file(path)?;
        Ok(Self::parse(&text))
    }
}

/// Loads every data file under a directory.
pub struct DataLoader {
    root: PathBuf,
    config: LoaderConfig,
}

impl DataLoader {
    pub fn new(root: impl Into<PathBuf>, config: LoaderConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Paths of all files the config selects, sorted.
    pub fn files(&self) -> LoadResult<Vec<PathBuf>> {
        if !self.root.is_dir() {
            anyhow::bail!("Data directory not found: {}", self.root.display());
        }
        let mut files = Vec::new();
        self.collect(&self.root, 0, &mut files)?;
        files.sort();
        Ok(files)
    }

    /// Parses every selected file, logging warnings through `tracing`.
    pub fn load_all(&self) -> LoadResult<Vec<LoadedFile>> {
        self.load_all_with(&mut TracingSink)
    }

    /// Parses every selected file, sending warnings to `sink`.
    pub fn load_all_with<S>(&self, sink: &mut S) -> LoadResult<Vec<LoadedFile>>
    where
        S: DiagnosticSink + ?Sized,
    {
        let files = self.files()?;
        tracing::debug!(root = %self.root.display(), count = files.len(), "loading data files");

        let mut loaded = Vec::with_capacity(files.len());
        for path in files {
            let text = read_file(&path)?;
            let mut counter = CountingSink::new(&mut *sink);
            let data = DataFile::parse_with(&text, &mut counter);
            let diagnostics = counter.count();
            tracing::debug!(
                path = %path.display(),
                nodes = data.node_count(),
                diagnostics,
                "parsed data file"
            );
            loaded.push(LoadedFile {
                path,
                data,
                diagnostics,
            });
        }
        Ok(loaded)
    }

    fn collect(&self, dir: &Path, depth: usize, files: &mut Vec<PathBuf>) -> LoadResult<()> {
        let entries = std::fs::read_dir(dir)
            .with_context(|| format!("Failed to read directory {}", dir.display()))?;

        for entry in entries {
            let entry = entry.with_context(|| format!("Failed to list {}", dir.display()))?;
            let path = entry.path();
            let file_type = entry
                .file_type()
                .with_context(|| format!("Failed to stat {}", path.display()))?;

            if file_type.is_dir() {
                if self.config.allows_depth(depth + 1) {
                    self.collect(&path, depth + 1, files)?;
                }
            } else if self.config.matches(&path) {
                files.push(path);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("ships.txt"), "ship Falcon\n\tmass 200\n").unwrap();
        fs::write(root.join("notes.md"), "# not data\n").unwrap();
        fs::create_dir_all(root.join("outfits/weapons")).unwrap();
        fs::write(root.join("outfits/engines.txt"), "outfit Ion\n").unwrap();
        fs::write(
            root.join("outfits/weapons/laser.txt"),
            "outfit Laser\n\tcost \"100\n",
        )
        .unwrap();
        dir
    }

    fn relative(loader: &DataLoader, paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|path| {
                path.strip_prefix(loader.root())
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    #[test]
    fn lists_matching_files_sorted() {
        let dir = fixture();
        let loader = DataLoader::new(dir.path(), LoaderConfig::default());
        let files = loader.files().unwrap();
        assert_eq!(
            relative(&loader, &files),
            ["outfits/engines.txt", "outfits/weapons/laser.txt", "ships.txt"]
        );
    }

    #[test]
    fn depth_limits_apply() {
        let dir = fixture();
        let shallow = LoaderConfig {
            max_depth: Some(1),
            ..LoaderConfig::default()
        };
        let loader = DataLoader::new(dir.path(), shallow);
        assert_eq!(
            relative(&loader, &loader.files().unwrap()),
            ["outfits/engines.txt", "ships.txt"]
        );

        let flat = LoaderConfig {
            recursive: false,
            ..LoaderConfig::default()
        };
        let loader = DataLoader::new(dir.path(), flat);
        assert_eq!(relative(&loader, &loader.files().unwrap()), ["ships.txt"]);
    }

    #[test]
    fn load_all_counts_diagnostics_per_file() {
        let dir = fixture();
        let loader = DataLoader::new(dir.path(), LoaderConfig::default());
        let mut lines: Vec<String> = Vec::new();
        let loaded = loader.load_all_with(&mut lines).unwrap();

        assert_eq!(loaded.len(), 3);
        let counts: Vec<usize> = loaded.iter().map(|file| file.diagnostics).collect();
        assert_eq!(counts, [0, 1, 0]);
        assert_eq!(loaded[2].data.node_count(), 2);
        assert_eq!(lines[0], "Warning: Closing quotation mark is missing:");
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let loader = DataLoader::new(dir.path().join("absent"), LoaderConfig::default());
        let err = loader.files().unwrap_err();
        assert!(err.to_string().contains("Data directory not found"));
    }

    #[test]
    fn load_single_file() {
        let dir = fixture();
        let file = DataFile::load(&dir.path().join("ships.txt")).unwrap();
        let ship = file.nodes().next().unwrap();
        assert_eq!(ship.tokens(), ["ship", "Falcon"]);
        assert!(DataFile::load(&dir.path().join("nope.txt")).is_err());
    }
}
