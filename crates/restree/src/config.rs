//! Tree configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TreeError};

/// Default number of index slots reserved up front.
pub const DEFAULT_INITIAL_CAPACITY: usize = 10_000;

/// Options controlling how mounts are read and merged into the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Absolute paths skipped during reads, together with everything beneath them.
    pub ignored_paths: Vec<PathBuf>,
    /// Reads sibling directories on the rayon pool.
    pub parallel_read: bool,
    /// Collapses concurrent mounts of the same path into a single read.
    pub single_flight: bool,
    /// Re-reads a virtual ancestor from disk when it is mounted directly.
    pub promote_virtual: bool,
    /// Resolves symlinks in mount paths before indexing.
    pub canonicalize_mounts: bool,
    /// Index slots reserved when the tree is created.
    pub initial_capacity: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            ignored_paths: Vec::new(),
            parallel_read: true,
            single_flight: true,
            promote_virtual: true,
            canonicalize_mounts: false,
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
        }
    }
}

impl TreeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a config from JSON. Missing fields take their defaults.
    pub fn from_json_str(input: &str) -> Result<Self> {
        serde_json::from_str(input).map_err(|error| TreeError::InvalidConfig(error.to_string()))
    }

    /// Loads a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|error| {
            TreeError::InvalidConfig(format!("unable to read {}: {error}", path.display()))
        })?;
        Self::from_json_str(&contents)
    }

    pub fn with_ignored_paths(mut self, ignored_paths: Vec<PathBuf>) -> Self {
        self.ignored_paths = ignored_paths;
        self
    }

    pub fn with_parallel_read(mut self, parallel_read: bool) -> Self {
        self.parallel_read = parallel_read;
        self
    }

    pub fn with_single_flight(mut self, single_flight: bool) -> Self {
        self.single_flight = single_flight;
        self
    }

    pub fn with_promote_virtual(mut self, promote_virtual: bool) -> Self {
        self.promote_virtual = promote_virtual;
        self
    }

    pub fn with_canonicalize_mounts(mut self, canonicalize_mounts: bool) -> Self {
        self.canonicalize_mounts = canonicalize_mounts;
        self
    }

    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    /// Returns true if `path` is an ignored path or lies beneath one.
    pub fn is_ignored(&self, path: &Path) -> bool {
        self.ignored_paths
            .iter()
            .any(|ignored| path == ignored || path.starts_with(ignored))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults() {
        let config = TreeConfig::default();
        assert!(config.ignored_paths.is_empty());
        assert!(config.parallel_read);
        assert!(config.single_flight);
        assert!(config.promote_virtual);
        assert!(!config.canonicalize_mounts);
        assert_eq!(config.initial_capacity, DEFAULT_INITIAL_CAPACITY);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config =
            TreeConfig::from_json_str(r#"{"ignored_paths": ["/src/target"], "single_flight": false}"#)
                .unwrap();
        assert_eq!(config.ignored_paths, vec![PathBuf::from("/src/target")]);
        assert!(!config.single_flight);
        assert!(config.promote_virtual);
        assert_eq!(config.initial_capacity, DEFAULT_INITIAL_CAPACITY);
    }

    #[test]
    fn malformed_json_is_rejected() {
        let error = TreeConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(error, TreeError::InvalidConfig(_)));
    }

    #[test]
    fn load_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("tree.json");
        fs::write(&path, r#"{"parallel_read": false, "initial_capacity": 64}"#).unwrap();

        let config = TreeConfig::load(&path).unwrap();
        assert!(!config.parallel_read);
        assert_eq!(config.initial_capacity, 64);

        let missing = TreeConfig::load(&temp.path().join("missing.json")).unwrap_err();
        assert!(matches!(missing, TreeError::InvalidConfig(_)));
    }

    #[test]
    fn ignored_paths_cover_descendants() {
        let config = TreeConfig::new().with_ignored_paths(vec![PathBuf::from("/src/target")]);
        assert!(config.is_ignored(Path::new("/src/target")));
        assert!(config.is_ignored(Path::new("/src/target/debug/build")));
        assert!(!config.is_ignored(Path::new("/src/targets")));
        assert!(!config.is_ignored(Path::new("/src")));
    }
}
