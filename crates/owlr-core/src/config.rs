use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Dependency manifest filename, checked for readability and staleness.
pub const MANIFEST_FILE: &str = "Gemfile";

/// Lock file whose modification time gates cache invalidation.
pub const LOCKFILE_FILE: &str = "Gemfile.lock";

/// Hidden cache directory under the project root.
pub const CACHE_DIR: &str = ".owl_cache";

/// Cache document filename inside [`CACHE_DIR`].
pub const CACHE_FILE: &str = "load_paths.json";

/// Compiler-cache subdirectory reserved inside [`CACHE_DIR`].
pub const COMPILER_CACHE_DIR: &str = "cc";

/// Marker selecting the Rails invocation form of the load-path enumerator.
pub const RAILS_MARKER: &str = "bin/rails";

/// Project-level configuration for the resolver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Working-tree root. Load paths under this directory belong to the
    /// application itself; everything else is an external dependency root.
    pub root: PathBuf,

    /// Dependency manifest path.
    pub manifest_path: PathBuf,

    /// Lock file path.
    pub lockfile_path: PathBuf,

    /// Cache directory.
    pub cache_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self::new(std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
    }
}

impl Config {
    /// Create a config rooted at `root`, with all paths at their
    /// conventional locations under it.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        let manifest_path = root.join(MANIFEST_FILE);
        let lockfile_path = root.join(LOCKFILE_FILE);
        let cache_dir = root.join(CACHE_DIR);
        Self {
            root,
            manifest_path,
            lockfile_path,
            cache_dir,
        }
    }

    /// Override the manifest path.
    #[must_use]
    pub fn with_manifest_path(mut self, path: PathBuf) -> Self {
        self.manifest_path = path;
        self
    }

    /// Override the lock file path.
    #[must_use]
    pub fn with_lockfile_path(mut self, path: PathBuf) -> Self {
        self.lockfile_path = path;
        self
    }

    /// Override the cache directory.
    #[must_use]
    pub fn with_cache_dir(mut self, path: PathBuf) -> Self {
        self.cache_dir = path;
        self
    }

    /// Path of the cache document.
    #[must_use]
    pub fn cache_file(&self) -> PathBuf {
        self.cache_dir.join(CACHE_FILE)
    }

    /// Compiler-cache subdirectory, created alongside the cache document.
    #[must_use]
    pub fn compiler_cache_dir(&self) -> PathBuf {
        self.cache_dir.join(COMPILER_CACHE_DIR)
    }

    /// Path of the Rails marker file.
    #[must_use]
    pub fn rails_marker(&self) -> PathBuf {
        self.root.join(RAILS_MARKER)
    }

    /// Whether `path` lies inside the working tree.
    #[must_use]
    pub fn in_working_tree(&self, path: &str) -> bool {
        Path::new(path).starts_with(&self.root)
    }
}
