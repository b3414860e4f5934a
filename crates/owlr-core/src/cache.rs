//! Persistent load-path cache with mtime-based invalidation.
//!
//! The cache document lives at `.owl_cache/load_paths.json` under the
//! project root and is valid as long as `Gemfile.lock` has not been modified
//! after it. Loading is idempotent per store: the enumeration and directory
//! walk run at most once per process lifetime.

use crate::config::Config;
use crate::error::Error;
use crate::index::{index_directory, IndexScope};
use crate::loadpaths::LoadPathsSource;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;
use std::time::SystemTime;

/// On-disk cache document.
///
/// Field names are part of the cache-file contract and must not change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CacheData {
    /// Search roots in the host toolchain's priority order.
    #[serde(rename = "opal_load_paths")]
    pub load_paths: Vec<String>,

    /// Flattened file index of every load path, in walk order.
    #[serde(rename = "opal_load_path_entries")]
    pub entries: Vec<String>,
}

/// Non-fatal advisories raised while loading the cache.
///
/// These never block resolution; the CLI surfaces them as log warnings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheWarning {
    /// The manifest is newer than its lock file; the lock file should be
    /// regenerated with `bundle install` or `bundle update`.
    StaleLockfile,
    /// The persisted cache document could not be decoded and was rebuilt.
    CorruptCache { detail: String },
}

impl fmt::Display for CacheWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StaleLockfile => write!(
                f,
                "Gemfile is newer than Gemfile.lock, run `bundle install` or `bundle update`"
            ),
            Self::CorruptCache { detail } => {
                write!(f, "cache document was unreadable and has been rebuilt: {detail}")
            }
        }
    }
}

/// Cache loading state, owned by one [`CacheStore`] for its lifetime.
#[derive(Debug)]
pub enum CacheState {
    /// Nothing loaded yet; the first use runs the load-or-rebuild machine.
    Unloaded,
    /// Loaded (or rebuilt) data, reused for the rest of the process.
    Loaded(CacheData),
}

/// Owns the cache file lifecycle: readability checks, staleness comparison,
/// rebuild, and reload.
#[derive(Debug)]
pub struct CacheStore {
    config: Config,
    state: CacheState,
    warnings: Vec<CacheWarning>,
}

impl CacheStore {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: CacheState::Unloaded,
            warnings: Vec::new(),
        }
    }

    /// Current loading state.
    #[must_use]
    pub fn state(&self) -> &CacheState {
        &self.state
    }

    /// Advisories collected by the last load. Empty before the first load.
    #[must_use]
    pub fn warnings(&self) -> &[CacheWarning] {
        &self.warnings
    }

    /// Return the cached data, running the load-or-rebuild state machine on
    /// the first call. Later calls return the already-loaded data without
    /// touching the filesystem or the enumerator.
    pub fn ensure_loaded(&mut self, paths: &dyn LoadPathsSource) -> Result<&CacheData, Error> {
        if matches!(self.state, CacheState::Unloaded) {
            let data = self.load_or_rebuild(paths)?;
            self.state = CacheState::Loaded(data);
        }
        match &self.state {
            CacheState::Loaded(data) => Ok(data),
            CacheState::Unloaded => unreachable!("state set above"),
        }
    }

    fn load_or_rebuild(&mut self, paths: &dyn LoadPathsSource) -> Result<CacheData, Error> {
        let manifest_mtime =
            stat_readable(&self.config.manifest_path).map_err(|source| Error::ManifestUnreadable {
                path: self.config.manifest_path.clone(),
                source,
            })?;
        let lockfile_mtime =
            stat_readable(&self.config.lockfile_path).map_err(|source| Error::LockfileUnreadable {
                path: self.config.lockfile_path.clone(),
                source,
            })?;

        let cache_file = self.config.cache_file();
        let mut must_rebuild = false;
        if !readable_writable(&cache_file) {
            fs::create_dir_all(self.config.compiler_cache_dir()).map_err(|source| {
                Error::CacheWrite {
                    path: self.config.compiler_cache_dir(),
                    source,
                }
            })?;
            owlr_util::fs::atomic_write(&cache_file, b"{}").map_err(|source| Error::CacheWrite {
                path: cache_file.clone(),
                source,
            })?;
            must_rebuild = true;
        }
        let cache_mtime = stat_readable(&cache_file)?;

        if manifest_mtime > lockfile_mtime {
            self.warnings.push(CacheWarning::StaleLockfile);
        }

        if must_rebuild || lockfile_mtime > cache_mtime {
            let data = self.rebuild(paths)?;
            self.persist(&data)?;
            return Ok(data);
        }

        let text = owlr_util::fs::read_to_string_lossy(&cache_file)?;
        match serde_json::from_str::<CacheData>(&text) {
            Ok(data) => Ok(data),
            Err(err) => {
                // A corrupt document is treated like an absent one
                self.warnings.push(CacheWarning::CorruptCache {
                    detail: err.to_string(),
                });
                let data = self.rebuild(paths)?;
                self.persist(&data)?;
                Ok(data)
            }
        }
    }

    /// Enumerate load paths and index each one, in order. Entries from later
    /// load paths are appended after earlier ones; duplicates are kept.
    fn rebuild(&self, paths: &dyn LoadPathsSource) -> Result<CacheData, Error> {
        let load_paths = paths.enumerate()?;
        let entries = load_paths
            .iter()
            .flat_map(|load_path| {
                index_directory(load_path, IndexScope::ExcludeWorkingTree, &self.config.root)
            })
            .collect();
        Ok(CacheData { load_paths, entries })
    }

    fn persist(&self, data: &CacheData) -> Result<(), Error> {
        let cache_file = self.config.cache_file();
        let bytes = serde_json::to_vec(data)?;
        owlr_util::fs::atomic_write(&cache_file, &bytes).map_err(|source| Error::CacheWrite {
            path: cache_file,
            source,
        })
    }
}

/// Modification time of a file, erring when it is missing or unreadable.
fn stat_readable(path: &Path) -> io::Result<SystemTime> {
    fs::File::open(path)?.metadata()?.modified()
}

/// Whether the file can be opened for both reading and writing.
fn readable_writable(path: &Path) -> bool {
    OpenOptions::new().read(true).write(true).open(path).is_ok()
}
