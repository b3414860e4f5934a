//! Module-to-path resolution over the load-path index.
//!
//! A specifier is normalized to a root-relative logical path, expanded into
//! its source/compiled suffix variants, then handed to an ordered list of
//! lookup tiers: the indexed cache, a live probe of working-tree load paths,
//! and finally the requesting directory itself. The first hit wins; a miss
//! is not an error.

use crate::cache::CacheData;
use crate::config::Config;
use crate::index::{COMPILED_SUFFIX, SOURCE_SUFFIX};
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Suffix variants of one logical module path.
///
/// An Opal module may be satisfied by its source file or by a compiled
/// counterpart: `/foo.rb` pairs with `/foo.js`, and `/foo.js` pairs with
/// `/foo.js.rb`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidates {
    /// Logical path with the source suffix; tried first at every tier.
    pub source: String,
    /// Logical path with the compiled suffix.
    pub compiled: String,
}

/// Normalize a specifier to a root-relative logical path: a leading `./`
/// becomes `/`, an already-leading `/` is kept, anything else is prefixed
/// with `/`.
fn logical_path(specifier: &str) -> String {
    if let Some(rest) = specifier.strip_prefix("./") {
        format!("/{rest}")
    } else if specifier.starts_with('/') {
        specifier.to_owned()
    } else {
        format!("/{specifier}")
    }
}

/// Derive both suffix variants of a specifier, or `None` when the suffix is
/// unrecognized. Runs before any filesystem access.
fn candidates(specifier: &str) -> Option<Candidates> {
    if specifier.ends_with(SOURCE_SUFFIX) {
        let module = logical_path(specifier);
        // Swap the `rb` tail for `js`, keeping the dot
        let compiled = format!("{}js", &module[..module.len() - 2]);
        Some(Candidates {
            source: module,
            compiled,
        })
    } else if specifier.ends_with(COMPILED_SUFFIX) {
        let module = logical_path(specifier);
        let source = format!("{module}{SOURCE_SUFFIX}");
        Some(Candidates {
            source,
            compiled: module,
        })
    } else {
        None
    }
}

/// One tier of the resolution search.
///
/// Tiers are assembled into an ordered list at resolver construction, so the
/// overall search order is data, not control flow, and each tier is
/// testable on its own.
trait Lookup: Send + Sync {
    fn try_resolve(&self, requesting_dir: &Path, candidates: &Candidates) -> Option<String>;
}

/// Tier 1: exact-string membership against the indexed cache entries, per
/// load path in registration order.
struct IndexLookup {
    load_paths: Arc<Vec<String>>,
    entries: Arc<HashSet<String>>,
}

impl Lookup for IndexLookup {
    fn try_resolve(&self, _requesting_dir: &Path, candidates: &Candidates) -> Option<String> {
        for load_path in self.load_paths.iter() {
            let source = format!("{load_path}{}", candidates.source);
            if self.entries.contains(&source) {
                return Some(source);
            }
            let compiled = format!("{load_path}{}", candidates.compiled);
            if self.entries.contains(&compiled) {
                return Some(compiled);
            }
        }
        None
    }
}

/// Tier 2: live filesystem probe of load paths under the working tree.
/// Recovers files created after the index was built; external dependency
/// roots only change when the lock file does, which forces a rebuild anyway.
struct WorkingTreeProbe {
    load_paths: Arc<Vec<String>>,
    root: PathBuf,
}

impl Lookup for WorkingTreeProbe {
    fn try_resolve(&self, _requesting_dir: &Path, candidates: &Candidates) -> Option<String> {
        for load_path in self.load_paths.iter() {
            if !Path::new(load_path.as_str()).starts_with(&self.root) {
                continue;
            }
            let source = format!("{load_path}{}", candidates.source);
            if Path::new(&source).exists() {
                return Some(source);
            }
            let compiled = format!("{load_path}{}", candidates.compiled);
            if Path::new(&compiled).exists() {
                return Some(compiled);
            }
        }
        None
    }
}

/// Tier 3: the requesting file's own directory, source variant only, and
/// only when the resulting path stays inside the working tree.
struct RequestingDirProbe {
    root: PathBuf,
}

impl Lookup for RequestingDirProbe {
    fn try_resolve(&self, requesting_dir: &Path, candidates: &Candidates) -> Option<String> {
        let candidate = format!(
            "{}{}",
            requesting_dir.to_string_lossy(),
            candidates.source
        );
        if Path::new(&candidate).starts_with(&self.root) && Path::new(&candidate).exists() {
            return Some(candidate);
        }
        None
    }
}

/// Resolves module specifiers against an indexed set of load paths.
///
/// The load paths and entry set are fixed at construction and shared across
/// tiers; first match by load-path order wins, with the source suffix tried
/// before the compiled one at each load path.
pub struct Resolver {
    load_paths: Arc<Vec<String>>,
    tiers: Vec<Box<dyn Lookup>>,
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("load_paths", &self.load_paths.len())
            .field("tiers", &self.tiers.len())
            .finish()
    }
}

impl Resolver {
    /// Build a resolver over loaded cache data.
    #[must_use]
    pub fn new(config: &Config, data: &CacheData) -> Self {
        let load_paths = Arc::new(data.load_paths.clone());
        let entries: Arc<HashSet<String>> = Arc::new(data.entries.iter().cloned().collect());
        let tiers: Vec<Box<dyn Lookup>> = vec![
            Box::new(IndexLookup {
                load_paths: Arc::clone(&load_paths),
                entries,
            }),
            Box::new(WorkingTreeProbe {
                load_paths: Arc::clone(&load_paths),
                root: config.root.clone(),
            }),
            Box::new(RequestingDirProbe {
                root: config.root.clone(),
            }),
        ];
        Self { load_paths, tiers }
    }

    /// The load paths this resolver searches, in priority order.
    #[must_use]
    pub fn load_paths(&self) -> &[String] {
        &self.load_paths
    }

    /// Resolve `specifier` as required from `requesting_dir`.
    ///
    /// Returns `None` when the specifier carries an unrecognized suffix or
    /// no tier finds a match; the caller's own resolution then proceeds.
    #[must_use]
    pub fn resolve(&self, requesting_dir: &Path, specifier: &str) -> Option<String> {
        let candidates = candidates(specifier)?;
        self.tiers
            .iter()
            .find_map(|tier| tier.try_resolve(requesting_dir, &candidates))
    }
}
