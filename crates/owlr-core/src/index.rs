//! Recursive directory indexing for load-path roots.

use std::path::Path;
use walkdir::WalkDir;

/// Primary source suffix collected by the indexer.
pub const SOURCE_SUFFIX: &str = ".rb";

/// Compiled/intermediate suffix collected by the indexer.
pub const COMPILED_SUFFIX: &str = ".js";

/// Which roots the indexer is allowed to descend into, relative to the
/// working tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexScope {
    /// Indexing external dependency roots: a root inside the working tree
    /// is skipped entirely. Application files are found by the resolver's
    /// live-filesystem probe instead.
    ExcludeWorkingTree,
    /// Roots inside the working tree are indexed like any other.
    IncludeWorkingTree,
}

/// Recursively collect the absolute paths of all `.rb`/`.js` files under
/// `root`.
///
/// Returns an empty vector when `root` is not absolute, does not exist, or
/// is excluded by `scope`. Unreadable entries and symlink cycles are
/// skipped; one bad entry never aborts the walk. No ordering is guaranteed
/// beyond filesystem enumeration order within each directory.
#[must_use]
pub fn index_directory(root: &str, scope: IndexScope, working_tree: &Path) -> Vec<String> {
    let root_path = Path::new(root);
    if !root_path.is_absolute() {
        return Vec::new();
    }
    if scope == IndexScope::ExcludeWorkingTree && root_path.starts_with(working_tree) {
        return Vec::new();
    }
    if !root_path.exists() {
        return Vec::new();
    }

    WalkDir::new(root_path)
        .follow_links(true)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| entry.path().to_str().map(str::to_owned))
        .filter(|path| path.ends_with(SOURCE_SUFFIX) || path.ends_with(COMPILED_SUFFIX))
        .collect()
}
