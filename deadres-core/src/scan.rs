//! Deterministic file discovery with directory pruning.
//!
//! - Early directory pruning via `WalkDir::filter_entry` (O(1) subtree skip)
//! - Siblings sorted by file name so the walk order is stable
//! - Missing or non-directory roots produce an empty list, never an error
//!
//! Symlinks are not followed, so link cycles cannot loop the walk; resources
//! reachable only through a link are not seen.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

/// Directories to exclude by default (version control metadata).
pub const EXCLUDED_DIRS: &[&str] = &[".git", ".svn", ".hg"];

/// Checks if a directory entry should be pruned (excluded from traversal).
#[inline]
fn is_excluded_dir(entry: &walkdir::DirEntry, excludes: &HashSet<&str>) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| excludes.contains(name))
}

/// Gathers every file under `root` whose file name ends with `suffix`.
///
/// Automatically excludes `.git/`, `.svn/` and `.hg/`.
pub fn gather_files(root: &Path, suffix: &str) -> Vec<PathBuf> {
    gather_files_with_excludes(root, suffix, &[])
}

/// Gathers matching files with custom directory names pruned in addition to
/// the defaults.
pub fn gather_files_with_excludes(root: &Path, suffix: &str, excludes: &[&str]) -> Vec<PathBuf> {
    if !root.is_dir() {
        debug!(root = %root.display(), "root is missing or not a directory, nothing to scan");
        return Vec::new();
    }

    let all_excludes: HashSet<&str> = EXCLUDED_DIRS
        .iter()
        .copied()
        .chain(excludes.iter().copied())
        .collect();

    let files: Vec<PathBuf> = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_excluded_dir(e, &all_excludes))
        .filter_map(|entry| match entry {
            Ok(e) => {
                let matches = e.file_type().is_file()
                    && e.file_name().to_string_lossy().ends_with(suffix);
                matches.then(|| e.into_path())
            }
            Err(e) => {
                warn!(root = %root.display(), error = %e, "skipping unreadable entry");
                None
            }
        })
        .collect();

    debug!(root = %root.display(), suffix, count = files.len(), "gathered files");
    files
}

/// Finds the first file, in walk order, named exactly `file_name`.
pub fn locate_file(root: &Path, file_name: &str) -> Option<PathBuf> {
    gather_files(root, file_name)
        .into_iter()
        .find(|p| p.file_name().is_some_and(|n| n == file_name))
}
