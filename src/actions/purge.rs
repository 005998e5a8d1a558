//! Removal of source subdirectories emptied by a move.
//!
//! The purge walks each root contents-first, so a directory is visited only
//! after everything beneath it. A directory whose children were all removed
//! is therefore itself empty by the time it is visited, and nested chains of
//! empty directories disappear in one pass. The roots themselves are never
//! removed.
//!
//! The purge is best-effort: a directory that cannot be read or removed is
//! logged, recorded in [`PurgeSummary::failed`] and skipped.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// A directory the purge could not inspect or remove.
#[derive(Debug)]
pub struct PurgeFailure {
    /// Directory that was left in place.
    pub path: PathBuf,
    /// Why it was left in place.
    pub source: io::Error,
}

/// Outcome of a purge.
#[derive(Debug, Default)]
pub struct PurgeSummary {
    /// Directories removed, deepest first.
    pub removed: Vec<PathBuf>,
    /// Directories that could not be inspected or removed.
    pub failed: Vec<PurgeFailure>,
}

impl PurgeSummary {
    /// Check if every empty directory was removed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Remove every empty subdirectory beneath each of `roots`.
///
/// A directory holding any entry at all (file, symlink or non-empty
/// subdirectory) is kept, and so is every ancestor of it.
pub fn purge_empty_subdirs(roots: &[PathBuf]) -> PurgeSummary {
    let mut summary = PurgeSummary::default();

    for root in roots {
        log::info!("Purging empty directories under {}", root.display());
        purge_root(root, &mut summary);
    }

    log::info!(
        "Removed {} empty directories ({} failed)",
        summary.removed.len(),
        summary.failed.len()
    );
    summary
}

fn purge_root(root: &Path, summary: &mut PurgeSummary) {
    let walk = WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .contents_first(true)
        .sort_by_file_name();

    for entry in walk {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e.path().map_or_else(|| root.to_path_buf(), Path::to_path_buf);
                log::warn!("Cannot inspect {}: {}", path.display(), e);
                let source = e
                    .into_io_error()
                    .unwrap_or_else(|| io::Error::other("directory walk failed"));
                summary.failed.push(PurgeFailure { path, source });
                continue;
            }
        };

        if !entry.file_type().is_dir() {
            continue;
        }

        let path = entry.path();
        match is_empty_dir(path) {
            Ok(false) => {}
            Ok(true) => match fs::remove_dir(path) {
                Ok(()) => {
                    log::debug!("Removed empty directory {}", path.display());
                    summary.removed.push(path.to_path_buf());
                }
                Err(source) => {
                    log::warn!("Cannot remove {}: {}", path.display(), source);
                    summary.failed.push(PurgeFailure {
                        path: path.to_path_buf(),
                        source,
                    });
                }
            },
            Err(source) => {
                log::warn!("Cannot read {}: {}", path.display(), source);
                summary.failed.push(PurgeFailure {
                    path: path.to_path_buf(),
                    source,
                });
            }
        }
    }
}

fn is_empty_dir(path: &Path) -> io::Result<bool> {
    Ok(fs::read_dir(path)?.next().is_none())
}
