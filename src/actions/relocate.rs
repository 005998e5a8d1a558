//! Relocation of duplicate and unique files into a destination tree.
//!
//! # Overview
//!
//! Two batch operations walk the index's groups and move files out of the
//! source trees:
//!
//! - [`move_duplicates`] gives every duplicate group its own subdirectory of
//!   the destination, named after the group, and moves every copy except the
//!   first-discovered one into it. Each copy keeps its path relative to the
//!   source root it was found under.
//! - [`move_uniques`] moves the first path of every content group (one per
//!   distinct content) directly into the destination.
//!
//! Destination names are handed out by a [`NameRegistry`] shared across the
//! whole batch: the first claim of `photo.jpg` gets `photo.jpg`, later claims
//! get `photo_1.jpg`, `photo_2.jpg` and so on, in group processing order.
//!
//! Every relocated entry records its destination in
//! [`PathEntry::moved_to`](crate::duplicates::PathEntry::moved_to). A dry run
//! performs the same bookkeeping without touching the filesystem.
//!
//! # Failure policy
//!
//! Both operations stop at the first error. Files already moved stay moved
//! and keep their recorded destination; the remaining entries are untouched.
//! Nothing is rolled back.
//!
//! # Example
//!
//! ```no_run
//! use dupesift::actions::relocate::move_duplicates;
//! use dupesift::duplicates::{DuplicateFinder, DuplicateIndex};
//! use dupesift::hooks::NoHooks;
//! use std::path::{Path, PathBuf};
//!
//! let sources = vec![PathBuf::from("/data/a"), PathBuf::from("/data/b")];
//! let mut index = DuplicateIndex::new();
//! let finder = DuplicateFinder::with_defaults();
//! for source in &sources {
//!     finder.scan(source, &mut index)?;
//! }
//!
//! let summary = move_duplicates(&mut index, &sources, Path::new("/dupes"), true, &mut NoHooks)?;
//! println!("{} files would move", summary.moved);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::collections::{HashMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::duplicates::DuplicateIndex;
use crate::hooks::PipelineHooks;
use crate::scanner::path_utils::{
    absolute_path, display_name, normalize_path, relative_to_sources, suffixed_name,
};

/// Error type for relocation operations.
#[derive(Debug, Error)]
pub enum MoveError {
    /// The destination does not exist or is not a directory.
    #[error("destination is not a directory: {0}")]
    DestinationNotADirectory(PathBuf),

    /// A destination directory could not be created.
    #[error("cannot create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A file could not be moved.
    #[error("cannot move {from} to {to}: {source}")]
    Move {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl MoveError {
    /// Get the path associated with this error.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::DestinationNotADirectory(p) | Self::CreateDir { path: p, .. } => p,
            Self::Move { from, .. } => from,
        }
    }
}

/// Counts from one relocation batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveSummary {
    /// Groups processed.
    pub groups: usize,
    /// Files moved (or, in a dry run, that would be moved).
    pub moved: usize,
    /// Files left in place because they lie under none of the sources or
    /// repeat a path already listed in their group.
    pub skipped: usize,
    /// Whether the batch ran without touching the filesystem.
    pub dry_run: bool,
}

/// Hands out collision-free file names for one relocation batch.
///
/// Names are tracked across the whole batch, not per bucket, and a name is
/// never handed out twice, even when a suffixed candidate collides with a
/// name claimed literally.
#[derive(Debug, Clone, Default)]
pub struct NameRegistry {
    claimed: HashSet<String>,
    next_suffix: HashMap<String, usize>,
}

impl NameRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim a name derived from `name`.
    ///
    /// The first claim of a name returns it unchanged; subsequent claims
    /// insert `_1`, `_2`, ... before the last extension.
    pub fn claim(&mut self, name: &str) -> String {
        let next = self.next_suffix.entry(name.to_string()).or_insert(0);

        loop {
            let candidate = if *next == 0 {
                name.to_string()
            } else {
                suffixed_name(name, *next)
            };
            *next += 1;

            if self.claimed.insert(candidate.clone()) {
                return candidate;
            }
        }
    }

    /// Number of names handed out.
    #[must_use]
    pub fn len(&self) -> usize {
        self.claimed.len()
    }

    /// Check if no name has been handed out.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.claimed.is_empty()
    }
}

/// Move every non-original copy of each duplicate group under `destination`.
///
/// For each duplicate group a subdirectory named after the group is created
/// (a pre-existing directory of that name is an error, nothing is merged).
/// Every path after the first is then moved to
/// `<destination>/<group dir>/<path relative to its source root>`, creating
/// intermediate directories as needed. Copies from different sources that
/// share a relative path get `_1`, `_2`, ... in their file name. The first
/// path is never touched, even if the group lists it again.
///
/// A path that lies under none of `sources` is logged and left in place.
///
/// # Arguments
///
/// * `index` - Scanned index; moved entries get their `moved_to` recorded
/// * `sources` - Source roots, consulted in order
/// * `destination` - Existing directory receiving the group subdirectories
/// * `dry_run` - Record destinations without touching the filesystem
/// * `hooks` - Receives `before_move` and one `group_moved` per group
///
/// # Errors
///
/// Returns [`MoveError`] on the first directory creation or move failure.
pub fn move_duplicates(
    index: &mut DuplicateIndex,
    sources: &[PathBuf],
    destination: &Path,
    dry_run: bool,
    hooks: &mut dyn PipelineHooks,
) -> Result<MoveSummary, MoveError> {
    check_destination(destination)?;
    let sources = normalized_sources(sources);
    let mut registry = NameRegistry::new();
    let mut summary = MoveSummary {
        dry_run,
        ..MoveSummary::default()
    };

    hooks.before_move(index.count_duplicate_groups());
    log::info!(
        "Moving duplicates into {}{}",
        destination.display(),
        if dry_run { " (dry run)" } else { "" }
    );

    for group in index.duplicate_groups_mut() {
        let group_dir = destination.join(registry.claim(&group.display_name));
        if !dry_run {
            fs::create_dir(&group_dir).map_err(|source| MoveError::CreateDir {
                path: group_dir.clone(),
                source,
            })?;
        }
        log::debug!("Group {} -> {}", group.display_name, group_dir.display());

        let mut seen: HashSet<PathBuf> =
            group.first().map(|e| e.original.clone()).into_iter().collect();
        let mut targets = HashSet::new();

        for entry in group.entries.iter_mut().skip(1) {
            if !seen.insert(entry.original.clone()) {
                log::warn!("Listed twice, left in place: {}", entry.original.display());
                summary.skipped += 1;
                continue;
            }

            let Some(relative) = relative_to_sources(&entry.original, &sources) else {
                log::warn!(
                    "Not under any source, left in place: {}",
                    entry.original.display()
                );
                summary.skipped += 1;
                continue;
            };

            let target = free_target(&group_dir.join(relative), &mut targets);
            if !dry_run {
                relocate_file(&entry.original, &target)?;
            }
            log::trace!("{} -> {}", entry.original.display(), target.display());
            entry.moved_to = Some(target);
            summary.moved += 1;
        }

        summary.groups += 1;
        hooks.group_moved();
    }

    log::info!(
        "Moved {} files from {} duplicate groups",
        summary.moved,
        summary.groups
    );
    Ok(summary)
}

/// Move the first path of every content group directly into `destination`.
///
/// Singletons and the originals of duplicate groups alike end up in the
/// destination under their own file name, suffixed on collision. An
/// existing file at the chosen destination is replaced.
///
/// # Errors
///
/// Returns [`MoveError`] on the first move failure.
pub fn move_uniques(
    index: &mut DuplicateIndex,
    destination: &Path,
    dry_run: bool,
    hooks: &mut dyn PipelineHooks,
) -> Result<MoveSummary, MoveError> {
    check_destination(destination)?;
    let mut registry = NameRegistry::new();
    let mut summary = MoveSummary {
        dry_run,
        ..MoveSummary::default()
    };

    hooks.before_move(index.count_unique_groups());
    log::info!(
        "Moving unique files into {}{}",
        destination.display(),
        if dry_run { " (dry run)" } else { "" }
    );

    for group in index.unique_groups_mut() {
        let target = destination.join(registry.claim(&group.display_name));

        if let Some(entry) = group.entries.first_mut() {
            if !dry_run {
                relocate_file(&entry.original, &target)?;
            }
            log::trace!("{} -> {}", entry.original.display(), target.display());
            entry.moved_to = Some(target);
            summary.moved += 1;
        }

        summary.groups += 1;
        hooks.group_moved();
    }

    log::info!("Moved {} unique files", summary.moved);
    Ok(summary)
}

fn check_destination(destination: &Path) -> Result<(), MoveError> {
    if destination.is_dir() {
        Ok(())
    } else {
        Err(MoveError::DestinationNotADirectory(destination.to_path_buf()))
    }
}

fn normalized_sources(sources: &[PathBuf]) -> Vec<PathBuf> {
    sources
        .iter()
        .map(|s| absolute_path(s).unwrap_or_else(|_| normalize_path(s)))
        .collect()
}

/// `target`, or `target` with `_N` inserted into its file name when another
/// copy of the same group already claimed it or something exists there.
fn free_target(target: &Path, taken: &mut HashSet<PathBuf>) -> PathBuf {
    let name = display_name(target);
    let mut candidate = target.to_path_buf();
    let mut suffix = 1;
    while taken.contains(&candidate) || candidate.symlink_metadata().is_ok() {
        candidate = target.with_file_name(suffixed_name(&name, suffix));
        suffix += 1;
    }
    taken.insert(candidate.clone());
    candidate
}

/// Rename `from` to `to`, creating `to`'s parent directories first.
fn relocate_file(from: &Path, to: &Path) -> Result<(), MoveError> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent).map_err(|source| MoveError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::rename(from, to).map_err(|source| MoveError::Move {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    })
}
