//! File groups and per-bucket content refinement.
//!
//! # Overview
//!
//! Every bucket of the [`DuplicateIndex`](super::DuplicateIndex) owns one
//! [`SimilarFiles`] value. A bucket starts out holding a single path that has
//! **not** been hashed: most files have a unique size and never need their
//! content read. Only when a second path lands in the same bucket are both
//! paths hashed, and from then on the bucket keeps one [`FileGroup`] per
//! distinct content digest, in first-hashed-first order.
//!
//! # Example
//!
//! ```no_run
//! use dupesift::duplicates::SimilarFiles;
//! use dupesift::scanner::Hasher;
//! use std::path::PathBuf;
//!
//! let hasher = Hasher::new();
//! let mut bucket = SimilarFiles::new(PathBuf::from("/a/x.txt"));
//! assert!(!bucket.is_hashed());
//!
//! bucket.add(PathBuf::from("/b/x.txt"), &hasher)?;
//! assert!(bucket.is_hashed());
//! # Ok::<(), dupesift::scanner::HashError>(())
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Serialize;

use crate::scanner::path_utils::display_name;
use crate::scanner::{ContentDigest, HashError, Hasher};

/// One discovered file and, once relocated, where it went.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathEntry {
    /// Absolute path where the file was discovered.
    pub original: PathBuf,
    /// Destination the file was (or in a dry run, would be) moved to.
    pub moved_to: Option<PathBuf>,
}

impl PathEntry {
    /// Create an entry that has not been moved.
    #[must_use]
    pub fn new(original: PathBuf) -> Self {
        Self {
            original,
            moved_to: None,
        }
    }

    /// Whether a move has been recorded for this entry.
    #[must_use]
    pub fn is_moved(&self) -> bool {
        self.moved_to.is_some()
    }
}

/// Report rendition: the original path, followed by ` -> <destination>` once moved.
impl fmt::Display for PathEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.original.display())?;
        if let Some(moved_to) = &self.moved_to {
            write!(f, " -> {}", moved_to.display())?;
        }
        Ok(())
    }
}

/// Files sharing one content digest within a bucket.
///
/// `entries[0]` is the first-discovered instance, "the original". Order is
/// insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileGroup {
    /// File name of the first-discovered path.
    pub display_name: String,
    /// Every path with this content, in discovery order.
    pub entries: Vec<PathEntry>,
}

impl FileGroup {
    /// Start a group from its first path.
    #[must_use]
    pub fn new(first: PathBuf) -> Self {
        Self {
            display_name: display_name(&first),
            entries: vec![PathEntry::new(first)],
        }
    }

    /// Append a path discovered later.
    pub fn push(&mut self, path: PathBuf) {
        self.entries.push(PathEntry::new(path));
    }

    /// Number of paths in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check if this group holds true duplicates (2+ files).
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        self.entries.len() > 1
    }

    /// The retained original.
    #[must_use]
    pub fn first(&self) -> Option<&PathEntry> {
        self.entries.first()
    }

    /// Original paths in discovery order.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.entries.iter().map(|e| e.original.as_path())
    }
}

/// Contents of one bucket: deferred until a second path arrives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimilarFiles {
    /// Exactly one path, not hashed yet.
    Unhashed(FileGroup),
    /// Two or more paths, grouped by content digest in first-hashed order.
    Hashed(IndexMap<ContentDigest, FileGroup>),
}

impl SimilarFiles {
    /// Open a bucket with its first path. No file content is read.
    #[must_use]
    pub fn new(first: PathBuf) -> Self {
        Self::Unhashed(FileGroup::new(first))
    }

    /// Add another path to this bucket.
    ///
    /// The first time this is called, the held path is hashed as well as
    /// `path`; afterwards only `path` is hashed.
    ///
    /// # Errors
    ///
    /// Returns the [`HashError`] of whichever file could not be read. On
    /// error the bucket is left exactly as it was.
    pub fn add(&mut self, path: PathBuf, hasher: &Hasher) -> Result<(), HashError> {
        match self {
            Self::Unhashed(held) => {
                let held_path = match held.first() {
                    Some(entry) => entry.original.clone(),
                    None => {
                        // An Unhashed bucket always has its first path
                        *self = Self::new(path);
                        return Ok(());
                    }
                };
                let held_digest = hasher.content_digest(&held_path)?;
                let new_digest = hasher.content_digest(&path)?;
                log::debug!(
                    "Bucket refined: {} and {} now hashed",
                    held_path.display(),
                    path.display()
                );

                let mut groups = IndexMap::new();
                groups.insert(held_digest, held.clone());
                insert_into(&mut groups, new_digest, path);
                *self = Self::Hashed(groups);
            }
            Self::Hashed(groups) => {
                let digest = hasher.content_digest(&path)?;
                insert_into(groups, digest, path);
            }
        }
        Ok(())
    }

    /// Whether content digests have been computed for this bucket.
    #[must_use]
    pub fn is_hashed(&self) -> bool {
        matches!(self, Self::Hashed(_))
    }

    /// Every content group, including singletons, with its digest if known.
    pub fn groups(&self) -> impl Iterator<Item = (Option<&ContentDigest>, &FileGroup)> {
        let (single, many) = match self {
            Self::Unhashed(group) => (Some(group), None),
            Self::Hashed(groups) => (None, Some(groups)),
        };
        single.into_iter().map(|g| (None, g)).chain(
            many.into_iter()
                .flat_map(|groups| groups.iter().map(|(d, g)| (Some(d), g))),
        )
    }

    /// Mutable access to every content group, in the same order as [`Self::groups`].
    pub fn groups_mut(&mut self) -> impl Iterator<Item = &mut FileGroup> {
        let (single, many) = match self {
            Self::Unhashed(group) => (Some(group), None),
            Self::Hashed(groups) => (None, Some(groups)),
        };
        single
            .into_iter()
            .chain(many.into_iter().flat_map(|groups| groups.values_mut()))
    }

    /// Content groups holding 2+ paths.
    pub fn duplicates(&self) -> impl Iterator<Item = (Option<&ContentDigest>, &FileGroup)> {
        self.groups().filter(|(_, g)| g.is_duplicate())
    }

    /// Total number of paths in this bucket.
    #[must_use]
    pub fn path_count(&self) -> usize {
        self.groups().map(|(_, g)| g.len()).sum()
    }
}

fn insert_into(groups: &mut IndexMap<ContentDigest, FileGroup>, digest: ContentDigest, path: PathBuf) {
    match groups.get_mut(&digest) {
        Some(group) => group.push(path),
        None => {
            groups.insert(digest, FileGroup::new(path));
        }
    }
}
