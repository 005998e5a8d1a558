//! Two-tier duplicate index: metadata bucket key, then content digest.
//!
//! The index maps each [`BucketKey`] to the [`SimilarFiles`] observed under
//! it. Buckets are kept in first-insertion order and each bucket keeps its
//! digest groups in first-hashed order, so traversal order is a pure function
//! of the order in which paths were inserted.
//!
//! Repeated scans into the same index accumulate. Scanning a root twice
//! makes every file a duplicate of itself.

use std::path::PathBuf;

use indexmap::IndexMap;

use super::groups::{FileGroup, SimilarFiles};
use crate::scanner::{BucketKey, ContentDigest, HashError, Hasher};

/// Borrowed view of one content group together with its bucket metadata.
#[derive(Debug, Clone, Copy)]
pub struct GroupView<'a> {
    /// Bucket this group belongs to.
    pub key: &'a BucketKey,
    /// Content digest, absent for a bucket that was never refined.
    pub digest: Option<&'a ContentDigest>,
    /// The group itself.
    pub group: &'a FileGroup,
}

/// Mapping from bucket key to the files observed under it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DuplicateIndex {
    buckets: IndexMap<BucketKey, SimilarFiles>,
    hasher: Hasher,
}

impl DuplicateIndex {
    /// Create an empty index using the default hasher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty index that hashes with `hasher`.
    #[must_use]
    pub fn with_hasher(hasher: Hasher) -> Self {
        Self {
            buckets: IndexMap::new(),
            hasher,
        }
    }

    /// Hasher used when a bucket is refined.
    #[must_use]
    pub fn hasher(&self) -> &Hasher {
        &self.hasher
    }

    /// Record `path` under `key`.
    ///
    /// The first path for a key opens a new bucket without reading content;
    /// later paths are handed to the bucket, which hashes as needed.
    ///
    /// # Errors
    ///
    /// Returns a [`HashError`] if refining the bucket requires reading a file
    /// that is missing or unreadable. The index is unchanged in that case.
    pub fn insert(&mut self, key: BucketKey, path: PathBuf) -> Result<(), HashError> {
        let hasher = self.hasher;
        match self.buckets.get_mut(&key) {
            Some(bucket) => bucket.add(path, &hasher),
            None => {
                log::trace!("New bucket {:?} opened by {}", key, path.display());
                self.buckets.insert(key, SimilarFiles::new(path));
                Ok(())
            }
        }
    }

    /// Number of buckets (distinct keys).
    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Check if nothing has been inserted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Total number of paths inserted.
    #[must_use]
    pub fn path_count(&self) -> usize {
        self.buckets.values().map(SimilarFiles::path_count).sum()
    }

    /// Buckets with their keys, in insertion order.
    pub fn buckets(&self) -> impl Iterator<Item = (&BucketKey, &SimilarFiles)> {
        self.buckets.iter()
    }

    /// Every content group, singletons included, in bucket then digest order.
    pub fn unique_groups(&self) -> impl Iterator<Item = GroupView<'_>> {
        self.buckets.iter().flat_map(|(key, bucket)| {
            bucket
                .groups()
                .map(move |(digest, group)| GroupView { key, digest, group })
        })
    }

    /// Every content group holding 2+ paths, in bucket then digest order.
    pub fn duplicate_groups(&self) -> impl Iterator<Item = GroupView<'_>> {
        self.unique_groups().filter(|view| view.group.is_duplicate())
    }

    /// Mutable counterpart of [`Self::unique_groups`].
    pub fn unique_groups_mut(&mut self) -> impl Iterator<Item = &mut FileGroup> {
        self.buckets.values_mut().flat_map(SimilarFiles::groups_mut)
    }

    /// Mutable counterpart of [`Self::duplicate_groups`].
    pub fn duplicate_groups_mut(&mut self) -> impl Iterator<Item = &mut FileGroup> {
        self.unique_groups_mut().filter(|group| group.is_duplicate())
    }

    /// Count duplicate groups by full traversal.
    #[must_use]
    pub fn count_duplicate_groups(&self) -> usize {
        self.duplicate_groups().count()
    }

    /// Count unique groups (one per distinct content) by full traversal.
    #[must_use]
    pub fn count_unique_groups(&self) -> usize {
        self.unique_groups().count()
    }
}
