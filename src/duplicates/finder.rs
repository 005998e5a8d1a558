//! Source scanning into a [`DuplicateIndex`].
//!
//! # Overview
//!
//! [`DuplicateFinder::scan`] walks one root with the [`Walker`], keys every
//! regular file with [`Hasher::bucket_key`] and inserts it into the index.
//! Content is only read when a bucket receives its second path.
//!
//! Walk problems (an unreadable directory, a symlink loop) are logged,
//! collected in [`ScanSummary::scan_errors`] and skipped. A file that was
//! discovered but then cannot be keyed or hashed aborts the scan.
//!
//! # Example
//!
//! ```no_run
//! use dupesift::duplicates::{DuplicateFinder, DuplicateIndex};
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::with_defaults();
//! let mut index = DuplicateIndex::new();
//! let summary = finder.scan(Path::new("/photos"), &mut index)?;
//!
//! println!(
//!     "{} files, {} duplicate groups",
//!     summary.files_scanned,
//!     index.count_duplicate_groups()
//! );
//! # Ok::<(), dupesift::duplicates::FinderError>(())
//! ```

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use super::DuplicateIndex;
use crate::scanner::path_utils::absolute_path;
use crate::scanner::{HashError, KeyPolicy, ScanError, Walker, WalkerConfig};

/// Configuration for the duplicate finder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FinderConfig {
    /// Walker configuration for directory traversal.
    pub walker_config: WalkerConfig,
    /// Metadata fields that make up the bucket key.
    pub key_policy: KeyPolicy,
}

impl FinderConfig {
    /// Set the symlink policy.
    #[must_use]
    pub fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.walker_config.follow_symlinks = follow;
        self
    }

    /// Set the bucket key policy.
    #[must_use]
    pub fn with_key_policy(mut self, policy: KeyPolicy) -> Self {
        self.key_policy = policy;
        self
    }
}

/// Statistics from scanning one or more roots.
#[derive(Debug, Default)]
pub struct ScanSummary {
    /// Number of regular files inserted into the index
    pub files_scanned: usize,
    /// Total size of those files in bytes
    pub total_size: u64,
    /// Walk errors that were logged and skipped
    pub scan_errors: Vec<ScanError>,
    /// Wall time spent scanning
    pub scan_duration: Duration,
}

impl ScanSummary {
    /// Fold another summary into this one.
    pub fn merge(&mut self, other: ScanSummary) {
        self.files_scanned += other.files_scanned;
        self.total_size += other.total_size;
        self.scan_errors.extend(other.scan_errors);
        self.scan_duration += other.scan_duration;
    }
}

/// Errors that abort a scan.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The provided root does not exist.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// The provided root is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// The root could not be made absolute.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Root being resolved
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A discovered file could not be keyed or hashed.
    #[error(transparent)]
    Hash(#[from] HashError),
}

/// Walks sources and fills a [`DuplicateIndex`].
#[derive(Debug, Clone, Default)]
pub struct DuplicateFinder {
    config: FinderConfig,
}

impl DuplicateFinder {
    /// Create a new duplicate finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        Self { config }
    }

    /// Create a new duplicate finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// Finder configuration.
    #[must_use]
    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    /// Scan every regular file under `root` into `index`.
    ///
    /// The root is made absolute first, so every path stored in the index is
    /// absolute. Scanning into an index that already holds entries
    /// accumulates; scanning the same root twice turns every file into a
    /// duplicate of itself.
    ///
    /// # Arguments
    ///
    /// * `root` - Directory to scan
    /// * `index` - Index receiving the discovered files
    ///
    /// # Errors
    ///
    /// Returns `FinderError` if:
    /// - The root does not exist or is not a directory
    /// - A discovered file vanished or cannot be read while keying or hashing
    pub fn scan(&self, root: &Path, index: &mut DuplicateIndex) -> Result<ScanSummary, FinderError> {
        let start_time = Instant::now();

        if !root.exists() {
            return Err(FinderError::NotFound(root.to_path_buf()));
        }
        if !root.is_dir() {
            return Err(FinderError::NotADirectory(root.to_path_buf()));
        }
        let root = absolute_path(root).map_err(|source| FinderError::Io {
            path: root.to_path_buf(),
            source,
        })?;

        log::info!("Scanning {}", root.display());

        let hasher = *index.hasher();
        let walker = Walker::new(&root, self.config.walker_config.clone());
        let mut summary = ScanSummary::default();

        for result in walker.walk() {
            match result {
                Ok(path) => {
                    let key = hasher.bucket_key(&path, self.config.key_policy)?;
                    summary.total_size += key.size;
                    index.insert(key, path)?;
                    summary.files_scanned += 1;
                }
                Err(e) => {
                    log::warn!("Skipping {}: {}", e.path().display(), e);
                    summary.scan_errors.push(e);
                }
            }
        }

        summary.scan_duration = start_time.elapsed();
        log::info!(
            "Scanned {} files under {} in {:.2?}",
            summary.files_scanned,
            root.display(),
            summary.scan_duration
        );

        Ok(summary)
    }
}
