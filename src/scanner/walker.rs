//! Directory walker implementation using walkdir.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for enumerating every regular
//! file beneath a root directory. The walk is single-threaded and
//! depth-first, with each directory's entries sorted by file name, so the
//! visitation order (and therefore which copy of a duplicate counts as "the
//! original") is the same on every run and every platform.
//!
//! # Symlinks
//!
//! Symlinks are skipped unless [`WalkerConfig::follow_symlinks`] is set. When
//! following, walkdir detects links that point back at an ancestor; such a
//! loop is yielded as [`ScanError::SymlinkLoop`] and not descended into.
//!
//! # Example
//!
//! ```no_run
//! use dupesift::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/home/user/Downloads"), WalkerConfig::default());
//! let files: Vec<_> = walker.walk().filter_map(Result::ok).collect();
//! println!("Found {} files", files.len());
//! ```

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::{ScanError, WalkerConfig};

/// Directory walker for deterministic file discovery.
#[derive(Debug, Clone)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
}

impl Walker {
    /// Create a new walker for the given path.
    ///
    /// # Arguments
    ///
    /// * `path` - Root directory to scan
    /// * `config` - Walker configuration options
    #[must_use]
    pub fn new(path: &Path, config: WalkerConfig) -> Self {
        Self {
            root: path.to_path_buf(),
            config,
        }
    }

    /// Root directory of this walk.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walk the directory tree, yielding regular file paths.
    ///
    /// Errors are yielded as [`ScanError`] values rather than stopping
    /// iteration; an unreadable directory produces one error and its
    /// contents are skipped.
    pub fn walk(&self) -> impl Iterator<Item = Result<PathBuf, ScanError>> + '_ {
        let walk_dir = WalkDir::new(&self.root)
            .follow_links(self.config.follow_symlinks)
            .min_depth(1)
            .sort_by_file_name();

        walk_dir
            .into_iter()
            .filter_map(move |entry_result| match entry_result {
                Ok(entry) => {
                    let file_type = entry.file_type();

                    if file_type.is_dir() {
                        return None;
                    }

                    // Only reachable when not following links
                    if file_type.is_symlink() {
                        log::trace!("Skipping symlink: {}", entry.path().display());
                        return None;
                    }

                    if !file_type.is_file() {
                        log::trace!("Skipping special file: {}", entry.path().display());
                        return None;
                    }

                    Some(Ok(entry.into_path()))
                }
                Err(e) => Some(Err(self.convert_error(e))),
            })
    }

    /// Convert a walkdir error into a [`ScanError`].
    fn convert_error(&self, error: walkdir::Error) -> ScanError {
        use std::io::ErrorKind;

        let path = error
            .path()
            .map_or_else(|| self.root.clone(), Path::to_path_buf);

        if let Some(ancestor) = error.loop_ancestor() {
            log::warn!(
                "Symlink loop detected: {} -> {}",
                path.display(),
                ancestor.display()
            );
            return ScanError::SymlinkLoop {
                ancestor: ancestor.to_path_buf(),
                path,
            };
        }

        match error.io_error().map(std::io::Error::kind) {
            Some(ErrorKind::PermissionDenied) => {
                log::warn!("Permission denied: {}", path.display());
                ScanError::PermissionDenied(path)
            }
            Some(ErrorKind::NotFound) => {
                log::debug!("Path not found (may have been deleted): {}", path.display());
                ScanError::NotFound(path)
            }
            _ => {
                log::warn!("Walker error for {}: {}", path.display(), error);
                let source = error
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("directory walk failed"));
                ScanError::Io { path, source }
            }
        }
    }
}
