//! Scanner module for directory traversal and file hashing.
//!
//! This module provides functionality for:
//! - Deterministic, single-threaded directory walking using walkdir
//! - Metadata bucket keys and streaming SHA-512 content digests
//! - Lexical path handling for source roots and destination names
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and file discovery
//! - [`hasher`]: Bucket keys and SHA-512 file hashing (streaming)
//! - [`path_utils`]: Path normalisation and naming helpers
//!
//! # Example
//!
//! ```no_run
//! use dupesift::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("."), WalkerConfig::default());
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(path) => println!("{}", path.display()),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

pub mod hasher;
pub mod path_utils;
pub mod walker;

use std::io;
use std::path::{Path, PathBuf};

// Re-export main types
pub use hasher::{
    digest_to_hex, BucketKey, ContentDigest, Hasher, KeyPolicy, DEFAULT_CHUNK_SIZE, DIGEST_LEN,
    MAX_CHUNK_SIZE,
};
pub use walker::Walker;

/// Configuration for directory walking.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkerConfig {
    /// Follow symbolic links during traversal.
    ///
    /// When false (the default) symlinks are skipped entirely. When true,
    /// walkdir's ancestor check reports cycles, which are logged and skipped.
    pub follow_symlinks: bool,
}

impl WalkerConfig {
    /// Create a configuration with an explicit symlink policy.
    #[must_use]
    pub fn new(follow_symlinks: bool) -> Self {
        Self { follow_symlinks }
    }
}

/// Errors that can occur during directory scanning.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The specified path was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// The specified path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// A followed symlink points back at one of its ancestors.
    #[error("Symlink loop: {path} -> {ancestor}")]
    SymlinkLoop {
        /// The link that closes the loop
        path: PathBuf,
        /// The ancestor directory it points to
        ancestor: PathBuf,
    },

    /// An I/O error occurred while accessing a file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl ScanError {
    /// Path associated with this error.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::PermissionDenied(p) | Self::NotFound(p) | Self::NotADirectory(p) => p,
            Self::SymlinkLoop { path, .. } | Self::Io { path, .. } => path,
        }
    }
}

/// Errors that can occur while keying or hashing a file.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The specified file was not found.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl HashError {
    /// Classify an I/O error raised while accessing `path`.
    #[must_use]
    pub fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }

    /// Path associated with this error.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(p) | Self::PermissionDenied(p) => p,
            Self::Io { path, .. } => path,
        }
    }
}
