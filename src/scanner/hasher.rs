//! SHA-512 file hasher with streaming support and metadata bucket keys.
//!
//! # Overview
//!
//! Duplicate detection uses two tiers of keys:
//!
//! 1. A [`BucketKey`] built from filesystem metadata only (size, and
//!    optionally the last-modified second). Files with different bucket keys
//!    can never be duplicates, and computing the key reads zero content bytes.
//! 2. A [`ContentDigest`], the SHA-512 of the whole byte stream, computed by
//!    [`Hasher::content_digest`] in fixed-size chunks so memory stays bounded
//!    regardless of file size.
//!
//! # Example
//!
//! ```no_run
//! use dupesift::scanner::{Hasher, KeyPolicy};
//! use std::path::Path;
//!
//! let hasher = Hasher::new();
//! let key = hasher.bucket_key(Path::new("photo.jpg"), KeyPolicy::SizeOnly)?;
//! let digest = hasher.content_digest(Path::new("photo.jpg"))?;
//! println!("{} bytes, sha512 {}", key.size, digest);
//! # Ok::<(), dupesift::scanner::HashError>(())
//! ```

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use sha2::{Digest, Sha512};

use super::HashError;

/// Default read window for content hashing (64 KiB).
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Largest accepted read window (64 MiB).
pub const MAX_CHUNK_SIZE: usize = 64 * 1024 * 1024;

/// Length of a SHA-512 digest in bytes.
pub const DIGEST_LEN: usize = 64;

/// Which metadata fields make up a [`BucketKey`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyPolicy {
    /// Bucket by file size alone.
    #[default]
    SizeOnly,
    /// Bucket by file size and last-modified time (second resolution).
    SizeAndModified,
}

/// Cheap pre-filter key for candidate duplicates.
///
/// Equality is structural: two keys are equal iff the size matches and the
/// modification second matches (or both keys omit it).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct BucketKey {
    /// File size in bytes.
    pub size: u64,
    /// Last modification time truncated to whole seconds, when part of the key.
    pub modified: Option<DateTime<Utc>>,
}

impl BucketKey {
    /// Key made of the file size only.
    #[must_use]
    pub fn from_size(size: u64) -> Self {
        Self {
            size,
            modified: None,
        }
    }

    /// Key made of the file size and a modification time.
    ///
    /// Sub-second precision is dropped so that keys match at the same
    /// resolution as the report prints them.
    #[must_use]
    pub fn with_modified(size: u64, modified: DateTime<Utc>) -> Self {
        let seconds = modified.timestamp();
        Self {
            size,
            modified: DateTime::from_timestamp(seconds, 0),
        }
    }

    /// Last-modified time in the fixed report format (`2019-08-08T09:59:19Z`).
    #[must_use]
    pub fn modified_display(&self) -> Option<String> {
        self.modified
            .map(|m| m.to_rfc3339_opts(SecondsFormat::Secs, true))
    }
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Size: {} byte", self.size)?;
        if let Some(modified) = self.modified_display() {
            write!(f, ", last modified: {modified}")?;
        }
        Ok(())
    }
}

/// SHA-512 digest of a file's full content.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentDigest([u8; DIGEST_LEN]);

impl ContentDigest {
    /// Wrap raw digest bytes.
    #[must_use]
    pub fn from_bytes(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }

    /// Raw digest bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    /// Lowercase hexadecimal rendering (128 characters).
    #[must_use]
    pub fn to_hex(&self) -> String {
        digest_to_hex(&self.0)
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex = self.to_hex();
        write!(f, "ContentDigest({}..)", &hex[..16])
    }
}

impl Serialize for ContentDigest {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// Convert digest bytes to a lowercase hex string.
#[must_use]
pub fn digest_to_hex(bytes: &[u8]) -> String {
    use std::fmt::Write;

    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(out, "{byte:02x}");
    }
    out
}

/// Streaming content hasher.
///
/// Holds only the read-window size; each call opens the file, folds it
/// through SHA-512 chunk by chunk and closes it before returning, on success
/// and on error alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hasher {
    chunk_size: usize,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher {
    /// Create a hasher with the default 64 KiB read window.
    #[must_use]
    pub fn new() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Create a hasher with a custom read window, clamped to
    /// `1..=MAX_CHUNK_SIZE`.
    #[must_use]
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.clamp(1, MAX_CHUNK_SIZE),
        }
    }

    /// Read window in bytes.
    #[must_use]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Build the metadata bucket key for `path` without reading its content.
    ///
    /// # Errors
    ///
    /// Returns [`HashError::NotFound`] if the path does not exist, or
    /// [`HashError::PermissionDenied`] if its metadata is inaccessible.
    pub fn bucket_key(&self, path: &Path, policy: KeyPolicy) -> Result<BucketKey, HashError> {
        let metadata = std::fs::metadata(path).map_err(|e| HashError::from_io(path, e))?;
        let size = metadata.len();

        let key = match policy {
            KeyPolicy::SizeOnly => BucketKey::from_size(size),
            KeyPolicy::SizeAndModified => {
                let modified = metadata
                    .modified()
                    .map_err(|e| HashError::from_io(path, e))?;
                BucketKey::with_modified(size, DateTime::<Utc>::from(modified))
            }
        };

        log::trace!("Bucket key for {}: {:?}", path.display(), key);
        Ok(key)
    }

    /// Compute the SHA-512 digest of the file at `path`.
    ///
    /// The result does not depend on the chunk size. An empty file hashes to
    /// the digest of the empty input.
    ///
    /// # Errors
    ///
    /// Returns [`HashError::NotFound`] if the file vanished,
    /// [`HashError::PermissionDenied`] if it cannot be opened, or
    /// [`HashError::Io`] for read failures.
    pub fn content_digest(&self, path: &Path) -> Result<ContentDigest, HashError> {
        let mut file = File::open(path).map_err(|e| HashError::from_io(path, e))?;
        let digest = self
            .digest_reader(&mut file)
            .map_err(|e| HashError::from_io(path, e))?;

        log::trace!("Digest computed: {} ({:?})", path.display(), digest);
        Ok(digest)
    }

    /// Fold any reader through SHA-512 using this hasher's read window.
    ///
    /// # Errors
    ///
    /// Propagates read errors other than [`io::ErrorKind::Interrupted`].
    pub fn digest_reader<R: Read>(&self, reader: &mut R) -> io::Result<ContentDigest> {
        let mut state = Sha512::new();
        let mut buffer = vec![0u8; self.chunk_size];

        loop {
            let bytes_read = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            state.update(&buffer[..bytes_read]);
        }

        let mut bytes = [0u8; DIGEST_LEN];
        bytes.copy_from_slice(&state.finalize());
        Ok(ContentDigest(bytes))
    }
}
