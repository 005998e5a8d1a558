//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Per-bucket lazy content refinement ([`SimilarFiles`])
//! - The two-tier [`DuplicateIndex`] and its group traversals
//! - Scanning source roots into an index ([`DuplicateFinder`])

pub mod finder;
pub mod groups;
pub mod index;

pub use finder::{DuplicateFinder, FinderConfig, FinderError, ScanSummary};
pub use groups::{FileGroup, PathEntry, SimilarFiles};
pub use index::{DuplicateIndex, GroupView};
