//! File actions module.
//!
//! This module provides functionality for:
//! - Relocating duplicate copies or unique files into a destination tree
//! - Removing source subdirectories left empty afterwards
//!
//! # Relocation
//!
//! ```no_run
//! use dupesift::actions::{move_duplicates, purge_empty_subdirs};
//! use dupesift::duplicates::{DuplicateFinder, DuplicateIndex};
//! use dupesift::hooks::NoHooks;
//! use std::path::{Path, PathBuf};
//!
//! let sources = vec![PathBuf::from("/data")];
//! let mut index = DuplicateIndex::new();
//! DuplicateFinder::with_defaults().scan(&sources[0], &mut index)?;
//!
//! move_duplicates(&mut index, &sources, Path::new("/dupes"), false, &mut NoHooks)?;
//! let purge = purge_empty_subdirs(&sources);
//! println!("{} empty directories removed", purge.removed.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod purge;
pub mod relocate;

// Re-export commonly used types
pub use purge::{purge_empty_subdirs, PurgeFailure, PurgeSummary};
pub use relocate::{move_duplicates, move_uniques, MoveError, MoveSummary, NameRegistry};
