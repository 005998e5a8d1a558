//! Report formatters for scan and move results.
//!
//! This module provides two renditions of the same report:
//! - Plain text in the fixed `Duplicate list:` / `Unique list:` format
//! - JSON for automation and scripting
//!
//! # Example
//!
//! ```no_run
//! use dupesift::duplicates::{DuplicateFinder, DuplicateIndex};
//! use dupesift::hooks::NoHooks;
//! use dupesift::output::{write_report, ReportFormat, ReportKind};
//! use std::path::Path;
//!
//! let mut index = DuplicateIndex::new();
//! DuplicateFinder::with_defaults().scan(Path::new("."), &mut index)?;
//!
//! let mut stdout = std::io::stdout().lock();
//! write_report(&index, ReportKind::Duplicates, ReportFormat::Text, &mut stdout, &mut NoHooks)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod json;
pub mod text;

use std::io::Write;

use clap::ValueEnum;
use serde::Serialize;

use crate::duplicates::DuplicateIndex;
use crate::hooks::PipelineHooks;

// Re-export main types
pub use json::{write_json_report, JsonReport};
pub use text::{write_duplicate_report, write_unique_report};

/// Which groups a report lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    /// Every group with two or more paths
    Duplicates,
    /// One entry per distinct content
    Uniques,
}

/// Output format for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable list
    #[default]
    Text,
    /// JSON output for scripting
    Json,
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportFormat::Text => write!(f, "text"),
            ReportFormat::Json => write!(f, "json"),
        }
    }
}

/// Errors that can occur while writing a report.
#[derive(thiserror::Error, Debug)]
pub enum ReportError {
    /// I/O error during writing
    #[error("I/O error while writing report: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Write the report of `kind` in `format` to `sink`.
///
/// # Errors
///
/// Returns [`ReportError`] if writing or serialization fails.
pub fn write_report<W: Write + ?Sized>(
    index: &DuplicateIndex,
    kind: ReportKind,
    format: ReportFormat,
    sink: &mut W,
    hooks: &mut dyn PipelineHooks,
) -> Result<(), ReportError> {
    match (format, kind) {
        (ReportFormat::Text, ReportKind::Duplicates) => write_duplicate_report(index, sink, hooks)?,
        (ReportFormat::Text, ReportKind::Uniques) => write_unique_report(index, sink, hooks)?,
        (ReportFormat::Json, kind) => write_json_report(index, kind, sink, hooks)?,
    }
    Ok(())
}
