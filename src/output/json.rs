//! JSON output formatter for duplicate and unique reports.
//!
//! Provides machine-readable JSON output for scripting and automation.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "kind": "duplicates",
//!   "groups": [
//!     {
//!       "name": "x.txt",
//!       "size": 10,
//!       "modified": null,
//!       "digest": "4dff4ea3...",
//!       "files": [
//!         { "path": "/src/A/x.txt", "moved_to": null },
//!         { "path": "/src/B/x.txt", "moved_to": "/dest/x.txt/x.txt" }
//!       ]
//!     }
//!   ],
//!   "summary": { "groups": 1, "files": 2, "moved": 1 }
//! }
//! ```
//!
//! In the unique rendition each group lists only its first path.

use std::io::Write;

use serde::Serialize;

use super::{ReportError, ReportKind};
use crate::duplicates::{DuplicateIndex, GroupView, PathEntry};
use crate::hooks::PipelineHooks;

/// A single file entry in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonFile {
    /// Path where the file was discovered
    pub path: String,
    /// Where it was moved to, if it was
    pub moved_to: Option<String>,
}

impl From<&PathEntry> for JsonFile {
    fn from(entry: &PathEntry) -> Self {
        Self {
            path: entry.original.to_string_lossy().into_owned(),
            moved_to: entry
                .moved_to
                .as_ref()
                .map(|p| p.to_string_lossy().into_owned()),
        }
    }
}

/// A single group in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonGroup {
    /// File name of the first-discovered path
    pub name: String,
    /// File size in bytes
    pub size: u64,
    /// Last modification time, when part of the bucket key
    pub modified: Option<String>,
    /// SHA-512 digest as hexadecimal, absent for never-hashed singletons
    pub digest: Option<String>,
    /// Files listed for this group
    pub files: Vec<JsonFile>,
}

impl JsonGroup {
    fn from_view(view: &GroupView<'_>, kind: ReportKind) -> Self {
        let files = match kind {
            ReportKind::Duplicates => view.group.entries.iter().map(JsonFile::from).collect(),
            ReportKind::Uniques => view.group.first().map(JsonFile::from).into_iter().collect(),
        };

        Self {
            name: view.group.display_name.clone(),
            size: view.key.size,
            modified: view.key.modified_display(),
            digest: view.digest.map(|d| d.to_hex()),
            files,
        }
    }
}

/// Summary counts in JSON format.
#[derive(Debug, Clone, Default, Serialize)]
pub struct JsonSummary {
    /// Number of groups listed
    pub groups: usize,
    /// Number of file entries listed
    pub files: usize,
    /// Number of listed entries that carry a destination
    pub moved: usize,
}

/// Complete JSON output structure.
#[derive(Debug, Clone, Serialize)]
pub struct JsonReport {
    /// Which list this is
    pub kind: ReportKind,
    /// Listed groups in index traversal order
    pub groups: Vec<JsonGroup>,
    /// Summary counts
    pub summary: JsonSummary,
}

impl JsonReport {
    /// Build the report of `kind` for `index`.
    #[must_use]
    pub fn new(index: &DuplicateIndex, kind: ReportKind) -> Self {
        let views: Vec<_> = match kind {
            ReportKind::Duplicates => index.duplicate_groups().collect(),
            ReportKind::Uniques => index.unique_groups().collect(),
        };
        let groups: Vec<_> = views
            .iter()
            .map(|view| JsonGroup::from_view(view, kind))
            .collect();

        let summary = JsonSummary {
            groups: groups.len(),
            files: groups.iter().map(|g| g.files.len()).sum(),
            moved: groups
                .iter()
                .flat_map(|g| &g.files)
                .filter(|f| f.moved_to.is_some())
                .count(),
        };

        Self {
            kind,
            groups,
            summary,
        }
    }

    /// Serialize to compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write JSON to a writer, followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write + ?Sized>(&self, writer: &mut W, pretty: bool) -> Result<(), ReportError> {
        let json = if pretty {
            self.to_json_pretty()?
        } else {
            self.to_json()?
        };
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}

/// Write the JSON report of `kind` for `index` to `sink`.
///
/// Hooks are notified the same way as for the text report.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_json_report<W: Write + ?Sized>(
    index: &DuplicateIndex,
    kind: ReportKind,
    sink: &mut W,
    hooks: &mut dyn PipelineHooks,
) -> Result<(), ReportError> {
    let report = JsonReport::new(index, kind);
    hooks.before_report(report.summary.groups);
    report.write_to(sink, true)?;
    for _ in 0..report.summary.groups {
        hooks.group_reported();
    }
    Ok(())
}
