//! Plain-text duplicate and unique reports.
//!
//! # Format
//!
//! ```text
//! Duplicate list:
//! Filename: x.txt
//! Size: 10 byte
//! /src/A/x.txt
//! /src/B/x.txt -> /dest/x.txt/x.txt
//!
//! End of list.
//! ```
//!
//! The size line gains `, last modified: <RFC 3339 UTC>` when the
//! modification time is part of the bucket key. The unique variant opens
//! with `Unique list:`, prints only the first path of each group and has no
//! blank separator lines.
//!
//! Both writers are pure reads over the index; the output depends only on the
//! index's traversal order.

use std::io::{self, Write};

use crate::duplicates::{DuplicateIndex, GroupView};
use crate::hooks::PipelineHooks;

/// Write the duplicate report for `index` to `sink`.
///
/// Calls `hooks.before_report` with the number of duplicate groups, then
/// `hooks.group_reported` after each group.
///
/// # Errors
///
/// Propagates write errors from `sink`.
pub fn write_duplicate_report<W: Write + ?Sized>(
    index: &DuplicateIndex,
    sink: &mut W,
    hooks: &mut dyn PipelineHooks,
) -> io::Result<()> {
    hooks.before_report(index.count_duplicate_groups());

    writeln!(sink, "Duplicate list:")?;
    for view in index.duplicate_groups() {
        write_group_header(sink, &view)?;
        for entry in &view.group.entries {
            writeln!(sink, "{entry}")?;
        }
        writeln!(sink)?;
        hooks.group_reported();
    }
    writeln!(sink, "End of list.")?;

    sink.flush()
}

/// Write the unique report for `index` to `sink`.
///
/// One block per distinct content, listing the group's first path.
///
/// # Errors
///
/// Propagates write errors from `sink`.
pub fn write_unique_report<W: Write + ?Sized>(
    index: &DuplicateIndex,
    sink: &mut W,
    hooks: &mut dyn PipelineHooks,
) -> io::Result<()> {
    hooks.before_report(index.count_unique_groups());

    writeln!(sink, "Unique list:")?;
    for view in index.unique_groups() {
        write_group_header(sink, &view)?;
        if let Some(entry) = view.group.first() {
            writeln!(sink, "{entry}")?;
        }
        hooks.group_reported();
    }
    writeln!(sink, "End of list.")?;

    sink.flush()
}

fn write_group_header<W: Write + ?Sized>(sink: &mut W, view: &GroupView<'_>) -> io::Result<()> {
    writeln!(sink, "Filename: {}", view.group.display_name)?;
    writeln!(sink, "{}", view.key)
}
