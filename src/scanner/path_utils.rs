//! Lexical path utilities.
//!
//! Source roots and discovered files are compared lexically: a path belongs to
//! a root when, after both are made absolute and `.`/`..` components are
//! folded away, the root's components are a prefix of the path's. No symlink
//! resolution takes place, so a file reached through a linked directory is
//! matched against the root it was discovered under.
//!
//! # Example
//!
//! ```
//! use dupesift::scanner::path_utils::{normalize_path, suffixed_name};
//! use std::path::Path;
//!
//! assert_eq!(normalize_path(Path::new("/a/./b/../c")), Path::new("/a/c"));
//! assert_eq!(suffixed_name("photo.jpg", 2), "photo_2.jpg");
//! ```

use std::io;
use std::path::{Component, Path, PathBuf};

/// Fold `.` and `..` components without touching the filesystem.
///
/// `..` at the root stays at the root; `..` at the start of a relative path
/// is preserved.
#[must_use]
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }

    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Make `path` absolute against the current directory, then normalise it.
///
/// # Errors
///
/// Returns an error if the current directory cannot be determined.
pub fn absolute_path(path: &Path) -> io::Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };
    Ok(normalize_path(&absolute))
}

/// First root in `roots` that lexically contains `path`.
#[must_use]
pub fn source_root_for<'a>(path: &Path, roots: &'a [PathBuf]) -> Option<&'a Path> {
    let path = normalize_path(path);
    roots
        .iter()
        .map(PathBuf::as_path)
        .find(|root| path.starts_with(normalize_path(root)))
}

/// Path of `path` relative to the first matching root in `roots`.
#[must_use]
pub fn relative_to_sources(path: &Path, roots: &[PathBuf]) -> Option<PathBuf> {
    let path = normalize_path(path);
    let root = source_root_for(&path, roots)?;
    path.strip_prefix(normalize_path(root))
        .ok()
        .map(Path::to_path_buf)
}

/// Final component of `path` as a display string.
#[must_use]
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Insert `_<index>` before the last extension of `name`.
///
/// Leading-dot names such as `.bashrc` have no extension and get the suffix
/// appended at the end.
#[must_use]
pub fn suffixed_name(name: &str, index: usize) -> String {
    let as_path = Path::new(name);
    let stem = as_path.file_stem().map(|s| s.to_string_lossy());
    let extension = as_path.extension().map(|e| e.to_string_lossy());

    match (stem, extension) {
        (Some(stem), Some(ext)) => format!("{stem}_{index}.{ext}"),
        _ => format!("{name}_{index}"),
    }
}
