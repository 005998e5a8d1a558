//! Command-line interface definitions for dupesift.
//!
//! This module defines all CLI arguments using the clap derive API and turns
//! them, together with the loaded [`Config`], into [`Settings`].
//!
//! # Example
//!
//! ```bash
//! # Print the duplicate report of two trees
//! dupesift ~/Photos /mnt/backup/Photos
//!
//! # Move duplicate copies into ~/dupes, then drop emptied directories
//! dupesift -d -p -r ~/dupes ~/Photos /mnt/backup/Photos
//!
//! # Preview which unique files would be collected, as JSON
//! dupesift -u -n -r ~/uniques --format json ~/Photos
//! ```

use clap::Parser;
use std::path::PathBuf;

use crate::config::Config;
use crate::output::ReportFormat;
use crate::scanner::KeyPolicy;
use crate::settings::{Mode, Settings, SettingsError};

/// Find duplicate files across directory trees.
///
/// Files are bucketed by size (optionally also by modification time) and
/// confirmed with SHA-512. Without -d or -u only a report is produced.
#[derive(Debug, Parser)]
#[command(name = "dupesift")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Source directories to scan, in order
    ///
    /// The first copy found (in argument order, then sorted walk order) is
    /// treated as the original.
    #[arg(value_name = "SOURCE", required = true)]
    pub sources: Vec<PathBuf>,

    /// Move duplicate copies into the result directory, keeping the original
    #[arg(short, long, conflicts_with = "unique")]
    pub deduplicate: bool,

    /// Move one copy of every distinct file into the result directory
    #[arg(short, long)]
    pub unique: bool,

    /// Remove source subdirectories left empty after moving
    #[arg(short, long)]
    pub purge: bool,

    /// Result directory (move modes) or report file or directory (report mode)
    ///
    /// Without it, the report is printed to stdout.
    #[arg(short, long = "result", value_name = "PATH")]
    pub result: Option<PathBuf>,

    /// Compute and report moves without touching any file
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Treat files as candidates only if their modification times also match
    #[arg(long)]
    pub match_mtime: bool,

    /// Follow symbolic links while scanning
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Read window for hashing (e.g., 64KiB, 1MiB)
    ///
    /// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB, TB, TiB
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    pub chunk_size: Option<u64>,

    /// Report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Configuration file (TOML)
    #[arg(long, value_name = "PATH", env = "DUPESIFT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress bars and all log output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print errors as JSON on stderr
    #[arg(long)]
    pub json_errors: bool,
}

impl Cli {
    /// Combine the parsed flags with `config` into run settings.
    ///
    /// Boolean flags can only switch a feature on; the configuration supplies
    /// the value when a flag is absent.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::ConflictingModes`] if both move modes are set.
    pub fn to_settings(&self, config: &Config) -> Result<Settings, SettingsError> {
        let mode = Mode::from_flags(self.deduplicate, self.unique)?;

        let key_policy = if self.match_mtime || config.match_modified {
            KeyPolicy::SizeAndModified
        } else {
            KeyPolicy::SizeOnly
        };

        let chunk_size = match self.chunk_size {
            Some(size) => usize::try_from(size).unwrap_or(usize::MAX),
            None => config.chunk_size,
        };

        Ok(Settings {
            mode,
            destination: self.result.clone(),
            sources: self.sources.clone(),
            purge_empty: self.purge || config.purge_empty,
            dry_run: self.dry_run,
            key_policy,
            follow_symlinks: self.follow_symlinks || config.follow_symlinks,
            chunk_size,
            report_format: self.format,
            report_name: config.report_name.clone(),
        })
    }
}

/// Parse a human-readable size string into bytes.
///
/// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB, TB, TiB
/// Case-insensitive. Numbers without suffix are treated as bytes.
///
/// # Examples
///
/// ```
/// use dupesift::cli::parse_size;
///
/// assert_eq!(parse_size("1024").unwrap(), 1024);
/// assert_eq!(parse_size("64KiB").unwrap(), 65_536);
/// assert_eq!(parse_size("1MB").unwrap(), 1_000_000);
/// ```
/// # Errors
///
/// Returns an error if the string is empty, contains an invalid number,
/// a negative number, an unknown size suffix, or a size beyond `u64`.
pub fn parse_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("Size cannot be empty".to_string());
    }

    // Find where the number ends and the suffix begins
    let (num_str, suffix) = match s.find(|c: char| !c.is_ascii_digit() && c != '.') {
        Some(idx) => (&s[..idx], s[idx..].trim().to_uppercase()),
        None => (s, String::new()),
    };

    let num: f64 = num_str
        .parse()
        .map_err(|_| format!("Invalid number: '{num_str}'"))?;

    let multiplier: u64 = match suffix.as_str() {
        "" | "B" => 1,
        "KB" | "K" => 1_000,
        "KIB" => 1_024,
        "MB" | "M" => 1_000_000,
        "MIB" => 1_048_576,
        "GB" | "G" => 1_000_000_000,
        "GIB" => 1_073_741_824,
        "TB" | "T" => 1_000_000_000_000,
        "TIB" => 1_099_511_627_776,
        _ => return Err(format!("Unknown size suffix: '{suffix}'")),
    };

    let bytes = num * multiplier as f64;
    if !bytes.is_finite() || bytes >= u64::MAX as f64 {
        return Err(format!("Size too large: '{s}'"));
    }
    Ok(bytes as u64)
}
