//! End-to-end deduplication run.
//!
//! [`deduplicate`] strings the components together:
//!
//! 1. validate the [`Settings`]
//! 2. scan every source into one [`DuplicateIndex`]
//! 3. report mode: write the duplicate report and stop
//! 4. move modes: relocate, optionally purge emptied source directories
//!    (real runs only), then write the report into the destination
//!
//! When a move fails part-way, the report of the partially processed index
//! is still written before the error is returned, so every completed move is
//! on record.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::actions::{
    move_duplicates, move_uniques, purge_empty_subdirs, MoveError, MoveSummary, PurgeSummary,
};
use crate::duplicates::{DuplicateFinder, DuplicateIndex, FinderConfig, FinderError, ScanSummary};
use crate::hooks::PipelineHooks;
use crate::output::{write_report, ReportError, ReportFormat, ReportKind};
use crate::scanner::path_utils::suffixed_name;
use crate::scanner::Hasher;
use crate::settings::{Mode, Settings, SettingsError};

/// Errors that abort a deduplication run.
#[derive(thiserror::Error, Debug)]
pub enum DedupeError {
    /// Settings failed validation; nothing was scanned.
    #[error(transparent)]
    Settings(#[from] SettingsError),

    /// Scanning a source failed.
    #[error(transparent)]
    Scan(#[from] FinderError),

    /// Relocation stopped at a failed move.
    #[error(transparent)]
    Move(#[from] MoveError),

    /// Writing the report failed.
    #[error(transparent)]
    Report(#[from] ReportError),

    /// The report file could not be created.
    #[error("cannot create report {path}: {source}")]
    ReportFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// What a completed run did.
#[derive(Debug, Default)]
pub struct Outcome {
    /// Scan statistics across all sources
    pub scan: ScanSummary,
    /// Number of duplicate groups found
    pub duplicate_groups: usize,
    /// Number of distinct contents found
    pub unique_groups: usize,
    /// Relocation counts, in move modes
    pub moves: Option<MoveSummary>,
    /// Purge result, when a purge ran
    pub purge: Option<PurgeSummary>,
    /// Report file, or `None` when the report went to standard output
    pub report_path: Option<PathBuf>,
}

impl Outcome {
    /// Whether anything was skipped along the way (walk errors or
    /// directories the purge could not remove).
    #[must_use]
    pub fn is_partial(&self) -> bool {
        !self.scan.scan_errors.is_empty()
            || self.purge.as_ref().is_some_and(|p| !p.is_complete())
    }
}

/// Run one full deduplication pass.
///
/// # Errors
///
/// Returns [`DedupeError`] for invalid settings, a failed scan, the first
/// failed move, or a report that cannot be written.
pub fn deduplicate(
    settings: &Settings,
    hooks: &mut dyn PipelineHooks,
) -> Result<Outcome, DedupeError> {
    let settings = settings.clone().validate()?;
    let mut outcome = Outcome::default();

    let mut index = scan_sources(&settings, hooks, &mut outcome)?;
    outcome.duplicate_groups = index.count_duplicate_groups();
    outcome.unique_groups = index.count_unique_groups();
    log::info!(
        "Found {} duplicate groups among {} distinct files",
        outcome.duplicate_groups,
        outcome.unique_groups
    );

    let destination = match (settings.mode, settings.destination.as_deref()) {
        (Mode::Report, _) => {
            outcome.report_path = settings.report_path();
            emit_report(
                &index,
                ReportKind::Duplicates,
                settings.report_format,
                outcome.report_path.as_deref(),
                hooks,
            )?;
            return Ok(outcome);
        }
        (_, Some(destination)) => destination,
        (_, None) => return Err(SettingsError::MissingDestination.into()),
    };

    let kind = match settings.mode {
        Mode::MoveUnique => ReportKind::Uniques,
        _ => ReportKind::Duplicates,
    };

    let moved = match settings.mode {
        Mode::MoveUnique => move_uniques(&mut index, destination, settings.dry_run, hooks),
        _ => move_duplicates(
            &mut index,
            &settings.sources,
            destination,
            settings.dry_run,
            hooks,
        ),
    };

    let report_path = free_report_path(destination, &settings.report_name);
    outcome.report_path = Some(report_path.clone());

    match moved {
        Ok(summary) => outcome.moves = Some(summary),
        Err(e) => {
            log::error!("Move aborted: {e}");
            if let Err(report_err) =
                emit_report(&index, kind, settings.report_format, Some(&report_path), hooks)
            {
                log::error!("Could not record partial moves: {report_err}");
            }
            return Err(e.into());
        }
    }

    if settings.purge_empty && !settings.dry_run {
        hooks.before_purge();
        let purge = purge_empty_subdirs(&settings.sources);
        for failure in &purge.failed {
            log::warn!("Left in place: {} ({})", failure.path.display(), failure.source);
        }
        outcome.purge = Some(purge);
        hooks.after_purge();
    }

    emit_report(&index, kind, settings.report_format, Some(&report_path), hooks)?;
    Ok(outcome)
}

fn scan_sources(
    settings: &Settings,
    hooks: &mut dyn PipelineHooks,
    outcome: &mut Outcome,
) -> Result<DuplicateIndex, FinderError> {
    let finder = DuplicateFinder::new(
        FinderConfig::default()
            .with_follow_symlinks(settings.follow_symlinks)
            .with_key_policy(settings.key_policy),
    );
    let mut index = DuplicateIndex::with_hasher(Hasher::with_chunk_size(settings.chunk_size));

    hooks.before_scan(settings.sources.len());
    for source in &settings.sources {
        outcome.scan.merge(finder.scan(source, &mut index)?);
        hooks.source_scanned();
    }

    Ok(index)
}

/// Write the report to `path`, or to standard output when `path` is `None`.
fn emit_report(
    index: &DuplicateIndex,
    kind: ReportKind,
    format: ReportFormat,
    path: Option<&Path>,
    hooks: &mut dyn PipelineHooks,
) -> Result<(), DedupeError> {
    match path {
        Some(path) => {
            let file = File::create(path).map_err(|source| DedupeError::ReportFile {
                path: path.to_path_buf(),
                source,
            })?;
            let mut writer = BufWriter::new(file);
            write_report(index, kind, format, &mut writer, hooks)?;
            writer.flush().map_err(ReportError::from)?;
            log::info!("Report written to {}", path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            write_report(index, kind, format, &mut lock, hooks)?;
        }
    }
    Ok(())
}

/// `<dir>/<name>`, or the first free `<dir>/<name_N>` if that is taken.
///
/// Relocated files and group directories share the destination with the
/// report, which must never overwrite them.
fn free_report_path(dir: &Path, name: &str) -> PathBuf {
    let mut candidate = dir.join(name);
    let mut suffix = 1;
    while candidate.exists() {
        candidate = dir.join(suffixed_name(name, suffix));
        suffix += 1;
    }
    if suffix > 1 {
        log::warn!(
            "{} is taken, writing report to {}",
            dir.join(name).display(),
            candidate.display()
        );
    }
    candidate
}
