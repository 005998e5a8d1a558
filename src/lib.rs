//! dupesift - duplicate file grouping and relocation
//!
//! Scans one or more directory trees, groups files with identical content
//! (size buckets confirmed by SHA-512) and either reports the duplicate
//! groups, moves duplicate copies out of the way, or collects one copy of
//! every distinct file into a destination directory.
//!
//! The library entry point is [`pipeline::deduplicate`]; the binary wraps it
//! with [`run_app`].

pub mod actions;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod hooks;
pub mod logging;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod scanner;
pub mod settings;

use anyhow::Context;

use crate::cli::Cli;
use crate::config::Config;
use crate::error::ExitCode;
use crate::pipeline::{deduplicate, Outcome};
use crate::progress::Progress;

/// Run the command-line application.
///
/// # Errors
///
/// Returns any configuration, settings or pipeline error; the binary maps it
/// to an exit code with [`ExitCode::for_error`].
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    let config = Config::load(cli.config.as_deref())?;
    log::debug!("Effective configuration: {config:?}");

    let settings = cli.to_settings(&config)?;
    let mut progress = Progress::new(cli.quiet);
    let outcome = deduplicate(&settings, &mut progress).context("deduplication failed")?;
    progress.finish();

    log_outcome(&outcome);
    if outcome.is_partial() {
        Ok(ExitCode::PartialSuccess)
    } else {
        Ok(ExitCode::Success)
    }
}

fn log_outcome(outcome: &Outcome) {
    log::info!(
        "Scanned {} files ({} bytes) in {:.2?}",
        outcome.scan.files_scanned,
        outcome.scan.total_size,
        outcome.scan.scan_duration
    );
    if let Some(moves) = &outcome.moves {
        let verb = if moves.dry_run { "Would move" } else { "Moved" };
        log::info!("{verb} {} files from {} groups", moves.moved, moves.groups);
    }
    if let Some(purge) = &outcome.purge {
        log::info!("Removed {} empty directories", purge.removed.len());
    }
    if !outcome.scan.scan_errors.is_empty() {
        log::warn!("{} paths could not be scanned", outcome.scan.scan_errors.len());
    }
}
