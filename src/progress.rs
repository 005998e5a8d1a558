//! Progress reporting utilities using indicatif.
//!
//! This module provides the [`Progress`] struct which implements
//! [`PipelineHooks`] to display progress bars on stderr while sources are
//! scanned, groups are moved and the report is written.
//!
//! Only one bar is live at a time; each `before_*` hook finishes the previous
//! phase's bar and starts the next.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::hooks::PipelineHooks;

/// Pipeline phase shown by the live bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Scan,
    Move,
    Purge,
    Report,
}

impl Phase {
    fn label(self) -> &'static str {
        match self {
            Phase::Scan => "Scanning sources",
            Phase::Move => "Moving groups",
            Phase::Purge => "Removing empty directories",
            Phase::Report => "Writing report",
        }
    }

    fn done(self) -> &'static str {
        match self {
            Phase::Scan => "Scan complete",
            Phase::Move => "Move complete",
            Phase::Purge => "Purge complete",
            Phase::Report => "Report complete",
        }
    }
}

/// Progress reporter using indicatif.
pub struct Progress {
    current: Option<(Phase, ProgressBar)>,
    quiet: bool,
}

impl Progress {
    /// Create a new progress reporter.
    ///
    /// # Arguments
    ///
    /// * `quiet` - If true, no progress bars will be displayed.
    ///
    /// # Examples
    ///
    /// ```
    /// use dupesift::progress::Progress;
    ///
    /// let progress = Progress::new(true);
    /// assert!(progress.is_quiet());
    /// ```
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self {
            current: None,
            quiet,
        }
    }

    /// Whether bars are suppressed.
    #[must_use]
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// Style for counted phases.
    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█>-")
    }

    /// Style for the open-ended purge phase.
    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed_precise}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
    }

    fn start(&mut self, phase: Phase, total: Option<usize>) {
        self.finish();
        if self.quiet {
            return;
        }

        let pb = ProgressBar::with_draw_target(total.map(|t| t as u64), ProgressDrawTarget::stderr());
        if total.is_some() {
            pb.set_style(Self::bar_style());
        } else {
            pb.set_style(Self::spinner_style());
            pb.enable_steady_tick(Duration::from_millis(100));
        }
        pb.set_message(phase.label());
        self.current = Some((phase, pb));
    }

    fn advance(&self, phase: Phase) {
        if let Some((current, pb)) = &self.current {
            if *current == phase {
                pb.inc(1);
            }
        }
    }

    /// Finish the live bar, if any.
    pub fn finish(&mut self) {
        if let Some((phase, pb)) = self.current.take() {
            pb.finish_with_message(phase.done());
        }
    }
}

impl PipelineHooks for Progress {
    fn before_scan(&mut self, total_sources: usize) {
        self.start(Phase::Scan, Some(total_sources));
    }

    fn source_scanned(&mut self) {
        self.advance(Phase::Scan);
    }

    fn before_move(&mut self, total_groups: usize) {
        self.start(Phase::Move, Some(total_groups));
    }

    fn group_moved(&mut self) {
        self.advance(Phase::Move);
    }

    fn before_purge(&mut self) {
        self.start(Phase::Purge, None);
    }

    fn after_purge(&mut self) {
        self.finish();
    }

    fn before_report(&mut self, total_groups: usize) {
        self.start(Phase::Report, Some(total_groups));
    }

    fn group_reported(&mut self) {
        self.advance(Phase::Report);
    }
}

impl Drop for Progress {
    fn drop(&mut self) {
        self.finish();
    }
}
