//! Progress notification points of the deduplication pipeline.
//!
//! Every stage of [`deduplicate`](crate::pipeline::deduplicate) announces
//! itself through a [`PipelineHooks`] implementation. Hooks are plain
//! notifications: they receive counts, return nothing and cannot influence
//! control flow. Every method has a no-op default, so an implementation only
//! overrides the points it cares about, and [`NoHooks`] stands in when no
//! observer is attached.
//!
//! # Example
//!
//! ```
//! use dupesift::hooks::PipelineHooks;
//!
//! #[derive(Default)]
//! struct Counter {
//!     moved: usize,
//! }
//!
//! impl PipelineHooks for Counter {
//!     fn group_moved(&mut self) {
//!         self.moved += 1;
//!     }
//! }
//! ```

/// Synchronous callbacks invoked at fixed points of the pipeline.
pub trait PipelineHooks {
    /// Scanning is about to start over `total_sources` roots.
    fn before_scan(&mut self, _total_sources: usize) {}

    /// One source root has been scanned.
    fn source_scanned(&mut self) {}

    /// Relocation is about to process `total_groups` groups.
    fn before_move(&mut self, _total_groups: usize) {}

    /// One group has been relocated.
    fn group_moved(&mut self) {}

    /// Empty-directory purge is about to start.
    fn before_purge(&mut self) {}

    /// Empty-directory purge has finished.
    fn after_purge(&mut self) {}

    /// The report is about to list `total_groups` groups.
    fn before_report(&mut self, _total_groups: usize) {}

    /// One group has been written to the report.
    fn group_reported(&mut self) {}
}

/// Hooks that ignore every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl PipelineHooks for NoHooks {}
