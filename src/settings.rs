//! Run settings for one deduplication pass.
//!
//! [`Settings`] is what the CLI (or any other front end) hands to
//! [`deduplicate`](crate::pipeline::deduplicate). It is checked once by
//! [`Settings::validate`] before any scanning starts: invalid settings never
//! touch the filesystem.

use std::path::{Path, PathBuf};

use crate::output::ReportFormat;
use crate::scanner::path_utils::absolute_path;
use crate::scanner::{KeyPolicy, DEFAULT_CHUNK_SIZE, MAX_CHUNK_SIZE};

/// Default file name of the report written into the destination.
pub const DEFAULT_REPORT_NAME: &str = "report.txt";

/// What a run does with the scanned index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// List duplicates, move nothing.
    #[default]
    Report,
    /// Move every duplicate copy except the first into the destination.
    Dedupe,
    /// Move one copy of every distinct content into the destination.
    MoveUnique,
}

impl Mode {
    /// Select the mode from the two mutually exclusive move flags.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::ConflictingModes`] if both flags are set.
    pub fn from_flags(dedupe: bool, unique: bool) -> Result<Self, SettingsError> {
        match (dedupe, unique) {
            (true, true) => Err(SettingsError::ConflictingModes),
            (true, false) => Ok(Self::Dedupe),
            (false, true) => Ok(Self::MoveUnique),
            (false, false) => Ok(Self::Report),
        }
    }

    /// Whether this mode relocates files.
    #[must_use]
    pub fn moves_files(self) -> bool {
        !matches!(self, Self::Report)
    }
}

/// Errors raised by settings validation.
#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    /// Dedupe and move-unique were both requested.
    #[error("--deduplicate and --unique cannot be used together")]
    ConflictingModes,

    /// No source directory was given.
    #[error("at least one source directory is required")]
    NoSources,

    /// A source directory does not exist.
    #[error("source not found: {0}")]
    SourceNotFound(PathBuf),

    /// A source path is not a directory.
    #[error("source is not a directory: {0}")]
    SourceNotADirectory(PathBuf),

    /// Two sources are the same directory, or one lies inside the other.
    #[error("sources overlap: {inner} is inside {outer}")]
    OverlappingSources { outer: PathBuf, inner: PathBuf },

    /// A move mode was requested without a destination.
    #[error("a destination directory is required to move files")]
    MissingDestination,

    /// The destination of a move mode is not an existing directory.
    #[error("destination is not an existing directory: {0}")]
    DestinationNotADirectory(PathBuf),

    /// The report file cannot be created because its parent is missing.
    #[error("cannot create report {0}: parent directory does not exist")]
    ReportParentMissing(PathBuf),

    /// The report file name is empty or contains a path separator.
    #[error("invalid report name: {0:?}")]
    InvalidReportName(String),

    /// The chunk size is zero.
    #[error("chunk size must be at least 1 byte")]
    InvalidChunkSize,

    /// The chunk size exceeds [`MAX_CHUNK_SIZE`].
    #[error("chunk size of {0} bytes exceeds the {MAX_CHUNK_SIZE} byte limit")]
    ChunkSizeTooLarge(usize),

    /// A path could not be made absolute.
    #[error("cannot resolve {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Complete settings of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// What to do with the scanned index
    pub mode: Mode,
    /// Move target (move modes) or report location (report mode)
    pub destination: Option<PathBuf>,
    /// Roots to scan, in order
    pub sources: Vec<PathBuf>,
    /// Remove emptied source subdirectories after a real move
    pub purge_empty: bool,
    /// Compute and report moves without touching the filesystem
    pub dry_run: bool,
    /// Metadata that makes up the bucket key
    pub key_policy: KeyPolicy,
    /// Follow symlinks while walking
    pub follow_symlinks: bool,
    /// Read window for content hashing
    pub chunk_size: usize,
    /// Report rendition
    pub report_format: ReportFormat,
    /// File name of the report written into a destination directory
    pub report_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: Mode::Report,
            destination: None,
            sources: Vec::new(),
            purge_empty: false,
            dry_run: false,
            key_policy: KeyPolicy::SizeOnly,
            follow_symlinks: false,
            chunk_size: DEFAULT_CHUNK_SIZE,
            report_format: ReportFormat::Text,
            report_name: DEFAULT_REPORT_NAME.to_string(),
        }
    }
}

impl Settings {
    /// Settings for `mode` over `sources`, everything else at defaults.
    #[must_use]
    pub fn new(mode: Mode, sources: Vec<PathBuf>) -> Self {
        Self {
            mode,
            sources,
            ..Self::default()
        }
    }

    /// Set the destination.
    #[must_use]
    pub fn with_destination(mut self, destination: impl Into<PathBuf>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    /// Enable or disable dry-run.
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Enable or disable the empty-directory purge.
    #[must_use]
    pub fn with_purge_empty(mut self, purge: bool) -> Self {
        self.purge_empty = purge;
        self
    }

    /// Check every constraint and return the settings with absolute paths.
    ///
    /// - at least one source; every source an existing directory
    /// - move modes: destination is an existing directory
    /// - report mode: destination, when given, is an existing directory or a
    ///   file path whose parent directory exists
    /// - no source equal to or nested inside another
    /// - chunk size within `1..=MAX_CHUNK_SIZE`, report name a bare file name
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint as a [`SettingsError`].
    pub fn validate(mut self) -> Result<Self, SettingsError> {
        if self.sources.is_empty() {
            return Err(SettingsError::NoSources);
        }
        if self.chunk_size == 0 {
            return Err(SettingsError::InvalidChunkSize);
        }
        if self.chunk_size > MAX_CHUNK_SIZE {
            return Err(SettingsError::ChunkSizeTooLarge(self.chunk_size));
        }
        if !is_bare_file_name(&self.report_name) {
            return Err(SettingsError::InvalidReportName(self.report_name));
        }

        let mut sources: Vec<PathBuf> = Vec::with_capacity(self.sources.len());
        for source in &self.sources {
            if !source.exists() {
                return Err(SettingsError::SourceNotFound(source.clone()));
            }
            if !source.is_dir() {
                return Err(SettingsError::SourceNotADirectory(source.clone()));
            }
            let source = resolve(source)?;
            if let Some(outer) = sources
                .iter()
                .find(|s| source.starts_with(s) || s.starts_with(&source))
            {
                let (outer, inner) = if source.starts_with(outer) {
                    (outer.clone(), source)
                } else {
                    (source, outer.clone())
                };
                return Err(SettingsError::OverlappingSources { outer, inner });
            }
            sources.push(source);
        }
        self.sources = sources;

        self.destination = match (self.mode.moves_files(), self.destination.take()) {
            (true, None) => return Err(SettingsError::MissingDestination),
            (true, Some(dest)) => {
                if !dest.is_dir() {
                    return Err(SettingsError::DestinationNotADirectory(dest));
                }
                Some(resolve(&dest)?)
            }
            (false, None) => None,
            (false, Some(dest)) => {
                let dest = resolve(&dest)?;
                if !dest.is_dir() && !dest.parent().is_some_and(Path::is_dir) {
                    return Err(SettingsError::ReportParentMissing(dest));
                }
                Some(dest)
            }
        };

        Ok(self)
    }

    /// Where the report goes: `None` means standard output.
    ///
    /// In move modes this is `<destination>/<report_name>`. In report mode it
    /// is the same when the destination is a directory, the destination
    /// itself when it names a file, and `None` without a destination.
    #[must_use]
    pub fn report_path(&self) -> Option<PathBuf> {
        let destination = self.destination.as_ref()?;
        if self.mode.moves_files() || destination.is_dir() {
            Some(destination.join(&self.report_name))
        } else {
            Some(destination.clone())
        }
    }
}

fn resolve(path: &Path) -> Result<PathBuf, SettingsError> {
    absolute_path(path).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn is_bare_file_name(name: &str) -> bool {
    let path = Path::new(name);
    !name.is_empty() && path.file_name().is_some_and(|n| n == path.as_os_str())
}
