//! Structured error handling and exit codes.

use serde::Serialize;

use crate::config::ConfigError;
use crate::pipeline::DedupeError;
use crate::settings::SettingsError;

/// Exit codes for the dupesift application.
///
/// - 0: Success (run completed)
/// - 1: General error (scan, move or report failure)
/// - 2: Invalid configuration (bad flags, settings or config file)
/// - 3: Partial success (completed, but some paths could not be read or purged)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: the run completed.
    Success = 0,
    /// General error: a fatal error stopped the run.
    GeneralError = 1,
    /// Invalid configuration: nothing was scanned.
    InvalidConfiguration = 2,
    /// Partial success: completed with some non-fatal errors.
    PartialSuccess = 3,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "DS000",
            Self::GeneralError => "DS001",
            Self::InvalidConfiguration => "DS002",
            Self::PartialSuccess => "DS003",
        }
    }

    /// Classify a fatal error.
    #[must_use]
    pub fn for_error(err: &anyhow::Error) -> Self {
        let invalid = err.downcast_ref::<SettingsError>().is_some()
            || err.downcast_ref::<ConfigError>().is_some()
            || matches!(
                err.downcast_ref::<DedupeError>(),
                Some(DedupeError::Settings(_))
            );
        if invalid {
            Self::InvalidConfiguration
        } else {
            Self::GeneralError
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "DS001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message
    pub message: String,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{err:#}"),
        }
    }
}
