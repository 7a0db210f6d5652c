//! Structured error handling and exit codes.

use serde::Serialize;

use crate::duplicates::FinderError;
use crate::scanner::ScanError;

/// Exit codes for the dupsweep application.
///
/// - 0: Success (session ended normally, including any "no" answer)
/// - 1: General error (unexpected failure)
/// - 2: Invalid root (directory not given, missing, or not a directory)
/// - 3: Partial success (some selected files could not be deleted)
/// - 130: Interrupted by user (Ctrl+C)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: The session ended normally.
    Success = 0,
    /// General error: An unexpected error occurred.
    GeneralError = 1,
    /// Invalid root: No usable directory to scan.
    InvalidRoot = 2,
    /// Partial success: Some deletions failed.
    PartialSuccess = 3,
    /// Interrupted: Session was interrupted by user (Ctrl+C).
    Interrupted = 130,
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
            Self::InvalidRoot => "DS002",
            Self::PartialSuccess => "DS003",
            Self::Interrupted => "DS130",
        }
    }

    /// Pick the exit code for an error returned by [`crate::run_app`].
    #[must_use]
    pub fn for_error(err: &anyhow::Error) -> Self {
        if let Some(e) = err.downcast_ref::<FinderError>() {
            return match e {
                FinderError::Interrupted => Self::Interrupted,
                e if e.is_invalid_root() => Self::InvalidRoot,
                _ => Self::GeneralError,
            };
        }
        if err
            .downcast_ref::<ScanError>()
            .is_some_and(ScanError::is_invalid_root)
            || err.downcast_ref::<UsageError>().is_some()
        {
            return Self::InvalidRoot;
        }
        Self::GeneralError
    }
}

/// Errors in how the program was invoked.
#[derive(Debug, thiserror::Error)]
pub enum UsageError {
    /// No directory argument was given.
    #[error("Directory is not specified")]
    DirectoryNotSpecified,
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
    /// Whether the operation was interrupted
    pub interrupted: bool,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: err.to_string(),
            interrupted: exit_code == ExitCode::Interrupted,
        }
    }
}
