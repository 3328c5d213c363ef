//! Error types for submission checking

use std::path::PathBuf;
use thiserror::Error;

/// Faults that stop a check run outright.
///
/// A submission that fails a check is not an error; it is reported as
/// [`CheckStatus::Fail`](crate::CheckStatus::Fail). These variants cover the
/// conditions under which no verdict can be produced at all.
#[derive(Error, Debug)]
pub enum CheckError {
    /// Submission directory does not exist or is not a directory
    #[error("Invalid directory: {}", .0.display())]
    InvalidDirectory(PathBuf),

    /// Patch file does not exist
    #[error("Invalid patch file: {}", .0.display())]
    InvalidPatchFile(PathBuf),

    /// A required external command could not be found
    #[error("Required command `{0}` is not installed or not in PATH")]
    CommandNotFound(String),

    /// Command line was empty
    #[error("Empty command for step {0}")]
    EmptyCommand(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for submission checks.
pub type CheckResult<T> = std::result::Result<T, CheckError>;
