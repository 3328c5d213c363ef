//! Per-check outcomes and the run report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of one check.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CheckStatus {
    /// The check passed.
    Pass { message: String },

    /// The check failed; `reason` is shown to the student.
    Fail { reason: String },

    /// An earlier check failed, so this one never ran.
    NotAttempted,
}

impl CheckStatus {
    pub fn pass(message: impl Into<String>) -> Self {
        CheckStatus::Pass {
            message: message.into(),
        }
    }

    pub fn fail(reason: impl Into<String>) -> Self {
        CheckStatus::Fail {
            reason: reason.into(),
        }
    }

    pub fn passed(&self) -> bool {
        matches!(self, CheckStatus::Pass { .. })
    }

    pub fn failed(&self) -> bool {
        matches!(self, CheckStatus::Fail { .. })
    }

    /// Tagged report line, e.g. `[FAIL] There was a problem patching.`
    pub fn line(&self) -> String {
        match self {
            CheckStatus::Pass { message } => format!("[PASS] {message}"),
            CheckStatus::Fail { reason } => format!("[FAIL] {reason}"),
            CheckStatus::NotAttempted => "[SKIP] Not attempted.".to_string(),
        }
    }
}

/// Result of a complete submission check.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckReport {
    /// File presence check.
    pub presence: CheckStatus,

    /// Patch verification; `NotAttempted` when presence failed.
    pub patch: CheckStatus,

    /// When the run started.
    pub checked_at: DateTime<Utc>,

    /// Total duration in milliseconds.
    pub duration_ms: u64,
}

impl CheckReport {
    /// Whether both checks passed.
    pub fn passed(&self) -> bool {
        self.presence.passed() && self.patch.passed()
    }

    /// Process exit code for this report.
    ///
    /// 0 = passed, 1 = presence check failed, 2 = patch verification failed.
    pub fn exit_code(&self) -> u8 {
        if !self.presence.passed() {
            1
        } else if !self.patch.passed() {
            2
        } else {
            0
        }
    }

    /// One-line summary of the run.
    pub fn summary(&self) -> String {
        match self.exit_code() {
            0 => "Submission check passed".to_string(),
            1 => "Submission check failed: required files".to_string(),
            _ => "Submission check failed: patch".to_string(),
        }
    }
}
