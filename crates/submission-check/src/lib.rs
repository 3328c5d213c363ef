//! Submission Check - course project submission validation
//!
//! Verifies a student submission in two steps:
//! - Every required file appears exactly once in the submission tree
//! - The submitted patch applies cleanly to a fresh copy of the reference
//!   codebase, under a wall-clock timeout
//!
//! The second step only runs when the first passes.

pub mod config;
pub mod error;
pub mod fakes;
pub mod layout;
pub mod logger;
pub mod patch;
pub mod pipeline;
pub mod presence;
pub mod runner;
pub mod status;
pub mod telemetry;

// Re-export key types
pub use config::CheckConfig;
pub use error::{CheckError, CheckResult};
pub use layout::{Project, SubmissionLayout};
pub use logger::{logger_for, ConsoleLogger, Logger, NoopLogger};
pub use patch::PatchVerifier;
pub use pipeline::SubmissionCheck;
pub use presence::{check_presence, find_required_files, PresenceReport};
pub use runner::{CommandOutcome, CommandRunner, CommandSpec, TimeoutRunner};
pub use status::{CheckReport, CheckStatus};
pub use telemetry::init_tracing;
