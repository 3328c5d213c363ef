//! In-memory fakes for the runner and logger seams (testing only)
//!
//! `RecordingRunner` records every command instead of executing it and
//! answers with scripted exit codes. `MemoryLogger` keeps report lines.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::CheckResult;
use crate::logger::Logger;
use crate::runner::{CommandOutcome, CommandRunner, CommandSpec};

// ---------------------------------------------------------------------------
// RecordingRunner
// ---------------------------------------------------------------------------

/// Command runner that never spawns anything.
///
/// Exit codes are handed out in order; once they run out every call
/// succeeds.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    calls: Mutex<Vec<CommandSpec>>,
    exit_codes: Mutex<VecDeque<i32>>,
}

impl RecordingRunner {
    /// Every command exits 0.
    pub fn succeeding() -> Self {
        Self::default()
    }

    /// Commands exit with `codes` in order, then 0.
    pub fn with_exit_codes(codes: Vec<i32>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            exit_codes: Mutex::new(codes.into()),
        }
    }

    /// Commands received so far.
    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRunner for RecordingRunner {
    async fn run(&self, spec: &CommandSpec) -> CheckResult<CommandOutcome> {
        self.calls.lock().unwrap().push(spec.clone());
        let exit_code = self.exit_codes.lock().unwrap().pop_front().unwrap_or(0);
        Ok(CommandOutcome {
            exit_code,
            output: String::new(),
            duration_ms: 0,
        })
    }
}

// ---------------------------------------------------------------------------
// MemoryLogger
// ---------------------------------------------------------------------------

/// Logger that keeps every line in memory.
#[derive(Debug, Default)]
pub struct MemoryLogger {
    lines: Mutex<Vec<String>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines written so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl Logger for MemoryLogger {
    fn write_line(&self, line: &str) {
        self.lines.lock().unwrap().push(line.to_string());
    }
}
