//! Line-oriented report sinks.
//!
//! Checks report their verdicts as tagged lines (`[PASS]`, `[FAIL]`,
//! `[ERROR]`) through a [`Logger`]. The sink is injected so that quiet runs
//! use [`NoopLogger`] and tests can capture lines with
//! [`MemoryLogger`](crate::fakes::MemoryLogger).

use std::io::Write;

/// Anything that can write a single report line.
pub trait Logger: Send + Sync {
    /// Write one line of operator-facing output.
    fn write_line(&self, line: &str);
}

/// Writes report lines to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleLogger;

impl Logger for ConsoleLogger {
    fn write_line(&self, line: &str) {
        let mut stdout = std::io::stdout().lock();
        // A closed stdout must not abort the check.
        let _ = writeln!(stdout, "{line}");
    }
}

/// Discards every line. Used when verbosity is off.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLogger;

impl Logger for NoopLogger {
    fn write_line(&self, _line: &str) {}
}

/// Pick the sink for the requested verbosity.
pub fn logger_for(verbose: bool) -> Box<dyn Logger> {
    if verbose {
        Box::new(ConsoleLogger)
    } else {
        Box::new(NoopLogger)
    }
}
