//! External command execution under a wall-clock limit.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Instant;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::{CheckError, CheckResult};

/// Exit status `timeout(1)` uses when the wrapped command cannot be found.
const EXIT_COMMAND_NOT_FOUND: i32 = 127;

/// One external command to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Step name, for logs.
    pub step: String,

    /// Command to execute (first element is executable).
    pub command: Vec<String>,

    /// Working directory.
    pub cwd: PathBuf,

    /// Timeout in seconds.
    pub timeout_secs: u64,
}

impl CommandSpec {
    pub fn new(step: &str, command: Vec<String>, cwd: PathBuf, timeout_secs: u64) -> Self {
        Self {
            step: step.to_string(),
            command,
            cwd,
            timeout_secs,
        }
    }

    /// The executable being wrapped.
    pub fn program(&self) -> Option<&str> {
        self.command.first().map(String::as_str)
    }
}

/// Captured result of a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    /// Exit code (0 = success, -1 = killed without a code).
    pub exit_code: i32,

    /// Captured stdout followed by stderr.
    pub output: String,

    /// Duration in milliseconds.
    pub duration_ms: u64,
}

impl CommandOutcome {
    /// Whether the command exited zero.
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Runs external commands.
///
/// Non-zero exits are returned as outcomes, not errors. Errors are reserved
/// for commands that could not be started at all.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, spec: &CommandSpec) -> CheckResult<CommandOutcome>;
}

/// Runs each command as `timeout --preserve-status -s INT <secs> <command...>`.
///
/// On expiry the command receives SIGINT and its own exit status is
/// propagated, so a hang and an ordinary failure differ only in elapsed time.
#[derive(Debug, Default, Clone, Copy)]
pub struct TimeoutRunner;

impl TimeoutRunner {
    /// Full argument vector including the timeout wrapper.
    pub fn wrapped_command(spec: &CommandSpec) -> Vec<String> {
        let mut argv = vec![
            "timeout".to_string(),
            "--preserve-status".to_string(),
            "-s".to_string(),
            "INT".to_string(),
            spec.timeout_secs.to_string(),
        ];
        argv.extend(spec.command.iter().cloned());
        argv
    }
}

#[async_trait]
impl CommandRunner for TimeoutRunner {
    async fn run(&self, spec: &CommandSpec) -> CheckResult<CommandOutcome> {
        let program = spec
            .program()
            .ok_or_else(|| CheckError::EmptyCommand(spec.step.clone()))?
            .to_string();

        let argv = Self::wrapped_command(spec);
        debug!(step = %spec.step, command = ?argv, cwd = %spec.cwd.display(), "Running command");

        let start = Instant::now();
        let child = Command::new(&argv[0])
            .args(&argv[1..])
            .current_dir(&spec.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => CheckError::CommandNotFound(argv[0].clone()),
                _ => CheckError::Io(e),
            })?;

        let output = child.wait_with_output().await?;

        let duration_ms = start.elapsed().as_millis() as u64;
        let exit_code = output.status.code().unwrap_or(-1);
        if exit_code == EXIT_COMMAND_NOT_FOUND {
            return Err(CheckError::CommandNotFound(program));
        }

        let mut combined = String::from_utf8_lossy(&output.stdout).to_string();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        debug!(
            step = %spec.step,
            exit_code,
            duration_ms,
            output = %combined.trim_end(),
            "Command finished"
        );

        Ok(CommandOutcome {
            exit_code,
            output: combined,
            duration_ms,
        })
    }
}
