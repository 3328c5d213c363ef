//! Submission Check CLI
//!
//! `check-your-submission` validates a project submission directory:
//! required files present exactly once, then the patch applied to a fresh
//! copy of the reference codebase.
//!
//! ## Exit codes
//!
//! - `0`: all checks passed
//! - `1`: required files missing or duplicated
//! - `2`: the patch could not be verified
//! - `3`: the check could not run (bad arguments, missing tools, I/O)

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::Level;

use submission_check::config::{
    DEFAULT_PRE_CHECK_DELAY_SECS, DEFAULT_SUBMISSION_DIR, DEFAULT_TIMEOUT_SECS,
};
use submission_check::{
    init_tracing, logger_for, CheckConfig, CheckReport, Project, SubmissionCheck, TimeoutRunner,
};

/// Exit code when no verdict could be reached.
const EXIT_FAULT: u8 = 3;

#[derive(Parser, Debug)]
#[command(name = "check-your-submission")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Check a project submission before handing it in", long_about = None)]
struct Cli {
    /// Top-level directory containing the submission
    #[arg(short, long, env = "SUBMISSION_DIR", default_value = DEFAULT_SUBMISSION_DIR)]
    dir: PathBuf,

    /// Run with verbosity
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON-formatted log lines and a JSON report
    #[arg(long)]
    json: bool,

    /// Time limit for each external command, in seconds (at least 1)
    #[arg(
        long,
        env = "SUBMISSION_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    timeout: u64,

    /// Pause before checking so the printed arguments can be reviewed (0 = none)
    #[arg(long, env = "SUBMISSION_PRE_CHECK_DELAY_SECS", default_value_t = DEFAULT_PRE_CHECK_DELAY_SECS)]
    delay: u64,

    /// Reference codebase (default: aos_pintos next to the submission directory)
    #[arg(long, env = "SUBMISSION_REFERENCE_DIR")]
    reference: Option<PathBuf>,
}

impl Cli {
    fn into_config(self) -> CheckConfig {
        CheckConfig {
            project: Project::Project0,
            dir: self.dir,
            verbose: self.verbose,
            json: self.json,
            timeout_secs: self.timeout,
            pre_check_delay_secs: self.delay,
            reference_dir: self.reference,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    init_tracing(cli.json, level);

    match run(cli.into_config()).await {
        Ok(report) => ExitCode::from(report.exit_code()),
        Err(e) => {
            eprintln!("[ERROR] {:#}", e);
            ExitCode::from(EXIT_FAULT)
        }
    }
}

async fn run(config: CheckConfig) -> Result<CheckReport> {
    println!("{}", config.to_pretty_json()?);

    let json = config.json;
    let logger = logger_for(config.verbose);
    if config.verbose {
        logger.write_line(&format!("Check submission for {}", config.project.name()));
    }

    let check = SubmissionCheck::new(config, Arc::new(TimeoutRunner), logger);
    let report = check
        .run()
        .await
        .with_context(|| format!("Failed to check {}", check.config().dir.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["check-your-submission"]).unwrap();
        let config = cli.into_config();
        assert_eq!(config.dir, PathBuf::from("check-submission"));
        assert!(!config.verbose);
        assert_eq!(config.timeout_secs, 20);
        assert_eq!(config.pre_check_delay_secs, 9);
        assert!(config.reference_dir.is_none());
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::try_parse_from(["check-your-submission", "-d", "/tmp/sub", "-v"]).unwrap();
        let config = cli.into_config();
        assert_eq!(config.dir, PathBuf::from("/tmp/sub"));
        assert!(config.verbose);
    }

    #[test]
    fn test_cli_long_flags() {
        let cli = Cli::try_parse_from([
            "check-your-submission",
            "--dir",
            "sub",
            "--timeout",
            "5",
            "--delay",
            "0",
            "--reference",
            "/opt/aos_pintos",
            "--json",
        ])
        .unwrap();
        let config = cli.into_config();
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.pre_check_delay_secs, 0);
        assert_eq!(config.reference_dir, Some(PathBuf::from("/opt/aos_pintos")));
        assert!(config.json);
    }

    #[test]
    fn test_cli_rejects_non_numeric_timeout() {
        assert!(Cli::try_parse_from(["check-your-submission", "--timeout", "soon"]).is_err());
    }

    #[test]
    fn test_cli_rejects_zero_timeout() {
        // `timeout 0` would disable the limit entirely.
        let err = Cli::try_parse_from(["check-your-submission", "--timeout", "0"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);

        let cli = Cli::try_parse_from(["check-your-submission", "--timeout", "1"]).unwrap();
        assert_eq!(cli.into_config().timeout_secs, 1);
    }

    #[tokio::test]
    async fn test_run_reports_missing_files() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("check-submission");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("wish.c"), b"int main(void) { return 0; }\n").unwrap();

        let report = run(CheckConfig::for_dir(&dir).without_delay()).await.unwrap();
        assert_eq!(report.exit_code(), 1);
    }
}
