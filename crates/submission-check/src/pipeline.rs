//! Submission check orchestration.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::info;

use crate::config::CheckConfig;
use crate::error::CheckResult;
use crate::layout::SubmissionLayout;
use crate::logger::Logger;
use crate::patch::PatchVerifier;
use crate::presence::check_presence;
use crate::runner::CommandRunner;
use crate::status::{CheckReport, CheckStatus};

/// Runs the presence check and, only if it passes, patch verification.
pub struct SubmissionCheck {
    config: CheckConfig,
    layout: SubmissionLayout,
    runner: Arc<dyn CommandRunner>,
    logger: Box<dyn Logger>,
}

impl SubmissionCheck {
    pub fn new(
        config: CheckConfig,
        runner: Arc<dyn CommandRunner>,
        logger: Box<dyn Logger>,
    ) -> Self {
        let layout = SubmissionLayout::for_project(config.project);
        Self {
            config,
            layout,
            runner,
            logger,
        }
    }

    /// Replace the project layout.
    pub fn with_layout(mut self, layout: SubmissionLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn config(&self) -> &CheckConfig {
        &self.config
    }

    /// Execute the check.
    ///
    /// Check failures are reported in the returned [`CheckReport`]; an `Err`
    /// means no verdict could be reached.
    pub async fn run(&self) -> CheckResult<CheckReport> {
        self.pre_check_delay().await;

        let checked_at = Utc::now();
        let start = Instant::now();
        let dir = &self.config.dir;

        info!(project = self.config.project.name(), dir = %dir.display(), "Checking submission");
        let (presence_report, presence) = check_presence(dir, &self.layout, self.logger.as_ref());

        let patch = match presence_report.located(self.layout.patch_file()) {
            Some(patch_file) if presence.passed() => {
                let verifier = PatchVerifier::new(
                    self.runner.clone(),
                    self.config.reference_path(&self.layout),
                    self.layout.reference_name(),
                    self.config.timeout_secs,
                );
                verifier.verify(dir, patch_file, self.logger.as_ref()).await?
            }
            _ => {
                info!("Skipping patch verification");
                CheckStatus::NotAttempted
            }
        };

        let report = CheckReport {
            presence,
            patch,
            checked_at,
            duration_ms: start.elapsed().as_millis() as u64,
        };
        info!(exit_code = report.exit_code(), "{}", report.summary());
        Ok(report)
    }

    /// Give the operator a moment to read the printed configuration before
    /// the scratch copy is replaced.
    async fn pre_check_delay(&self) {
        let secs = self.config.pre_check_delay_secs;
        for remaining in (1..=secs).rev() {
            info!(remaining, "Pre-check arguments");
            tokio::time::sleep(Duration::from_secs(1)).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::{MemoryLogger, RecordingRunner};
    use std::path::Path;
    use tempfile::tempdir;

    fn touch(path: &Path) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, b"x").unwrap();
    }

    fn check(dir: &Path, runner: Arc<RecordingRunner>) -> SubmissionCheck {
        let config = CheckConfig::for_dir(dir).without_delay();
        SubmissionCheck::new(config, runner, Box::new(MemoryLogger::new()))
    }

    #[tokio::test]
    async fn test_presence_failure_never_invokes_runner() {
        let root = tempdir().unwrap();
        let dir = root.path().join("check-submission");
        touch(&dir.join("wish.c"));

        let runner = Arc::new(RecordingRunner::succeeding());
        let report = check(&dir, runner.clone()).run().await.unwrap();

        assert!(report.presence.failed());
        assert_eq!(report.patch, CheckStatus::NotAttempted);
        assert_eq!(report.exit_code(), 1);
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_never_invokes_runner() {
        let root = tempdir().unwrap();
        let dir = root.path().join("check-submission");
        touch(&dir.join("a/wish.c"));
        touch(&dir.join("b/wish.c"));
        touch(&dir.join("pintos.patch"));

        let runner = Arc::new(RecordingRunner::succeeding());
        let report = check(&dir, runner.clone()).run().await.unwrap();

        match &report.presence {
            CheckStatus::Fail { reason } => assert!(reason.contains("Duplicated file(s)")),
            other => panic!("unexpected status {other:?}"),
        }
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_presence_pass_runs_verifier_with_located_patch() {
        let root = tempdir().unwrap();
        let dir = root.path().join("check-submission");
        touch(&dir.join("wish.c"));
        touch(&dir.join("nested/pintos.patch"));

        let runner = Arc::new(RecordingRunner::succeeding());
        let report = check(&dir, runner.clone()).run().await.unwrap();

        assert!(report.passed());
        assert_eq!(report.exit_code(), 0);
        let calls = runner.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls[1].command[3].ends_with("nested/pintos.patch"));
        assert!(calls[0].command[2].ends_with("aos_pintos"));
    }

    #[tokio::test]
    async fn test_patch_failure_maps_to_exit_code_two() {
        let root = tempdir().unwrap();
        let dir = root.path().join("check-submission");
        touch(&dir.join("wish.c"));
        touch(&dir.join("pintos.patch"));

        let runner = Arc::new(RecordingRunner::with_exit_codes(vec![0, 2]));
        let report = check(&dir, runner).run().await.unwrap();

        assert!(report.presence.passed());
        assert_eq!(report.patch, CheckStatus::fail("There was a problem patching."));
        assert_eq!(report.exit_code(), 2);
    }

    #[tokio::test]
    async fn test_custom_layout() {
        let root = tempdir().unwrap();
        let dir = root.path().join("sub");
        touch(&dir.join("main.c"));

        let runner = Arc::new(RecordingRunner::succeeding());
        let layout = SubmissionLayout::custom(
            vec!["main.c".to_string()],
            "fix.patch".to_string(),
            "base".to_string(),
        );
        let report = check(&dir, runner)
            .with_layout(layout)
            .run()
            .await
            .unwrap();

        match &report.presence {
            CheckStatus::Fail { reason } => assert_eq!(reason, "Missing file(s) fix.patch"),
            other => panic!("unexpected status {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_pre_check_delay_elapses() {
        let root = tempdir().unwrap();
        let dir = root.path().join("check-submission");
        let mut config = CheckConfig::for_dir(&dir);
        config.pre_check_delay_secs = 3;

        let check = SubmissionCheck::new(
            config,
            Arc::new(RecordingRunner::succeeding()),
            Box::new(MemoryLogger::new()),
        );
        let before = tokio::time::Instant::now();
        check.run().await.unwrap();
        assert!(before.elapsed() >= Duration::from_secs(3));
    }
}
