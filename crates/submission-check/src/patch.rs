//! Patch verification against a fresh copy of the reference codebase.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};

use crate::config::parent_of;
use crate::error::{CheckError, CheckResult};
use crate::logger::Logger;
use crate::runner::{CommandRunner, CommandSpec};
use crate::status::CheckStatus;

/// Copies the reference codebase into the submission directory and applies
/// the submitted patch to it.
pub struct PatchVerifier {
    runner: Arc<dyn CommandRunner>,
    reference_dir: PathBuf,
    /// Directory name of the copy inside the submission; `-p0` patch paths
    /// start with it regardless of where the reference lives.
    scratch_name: String,
    timeout_secs: u64,
}

impl PatchVerifier {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        reference_dir: PathBuf,
        scratch_name: impl Into<String>,
        timeout_secs: u64,
    ) -> Self {
        Self {
            runner,
            reference_dir,
            scratch_name: scratch_name.into(),
            timeout_secs,
        }
    }

    /// Verify that `patch_file` applies cleanly to a fresh copy of the
    /// reference codebase inside `dir`.
    ///
    /// Both steps run under the timeout wrapper. A failed copy means the
    /// patch is never attempted.
    pub async fn verify(
        &self,
        dir: &Path,
        patch_file: &Path,
        logger: &dyn Logger,
    ) -> CheckResult<CheckStatus> {
        if !dir.is_dir() {
            return Err(CheckError::InvalidDirectory(dir.to_path_buf()));
        }
        if !patch_file.exists() {
            return Err(CheckError::InvalidPatchFile(patch_file.to_path_buf()));
        }

        let dir = tokio::fs::canonicalize(dir).await?;
        let patch_file = tokio::fs::canonicalize(patch_file).await?;

        let status = match self.fresh_checkout(&dir).await? {
            Some(failure) => failure,
            None => self.apply_patch(&dir, &patch_file).await?,
        };

        logger.write_line(&status.line());
        Ok(status)
    }

    /// Replace `<dir>/<scratch>` with a copy of the reference codebase.
    /// The stale copy is removed first so `cp -r` creates the target fresh.
    /// Returns the failure status if the copy did not succeed.
    async fn fresh_checkout(&self, dir: &Path) -> CheckResult<Option<CheckStatus>> {
        let copy_failed = || {
            CheckStatus::fail(format!(
                "There was a problem copying fresh codebase ({}).",
                self.scratch_name
            ))
        };

        let scratch = dir.join(&self.scratch_name);
        if scratch.exists() {
            warn!(scratch = %scratch.display(), "Removing previous scratch copy");
            if let Err(e) = tokio::fs::remove_dir_all(&scratch).await {
                warn!(scratch = %scratch.display(), error = %e, "Could not remove scratch copy");
                return Ok(Some(copy_failed()));
            }
        }

        let reference = if self.reference_dir.is_relative() {
            std::env::current_dir()?.join(&self.reference_dir)
        } else {
            self.reference_dir.clone()
        };

        info!(reference = %reference.display(), "Copying fresh codebase");
        let spec = CommandSpec::new(
            "copy",
            vec![
                "cp".to_string(),
                "-r".to_string(),
                reference.display().to_string(),
                scratch.display().to_string(),
            ],
            parent_of(dir),
            self.timeout_secs,
        );
        let outcome = self.runner.run(&spec).await?;
        if !outcome.success() {
            warn!(
                exit_code = outcome.exit_code,
                duration_ms = outcome.duration_ms,
                output = %outcome.output.trim_end(),
                "Copy failed"
            );
            return Ok(Some(copy_failed()));
        }

        Ok(None)
    }

    /// `patch -p0 -i <patch>` from inside the submission directory.
    async fn apply_patch(&self, dir: &Path, patch_file: &Path) -> CheckResult<CheckStatus> {
        info!(patch = %patch_file.display(), "Applying patch");
        let spec = CommandSpec::new(
            "patch",
            vec![
                "patch".to_string(),
                "-p0".to_string(),
                "-i".to_string(),
                patch_file.display().to_string(),
            ],
            dir.to_path_buf(),
            self.timeout_secs,
        );
        let outcome = self.runner.run(&spec).await?;
        if !outcome.success() {
            warn!(
                exit_code = outcome.exit_code,
                duration_ms = outcome.duration_ms,
                output = %outcome.output.trim_end(),
                "Patch failed"
            );
            return Ok(CheckStatus::fail("There was a problem patching."));
        }

        Ok(CheckStatus::pass("Patch was successful."))
    }
}
