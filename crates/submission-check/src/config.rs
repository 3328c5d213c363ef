//! Run configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::CheckResult;
use crate::layout::{Project, SubmissionLayout};

/// Default submission directory, relative to the working directory.
pub const DEFAULT_SUBMISSION_DIR: &str = "check-submission";

/// Default wall-clock limit for each external command (seconds).
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Default pause before any destructive step (seconds).
pub const DEFAULT_PRE_CHECK_DELAY_SECS: u64 = 9;

/// Resolved configuration for a single check run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckConfig {
    /// Project whose layout the submission must follow.
    pub project: Project,

    /// Submission directory root.
    pub dir: PathBuf,

    /// Whether report lines are written to the console.
    pub verbose: bool,

    /// Emit JSON log lines and a JSON report.
    pub json: bool,

    /// Limit for each external command (seconds).
    pub timeout_secs: u64,

    /// Pause before the checks start (0 = none).
    pub pre_check_delay_secs: u64,

    /// Reference codebase location. `None` means `<dir>/../<reference name>`.
    pub reference_dir: Option<PathBuf>,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            project: Project::Project0,
            dir: PathBuf::from(DEFAULT_SUBMISSION_DIR),
            verbose: false,
            json: false,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            pre_check_delay_secs: DEFAULT_PRE_CHECK_DELAY_SECS,
            reference_dir: None,
        }
    }
}

impl CheckConfig {
    /// Configuration for `dir` with every other field defaulted.
    pub fn for_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ..Self::default()
        }
    }

    /// Skip the pre-check pause.
    pub fn without_delay(mut self) -> Self {
        self.pre_check_delay_secs = 0;
        self
    }

    /// Directory holding the submission directory. Scratch copies are made
    /// from here.
    pub fn parent_dir(&self) -> PathBuf {
        parent_of(&self.dir)
    }

    /// Where the reference codebase for `layout` is read from.
    pub fn reference_path(&self, layout: &SubmissionLayout) -> PathBuf {
        match &self.reference_dir {
            Some(path) => path.clone(),
            None => self.parent_dir().join(layout.reference_name()),
        }
    }

    /// Pretty JSON dump, printed before a run for auditability.
    pub fn to_pretty_json(&self) -> CheckResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Parent of `dir`, treating a bare relative name as living in `.`.
pub(crate) fn parent_of(dir: &Path) -> PathBuf {
    match dir.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => dir.join(".."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CheckConfig::default();
        assert_eq!(config.dir, PathBuf::from("check-submission"));
        assert_eq!(config.timeout_secs, 20);
        assert_eq!(config.pre_check_delay_secs, 9);
        assert!(!config.verbose);
        assert!(config.reference_dir.is_none());
    }

    #[test]
    fn test_reference_path_is_sibling_of_dir() {
        let config = CheckConfig::for_dir("/srv/grading/check-submission");
        assert_eq!(
            config.reference_path(&SubmissionLayout::default()),
            PathBuf::from("/srv/grading/aos_pintos")
        );
    }

    #[test]
    fn test_reference_path_for_bare_relative_dir() {
        let config = CheckConfig::for_dir("check-submission");
        assert_eq!(
            config.reference_path(&SubmissionLayout::default()),
            PathBuf::from("check-submission/../aos_pintos")
        );
    }

    #[test]
    fn test_reference_path_override() {
        let mut config = CheckConfig::for_dir("/tmp/sub");
        config.reference_dir = Some(PathBuf::from("/opt/pintos"));
        assert_eq!(config.reference_path(&SubmissionLayout::default()), PathBuf::from("/opt/pintos"));
    }

    #[test]
    fn test_without_delay() {
        let config = CheckConfig::default().without_delay();
        assert_eq!(config.pre_check_delay_secs, 0);
    }

    #[test]
    fn test_pretty_json_lists_fields() {
        let json = CheckConfig::default().to_pretty_json().unwrap();
        assert!(json.contains("\"dir\": \"check-submission\""));
        assert!(json.contains("\"timeout_secs\": 20"));
        assert!(json.contains("\"project\": \"project0\""));
    }
}
