//! Expected submission layouts.

use serde::{Deserialize, Serialize};

/// Course projects with a known submission layout.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Project {
    /// Project 0: the `wish` shell plus a Pintos patch.
    Project0,
}

impl Project {
    /// Get the project name as a string.
    pub fn name(&self) -> &'static str {
        match self {
            Project::Project0 => "project0",
        }
    }

    /// Files the submission archive must contain, in report order.
    pub fn required_files(&self) -> Vec<String> {
        match self {
            // <UT EID>-submission.zip
            //   wish.c
            //   pintos.patch
            Project::Project0 => vec!["wish.c".to_string(), "pintos.patch".to_string()],
        }
    }

    /// Name of the patch file among the required files.
    pub fn patch_file(&self) -> &'static str {
        match self {
            Project::Project0 => "pintos.patch",
        }
    }

    /// Directory name of the reference codebase the patch applies to.
    pub fn reference_name(&self) -> &'static str {
        match self {
            Project::Project0 => "aos_pintos",
        }
    }
}

/// The files a submission must contain and how to verify its patch.
///
/// Immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubmissionLayout {
    /// Required file names, in report order.
    required_files: Vec<String>,

    /// Which of the required files is the patch.
    patch_file: String,

    /// Directory name of the reference codebase.
    reference_name: String,
}

impl SubmissionLayout {
    /// Layout for a known project.
    pub fn for_project(project: Project) -> Self {
        Self {
            required_files: project.required_files(),
            patch_file: project.patch_file().to_string(),
            reference_name: project.reference_name().to_string(),
        }
    }

    /// Custom layout. The patch file is added to the required files if the
    /// caller left it out.
    pub fn custom(
        mut required_files: Vec<String>,
        patch_file: String,
        reference_name: String,
    ) -> Self {
        if !required_files.contains(&patch_file) {
            required_files.push(patch_file.clone());
        }
        Self {
            required_files,
            patch_file,
            reference_name,
        }
    }

    pub fn required_files(&self) -> &[String] {
        &self.required_files
    }

    pub fn patch_file(&self) -> &str {
        &self.patch_file
    }

    pub fn reference_name(&self) -> &str {
        &self.reference_name
    }
}

impl Default for SubmissionLayout {
    fn default() -> Self {
        Self::for_project(Project::Project0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project0_required_files() {
        let files = Project::Project0.required_files();
        assert_eq!(files, vec!["wish.c", "pintos.patch"]);
        assert!(files.contains(&Project::Project0.patch_file().to_string()));
    }

    #[test]
    fn test_default_layout_is_project0() {
        let layout = SubmissionLayout::default();
        assert_eq!(layout.required_files(), ["wish.c", "pintos.patch"]);
        assert_eq!(layout.patch_file(), "pintos.patch");
        assert_eq!(layout.reference_name(), "aos_pintos");
    }

    #[test]
    fn test_custom_layout_adds_patch_file() {
        let layout = SubmissionLayout::custom(
            vec!["main.c".to_string()],
            "fix.patch".to_string(),
            "base".to_string(),
        );
        assert_eq!(layout.required_files(), ["main.c", "fix.patch"]);
    }

    #[test]
    fn test_custom_layout_keeps_order() {
        let layout = SubmissionLayout::custom(
            vec!["fix.patch".to_string(), "main.c".to_string()],
            "fix.patch".to_string(),
            "base".to_string(),
        );
        assert_eq!(layout.required_files(), ["fix.patch", "main.c"]);
    }

    #[test]
    fn test_project_serde_name() {
        let json = serde_json::to_string(&Project::Project0).unwrap();
        assert_eq!(json, "\"project0\"");
    }
}
