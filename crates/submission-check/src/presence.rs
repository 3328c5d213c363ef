//! File presence check.
//!
//! Every required file must appear exactly once anywhere in the submission
//! tree. Matching is by file name only; contents are never read.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::layout::SubmissionLayout;
use crate::logger::Logger;
use crate::status::CheckStatus;

/// Where each required file was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceReport {
    /// Required name and every matching path, in layout order.
    found: Vec<(String, Vec<PathBuf>)>,
}

impl PresenceReport {
    /// Required names with no match.
    pub fn missing(&self) -> Vec<&str> {
        self.found
            .iter()
            .filter(|(_, paths)| paths.is_empty())
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Required names with more than one match, with their paths.
    pub fn duplicated(&self) -> Vec<(&str, &[PathBuf])> {
        self.found
            .iter()
            .filter(|(_, paths)| paths.len() > 1)
            .map(|(name, paths)| (name.as_str(), paths.as_slice()))
            .collect()
    }

    /// The single location of `name`, if it was found exactly once.
    pub fn located(&self, name: &str) -> Option<&Path> {
        self.found
            .iter()
            .find(|(n, _)| n == name)
            .and_then(|(_, paths)| match paths.as_slice() {
                [only] => Some(only.as_path()),
                _ => None,
            })
    }

    /// Whether every required name was found exactly once.
    pub fn passed(&self) -> bool {
        self.found.iter().all(|(_, paths)| paths.len() == 1)
    }

    /// Combined failure message, or `None` when the check passed.
    ///
    /// `Missing file(s) a,b AND Duplicated file(s) x/c,y/c`
    pub fn message(&self) -> Option<String> {
        let missing = self.missing().join(",");
        let duplicated = self
            .duplicated()
            .iter()
            .flat_map(|(_, paths)| paths.iter().map(|p| p.display().to_string()))
            .collect::<Vec<_>>()
            .join(",");

        let mut message = String::new();
        if !missing.is_empty() {
            message.push_str("Missing file(s) ");
            message.push_str(&missing);
        }
        if !duplicated.is_empty() {
            if !message.is_empty() {
                message.push_str(" AND ");
            }
            message.push_str("Duplicated file(s) ");
            message.push_str(&duplicated);
        }

        if message.is_empty() {
            None
        } else {
            Some(message)
        }
    }

    /// Convert to a check status.
    pub fn status(&self) -> CheckStatus {
        match self.message() {
            None => CheckStatus::pass("Your submission has the necessary files."),
            Some(reason) => CheckStatus::fail(reason),
        }
    }
}

/// Search `dir` recursively for every file the layout requires.
pub fn find_required_files(dir: &Path, layout: &SubmissionLayout) -> PresenceReport {
    let mut found: Vec<(String, Vec<PathBuf>)> = layout
        .required_files()
        .iter()
        .map(|name| (name.clone(), Vec::new()))
        .collect();

    for path in walk_files(dir) {
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if let Some((_, paths)) = found.iter_mut().find(|(name, _)| name == file_name) {
            debug!(path = %path.display(), "Found required file");
            paths.push(path);
        }
    }

    PresenceReport { found }
}

/// Run the presence check and write its verdict line.
pub fn check_presence(
    dir: &Path,
    layout: &SubmissionLayout,
    logger: &dyn Logger,
) -> (PresenceReport, CheckStatus) {
    let report = find_required_files(dir, layout);
    let status = report.status();
    match &status {
        CheckStatus::Pass { message } => logger.write_line(&format!("[PASS] {message}")),
        CheckStatus::Fail { reason } => logger.write_line(&format!("[ERROR] {reason}")),
        CheckStatus::NotAttempted => {}
    }
    (report, status)
}

/// Every non-directory entry under `dir`, depth first, sorted per directory.
///
/// Symlinked directories are not followed. Directories that cannot be read
/// are skipped.
fn walk_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "Skipping unreadable directory");
            return files;
        }
    };

    let mut entries: Vec<_> = entries.filter_map(Result::ok).collect();
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let path = entry.path();
        match entry.file_type() {
            Ok(file_type) if file_type.is_dir() => files.extend(walk_files(&path)),
            Ok(file_type) if file_type.is_symlink() && points_to_dir(&path) => {
                debug!(path = %path.display(), "Not following directory symlink");
            }
            Ok(_) => files.push(path),
            Err(e) => warn!(path = %path.display(), error = %e, "Skipping unreadable entry"),
        }
    }

    files
}

/// Whether a symlink resolves to a directory. Dangling links count as files.
fn points_to_dir(path: &Path) -> bool {
    std::fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false)
}
