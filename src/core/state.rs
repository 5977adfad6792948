//! Transient records produced by the build and status commands.
//!
//! Nothing here is persisted between runs. Build results live until the
//! report is printed; status records are recomputed on every request.

use crate::core::error::StewardError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Outcome of one document build attempt
#[derive(Debug)]
pub struct BuildResult {
    pub source: PathBuf,
    pub output: PathBuf,
    pub size_bytes: u64,
    pub error: Option<StewardError>,
}

impl BuildResult {
    pub fn built(source: PathBuf, output: PathBuf, size_bytes: u64) -> Self {
        Self {
            source,
            output,
            size_bytes,
            error: None,
        }
    }

    pub fn failed(source: PathBuf, output: PathBuf, error: StewardError) -> Self {
        Self {
            source,
            output,
            size_bytes: 0,
            error: Some(error),
        }
    }

    /// Success means the output exists and was non-empty after the attempt
    pub fn success(&self) -> bool {
        self.error.is_none() && self.size_bytes > 0
    }

    pub fn output_name(&self) -> String {
        file_name_of(&self.output)
    }

    pub fn source_name(&self) -> String {
        file_name_of(&self.source)
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// All build results of one run, in build order
#[derive(Debug, Default)]
pub struct BuildSummary {
    pub results: Vec<BuildResult>,
}

impl BuildSummary {
    pub fn attempted(&self) -> usize {
        self.results.len()
    }

    pub fn built(&self) -> Vec<&BuildResult> {
        self.results.iter().filter(|r| r.success()).collect()
    }

    pub fn built_outputs(&self) -> Vec<PathBuf> {
        self.built().into_iter().map(|r| r.output.clone()).collect()
    }

    /// True only when there was work and every document built
    pub fn all_succeeded(&self) -> bool {
        !self.results.is_empty() && self.results.iter().all(BuildResult::success)
    }

    pub fn total_bytes(&self) -> u64 {
        self.built().iter().map(|r| r.size_bytes).sum()
    }
}

/// Repository summary, recomputed on every request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub timestamp: String,
    pub branch: String,
    pub dirty: bool,
    pub untracked_files: usize,
    pub total_commits: usize,
    pub last_commit: String,
    pub last_commit_author: String,
    pub remote_url: String,
}

impl StatusSnapshot {
    /// Ordered `(key, value)` pairs for plain-text rendering
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("timestamp", self.timestamp.clone()),
            ("branch", self.branch.clone()),
            ("dirty", self.dirty.to_string()),
            ("untracked_files", self.untracked_files.to_string()),
            ("total_commits", self.total_commits.to_string()),
            ("last_commit", self.last_commit.clone()),
            ("last_commit_author", self.last_commit_author.clone()),
            ("remote_url", self.remote_url.clone()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitEntry {
    pub hash: String,
    pub date: String,
    pub message: String,
    pub author: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchEntry {
    pub name: String,
    pub is_current: bool,
    pub commit: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Untracked,
    Modified,
}

impl ChangeKind {
    pub fn marker(&self) -> &'static str {
        match self {
            ChangeKind::Untracked => "?",
            ChangeKind::Modified => "M",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangedFile {
    pub kind: ChangeKind,
    pub path: PathBuf,
}
