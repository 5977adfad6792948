//! Git repository setup utilities
//!
//! Creates throwaway repositories (and bare remotes) so tests exercise the
//! real `git` binary.

#![allow(dead_code)]

use repo_steward::core::error::{Result, StewardError};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Test repository. The TempDir must stay alive for the whole test.
pub struct TestRepo {
    pub temp_dir: TempDir,
    pub path: PathBuf,
}

impl TestRepo {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Bare repository used as `origin`
pub struct TestRemote {
    pub temp_dir: TempDir,
    pub path: PathBuf,
}

/// Run git in `dir` and return trimmed stdout; fails on non-zero exit
pub fn git(dir: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new("git").args(args).current_dir(dir).output()?;
    if !output.status.success() {
        return Err(StewardError::git_operation(
            args.first().copied().unwrap_or("git"),
            String::from_utf8_lossy(&output.stderr).trim(),
        ));
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Fresh repository on branch `main` with a local identity configured
pub fn setup_test_repo() -> Result<TestRepo> {
    let temp_dir = TempDir::new()?;
    let repo_path = temp_dir.path().to_path_buf();

    git(&repo_path, &["init", "--initial-branch=main"])?;
    git(&repo_path, &["config", "user.name", "Test User"])?;
    git(&repo_path, &["config", "user.email", "test@example.com"])?;
    git(&repo_path, &["config", "commit.gpgsign", "false"])?;

    Ok(TestRepo {
        temp_dir,
        path: repo_path,
    })
}

/// Repository with one commit containing `README.md`
pub fn setup_test_repo_with_initial_commit() -> Result<TestRepo> {
    let repo = setup_test_repo()?;
    create_file(&repo.path, "README.md", "# Docs\n")?;
    git_add(&repo.path, "README.md")?;
    git_commit(&repo.path, "Initial commit")?;
    Ok(repo)
}

/// Create a bare repository and register it as `origin` of `repo`
pub fn add_bare_remote(repo: &TestRepo) -> Result<TestRemote> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("origin.git");
    fs::create_dir_all(&path)?;
    git(&path, &["init", "--bare", "--initial-branch=main"])?;
    let url = path.to_string_lossy().into_owned();
    git(&repo.path, &["remote", "add", "origin", &url])?;
    Ok(TestRemote { temp_dir, path })
}

/// Write a file, creating parent directories as needed
pub fn create_file(repo_path: &Path, relative: &str, content: &str) -> Result<()> {
    let path = repo_path.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

pub fn git_add(repo_path: &Path, pathspec: &str) -> Result<()> {
    git(repo_path, &["add", pathspec])?;
    Ok(())
}

pub fn git_commit(repo_path: &Path, message: &str) -> Result<()> {
    git(repo_path, &["commit", "-m", message])?;
    Ok(())
}

pub fn commit_count(repo_path: &Path) -> Result<usize> {
    match git(repo_path, &["rev-list", "--count", "HEAD"]) {
        Ok(count) => Ok(count.parse().unwrap_or(0)),
        // Unborn HEAD
        Err(_) => Ok(0),
    }
}

pub fn head_message(repo_path: &Path) -> Result<String> {
    git(repo_path, &["log", "-1", "--format=%s"])
}

/// Paths tracked in HEAD
pub fn files_in_head(repo_path: &Path) -> Result<Vec<String>> {
    let listing = git(repo_path, &["ls-tree", "-r", "--name-only", "HEAD"])?;
    Ok(listing.lines().map(str::to_string).collect())
}

/// Whether `refname` (e.g. `refs/heads/main`) exists in the repository at `path`
pub fn has_ref(path: &Path, refname: &str) -> bool {
    git(path, &["rev-parse", "--verify", "--quiet", refname]).is_ok()
}

pub fn rev_parse(path: &Path, rev: &str) -> Result<String> {
    git(path, &["rev-parse", rev])
}
