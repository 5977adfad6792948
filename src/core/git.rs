//! Git repository operations.
//!
//! [`GitRepo`] reads repository metadata through `git2` and performs every
//! mutating operation (add, commit, push, pull, branch, checkout, tag) by
//! running the `git` command line in the repository's working directory, so
//! hooks, credential helpers and user configuration apply exactly as they
//! would in a shell.
//!
//! # Public API
//! - [`GitRepo`]: Handle opened once per run at the configured path

use crate::core::{
    error::{Result, StewardError},
    state::{BranchEntry, ChangeKind, ChangedFile, CommitEntry},
};
use git2::{BranchType, DiffOptions, ErrorCode, Repository, Status, StatusOptions};
use std::ffi::OsStr;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;

const SHORT_HASH_LEN: usize = 7;

pub struct GitRepo {
    repo: Repository,
}

impl GitRepo {
    /// Open an existing repository rooted at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let repo = Repository::open(path).map_err(|e| {
            log::debug!("Failed to open repository at {}: {e}", path.display());
            StewardError::not_a_repository(path)
        })?;
        if repo.is_bare() {
            return Err(StewardError::BareRepository);
        }
        Ok(GitRepo { repo })
    }

    pub fn workdir(&self) -> Result<&Path> {
        self.repo.workdir().ok_or(StewardError::BareRepository)
    }

    /// `path` relative to the working directory, as `git` and `git2`
    /// pathspecs expect. Relative input is taken as already workdir-relative.
    fn pathspec(&self, path: &Path) -> Result<PathBuf> {
        let workdir = self.workdir()?;
        if let Ok(relative) = path.strip_prefix(workdir) {
            return Ok(relative.to_path_buf());
        }
        if path.is_relative() {
            return Ok(path.to_path_buf());
        }
        // Symlinked spellings of the same directory
        let resolved = std::fs::canonicalize(path)?;
        let workdir = std::fs::canonicalize(workdir)?;
        Ok(resolved
            .strip_prefix(&workdir)
            .map(Path::to_path_buf)
            .unwrap_or(resolved))
    }

    fn pathspecs(&self, paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
        paths.iter().map(|path| self.pathspec(path)).collect()
    }

    /// Run `git <args>` in the working directory and return its stdout
    fn execute_git_command<I, S>(&self, operation: &str, args: I) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let workdir = self.workdir()?;
        let mut cmd = Command::new("git");
        cmd.args(args).current_dir(workdir);
        log::debug!("Running {cmd:?}");

        let output = cmd.output().map_err(|e| match e.kind() {
            ErrorKind::NotFound => StewardError::tool_not_found("git"),
            _ => StewardError::Io(e),
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            // `git commit` reports "nothing to commit" on stdout
            let message = if stderr.is_empty() { stdout } else { stderr };
            return Err(StewardError::git_operation(operation, message));
        }

        Ok(stdout)
    }

    /// Stage every change in the working tree, including deletions
    pub fn add_all(&self) -> Result<()> {
        self.execute_git_command("add", ["add", "-A"])?;
        Ok(())
    }

    /// Stage specific paths (absolute or relative to the working directory)
    pub fn add_paths(&self, paths: &[PathBuf]) -> Result<()> {
        if paths.is_empty() {
            return Ok(());
        }
        let specs = self.pathspecs(paths)?;
        let mut args: Vec<&OsStr> = vec![OsStr::new("add"), OsStr::new("--")];
        args.extend(specs.iter().map(|p| p.as_os_str()));
        self.execute_git_command("add", args)?;
        Ok(())
    }

    /// Commit everything in the index
    pub fn commit(&self, message: &str) -> Result<()> {
        self.execute_git_command("commit", ["commit", "-m", message])?;
        Ok(())
    }

    /// Commit only `paths`; anything else already staged stays staged and
    /// out of the commit
    pub fn commit_paths(&self, message: &str, paths: &[PathBuf]) -> Result<()> {
        let specs = self.pathspecs(paths)?;
        let mut args: Vec<&OsStr> = vec![
            OsStr::new("commit"),
            OsStr::new("-m"),
            OsStr::new(message),
            OsStr::new("--only"),
            OsStr::new("--"),
        ];
        args.extend(specs.iter().map(|p| p.as_os_str()));
        self.execute_git_command("commit", args)?;
        Ok(())
    }

    /// Push a branch or tag to the named remote
    pub fn push(&self, remote: &str, refname: &str) -> Result<()> {
        self.execute_git_command("push", ["push", remote, refname])?;
        Ok(())
    }

    pub fn pull(&self, remote: &str, branch: &str) -> Result<()> {
        self.execute_git_command("pull", ["pull", remote, branch])?;
        Ok(())
    }

    /// Create a branch at HEAD without switching to it
    pub fn create_branch(&self, branch_name: &str) -> Result<()> {
        self.execute_git_command("branch", ["branch", branch_name])?;
        Ok(())
    }

    pub fn checkout_branch(&self, branch_name: &str) -> Result<()> {
        self.execute_git_command("checkout", ["checkout", branch_name])?;
        Ok(())
    }

    /// Create a lightweight tag at HEAD
    pub fn create_tag(&self, tag_name: &str) -> Result<()> {
        self.execute_git_command("tag", ["tag", tag_name])?;
        Ok(())
    }

    /// True when the index differs from the last commit for any of `paths`,
    /// or anywhere when `paths` is empty.
    ///
    /// On an unborn branch every matching index entry counts as a staged
    /// change.
    pub fn has_staged_changes(&self, paths: &[PathBuf]) -> Result<bool> {
        let head_tree = match self.repo.head() {
            Ok(head) => Some(head.peel_to_tree()?),
            Err(e) if is_unborn(&e) => None,
            Err(e) => return Err(e.into()),
        };
        let mut index = self.repo.index()?;
        // Pick up changes made by the git CLI since the index was loaded
        index.read(false)?;

        let mut opts = DiffOptions::new();
        opts.disable_pathspec_match(true);
        for spec in self.pathspecs(paths)? {
            opts.pathspec(spec);
        }
        let diff = self
            .repo
            .diff_tree_to_index(head_tree.as_ref(), Some(&index), Some(&mut opts))?;
        Ok(diff.deltas().len() > 0)
    }

    /// Tracked files differ from HEAD in the index or working tree
    pub fn is_dirty(&self) -> Result<bool> {
        let mut opts = StatusOptions::new();
        opts.include_untracked(false).include_ignored(false);
        let statuses = self.repo.statuses(Some(&mut opts))?;
        Ok(statuses.iter().any(|entry| entry.status() != Status::CURRENT))
    }

    pub fn untracked_files(&self) -> Result<Vec<PathBuf>> {
        let mut opts = StatusOptions::new();
        opts.include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false);
        let statuses = self.repo.statuses(Some(&mut opts))?;
        let files = statuses
            .iter()
            .filter(|entry| entry.status().contains(Status::WT_NEW))
            .filter_map(|entry| entry.path().map(PathBuf::from))
            .collect();
        Ok(files)
    }

    /// Up to `limit` changed files: untracked first, then tracked files
    /// modified against HEAD
    pub fn changed_files(&self, limit: usize) -> Result<Vec<ChangedFile>> {
        let mut changes: Vec<ChangedFile> = self
            .untracked_files()?
            .into_iter()
            .take(limit)
            .map(|path| ChangedFile {
                kind: ChangeKind::Untracked,
                path,
            })
            .collect();

        let mut opts = StatusOptions::new();
        opts.include_untracked(false).include_ignored(false);
        let statuses = self.repo.statuses(Some(&mut opts))?;
        for entry in statuses.iter() {
            if changes.len() >= limit {
                break;
            }
            if entry.status() == Status::CURRENT {
                continue;
            }
            if let Some(path) = entry.path() {
                changes.push(ChangedFile {
                    kind: ChangeKind::Modified,
                    path: PathBuf::from(path),
                });
            }
        }

        Ok(changes)
    }

    /// Current branch name, including unborn branches; `detached at <hash>`
    /// when HEAD is detached
    pub fn current_branch(&self) -> Result<String> {
        match self.repo.head() {
            Ok(head) => {
                if head.is_branch() {
                    Ok(head.shorthand().unwrap_or("-none-").to_string())
                } else {
                    let hash = head.target().map(short_hash).unwrap_or_default();
                    Ok(format!("detached at {hash}"))
                }
            }
            Err(e) if is_unborn(&e) => {
                let head_ref = self.repo.find_reference("HEAD")?;
                let target = head_ref.symbolic_target().unwrap_or("-none-");
                Ok(target.trim_start_matches("refs/heads/").to_string())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Number of commits reachable from HEAD
    pub fn commit_count(&self) -> Result<usize> {
        let mut revwalk = self.repo.revwalk()?;
        match revwalk.push_head() {
            Ok(()) => {}
            Err(e) if is_unborn(&e) => return Ok(0),
            Err(e) => return Err(e.into()),
        }
        let mut count = 0;
        for oid in revwalk {
            oid?;
            count += 1;
        }
        Ok(count)
    }

    /// Full message and author name of the HEAD commit
    pub fn head_commit(&self) -> Result<Option<(String, String)>> {
        let head = match self.repo.head() {
            Ok(head) => head,
            Err(e) if is_unborn(&e) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let commit = head.peel_to_commit()?;
        let message = commit.message().unwrap_or("").trim().to_string();
        let author = commit.author().name().unwrap_or("unknown").to_string();
        Ok(Some((message, author)))
    }

    /// URL of the first configured remote
    pub fn first_remote_url(&self) -> Result<Option<String>> {
        let remotes = self.repo.remotes()?;
        let Some(name) = remotes.iter().flatten().next() else {
            return Ok(None);
        };
        let remote = self.repo.find_remote(name)?;
        Ok(remote.url().map(str::to_string))
    }

    /// Up to `limit` most recent commits reachable from HEAD
    pub fn recent_commits(&self, limit: usize) -> Result<Vec<CommitEntry>> {
        let mut revwalk = self.repo.revwalk()?;
        match revwalk.push_head() {
            Ok(()) => {}
            Err(e) if is_unborn(&e) => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        }

        let mut commits = Vec::with_capacity(limit);
        for oid in revwalk.take(limit) {
            let commit = self.repo.find_commit(oid?)?;
            let date = chrono::DateTime::from_timestamp(commit.time().seconds(), 0)
                .map(|utc| utc.with_timezone(&chrono::Local).to_rfc3339())
                .unwrap_or_default();
            let first_line = commit
                .message()
                .unwrap_or("")
                .trim()
                .lines()
                .next()
                .unwrap_or("")
                .to_string();
            commits.push(CommitEntry {
                hash: short_hash(commit.id()),
                date,
                message: truncate_chars(&first_line, 60),
                author: commit.author().name().unwrap_or("unknown").to_string(),
            });
        }
        Ok(commits)
    }

    /// Local branches with the commit each one points at
    pub fn branches(&self) -> Result<Vec<BranchEntry>> {
        let mut entries = Vec::new();
        for branch in self.repo.branches(Some(BranchType::Local))? {
            let (branch, _) = branch?;
            let Some(name) = branch.name()? else {
                log::warn!("Skipping branch with non UTF-8 name");
                continue;
            };
            entries.push(BranchEntry {
                name: name.to_string(),
                is_current: branch.is_head(),
                commit: branch.get().target().map(short_hash).unwrap_or_default(),
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }
}

fn is_unborn(error: &git2::Error) -> bool {
    matches!(error.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound)
}

fn short_hash(oid: git2::Oid) -> String {
    oid.to_string()[..SHORT_HASH_LEN].to_string()
}

/// Truncate to at most `max` characters without splitting a code point
pub fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
