//! Process-wide configuration read once from the environment.
//!
//! [`Config`] is built at startup and passed by reference to every command,
//! so nothing below `main` reads environment variables on its own.

use crate::core::error::{Result, StewardError};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_REPO_PATH: &str = "LOCAL_REPO_PATH";
pub const ENV_DOCS_DIR: &str = "DOCS_DIR";
pub const ENV_REMOTE: &str = "GIT_REMOTE";
pub const ENV_BRANCH: &str = "GIT_BRANCH";
pub const ENV_TYPESETTER: &str = "TYPESETTER";
pub const ENV_TYPESET_TIMEOUT: &str = "TYPESET_TIMEOUT_SECS";
pub const ENV_GITHUB_USERNAME: &str = "GITHUB_USERNAME";
pub const ENV_GITHUB_TOKEN: &str = "GITHUB_TOKEN";
pub const ENV_GITHUB_REPO: &str = "GITHUB_REPO";

const DEFAULT_DOCS_DIR: &str = "docs";
const DEFAULT_REMOTE: &str = "origin";
const DEFAULT_BRANCH: &str = "main";
const DEFAULT_TYPESETTER: &str = "pdflatex";
const DEFAULT_TYPESET_TIMEOUT_SECS: u64 = 60;

/// GitHub account details. Only carried for credential setup; none of the
/// commands read them.
#[derive(Clone, Default, Serialize)]
pub struct GithubConfig {
    pub username: Option<String>,
    #[serde(skip)]
    pub token: Option<String>,
    pub repo: Option<String>,
}

impl fmt::Debug for GithubConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GithubConfig")
            .field("username", &self.username)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("repo", &self.repo)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Config {
    pub repo_path: PathBuf,
    /// Docs directory, relative to `repo_path`
    pub docs_dir: PathBuf,
    pub remote: String,
    pub branch: String,
    pub typesetter: String,
    pub typeset_timeout: Duration,
    pub github: GithubConfig,
}

impl Config {
    /// Read configuration from the process environment.
    ///
    /// `repo_override` (the `--repo` flag) takes precedence over `LOCAL_REPO_PATH`.
    pub fn from_env(repo_override: Option<PathBuf>) -> Result<Self> {
        Self::from_lookup(repo_override, |key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(repo_override: Option<PathBuf>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Blank values count as unset
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let repo_path = match repo_override {
            Some(path) => path,
            None => get(ENV_REPO_PATH)
                .map(PathBuf::from)
                .ok_or_else(|| StewardError::missing_config(ENV_REPO_PATH))?,
        };
        let repo_path = resolve_repo_path(repo_path);

        let typeset_timeout = match get(ENV_TYPESET_TIMEOUT) {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(StewardError::invalid_config(ENV_TYPESET_TIMEOUT, raw)),
            },
            None => Duration::from_secs(DEFAULT_TYPESET_TIMEOUT_SECS),
        };

        let config = Config {
            repo_path,
            docs_dir: get(ENV_DOCS_DIR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DOCS_DIR)),
            remote: get(ENV_REMOTE).unwrap_or_else(|| DEFAULT_REMOTE.to_string()),
            branch: get(ENV_BRANCH).unwrap_or_else(|| DEFAULT_BRANCH.to_string()),
            typesetter: get(ENV_TYPESETTER).unwrap_or_else(|| DEFAULT_TYPESETTER.to_string()),
            typeset_timeout,
            github: GithubConfig {
                username: get(ENV_GITHUB_USERNAME),
                token: get(ENV_GITHUB_TOKEN),
                repo: get(ENV_GITHUB_REPO),
            },
        };

        log::debug!("Loaded configuration: {config:?}");
        Ok(config)
    }

    /// Defaults for everything except the repository path
    pub fn for_repo(repo_path: impl Into<PathBuf>) -> Self {
        Config {
            repo_path: resolve_repo_path(repo_path.into()),
            docs_dir: PathBuf::from(DEFAULT_DOCS_DIR),
            remote: DEFAULT_REMOTE.to_string(),
            branch: DEFAULT_BRANCH.to_string(),
            typesetter: DEFAULT_TYPESETTER.to_string(),
            typeset_timeout: Duration::from_secs(DEFAULT_TYPESET_TIMEOUT_SECS),
            github: GithubConfig::default(),
        }
    }

    /// Docs directory under the resolved repository path
    pub fn docs_path(&self) -> PathBuf {
        self.repo_path.join(&self.docs_dir)
    }
}

/// Canonical form of an existing repository path, so paths derived from it
/// stay valid whatever the working directory of spawned `git` processes.
/// A path that cannot be resolved is kept as given and rejected later by
/// `GitRepo::open`.
fn resolve_repo_path(path: PathBuf) -> PathBuf {
    match std::fs::canonicalize(&path) {
        Ok(resolved) => resolved,
        Err(e) => {
            log::debug!("Could not resolve {}: {e}", path.display());
            path
        }
    }
}
