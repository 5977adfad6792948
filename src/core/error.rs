//! Domain-specific error types for repo-steward.
//!
//! [`StewardError`] separates the failure kinds callers need to branch on:
//! typesetter problems (missing binary, non-zero exit, timeout, missing
//! output), repository problems, git operation failures and rejected user
//! input. Messages are written for the console, since every error ends up
//! there through [`crate::core::output::print_error`].
//!
//! # Public API
//! - [`StewardError`]: Main error enum
//! - [`Result<T>`]: Type alias for `std::result::Result<T, StewardError>`
//! - [`WorkflowStep`]: Step of the composite add/commit/push workflow

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Step of the composite add → commit → push workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowStep {
    Add,
    Commit,
    Push,
}

impl fmt::Display for WorkflowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WorkflowStep::Add => "add",
            WorkflowStep::Commit => "commit",
            WorkflowStep::Push => "push",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum StewardError {
    // Typesetter errors
    #[error("{tool} not found. Install TeX Live or MiKTeX")]
    ToolNotFound { tool: String },

    #[error("{tool} exited with {}", exit_code_text(.code))]
    ToolFailed { tool: String, code: Option<i32> },

    #[error("{tool} timed out after {}s", whole_seconds(.timeout))]
    ToolTimeout { tool: String, timeout: Duration },

    #[error("Output not created: {path}")]
    OutputMissing { path: PathBuf },

    // Repository errors
    #[error("Not a git repository: {path}")]
    NotARepository { path: PathBuf },

    #[error("Repository has no working directory")]
    BareRepository,

    #[error("git {operation} failed: {message}")]
    GitOperation { operation: String, message: String },

    #[error("Git repository error: {0}")]
    Git(#[from] git2::Error),

    // Input and configuration errors
    #[error("{field} cannot be empty")]
    EmptyInput { field: String },

    #[error("{var} not set in environment")]
    MissingConfig { var: String },

    #[error("Invalid value for {var}: '{value}'")]
    InvalidConfig { var: String, value: String },

    #[error("Workflow aborted at {step} step: {source}")]
    Workflow {
        step: WorkflowStep,
        #[source]
        source: Box<StewardError>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results using StewardError
pub type Result<T> = std::result::Result<T, StewardError>;

fn exit_code_text(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "no exit code (killed by signal)".to_string(),
    }
}

fn whole_seconds(timeout: &Duration) -> u64 {
    timeout.as_secs()
}

impl StewardError {
    pub fn tool_not_found(tool: impl Into<String>) -> Self {
        Self::ToolNotFound { tool: tool.into() }
    }

    pub fn tool_failed(tool: impl Into<String>, code: Option<i32>) -> Self {
        Self::ToolFailed {
            tool: tool.into(),
            code,
        }
    }

    pub fn tool_timeout(tool: impl Into<String>, timeout: Duration) -> Self {
        Self::ToolTimeout {
            tool: tool.into(),
            timeout,
        }
    }

    pub fn output_missing(path: impl Into<PathBuf>) -> Self {
        Self::OutputMissing { path: path.into() }
    }

    pub fn not_a_repository(path: impl Into<PathBuf>) -> Self {
        Self::NotARepository { path: path.into() }
    }

    /// Create a git operation error from the command name and its stderr
    pub fn git_operation(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::GitOperation {
            operation: operation.into(),
            message: message.into(),
        }
    }

    pub fn empty_input(field: impl Into<String>) -> Self {
        Self::EmptyInput {
            field: field.into(),
        }
    }

    pub fn missing_config(var: impl Into<String>) -> Self {
        Self::MissingConfig { var: var.into() }
    }

    pub fn invalid_config(var: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidConfig {
            var: var.into(),
            value: value.into(),
        }
    }

    /// Wrap the error of a failed composite workflow step
    pub fn workflow(step: WorkflowStep, source: StewardError) -> Self {
        Self::Workflow {
            step,
            source: Box::new(source),
        }
    }

    /// True for errors that should stop the process before any work starts
    pub fn is_setup_error(&self) -> bool {
        matches!(
            self,
            Self::NotARepository { .. }
                | Self::BareRepository
                | Self::MissingConfig { .. }
                | Self::InvalidConfig { .. }
        )
    }
}
