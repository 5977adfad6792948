//! Repo Steward - build LaTeX documentation, publish it, and run routine git
//! maintenance from one command-line tool.
//!
//! Every operation delegates to an external tool: the `git` command line
//! (with `git2` for read-only queries) and a typesetting program such as
//! `pdflatex`. This crate adds the orchestration, reporting and error
//! classification around them.
//!
//! # Public API
//! The main interface is re-exported from the [`core`] module:
//! - [`Config`]: configuration read once from the environment
//! - [`GitRepo`]: repository handle
//! - [`Typesetter`]: time-limited typesetter invocation
//! - [`StewardError`] / [`Result`]: error taxonomy
//!
//! The [`commands`] module holds the build, publish, status and console
//! entry points.

pub mod commands;
pub mod core;

pub use crate::core::{
    // Build and status records
    BranchEntry,
    BuildResult,
    BuildSummary,
    ChangedFile,
    CommitEntry,
    // Configuration
    Config,
    // Git operations
    GitRepo,
    Result,
    StatusSnapshot,
    // Error handling
    StewardError,
    // Typesetting
    Typesetter,
    WorkflowStep,
};
