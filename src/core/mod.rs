//! Core functionality for repo-steward.
//!
//! This module provides the building blocks the commands are assembled
//! from: configuration, error handling, the git repository handle, the
//! typesetter runner, transient state records and console output.

pub mod config;
pub mod error;
pub mod git;
pub mod output;
pub mod state;
pub mod typeset;

// === Error handling ===
pub use error::{Result, StewardError, WorkflowStep};

// === Configuration ===
pub use config::Config;

// === Git operations ===
pub use git::GitRepo;

// === Typesetting ===
pub use typeset::Typesetter;

// === Transient state ===
pub use state::{
    BranchEntry, BuildResult, BuildSummary, ChangeKind, ChangedFile, CommitEntry, StatusSnapshot,
};

// === Output formatting ===
pub use output::{
    print_banner, print_error, print_info, print_section_header, print_step, print_step_failed,
    print_step_ok, print_success,
};
