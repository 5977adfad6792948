//! Publish stage: commit generated PDFs and push them.
//!
//! Outputs are staged by exact path. Each PDF lives next to its source
//! under the docs directory, so there is one canonical location and no glob
//! overlap between root-level and nested outputs.

use crate::core::{
    config::Config,
    error::Result,
    git::GitRepo,
    output::{print_banner, print_step, print_success},
};
use std::path::PathBuf;

/// What the publish stage ended up doing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// Nothing differed from the last commit
    NoChanges,
    Pushed { message: String },
}

pub fn commit_message(built_count: usize) -> String {
    format!("Auto-build: Generated {built_count} PDF(s)")
}

/// Stage `outputs`, commit them if they differ from HEAD, then push.
///
/// Only `outputs` go into the commit; anything the user had staged before
/// stays staged. Any failure aborts the stage. A commit that was created before a failed
/// push is left in place.
pub fn publish(repo: &GitRepo, config: &Config, outputs: &[PathBuf]) -> Result<PublishOutcome> {
    print_banner("Pushing to GitHub");

    print_step("Adding PDF files...");
    repo.add_paths(outputs)?;

    if !repo.has_staged_changes(outputs)? {
        println!("No changes to commit");
        return Ok(PublishOutcome::NoChanges);
    }

    let message = commit_message(outputs.len());
    print_step(&format!("Committing: {message}"));
    repo.commit_paths(&message, outputs)?;

    print_step(&format!("Pushing {} to {}...", config.branch, config.remote));
    repo.push(&config.remote, &config.branch)?;

    print_success("Pushed successfully");
    Ok(PublishOutcome::Pushed { message })
}
