//! Build-then-publish pipeline behind `repo-steward build`.

use crate::commands::{
    build::{build_all, print_build_report},
    publish::publish,
};
use crate::core::{
    config::Config,
    error::Result,
    git::GitRepo,
    output::{print_banner, print_error, print_info},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    pub push: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self { push: true }
    }
}

/// Run build → report → publish.
///
/// Returns `Ok(true)` only when every document built and publishing (if
/// requested) succeeded. Outputs that did build are still published when
/// others failed; with nothing built there is no publish attempt. Setup
/// errors (repository cannot be opened) are returned as `Err`.
pub fn run_pipeline(config: &Config, options: PipelineOptions) -> Result<bool> {
    let repo = GitRepo::open(&config.repo_path)?;
    print_info("Starting Documentation Pipeline...");

    let summary = build_all(config);
    let all_built = summary.all_succeeded();

    print_build_report(&summary);
    if !all_built {
        print_error("Some documents failed to build");
    }

    let outputs = summary.built_outputs();
    if outputs.is_empty() {
        return Ok(false);
    }

    if options.push {
        if let Err(e) = publish(&repo, config, &outputs) {
            print_error(&e.to_string());
            return Ok(false);
        }
    } else {
        log::info!("Skipping publish stage (--no-push)");
    }

    if all_built {
        print_banner("✓ Pipeline completed successfully!");
    }
    Ok(all_built)
}
