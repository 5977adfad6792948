//! Status reporter: console report plus JSON and plain-text exports.

use crate::core::{
    error::Result,
    git::{truncate_chars, GitRepo},
    output::print_success,
    state::{BranchEntry, ChangedFile, CommitEntry, StatusSnapshot},
};
use colored::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_JSON_EXPORT: &str = "repo_status.json";
pub const DEFAULT_TEXT_EXPORT: &str = "repo_status.txt";
pub const EXPORT_HISTORY_LIMIT: usize = 10;
pub const CHANGED_FILES_LIMIT: usize = 10;
const LAST_COMMIT_MAX_CHARS: usize = 100;
const RULE_WIDTH: usize = 70;

/// Everything the JSON export contains
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusReport {
    pub summary: StatusSnapshot,
    pub history: Vec<CommitEntry>,
    pub branches: Vec<BranchEntry>,
    pub changes: Vec<ChangedFile>,
}

pub fn snapshot(repo: &GitRepo) -> Result<StatusSnapshot> {
    let (last_commit, last_commit_author) = match repo.head_commit()? {
        Some((message, author)) => (truncate_chars(&message, LAST_COMMIT_MAX_CHARS), author),
        None => ("- no commits yet -".to_string(), "N/A".to_string()),
    };

    Ok(StatusSnapshot {
        timestamp: chrono::Local::now().to_rfc3339(),
        branch: repo.current_branch()?,
        dirty: repo.is_dirty()?,
        untracked_files: repo.untracked_files()?.len(),
        total_commits: repo.commit_count()?,
        last_commit,
        last_commit_author,
        remote_url: repo.first_remote_url()?.unwrap_or_else(|| "N/A".to_string()),
    })
}

pub fn collect_report(repo: &GitRepo, history_limit: usize) -> Result<StatusReport> {
    Ok(StatusReport {
        summary: snapshot(repo)?,
        history: repo.recent_commits(history_limit)?,
        branches: repo.branches()?,
        changes: repo.changed_files(CHANGED_FILES_LIMIT)?,
    })
}

/// Render the console report for `repo_path`
pub fn render_report(report: &StatusReport, repo_path: &Path) -> String {
    let summary = &report.summary;
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = Vec::new();

    out.push(String::new());
    out.push(rule.bright_black().to_string());
    out.push("REPOSITORY MONITOR".blue().bold().to_string());
    out.push(rule.bright_black().to_string());

    out.push(section("REPOSITORY INFO"));
    out.push(format!("  Path: {}", repo_path.display()));
    out.push(format!("  Remote: {}", summary.remote_url));
    out.push(format!("  Timestamp: {}", summary.timestamp));

    out.push(section("BRANCH INFO"));
    out.push(format!("  Current Branch: {}", summary.branch.blue()));
    out.push(format!("  Total Commits: {}", summary.total_commits));
    let state = if summary.dirty {
        "Dirty (has changes)".red()
    } else {
        "Clean".green()
    };
    out.push(format!("  Status: {state}"));
    out.push(format!("  Untracked Files: {}", summary.untracked_files));

    out.push(section("LAST COMMIT"));
    out.push(format!("  Author: {}", summary.last_commit_author));
    out.push(format!("  Message: {}", summary.last_commit));

    out.push(section("BRANCHES"));
    for branch in &report.branches {
        let marker = if branch.is_current { "▶ " } else { "  " };
        out.push(format!("  {marker}{} ({})", branch.name, branch.commit.bright_black()));
    }

    out.push(section("RECENT COMMITS"));
    for (i, commit) in report.history.iter().enumerate() {
        out.push(format!("  {}. {} - {}", i + 1, commit.hash.yellow(), commit.message));
        let day = commit.date.get(..10).unwrap_or(&commit.date);
        out.push(format!("     {} ({day})", commit.author.bright_black()));
    }

    if !report.changes.is_empty() {
        out.push(section("CHANGED FILES"));
        for change in &report.changes {
            out.push(format!("  {} {}", change.kind.marker(), change.path.display()));
        }
    }

    out.push(String::new());
    out.push(rule.bright_black().to_string());
    out.join("\n")
}

fn section(title: &str) -> String {
    format!("\n{}", format!("{title}:").white().bold())
}

/// Pretty-printed JSON of the whole report; overwrites `path`
pub fn export_json(report: &StatusReport, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json)?;
    log::debug!("Wrote JSON status export to {}", path.display());
    Ok(())
}

/// Plain-text summary plus recent commits; overwrites `path`
pub fn export_text(report: &StatusReport, path: &Path) -> Result<()> {
    fs::write(path, render_text_export(report))?;
    log::debug!("Wrote text status export to {}", path.display());
    Ok(())
}

pub fn render_text_export(report: &StatusReport) -> String {
    let mut text = String::new();
    text.push_str("REPOSITORY STATUS\n");
    text.push_str(&"=".repeat(RULE_WIDTH));
    text.push_str("\n\nSUMMARY:\n");
    for (key, value) in report.summary.fields() {
        text.push_str(&format!("  {key}: {value}\n"));
    }
    text.push_str("\n\nRECENT COMMITS:\n");
    for commit in &report.history {
        text.push_str(&format!("  {} - {}\n", commit.hash, commit.message));
    }
    text
}

#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    pub history: usize,
    pub json: Option<std::path::PathBuf>,
    pub text: Option<std::path::PathBuf>,
}

/// `repo-steward status`: print the report and write any requested exports
pub fn execute_status(repo: &GitRepo, repo_path: &Path, options: &ReportOptions) -> Result<()> {
    let report = collect_report(repo, options.history)?;
    println!("{}\n", render_report(&report, repo_path));

    if options.json.is_none() && options.text.is_none() {
        return Ok(());
    }

    // Exports always carry the longer history
    let export = if options.history >= EXPORT_HISTORY_LIMIT {
        report
    } else {
        StatusReport {
            history: repo.recent_commits(EXPORT_HISTORY_LIMIT)?,
            ..report
        }
    };

    if let Some(path) = &options.json {
        export_json(&export, path)?;
        print_success(&format!("Exported to {}", path.display()));
    }
    if let Some(path) = &options.text {
        export_text(&export, path)?;
        print_success(&format!("Exported to {}", path.display()));
    }
    Ok(())
}
