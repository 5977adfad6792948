//! Predicates for CLI output

#![allow(dead_code)]

use predicates::prelude::*;

pub fn not_a_repository() -> impl Predicate<str> {
    predicates::str::contains("Not a git repository")
}

pub fn missing_repo_path() -> impl Predicate<str> {
    predicates::str::contains("LOCAL_REPO_PATH not set")
}

pub fn setup_hint() -> impl Predicate<str> {
    predicates::str::contains("Point LOCAL_REPO_PATH (or --repo) at a non-bare git working tree")
}

pub fn built_count(built: usize, total: usize) -> impl Predicate<str> {
    predicates::str::contains(format!("Built {built}/{total} files successfully"))
}

pub fn pipeline_completed() -> impl Predicate<str> {
    predicates::str::contains("Pipeline completed successfully")
}

pub fn has_section(title: &str) -> impl Predicate<str> {
    predicates::str::contains(format!("{title}:"))
}
