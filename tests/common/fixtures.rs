//! Fake typesetter and document fixtures
//!
//! The fake typesetter behaves like `pdflatex -interaction=nonstopmode`
//! for the purposes of the pipeline:
//! - a source containing `FAIL` makes it exit 1 without output
//! - a source containing `EMPTY` produces a zero-byte PDF
//! - anything else produces a 128000-byte PDF plus aux byproducts

#![allow(dead_code)]

use super::repository::*;
use repo_steward::core::error::Result;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const FAKE_PDF_SIZE: u64 = 128_000;

const FAKE_TYPESETTER: &str = r#"#!/bin/sh
src="$2"
base="${src%.tex}"
if grep -q FAIL "$src"; then
  echo "! LaTeX Error: fake failure"
  exit 1
fi
size=128000
if grep -q EMPTY "$src"; then
  size=0
fi
head -c "$size" /dev/zero > "$base.pdf"
touch "$base.aux" "$base.log" "$base.out" "$base.toc"
exit 0
"#;

/// Typesetter script living outside the repository under test
pub struct FakeTypesetter {
    pub temp_dir: TempDir,
    pub path: PathBuf,
}

impl FakeTypesetter {
    pub fn program(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}

pub fn fake_typesetter() -> Result<FakeTypesetter> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("fake-pdflatex");
    fs::write(&path, FAKE_TYPESETTER)?;
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755))?;
    Ok(FakeTypesetter { temp_dir, path })
}

pub fn good_document(repo_path: &Path, relative: &str) -> Result<()> {
    create_file(
        repo_path,
        relative,
        "\\documentclass{article}\n\\begin{document}Hello\\end{document}\n",
    )
}

pub fn failing_document(repo_path: &Path, relative: &str) -> Result<()> {
    create_file(repo_path, relative, "\\documentclass{article}\nFAIL\n")
}

/// Repository with a bare `origin`, ready for the build pipeline
pub fn docs_repo_with_remote() -> Result<(TestRepo, TestRemote)> {
    let repo = setup_test_repo_with_initial_commit()?;
    let remote = add_bare_remote(&repo)?;
    Ok((repo, remote))
}
