//! Build stage: typeset every LaTeX source under the docs directory.

use crate::core::{
    config::Config,
    error::{Result, StewardError},
    output::{format_megabytes, print_banner, print_error, print_step, print_step_failed, print_step_ok, print_success},
    state::{BuildResult, BuildSummary},
    typeset::Typesetter,
};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const SOURCE_EXTENSION: &str = "tex";
pub const OUTPUT_EXTENSION: &str = "pdf";
/// Byproducts removed after a successful build
pub const AUX_EXTENSIONS: [&str; 4] = ["aux", "log", "out", "toc"];
/// Two passes so cross-references resolve
pub const TYPESET_PASSES: usize = 2;

/// Recursively collect `.tex` files below `docs_dir`, sorted by path
pub fn find_sources(docs_dir: &Path) -> Vec<PathBuf> {
    if !docs_dir.is_dir() {
        print_error(&format!("Docs directory not found: {}", docs_dir.display()));
        return Vec::new();
    }

    let mut sources: Vec<PathBuf> = WalkDir::new(docs_dir)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("Skipping unreadable entry while scanning docs: {e}");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().is_some_and(|ext| ext == SOURCE_EXTENSION))
        .collect();
    sources.sort();
    sources
}

/// Typeset one document and verify its output.
///
/// The returned result is a success only if both passes exited zero and the
/// PDF exists and is non-empty afterwards. A stale PDF from an earlier run
/// never turns a failed pass into a success.
pub fn build_document(source: &Path, typesetter: &Typesetter) -> BuildResult {
    let output = source.with_extension(OUTPUT_EXTENSION);
    println!("\nBuilding: {}", display_name(source));

    match typeset_and_verify(source, &output, typesetter) {
        Ok(size_bytes) => {
            print_step_ok(&format!(
                "Built: {} ({})",
                display_name(&output),
                format_megabytes(size_bytes)
            ));
            BuildResult::built(source.to_path_buf(), output, size_bytes)
        }
        Err(e) => {
            print_step_failed(&e.to_string());
            log::debug!("Build of {} failed: {e:?}", source.display());
            BuildResult::failed(source.to_path_buf(), output, e)
        }
    }
}

fn typeset_and_verify(source: &Path, output: &Path, typesetter: &Typesetter) -> Result<u64> {
    for pass in 1..=TYPESET_PASSES {
        print_step(&format!("Run {pass}/{TYPESET_PASSES}..."));
        typesetter.run_pass(source)?;
    }

    remove_aux_files(source);

    let size = std::fs::metadata(output).map(|m| m.len()).unwrap_or(0);
    if size == 0 {
        return Err(StewardError::output_missing(output));
    }
    Ok(size)
}

/// Best effort; a byproduct that cannot be removed is only logged
pub fn remove_aux_files(source: &Path) {
    for ext in AUX_EXTENSIONS {
        let aux = source.with_extension(ext);
        if aux.exists() {
            if let Err(e) = std::fs::remove_file(&aux) {
                log::debug!("Could not remove {}: {e}", aux.display());
            }
        }
    }
}

/// Build every source under the configured docs directory
pub fn build_all(config: &Config) -> BuildSummary {
    print_banner("Building Documentation");

    let sources = find_sources(&config.docs_path());
    if sources.is_empty() {
        println!("No .{SOURCE_EXTENSION} files found");
        return BuildSummary::default();
    }
    println!("Found {} .{SOURCE_EXTENSION} file(s)", sources.len());

    let typesetter = Typesetter::new(&config.typesetter, config.typeset_timeout);
    let results = sources
        .iter()
        .map(|source| build_document(source, &typesetter))
        .collect();
    let summary = BuildSummary { results };

    print_success(&format!(
        "Built {}/{} files successfully",
        summary.built().len(),
        summary.attempted()
    ));
    summary
}

/// Per-file sizes and the total of everything that built
pub fn print_build_report(summary: &BuildSummary) {
    print_banner("Build Report");

    let built = summary.built();
    if built.is_empty() {
        println!("No files built");
        return;
    }

    println!("Built files ({}):", built.len());
    for result in &built {
        println!("  - {}", result.output_name());
        println!("    Size: {}", format_megabytes(result.size_bytes));
    }

    let failed: Vec<_> = summary.results.iter().filter(|r| !r.success()).collect();
    if !failed.is_empty() {
        println!("\nFailed files ({}):", failed.len());
        for result in failed {
            let reason = result
                .error
                .as_ref()
                .map(|e| e.to_string())
                .unwrap_or_else(|| "empty output".to_string());
            println!("  - {}: {reason}", result.source_name());
        }
    }

    println!(
        "\nTotal: {} | {} files",
        format_megabytes(summary.total_bytes()),
        built.len()
    );
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
