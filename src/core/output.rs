//! Console output helpers shared by all commands.
//!
//! Every user-facing line goes through these functions so the whole tool
//! uses one colour scheme: red for failures, green for success, blue for
//! section titles and bright black for secondary detail.

use colored::*;

const BANNER_WIDTH: usize = 60;

/// Prints an error line
///
/// # Format
/// ```text
///
/// ✕ Error: <message>
///
/// ```
pub fn print_error(message: &str) {
    println!("\n{} {}\n", "✕ Error:".red(), message.white());
}

/// Prints a success line preceded by a blank line
pub fn print_success(message: &str) {
    println!("\n{} {}", "✓".green(), message.white());
}

/// Prints an informational message surrounded by blank lines
pub fn print_info(message: &str) {
    println!("\n{}\n", message.white());
}

/// Prints a section title followed by a blank line
pub fn print_section_header(header: &str) {
    println!("\n{}:\n", header.blue());
}

/// Prints a stage banner
///
/// # Format
/// ```text
///
/// ============================================================
/// === Building Documentation ===
/// ============================================================
///
/// ```
pub fn print_banner(title: &str) {
    let rule = "=".repeat(BANNER_WIDTH);
    println!("\n{}", rule.bright_black());
    println!("{}", format!("=== {title} ===").blue());
    println!("{}\n", rule.bright_black());
}

/// Prints an indented progress step, e.g. `  Run 1/2...`
pub fn print_step(message: &str) {
    println!("  {}", message.bright_black());
}

/// Prints an indented step that succeeded
pub fn print_step_ok(message: &str) {
    println!("  {} {}", "✓".green(), message.white());
}

/// Prints an indented step that failed
pub fn print_step_failed(message: &str) {
    println!("  {} {}", "✗".red(), message.white());
}

/// Formats a byte count as megabytes with two decimals
pub fn format_megabytes(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / (1024.0 * 1024.0))
}
