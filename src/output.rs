//! CLI output formatting for every command.
//!
//! # Information-First Display
//!
//! Each image leads with its positional index and file name; facts about it
//! follow as indented context lines. Paths are shown as given on the command
//! line so users can trace every line back to a file.
//!
//! # Output Format
//!
//! ## Analyze
//!
//! ```text
//! 001 IMG_1384cd.jpg
//!     Source: images/IMG_1384cd.jpg
//!     Dimensions: 1024x768px
//!     Format: JPEG (RGB)
//!     Size: 245,760 bytes (240.00 KB)
//!     Range 200-400px: no
//!     Budget 50 KB: over
//! ```
//!
//! ## Normalize
//!
//! ```text
//! IMG_1384cd.jpg → images/IMG_1384cd_optimized.jpg
//!     Dimensions: 300x300px
//!     Size: 18,211 bytes (17.78 KB)
//!     Reduction: 92.6%
//!     Budget 50 KB: ok
//! ```
//!
//! ## Audit
//!
//! Each image prints its analyze block, then one status line:
//! `Status: compliant`, `Status: normalized → <path>` (plus the normalize
//! context lines), `Status: missing` or `Status: failed (<reason>)`. A final
//! summary counts the outcomes:
//!
//! ```text
//! Audited 2 images: 1 compliant, 1 normalized, 0 missing, 0 failed
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::audit::{AuditOutcome, AuditReport};
use crate::config::NormalizerConfig;
use crate::imaging::{ImageMetadata, NormalizationResult, PlaceholderResult};
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Group digits in thousands: `1234567` → `1,234,567`.
fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Byte count with a KiB rendering: `18,211 bytes (17.78 KB)`.
fn format_bytes(bytes: u64) -> String {
    format!(
        "{} bytes ({:.2} KB)",
        group_thousands(bytes),
        bytes as f64 / 1024.0
    )
}

/// Signed percentage with one decimal: `0.926` → `92.6%`.
fn format_percent(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

fn budget_line(bytes: u64, config: &NormalizerConfig) -> String {
    let status = if bytes <= config.max_file_bytes() {
        "ok"
    } else {
        "over"
    };
    format!("Budget {} KB: {}", config.requirements.max_file_size_kb, status)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// ============================================================================
// Analyze
// ============================================================================

/// Format the context lines of one analyzed image at `depth`.
fn analysis_context(
    meta: &ImageMetadata,
    config: &NormalizerConfig,
    depth: usize,
) -> Vec<String> {
    let pad = indent(depth);
    let (min, max) = config.range();
    vec![
        format!("{pad}Source: {}", meta.path.display()),
        format!("{pad}Dimensions: {}x{}px", meta.width, meta.height),
        format!("{pad}Format: {} ({})", meta.format, meta.color_mode),
        format!("{pad}Size: {}", format_bytes(meta.byte_size)),
        format!("{pad}Range {min}-{max}px: {}", yes_no(meta.within_range)),
        format!("{pad}{}", budget_line(meta.byte_size, config)),
    ]
}

/// Format one analyzed image with its positional index.
pub fn format_analysis(
    index: usize,
    meta: &ImageMetadata,
    config: &NormalizerConfig,
) -> Vec<String> {
    let mut lines = vec![format!("{} {}", format_index(index), file_name(&meta.path))];
    lines.extend(analysis_context(meta, config, 1));
    lines
}

/// Format an analyze failure for one path.
pub fn format_analysis_error(
    index: usize,
    path: &Path,
    error: &dyn std::fmt::Display,
) -> Vec<String> {
    vec![
        format!("{} {}", format_index(index), file_name(path)),
        format!("    Error: {}", error),
    ]
}

/// Print one analyzed image to stdout.
pub fn print_analysis(index: usize, meta: &ImageMetadata, config: &NormalizerConfig) {
    for line in format_analysis(index, meta, config) {
        println!("{}", line);
    }
}

// ============================================================================
// Normalize
// ============================================================================

fn normalization_context(
    result: &NormalizationResult,
    config: &NormalizerConfig,
    depth: usize,
) -> Vec<String> {
    let pad = indent(depth);
    vec![
        format!("{pad}Dimensions: {}x{}px", result.edge, result.edge),
        format!("{pad}Size: {}", format_bytes(result.output_bytes)),
        format!("{pad}Reduction: {}", format_percent(result.reduction)),
        format!("{pad}{}", budget_line(result.output_bytes, config)),
    ]
}

/// Format a completed normalize: `source → output` then context lines.
pub fn format_normalization(
    source: &Path,
    result: &NormalizationResult,
    config: &NormalizerConfig,
) -> Vec<String> {
    let mut lines = vec![format!(
        "{} → {}",
        file_name(source),
        result.output.display()
    )];
    lines.extend(normalization_context(result, config, 1));
    lines
}

/// Print a completed normalize to stdout.
pub fn print_normalization(source: &Path, result: &NormalizationResult, config: &NormalizerConfig) {
    for line in format_normalization(source, result, config) {
        println!("{}", line);
    }
}

// ============================================================================
// Audit
// ============================================================================

/// Format the full audit report, one block per image plus a summary line.
pub fn format_audit(report: &AuditReport, config: &NormalizerConfig) -> Vec<String> {
    let mut lines = Vec::new();

    for (i, entry) in report.entries.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        lines.push(format!("{} {}", format_index(i + 1), file_name(&entry.path)));

        match &entry.outcome {
            AuditOutcome::Missing => {
                lines.push(format!("    Source: {}", entry.path.display()));
                lines.push("    Status: missing".to_string());
            }
            AuditOutcome::Compliant { metadata } => {
                lines.extend(analysis_context(metadata, config, 1));
                lines.push("    Status: compliant".to_string());
            }
            AuditOutcome::Normalized { metadata, result } => {
                lines.extend(analysis_context(metadata, config, 1));
                lines.push(format!("    Status: normalized → {}", result.output.display()));
                lines.extend(normalization_context(result, config, 2));
            }
            AuditOutcome::Failed { metadata, error } => {
                match metadata {
                    Some(metadata) => lines.extend(analysis_context(metadata, config, 1)),
                    None => lines.push(format!("    Source: {}", entry.path.display())),
                }
                lines.push(format!("    Status: failed ({})", error));
            }
        }
    }

    let summary = report.summary();
    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push(format!(
        "Audited {} images: {} compliant, {} normalized, {} missing, {} failed",
        report.entries.len(),
        summary.compliant,
        summary.normalized,
        summary.missing,
        summary.failed
    ));
    lines
}

/// Print the audit report to stdout.
pub fn print_audit(report: &AuditReport, config: &NormalizerConfig) {
    for line in format_audit(report, config) {
        println!("{}", line);
    }
}

// ============================================================================
// Placeholder
// ============================================================================

pub fn format_placeholder(result: &PlaceholderResult) -> Vec<String> {
    vec![
        format!("Placeholder → {}", result.path.display()),
        format!("    Dimensions: {}x{}px", result.edge, result.edge),
        format!("    Size: {}", format_bytes(result.bytes)),
    ]
}

pub fn print_placeholder(result: &PlaceholderResult) {
    for line in format_placeholder(result) {
        println!("{}", line);
    }
}
