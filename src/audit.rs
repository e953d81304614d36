//! Requirement audit over an explicit list of images.
//!
//! For each path, in order:
//!
//! ```text
//! missing?          → Missing     (warning, continue)
//! analyze fails?    → Failed      (continue)
//! within range?     → Compliant
//! otherwise         → normalize to <stem><suffix>.jpg → Normalized | Failed
//! ```
//!
//! Every image is handled independently: one failure never stops the rest,
//! and the report carries each outcome so the caller decides the exit status.
//! `analyze` and `normalize` stay separate operations; this module is only
//! the composition the CLI's `audit` command needs.
//!
//! [`analyze_paths`] is the read-only counterpart used by `analyze`: one
//! entry per path, failures included, so a JSON report names every input.

use crate::config::NormalizerConfig;
use crate::imaging::{
    ImageBackend, ImageMetadata, ImagingError, NormalizationResult, RustBackend, analyze,
    normalize,
};
use crate::naming::optimized_path;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::warn;

/// What happened to one audited image.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AuditOutcome {
    /// The path does not exist.
    Missing,
    /// Already within the configured range; left alone.
    Compliant { metadata: ImageMetadata },
    /// Out of range; a normalized copy was written.
    Normalized {
        metadata: ImageMetadata,
        result: NormalizationResult,
    },
    /// Could not be analyzed or normalized.
    Failed {
        metadata: Option<ImageMetadata>,
        error: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditEntry {
    pub path: PathBuf,
    #[serde(flatten)]
    pub outcome: AuditOutcome,
}

/// Outcome counts across an audit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AuditSummary {
    pub compliant: usize,
    pub normalized: usize,
    pub missing: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditReport {
    pub entries: Vec<AuditEntry>,
}

impl AuditReport {
    pub fn summary(&self) -> AuditSummary {
        let mut summary = AuditSummary::default();
        for entry in &self.entries {
            match entry.outcome {
                AuditOutcome::Missing => summary.missing += 1,
                AuditOutcome::Compliant { .. } => summary.compliant += 1,
                AuditOutcome::Normalized { .. } => summary.normalized += 1,
                AuditOutcome::Failed { .. } => summary.failed += 1,
            }
        }
        summary
    }

    /// True when any image could not be analyzed or normalized.
    ///
    /// Missing images are warnings, not failures.
    pub fn has_failures(&self) -> bool {
        self.summary().failed > 0
    }
}

pub fn audit(paths: &[PathBuf], config: &NormalizerConfig) -> AuditReport {
    audit_with_backend(&RustBackend::new(), paths, config)
}

/// Audit images using a specific backend (allows testing with mock).
pub fn audit_with_backend(
    backend: &impl ImageBackend,
    paths: &[PathBuf],
    config: &NormalizerConfig,
) -> AuditReport {
    let entries = paths
        .iter()
        .map(|path| AuditEntry {
            path: path.clone(),
            outcome: audit_one(backend, path, config),
        })
        .collect();
    AuditReport { entries }
}

fn audit_one(
    backend: &impl ImageBackend,
    path: &Path,
    config: &NormalizerConfig,
) -> AuditOutcome {
    let metadata = match analyze(backend, path, config.range()) {
        Ok(metadata) => metadata,
        Err(ImagingError::NotFound(_)) => {
            warn!(path = %path.display(), "image not found, skipping");
            return AuditOutcome::Missing;
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "could not analyze image");
            return AuditOutcome::Failed {
                metadata: None,
                error: e.to_string(),
            };
        }
    };

    if metadata.within_range {
        return AuditOutcome::Compliant { metadata };
    }

    let destination = optimized_path(path, &config.output.suffix);
    match normalize(backend, &config.request(path, destination)) {
        Ok(result) => AuditOutcome::Normalized { metadata, result },
        Err(e) => {
            warn!(path = %path.display(), error = %e, "could not normalize image");
            AuditOutcome::Failed {
                metadata: Some(metadata),
                error: e.to_string(),
            }
        }
    }
}

/// Result of analyzing one path.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnalysisOutcome {
    Analyzed { metadata: ImageMetadata },
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisEntry {
    pub path: PathBuf,
    #[serde(flatten)]
    pub outcome: AnalysisOutcome,
}

impl AnalysisEntry {
    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, AnalysisOutcome::Failed { .. })
    }
}

/// Analyze every path, keeping one entry per input in order.
pub fn analyze_paths(
    backend: &impl ImageBackend,
    paths: &[PathBuf],
    range: (u32, u32),
) -> Vec<AnalysisEntry> {
    paths
        .iter()
        .map(|path| {
            let outcome = match analyze(backend, path, range) {
                Ok(metadata) => AnalysisOutcome::Analyzed { metadata },
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "analyze failed");
                    AnalysisOutcome::Failed {
                        error: e.to_string(),
                    }
                }
            };
            AnalysisEntry {
                path: path.clone(),
                outcome,
            }
        })
        .collect()
}
