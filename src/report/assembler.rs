//! Exported report assembly.
//!
//! Merges report identity (competitor, timestamp, derived threat level)
//! with the orchestrator's report into a write-once document, and prepares
//! it as a file artifact.

use crate::models::{CiReport, ExportedReport, ThreatLevel};
use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A serialized export ready to be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub filename: String,
    pub contents: String,
}

/// Build the exported document.
///
/// The timestamp is sampled once by the caller so the displayed and
/// exported times never drift apart.
pub fn assemble_report(
    competitor_name: &str,
    timestamp: DateTime<Utc>,
    threat_level: ThreatLevel,
    report: &CiReport,
) -> ExportedReport {
    ExportedReport {
        competitor_name: competitor_name.to_string(),
        timestamp: format_timestamp(timestamp),
        threat_level,
        report: report.clone(),
    }
}

/// Format a timestamp as RFC 3339 UTC with milliseconds, e.g. `2026-10-16T09:30:00.000Z`.
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// File name for an export: `CI-Report-<competitor>-<YYYY-MM-DD>.json`.
///
/// Each run of whitespace in the competitor name becomes a single hyphen.
pub fn export_filename(competitor_name: &str, timestamp: DateTime<Utc>) -> String {
    format!(
        "CI-Report-{}-{}.json",
        collapse_whitespace(competitor_name, '-'),
        timestamp.format("%Y-%m-%d")
    )
}

/// Serialize the exported document as JSON with 2-space indentation.
pub fn to_json(exported: &ExportedReport) -> Result<String> {
    serde_json::to_string_pretty(exported).context("Failed to serialize report")
}

/// Serialize the document and pair it with its file name.
pub fn prepare_export(exported: &ExportedReport, timestamp: DateTime<Utc>) -> Result<ExportArtifact> {
    Ok(ExportArtifact {
        filename: export_filename(&exported.competitor_name, timestamp),
        contents: to_json(exported)?,
    })
}

/// Save an artifact into `dir`, creating the directory if needed.
pub fn write_artifact(artifact: &ExportArtifact, dir: &Path) -> Result<PathBuf> {
    if !dir.exists() {
        debug!("Creating export directory: {}", dir.display());
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }

    let path = dir.join(&artifact.filename);
    std::fs::write(&path, artifact.contents.as_bytes())
        .with_context(|| format!("Failed to write report to {}", path.display()))?;

    info!("Exported report to {}", path.display());
    Ok(path)
}

fn collapse_whitespace(text: &str, separator: char) -> String {
    let mut collapsed = String::with_capacity(text.len());
    let mut in_whitespace = false;

    for c in text.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                collapsed.push(separator);
            }
            in_whitespace = true;
        } else {
            collapsed.push(c);
            in_whitespace = false;
        }
    }

    collapsed
}
