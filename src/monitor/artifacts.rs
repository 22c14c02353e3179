//! Readers for the artifacts the external pipeline writes incrementally.
//!
//! The pipeline may be mid-write when a file is read, so every failure here
//! is local: [`ArtifactReader::read`] turns it into a zero count for that
//! artifact and that cycle.

use chrono::{DateTime, Utc};
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::MonitorConfig;
use crate::constants::{artifacts::SUMMARY_HEADER_LINES, operations};
use crate::log_monitor;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Artifact missing: {0}")]
    Missing(PathBuf),
    #[error("Artifact unreadable: {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Artifact undecodable: {path}: {reason}")]
    Undecodable { path: PathBuf, reason: String },
}

impl ArtifactError {
    /// The file exists even though its contents could not be used
    pub fn artifact_exists(&self) -> bool {
        !matches!(self, Self::Missing(_))
    }
}

/// Data rows in a summary table with a single header line
pub fn summary_rows(content: &str) -> usize {
    content.lines().count().saturating_sub(SUMMARY_HEADER_LINES)
}

/// Element count of the structured-results container
pub fn result_elements(content: &str) -> Result<usize, String> {
    match serde_json::from_str::<Value>(content).map_err(|e| e.to_string())? {
        Value::Array(items) => Ok(items.len()),
        Value::Object(entries) => Ok(entries.len()),
        other => Err(format!("expected an array or object, found {other}")),
    }
}

/// Totals entries whose `score_field` is a number strictly above zero
pub fn nonzero_entries(content: &str, score_field: &str) -> Result<usize, String> {
    match serde_json::from_str::<Value>(content).map_err(|e| e.to_string())? {
        Value::Array(entries) => Ok(entries
            .iter()
            .filter_map(|entry| entry.get(score_field).and_then(Value::as_f64))
            .filter(|score| *score > 0.0)
            .count()),
        other => Err(format!("expected an array of totals, found {other}")),
    }
}

/// Counts gathered in one poll, zero for any artifact that could not be used
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArtifactCounts {
    pub processed: usize,
    pub json_results: usize,
    pub nonzero_categories: usize,
    /// At least one of the three artifacts exists on disk
    pub artifacts_present: bool,
    pub summary_modified_at: Option<DateTime<Utc>>,
}

/// Read-only view of the three pipeline artifacts
#[derive(Debug, Clone)]
pub struct ArtifactReader {
    summary_path: PathBuf,
    results_path: PathBuf,
    totals_path: PathBuf,
    score_field: String,
}

impl ArtifactReader {
    pub fn new(config: &MonitorConfig) -> Self {
        Self {
            summary_path: config.summary_path.clone(),
            results_path: config.results_path.clone(),
            totals_path: config.totals_path.clone(),
            score_field: config.score_field.clone(),
        }
    }

    pub async fn read(&self) -> ArtifactCounts {
        let mut present = false;

        let processed = self.settle(self.count_summary().await, &mut present);
        let json_results = self.settle(self.count_results().await, &mut present);
        let nonzero_categories = self.settle(self.count_totals().await, &mut present);

        let summary_modified_at = tokio::fs::metadata(&self.summary_path)
            .await
            .and_then(|metadata| metadata.modified())
            .ok()
            .map(DateTime::<Utc>::from);

        ArtifactCounts {
            processed,
            json_results,
            nonzero_categories,
            artifacts_present: present,
            summary_modified_at,
        }
    }

    fn settle(&self, reading: Result<usize, ArtifactError>, present: &mut bool) -> usize {
        match reading {
            Ok(count) => {
                *present = true;
                count
            }
            Err(error) => {
                *present |= error.artifact_exists();
                if error.artifact_exists() {
                    log_monitor!(debug, operations::ARTIFACT_UNAVAILABLE, error: error.to_string());
                }
                0
            }
        }
    }

    pub async fn count_summary(&self) -> Result<usize, ArtifactError> {
        let content = read_artifact(&self.summary_path).await?;
        Ok(summary_rows(&content))
    }

    pub async fn count_results(&self) -> Result<usize, ArtifactError> {
        let content = read_artifact(&self.results_path).await?;
        result_elements(&content).map_err(|reason| ArtifactError::Undecodable {
            path: self.results_path.clone(),
            reason,
        })
    }

    pub async fn count_totals(&self) -> Result<usize, ArtifactError> {
        let content = read_artifact(&self.totals_path).await?;
        nonzero_entries(&content, &self.score_field).map_err(|reason| {
            ArtifactError::Undecodable {
                path: self.totals_path.clone(),
                reason,
            }
        })
    }
}

async fn read_artifact(path: &Path) -> Result<String, ArtifactError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| match source.kind() {
            ErrorKind::NotFound => ArtifactError::Missing(path.to_path_buf()),
            _ => ArtifactError::Unreadable {
                path: path.to_path_buf(),
                source,
            },
        })
}
