//! Output rendering and run artifacts.
//!
//! Provides:
//! - CSV / JSON rendering of recommendation and performance rows
//! - `<dir>/<run_id>/recommendations.json` with a SHA-256 sidecar
//!   (`recommendations.digest`) so downstream consumers can verify integrity

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::config::LeadTimeConfig;
use crate::domain::{LeadTimeError, LeadTimeRecommendation, Result};
use crate::engine::RecommendationRun;
use crate::performance::FulfillmentPerformance;

const ARTIFACT_FILE: &str = "recommendations.json";
const DIGEST_FILE: &str = "recommendations.digest";

/// Rendering format for result rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

/// Write recommendation rows in `format`.
pub fn write_recommendations<W: Write>(
    writer: W,
    rows: &[LeadTimeRecommendation],
    format: OutputFormat,
) -> Result<()> {
    write_rows(writer, rows, format)
}

/// Write performance rows in `format`.
pub fn write_performance<W: Write>(
    writer: W,
    rows: &[FulfillmentPerformance],
    format: OutputFormat,
) -> Result<()> {
    write_rows(writer, rows, format)
}

fn write_rows<W: Write, T: Serialize>(mut writer: W, rows: &[T], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Csv => {
            let mut csv_writer = csv::Writer::from_writer(writer);
            for row in rows {
                csv_writer.serialize(row)?;
            }
            csv_writer.flush()?;
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, rows)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}

/// Auditable record of one recommendation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunArtifact {
    pub run_id: String,
    pub generated_at: DateTime<Utc>,
    pub config: LeadTimeConfig,
    pub run: RecommendationRun,
}

impl RunArtifact {
    /// Fresh random run id.
    pub fn new_run_id() -> String {
        Uuid::new_v4().to_string()
    }

    /// Wrap a finished run.
    pub fn new(run_id: String, config: &LeadTimeConfig, run: RecommendationRun) -> Self {
        Self {
            run_id,
            generated_at: Utc::now(),
            config: config.clone(),
            run,
        }
    }
}

/// SHA-256 hex digest of `bytes`.
pub fn content_digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Persist `<dir>/<run_id>/recommendations.json` and its digest.
pub fn write_run_artifact(artifact: &RunArtifact, dir: &Path) -> Result<PathBuf> {
    let run_dir = dir.join(&artifact.run_id);
    std::fs::create_dir_all(&run_dir)?;

    let path = run_dir.join(ARTIFACT_FILE);
    let json = serde_json::to_vec_pretty(artifact)?;
    let digest = content_digest(&json);

    std::fs::write(&path, &json)?;
    std::fs::write(run_dir.join(DIGEST_FILE), digest.as_bytes())?;

    Ok(path)
}

/// Read `<dir>/<run_id>/recommendations.json`, verifying its digest.
pub fn read_run_artifact(run_id: &str, dir: &Path) -> Result<RunArtifact> {
    let run_dir = dir.join(run_id);
    let json = std::fs::read(run_dir.join(ARTIFACT_FILE))?;
    let expected = std::fs::read_to_string(run_dir.join(DIGEST_FILE))?;
    let actual = content_digest(&json);
    if expected.trim() != actual {
        return Err(LeadTimeError::DigestMismatch {
            expected: expected.trim().to_string(),
            actual,
        });
    }
    Ok(serde_json::from_slice(&json)?)
}
