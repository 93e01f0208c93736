//! JSON run reports written after batch operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Instant;

use crate::blockchain::types::BlockchainResult;

/// Overwrite `path` with the pretty-printed report.
pub fn write_report<T: Serialize>(path: &Path, report: &T) -> BlockchainResult<()> {
    let json = serde_json::to_string_pretty(report)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    fs::write(path, json)?;
    tracing::info!(path = ?path, "Report written");
    Ok(())
}

/// Wall-clock start plus a monotonic timer for a script run.
#[derive(Debug, Clone, Copy)]
pub struct RunClock {
    started_at: DateTime<Utc>,
    started: Instant,
}

impl RunClock {
    pub fn start() -> Self {
        Self {
            started_at: Utc::now(),
            started: Instant::now(),
        }
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    /// Start/end/duration block shared by every report.
    pub fn timing(&self) -> RunTiming {
        let ended_at = Utc::now();
        RunTiming {
            total_script_duration: self.elapsed_secs(),
            start_time: self.started_at,
            end_time: ended_at,
            timestamp: ended_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunTiming {
    pub total_script_duration: f64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub timestamp: DateTime<Utc>,
}

/// Successful batch mint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchMintReport {
    pub success: bool,
    pub transaction_hash: String,
    pub minted_tokens: usize,
    /// Seconds spent in the mint transaction itself.
    pub duration: f64,
    #[serde(flatten)]
    pub timing: RunTiming,
    pub collections: Vec<String>,
    pub recipients: Vec<String>,
    pub uris: Vec<String>,
}

/// Successful token URI update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UriUpdateReport {
    pub success: bool,
    pub transaction_hash: String,
    pub digital_asset_address: String,
    pub new_uri: String,
    pub duration: f64,
    #[serde(flatten)]
    pub timing: RunTiming,
}

/// Any script run that ended in a fatal error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureReport {
    pub success: bool,
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digital_asset_address: Option<String>,
    #[serde(flatten)]
    pub timing: RunTiming,
}

impl FailureReport {
    pub fn new(error: impl Into<String>, clock: &RunClock) -> Self {
        Self {
            success: false,
            error: error.into(),
            digital_asset_address: None,
            timing: clock.timing(),
        }
    }
}

/// One attempted collection in a bulk run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionEntry {
    pub name: String,
    pub hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    /// Seconds spent creating collections, pauses included.
    pub duration: f64,
    pub total_script_duration: f64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// Bulk collection creation summary plus per-item detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionCreationReport {
    pub summary: CollectionSummary,
    pub collections: Vec<CollectionEntry>,
}

impl CollectionCreationReport {
    pub fn new(entries: Vec<CollectionEntry>, duration: f64, clock: &RunClock) -> Self {
        let failed = entries.iter().filter(|e| e.error.is_some()).count();
        let timing = clock.timing();
        Self {
            summary: CollectionSummary {
                total: entries.len(),
                successful: entries.len() - failed,
                failed,
                duration,
                total_script_duration: timing.total_script_duration,
                start_time: timing.start_time,
                end_time: timing.end_time,
            },
            collections: entries,
        }
    }

    pub fn failures(&self) -> impl Iterator<Item = &CollectionEntry> {
        self.collections.iter().filter(|e| e.error.is_some())
    }
}
