pub mod sqlite;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::scan::ScanReport;
use crate::search::Algorithm;

/// One searched source, as remembered after a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub pattern: String,
    pub source: String,
    /// SHA-256 of the searched content; empty when the source was unreadable.
    pub digest: String,
    pub algorithm: Algorithm,
    pub matches: usize,
}

impl HistoryEntry {
    pub fn from_report(pattern: &str, algorithm: Algorithm, report: &ScanReport) -> Self {
        Self {
            pattern: pattern.to_string(),
            source: report.source.clone(),
            digest: report.digest.clone(),
            algorithm,
            matches: report.match_count(),
        }
    }
}

/// Where past searches are kept.
#[async_trait]
pub trait History: Send + Sync {
    async fn store(&self, entry: HistoryEntry) -> Result<()>;
    /// The last `limit` entries, oldest first.
    async fn recent(&self, limit: usize) -> Result<Vec<HistoryEntry>>;
    /// Entries whose pattern contains `query`.
    async fn recall(&self, query: &str) -> Result<Vec<HistoryEntry>>;
    async fn clear(&self) -> Result<()>;
}

/// Store one entry per scanned source.
pub async fn record_reports(
    history: &dyn History,
    pattern: &str,
    algorithm: Algorithm,
    reports: &[ScanReport],
) -> Result<()> {
    for report in reports {
        history
            .store(HistoryEntry::from_report(pattern, algorithm, report))
            .await?;
    }
    Ok(())
}
