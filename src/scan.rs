//! Search one pattern across several sources concurrently.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use futures::future::join_all;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tokio::io::AsyncReadExt;

use crate::locate::{LineIndex, Location};
use crate::search::{Algorithm, Searcher, decode};

/// Where text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Stdin,
    File(PathBuf),
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Stdin => f.write_str("-"),
            Source::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Outcome of scanning a single source. Errors are information, not failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Matches(Vec<Location>),
    Error(String),
}

/// Result of scanning one source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub source: String,
    pub outcome: Outcome,
    /// Length of the searched text in characters.
    pub chars: usize,
    /// SHA-256 of the searched bytes, hex encoded.
    pub digest: String,
}

impl ScanReport {
    pub fn match_count(&self) -> usize {
        match &self.outcome {
            Outcome::Matches(locations) => locations.len(),
            Outcome::Error(_) => 0,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.outcome, Outcome::Error(_))
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScanConfig {
    pub algorithm: Algorithm,
    /// Keep at most this many matches per source.
    pub max_matches: Option<usize>,
}

pub struct Scanner {
    searcher: Arc<dyn Searcher>,
    config: ScanConfig,
}

impl Scanner {
    pub fn new(config: ScanConfig) -> Self {
        Self {
            searcher: Arc::from(config.algorithm.searcher()),
            config,
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        self.config.algorithm
    }

    /// Scan every source. Reports come back in source order.
    pub async fn scan(&self, pattern: &str, sources: &[Source]) -> Vec<ScanReport> {
        let tasks = sources.iter().map(|source| self.scan_source(pattern, source));
        join_all(tasks).await
    }

    async fn scan_source(&self, pattern: &str, source: &Source) -> ScanReport {
        let label = source.to_string();
        let bytes = match read_source(source).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("{label}: {e}");
                return ScanReport {
                    source: label,
                    outcome: Outcome::Error(e.to_string()),
                    chars: 0,
                    digest: String::new(),
                };
            }
        };

        let searcher = Arc::clone(&self.searcher);
        let pattern = pattern.to_string();
        let max_matches = self.config.max_matches;
        let task_label = label.clone();
        let joined = tokio::task::spawn_blocking(move || {
            search_bytes(searcher.as_ref(), &task_label, &pattern, &bytes, max_matches)
        })
        .await;

        match joined {
            Ok(report) => report,
            Err(e) => ScanReport {
                source: label,
                outcome: Outcome::Error(format!("search task failed: {e}")),
                chars: 0,
                digest: String::new(),
            },
        }
    }

    /// Scan an in-memory text on the current thread.
    pub fn scan_text(&self, label: &str, pattern: &str, text: &str) -> ScanReport {
        search_bytes(
            self.searcher.as_ref(),
            label,
            pattern,
            text.as_bytes(),
            self.config.max_matches,
        )
    }
}

async fn read_source(source: &Source) -> std::io::Result<Vec<u8>> {
    match source {
        Source::Stdin => {
            let mut buf = Vec::new();
            tokio::io::stdin().read_to_end(&mut buf).await?;
            Ok(buf)
        }
        Source::File(path) => tokio::fs::read(path).await,
    }
}

fn search_bytes(
    searcher: &dyn Searcher,
    label: &str,
    pattern: &str,
    bytes: &[u8],
    max_matches: Option<usize>,
) -> ScanReport {
    let digest = content_digest(bytes);
    let text = match decode(bytes, "text") {
        Ok(text) => text,
        Err(err) => {
            warn!("{label}: {err}");
            return ScanReport {
                source: label.to_string(),
                outcome: Outcome::Error(err.to_string()),
                chars: 0,
                digest,
            };
        }
    };

    let mut offsets = searcher.find_all(text, pattern);
    if let Some(limit) = max_matches {
        offsets.truncate(limit);
    }
    debug!(
        "{label}: {} matches with {}",
        offsets.len(),
        searcher.name()
    );

    let index = LineIndex::new(text);
    ScanReport {
        source: label.to_string(),
        outcome: Outcome::Matches(offsets.into_iter().map(|o| index.locate(o)).collect()),
        chars: text.chars().count(),
        digest,
    }
}

/// SHA-256 of `bytes` as lowercase hex.
pub fn content_digest(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_text_reports_locations() {
        let scanner = Scanner::new(ScanConfig::default());
        let report = scanner.scan_text("mem", "ab", "xab\nab");
        match report.outcome {
            Outcome::Matches(locs) => {
                assert_eq!(locs.len(), 2);
                assert_eq!((locs[0].line, locs[0].column), (1, 2));
                assert_eq!((locs[1].line, locs[1].column), (2, 1));
                assert_eq!(locs[1].offset, 4);
            }
            Outcome::Error(e) => panic!("unexpected error: {e}"),
        }
        assert_eq!(report.chars, 6);
    }

    #[test]
    fn max_matches_truncates() {
        let scanner = Scanner::new(ScanConfig {
            max_matches: Some(2),
            ..ScanConfig::default()
        });
        let report = scanner.scan_text("mem", "a", "aaaaa");
        assert_eq!(report.match_count(), 2);
    }

    #[test]
    fn invalid_utf8_is_reported() {
        let report = search_bytes(&crate::search::NaiveSearch, "bad", "a", &[0xff], None);
        match &report.outcome {
            Outcome::Error(e) => assert!(e.starts_with("invalid text: ")),
            Outcome::Matches(_) => panic!("expected an error"),
        }
        assert!(!report.digest.is_empty());
    }

    #[test]
    fn digest_is_sha256_hex() {
        assert_eq!(
            content_digest(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn stdin_label() {
        assert_eq!(Source::Stdin.to_string(), "-");
    }
}
