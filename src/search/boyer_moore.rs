//! Boyer–Moore search with the bad-character heuristic.
//!
//! Positions are character offsets. Matches may overlap: after a full match
//! the alignment advances by one.

use std::collections::HashMap;

use log::trace;

use super::{SearchError, Searcher, decode};

/// A fixed text and pattern, with the pattern's last-occurrence table.
#[derive(Debug, Clone)]
pub struct BoyerMooreSearch {
    text: Vec<char>,
    pattern: Vec<char>,
    last_occurrence: HashMap<char, usize>,
}

impl BoyerMooreSearch {
    pub fn new(text: &str, pattern: &str) -> Self {
        let text: Vec<char> = text.chars().collect();
        let pattern: Vec<char> = pattern.chars().collect();
        let last_occurrence = build_last_occurrence(&pattern);
        Self {
            text,
            pattern,
            last_occurrence,
        }
    }

    /// Build from raw bytes. Both inputs must be valid UTF-8.
    pub fn from_bytes(text: &[u8], pattern: &[u8]) -> Result<Self, SearchError> {
        let text = decode(text, "text")?;
        let pattern = decode(pattern, "pattern")?;
        Ok(Self::new(text, pattern))
    }

    pub fn text_len(&self) -> usize {
        self.text.len()
    }

    pub fn pattern_len(&self) -> usize {
        self.pattern.len()
    }

    /// Highest index of `c` in the pattern, or `None` if it does not occur.
    pub fn rightmost_match_in_pattern(&self, c: char) -> Option<usize> {
        self.last_occurrence.get(&c).copied()
    }

    /// Compare the pattern against the text aligned at `start`, right to left.
    ///
    /// Returns the offset within the pattern of the first differing
    /// character, or `None` on a full match. Positions past the end of the
    /// text count as mismatches.
    pub fn first_mismatch_offset(&self, start: usize) -> Option<usize> {
        (0..self.pattern.len()).rev().find(|&j| {
            start
                .checked_add(j)
                .and_then(|pos| self.text.get(pos))
                .is_none_or(|&c| c != self.pattern[j])
        })
    }

    /// Every start offset where the pattern occurs, in increasing order.
    pub fn find_all_matches(&self) -> Vec<usize> {
        let n = self.text.len();
        let m = self.pattern.len();
        let mut matches = Vec::new();

        if m == 0 || m > n {
            return matches;
        }

        let mut shift = 0;
        while shift <= n - m {
            match self.first_mismatch_offset(shift) {
                None => {
                    trace!("full match at {shift}");
                    matches.push(shift);
                    shift += 1;
                }
                Some(j) => {
                    let c = self.text[shift + j];
                    let skip = match self.rightmost_match_in_pattern(c) {
                        Some(last) if last < j => j - last,
                        Some(_) => 1,
                        None => j + 1,
                    };
                    trace!("mismatch at offset {j} ({c:?}), advancing {skip}");
                    shift += skip;
                }
            }
        }

        matches
    }
}

fn build_last_occurrence(pattern: &[char]) -> HashMap<char, usize> {
    let mut table = HashMap::with_capacity(pattern.len());
    for (i, &c) in pattern.iter().enumerate() {
        table.insert(c, i);
    }
    table
}

/// Stateless [`Searcher`] that builds a [`BoyerMooreSearch`] per call.
pub struct BoyerMoore;

impl Searcher for BoyerMoore {
    fn name(&self) -> &str {
        "boyer-moore"
    }

    fn find_all(&self, text: &str, pattern: &str) -> Vec<usize> {
        BoyerMooreSearch::new(text, pattern).find_all_matches()
    }
}
