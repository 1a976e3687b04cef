//! Map character offsets to line and column.

use serde::{Deserialize, Serialize};

/// A match position: character offset plus 1-based line and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

/// Character offsets at which each line starts.
#[derive(Debug, Clone)]
pub struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut starts = vec![0];
        for (i, c) in text.chars().enumerate() {
            if c == '\n' {
                starts.push(i + 1);
            }
        }
        Self { starts }
    }

    pub fn line_count(&self) -> usize {
        self.starts.len()
    }

    pub fn locate(&self, offset: usize) -> Location {
        // Index of the last line starting at or before `offset`.
        let line = self.starts.partition_point(|&start| start <= offset) - 1;
        Location {
            offset,
            line: line + 1,
            column: offset - self.starts[line] + 1,
        }
    }
}
