pub mod boyer_moore;
pub mod naive;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use boyer_moore::{BoyerMoore, BoyerMooreSearch};
pub use naive::NaiveSearch;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("invalid {argument}: {reason}")]
    InvalidArgument {
        argument: &'static str,
        reason: String,
    },
    #[error("unknown algorithm: {0}")]
    UnknownAlgorithm(String),
}

/// Decode `bytes` as UTF-8, naming `argument` in the error.
pub(crate) fn decode<'a>(bytes: &'a [u8], argument: &'static str) -> Result<&'a str, SearchError> {
    std::str::from_utf8(bytes).map_err(|e| SearchError::InvalidArgument {
        argument,
        reason: e.to_string(),
    })
}

/// Something that can find every occurrence of a pattern in a text.
///
/// Offsets are in characters, increasing, and may overlap.
pub trait Searcher: Send + Sync {
    fn name(&self) -> &str;
    fn find_all(&self, text: &str, pattern: &str) -> Vec<usize>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    #[default]
    BoyerMoore,
    Naive,
}

impl Algorithm {
    pub fn searcher(self) -> Box<dyn Searcher> {
        match self {
            Algorithm::BoyerMoore => Box::new(BoyerMoore),
            Algorithm::Naive => Box::new(NaiveSearch),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Algorithm::BoyerMoore => "boyer-moore",
            Algorithm::Naive => "naive",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "boyer-moore" | "bm" => Ok(Algorithm::BoyerMoore),
            "naive" => Ok(Algorithm::Naive),
            other => Err(SearchError::UnknownAlgorithm(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_names_the_argument() {
        assert_eq!(decode(b"abc", "text").unwrap(), "abc");
        let err = decode(&[0x61, 0xff], "pattern").unwrap_err();
        assert!(matches!(
            err,
            SearchError::InvalidArgument {
                argument: "pattern",
                ..
            }
        ));
    }

    #[test]
    fn algorithm_round_trips_through_str() {
        for algo in [Algorithm::BoyerMoore, Algorithm::Naive] {
            assert_eq!(algo.to_string().parse::<Algorithm>().unwrap(), algo);
        }
    }

    #[test]
    fn algorithm_short_alias() {
        assert_eq!("bm".parse::<Algorithm>().unwrap(), Algorithm::BoyerMoore);
    }

    #[test]
    fn unknown_algorithm_is_error() {
        let err = "kmp".parse::<Algorithm>().unwrap_err();
        assert_eq!(err.to_string(), "unknown algorithm: kmp");
    }

    #[test]
    fn searcher_names_match_algorithm() {
        assert_eq!(Algorithm::BoyerMoore.searcher().name(), "boyer-moore");
        assert_eq!(Algorithm::Naive.searcher().name(), "naive");
    }

    #[test]
    fn serde_uses_kebab_case() {
        let json = serde_json::to_string(&Algorithm::BoyerMoore).unwrap();
        assert_eq!(json, "\"boyer-moore\"");
    }
}
