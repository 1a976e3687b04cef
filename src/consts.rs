//! Project-wide constants.

use std::path::PathBuf;

use anyhow::{Context, Result};

/// Environment variable holding the `env_logger` filter.
pub const LOG_ENV: &str = "BMFIND_LOG";
/// Environment variable holding the `env_logger` write style.
pub const LOG_STYLE_ENV: &str = "BMFIND_LOG_STYLE";

/// Number of history entries `bmfind history` shows by default.
pub const DEFAULT_HISTORY_LIMIT: usize = 20;

/// Default database path: `~/.bmfind/bmfind.db`.
/// Single DB for config and history.
pub fn default_db_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("cannot determine home directory")?;
    Ok(home.join(".bmfind").join("bmfind.db"))
}

/// Format a number with comma separators (e.g. 1,234,567).
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i).is_multiple_of(3) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_db_path_is_under_dot_dir() {
        if let Ok(path) = default_db_path() {
            assert!(path.ends_with(".bmfind/bmfind.db"));
        }
    }

    #[test]
    fn format_number_small() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
    }

    #[test]
    fn format_number_thousands() {
        assert_eq!(format_number(1_000), "1,000");
        assert_eq!(format_number(123_456), "123,456");
        assert_eq!(format_number(1_234_567), "1,234,567");
    }
}
