use super::Searcher;

/// Brute-force search. Checks every alignment; same match policy as
/// Boyer–Moore.
pub struct NaiveSearch;

impl Searcher for NaiveSearch {
    fn name(&self) -> &str {
        "naive"
    }

    fn find_all(&self, text: &str, pattern: &str) -> Vec<usize> {
        let text: Vec<char> = text.chars().collect();
        let pattern: Vec<char> = pattern.chars().collect();

        if pattern.is_empty() || pattern.len() > text.len() {
            return Vec::new();
        }

        text.windows(pattern.len())
            .enumerate()
            .filter(|(_, window)| *window == pattern.as_slice())
            .map(|(i, _)| i)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_overlapping() {
        assert_eq!(NaiveSearch.find_all("AAAA", "AA"), vec![0, 1, 2]);
    }

    #[test]
    fn empty_pattern_finds_nothing() {
        assert!(NaiveSearch.find_all("abc", "").is_empty());
    }

    #[test]
    fn pattern_longer_than_text() {
        assert!(NaiveSearch.find_all("ab", "abc").is_empty());
    }
}
