//! Every token ever learned, ordered by when it was last seen.

use std::collections::HashMap;

pub const DEFAULT_VOCABULARY_CAP: usize = 10_000;

/// Deduplicated token set with recency tracking.
///
/// Each token carries the sequence number of its most recent sighting, so a
/// size-capped snapshot can keep exactly the most recently seen tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    last_seen: HashMap<String, u64>,
    clock: u64,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from a snapshot list ordered oldest → newest.
    pub fn from_words<I>(words: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut vocab = Self::new();
        for word in words {
            vocab.insert(&word);
        }
        vocab
    }

    pub fn insert(&mut self, token: &str) {
        self.clock += 1;
        match self.last_seen.get_mut(token) {
            Some(seen) => *seen = self.clock,
            None => {
                self.last_seen.insert(token.to_string(), self.clock);
            }
        }
    }

    pub fn contains(&self, token: &str) -> bool {
        self.last_seen.contains_key(token)
    }

    pub fn len(&self) -> usize {
        self.last_seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_seen.is_empty()
    }

    pub fn clear(&mut self) {
        self.last_seen.clear();
        self.clock = 0;
    }

    /// The `cap` most recently seen tokens, oldest first.
    pub fn snapshot(&self, cap: usize) -> Vec<&str> {
        let mut entries: Vec<(u64, &str)> = self
            .last_seen
            .iter()
            .map(|(word, seen)| (*seen, word.as_str()))
            .collect();
        entries.sort_unstable();
        let skip = entries.len().saturating_sub(cap);
        entries.into_iter().skip(skip).map(|(_, word)| word).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup() {
        let mut v = Vocabulary::new();
        v.insert("a");
        v.insert("b");
        v.insert("a");
        assert_eq!(v.len(), 2);
        assert!(v.contains("a"));
        assert!(!v.contains("c"));
    }

    #[test]
    fn test_snapshot_keeps_most_recent() {
        let mut v = Vocabulary::new();
        for w in ["a", "b", "c", "d"] {
            v.insert(w);
        }
        // Re-seeing "a" makes it the newest.
        v.insert("a");
        assert_eq!(v.snapshot(3), vec!["c", "d", "a"]);
        assert_eq!(v.snapshot(10), vec!["b", "c", "d", "a"]);
        assert!(v.snapshot(0).is_empty());
    }

    #[test]
    fn test_from_words_preserves_order() {
        let v = Vocabulary::from_words(["x", "y", "z"].map(String::from));
        assert_eq!(v.snapshot(2), vec!["y", "z"]);
    }

    #[test]
    fn test_clear() {
        let mut v = Vocabulary::from_words(["x".to_string()]);
        v.clear();
        assert!(v.is_empty());
        assert!(v.snapshot(5).is_empty());
    }
}
