//! Canned-reply memory: what people answered to messages starting a certain way.

use std::collections::{BTreeMap, VecDeque};

/// Default number of replies kept per trigger key.
pub const DEFAULT_REPLY_CAP: usize = 20;

/// Trigger key → replies, oldest first.
///
/// Each list is duplicate-free and holds at most `cap` entries; when full,
/// the oldest reply is evicted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyMemory {
    entries: BTreeMap<String, VecDeque<String>>,
    cap: usize,
}

impl Default for ReplyMemory {
    fn default() -> Self {
        Self::new(DEFAULT_REPLY_CAP)
    }
}

impl ReplyMemory {
    pub fn new(cap: usize) -> Self {
        Self {
            entries: BTreeMap::new(),
            cap: cap.max(1),
        }
    }

    /// Build from raw snapshot data. Later duplicates win over earlier ones,
    /// lists are trimmed to the newest `cap` entries and empty keys dropped.
    pub fn from_raw(raw: BTreeMap<String, Vec<String>>, cap: usize) -> Self {
        let mut memory = Self::new(cap);
        for (key, replies) in raw {
            let mut list: VecDeque<String> = VecDeque::with_capacity(replies.len());
            for reply in replies {
                list.retain(|r| *r != reply);
                list.push_back(reply);
            }
            memory.trim(&mut list);
            if !list.is_empty() {
                memory.entries.insert(key, list);
            }
        }
        memory
    }

    /// Remember `reply` under `key`. Returns `false` if it was already there.
    pub fn insert(&mut self, key: &str, reply: &str) -> bool {
        let cap = self.cap;
        let list = self.entries.entry(key.to_string()).or_default();
        if list.iter().any(|r| r == reply) {
            return false;
        }
        list.push_back(reply.to_string());
        while list.len() > cap {
            list.pop_front();
        }
        true
    }

    /// Replies stored under `key`, if there are any.
    pub fn get(&self, key: &str) -> Option<&VecDeque<String>> {
        self.entries.get(key).filter(|list| !list.is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &VecDeque<String>)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn key_count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &BTreeMap<String, VecDeque<String>> {
        &self.entries
    }

    fn trim(&self, list: &mut VecDeque<String>) {
        while list.len() > self.cap {
            list.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_dedupes() {
        let mut m = ReplyMemory::default();
        assert!(m.insert("как дела", "норм"));
        assert!(!m.insert("как дела", "норм"));
        assert!(m.insert("как дела", "плохо"));
        let list: Vec<&str> = m.get("как дела").unwrap().iter().map(String::as_str).collect();
        assert_eq!(list, vec!["норм", "плохо"]);
    }

    #[test]
    fn test_cap_evicts_oldest() {
        let mut m = ReplyMemory::default();
        for i in 0..21 {
            m.insert("k", &format!("reply {}", i));
        }
        let list = m.get("k").unwrap();
        assert_eq!(list.len(), 20);
        assert_eq!(list.front().map(String::as_str), Some("reply 1"));
        assert_eq!(list.back().map(String::as_str), Some("reply 20"));
        assert!(!list.iter().any(|r| r == "reply 0"));
    }

    #[test]
    fn test_from_raw_repairs_lists() {
        let mut raw = BTreeMap::new();
        raw.insert(
            "a".to_string(),
            vec!["x".to_string(), "y".to_string(), "x".to_string()],
        );
        raw.insert("b".to_string(), (0..30).map(|i| i.to_string()).collect());
        raw.insert("empty".to_string(), vec![]);

        let m = ReplyMemory::from_raw(raw, 20);
        let a: Vec<&str> = m.get("a").unwrap().iter().map(String::as_str).collect();
        assert_eq!(a, vec!["y", "x"]);
        let b = m.get("b").unwrap();
        assert_eq!(b.len(), 20);
        assert_eq!(b.front().map(String::as_str), Some("10"));
        assert_eq!(m.key_count(), 2);
    }

    #[test]
    fn test_small_cap() {
        let mut m = ReplyMemory::new(2);
        m.insert("k", "1");
        m.insert("k", "2");
        m.insert("k", "3");
        let list: Vec<&str> = m.get("k").unwrap().iter().map(String::as_str).collect();
        assert_eq!(list, vec!["2", "3"]);
    }
}
