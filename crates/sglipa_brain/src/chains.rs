//! Transition table: the first-order Markov model.
//!
//! Maps a source token to the tokens observed right after it, with an
//! occurrence count per edge. The reserved [`START_MARKER`] row counts the
//! tokens that opened a learned message.

use sglipa_core::START_MARKER;
use std::collections::BTreeMap;

/// Outgoing edges of one token: next token → occurrence count (always ≥ 1).
pub type Edges = BTreeMap<String, u32>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransitionTable {
    rows: BTreeMap<String, Edges>,
}

impl TransitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from raw snapshot data, dropping zero counts and empty rows.
    pub fn from_raw(raw: BTreeMap<String, BTreeMap<String, u32>>) -> Self {
        let rows = raw
            .into_iter()
            .filter_map(|(from, edges)| {
                let edges: Edges = edges.into_iter().filter(|(_, n)| *n > 0).collect();
                (!edges.is_empty()).then_some((from, edges))
            })
            .collect();
        Self { rows }
    }

    /// Count one more observation of `from → to`.
    pub fn increment(&mut self, from: &str, to: &str) {
        let count = self
            .rows
            .entry(from.to_string())
            .or_default()
            .entry(to.to_string())
            .or_insert(0);
        *count = count.saturating_add(1);
    }

    /// Count one more message that started with `token`.
    pub fn record_start(&mut self, token: &str) {
        self.increment(START_MARKER, token);
    }

    /// Outgoing edges of `token`, if it has any.
    pub fn successors(&self, token: &str) -> Option<&Edges> {
        self.rows.get(token).filter(|edges| !edges.is_empty())
    }

    pub fn start_edges(&self) -> Option<&Edges> {
        self.successors(START_MARKER)
    }

    /// The table's own copy of `token`, if it is a source with outgoing edges.
    pub fn source_key(&self, token: &str) -> Option<&str> {
        self.rows
            .get_key_value(token)
            .filter(|(_, edges)| !edges.is_empty())
            .map(|(key, _)| key.as_str())
    }

    pub fn count(&self, from: &str, to: &str) -> u32 {
        self.rows
            .get(from)
            .and_then(|edges| edges.get(to))
            .copied()
            .unwrap_or(0)
    }

    /// Source tokens, excluding the start marker.
    pub fn tokens(&self) -> impl Iterator<Item = &str> + '_ {
        self.rows
            .keys()
            .map(String::as_str)
            .filter(|k| *k != START_MARKER)
    }

    /// Number of source keys, start marker included.
    pub fn key_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    pub fn rows(&self) -> &BTreeMap<String, Edges> {
        &self.rows
    }
}
