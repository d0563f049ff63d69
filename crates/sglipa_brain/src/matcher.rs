//! Canned-reply lookup.

use rand::seq::IteratorRandom;
use rand::Rng;
use sglipa_core::{tokenize, trigger_key};
use std::collections::{HashSet, VecDeque};

use crate::replies::ReplyMemory;

/// Chance that a loosely matching key fires.
pub const FUZZY_MATCH_PROBABILITY: f64 = 0.3;

/// Find a stored reply for `text`.
///
/// An exact trigger-key hit always answers. Otherwise keys sharing at least
/// one token with the input are tried, those sharing the most distinct
/// tokens first (ties in key order), and each fires with probability
/// [`FUZZY_MATCH_PROBABILITY`].
pub fn find_reply<'a, R: Rng + ?Sized>(
    replies: &'a ReplyMemory,
    text: &str,
    rng: &mut R,
) -> Option<&'a str> {
    let key = trigger_key(text)?;
    if let Some(list) = replies.get(&key) {
        return pick(list, rng);
    }

    let tokens = tokenize(text);
    let input: HashSet<&str> = tokens.iter().collect();

    let mut candidates: Vec<(usize, &VecDeque<String>)> = replies
        .iter()
        .filter(|(_, list)| !list.is_empty())
        .filter_map(|(key, list)| {
            let shared: HashSet<&str> = key.split(' ').filter(|w| input.contains(w)).collect();
            (!shared.is_empty()).then_some((shared.len(), list))
        })
        .collect();
    // Stable: equal overlaps keep key order.
    candidates.sort_by(|a, b| b.0.cmp(&a.0));

    for (_, list) in candidates {
        if rng.gen_bool(FUZZY_MATCH_PROBABILITY) {
            return pick(list, rng);
        }
    }
    None
}

fn pick<'a, R: Rng + ?Sized>(list: &'a VecDeque<String>, rng: &mut R) -> Option<&'a str> {
    list.iter().choose(rng).map(String::as_str)
}
