//! Text generation: a weighted random walk over the transition table.

use rand::seq::IteratorRandom;
use rand::Rng;
use sglipa_core::{is_terminator, tokenize};

use crate::chains::{Edges, TransitionTable};

/// Walk length bounds, inclusive.
pub const MIN_WALK_STEPS: usize = 3;
pub const MAX_WALK_STEPS: usize = 15;

/// Chance of ending the walk right after emitting a sentence terminator.
pub const TERMINATOR_STOP_PROBABILITY: f64 = 0.7;

/// Pick a key with probability proportional to its count.
///
/// Draws uniformly from `[0, total]` and returns the first key (in map
/// order) whose running sum reaches the draw. Should rounding leave no key
/// selected, a uniformly random key is returned instead. `None` only for an
/// empty map.
pub fn weighted_choice<'a, R: Rng + ?Sized>(weights: &'a Edges, rng: &mut R) -> Option<&'a str> {
    let total: u64 = weights.values().map(|&w| u64::from(w)).sum();
    if total == 0 {
        return weights.keys().choose(rng).map(String::as_str);
    }
    let draw = rng.gen_range(0.0..=total as f64);
    let mut cumulative = 0.0;
    for (key, &weight) in weights {
        cumulative += f64::from(weight);
        if draw <= cumulative {
            return Some(key.as_str());
        }
    }
    weights.keys().choose(rng).map(String::as_str)
}

/// Choose where a walk begins.
///
/// The first seed token that has outgoing edges wins; otherwise a weighted
/// pick among message openers; otherwise any source token.
pub fn pick_start<'a, R: Rng + ?Sized>(
    chains: &'a TransitionTable,
    seed: Option<&str>,
    rng: &mut R,
) -> Option<&'a str> {
    if let Some(seed) = seed {
        let seeded = tokenize(seed).iter().find_map(|t| chains.source_key(t));
        if seeded.is_some() {
            return seeded;
        }
    }
    if let Some(openers) = chains.start_edges() {
        return weighted_choice(openers, rng);
    }
    chains.tokens().choose(rng)
}

/// Generate a short utterance, optionally steering the start with `seed`.
///
/// Returns `None` for an empty model, when no start token exists, or when
/// the walk produced fewer than two tokens.
pub fn generate<R: Rng + ?Sized>(
    chains: &TransitionTable,
    seed: Option<&str>,
    rng: &mut R,
) -> Option<String> {
    if chains.is_empty() {
        return None;
    }
    let start = pick_start(chains, seed, rng)?;

    let mut words = vec![start];
    let mut current = start;
    let steps = rng.gen_range(MIN_WALK_STEPS..=MAX_WALK_STEPS);
    for _ in 0..steps {
        let Some(next) = chains.successors(current).and_then(|edges| weighted_choice(edges, rng))
        else {
            break;
        };
        words.push(next);
        if is_terminator(next) && rng.gen_bool(TERMINATOR_STOP_PROBABILITY) {
            break;
        }
        current = next;
    }

    if words.len() < 2 {
        return None;
    }
    Some(render(&words))
}

/// Join tokens into display text: single spaces between words, none before
/// terminators, first letter capitalized.
pub fn render(tokens: &[&str]) -> String {
    let mut text = String::new();
    for token in tokens {
        if !text.is_empty() && !is_terminator(token) {
            text.push(' ');
        }
        text.push_str(token);
    }
    let text = text.trim();

    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() => first.to_uppercase().chain(chars).collect(),
        _ => text.to_string(),
    }
}
