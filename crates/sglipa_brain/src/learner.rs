//! Learning from observed chat.

use sglipa_core::{tokenize, trigger_key, Settings};

use crate::store::BrainState;

/// Learn word order from one message.
///
/// Skipped when learning is off or the message has fewer tokens than
/// `settings.min_words_to_learn`. Returns whether anything was learned.
pub fn learn_message(state: &mut BrainState, settings: &Settings, text: &str) -> bool {
    if !settings.learning_enabled {
        return false;
    }
    let tokens = tokenize(text);
    let tokens: Vec<&str> = tokens.iter().collect();
    if tokens.is_empty() || tokens.len() < settings.min_words_to_learn {
        return false;
    }

    for token in &tokens {
        state.words.insert(token);
    }
    for pair in tokens.windows(2) {
        state.chains.increment(pair[0], pair[1]);
    }
    if tokens.len() >= 2 {
        state.chains.record_start(tokens[0]);
    }
    true
}

/// Remember `reply` as an answer to messages opening like `trigger`.
///
/// Returns whether the reply was newly stored.
pub fn learn_reply(state: &mut BrainState, settings: &Settings, trigger: &str, reply: &str) -> bool {
    if !settings.learning_enabled || reply.trim().is_empty() {
        return false;
    }
    match trigger_key(trigger) {
        Some(key) => state.replies.insert(&key, reply),
        None => false,
    }
}
