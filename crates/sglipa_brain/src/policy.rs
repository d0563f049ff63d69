//! Deciding whether and how to answer a chat message.

use rand::Rng;
use sglipa_core::{ChatMessage, Settings};

use crate::generator;
use crate::matcher;
use crate::store::BrainState;

/// Chance of answering from reply memory when it has something to offer.
pub const MEMORY_PREFERENCE: f64 = 0.4;

#[derive(Debug, Clone, Default)]
pub struct ResponsePolicy {
    /// Lower-cased bot username, if known.
    bot_name: Option<String>,
}

impl ResponsePolicy {
    pub fn new(bot_name: Option<&str>) -> Self {
        let bot_name = bot_name
            .map(|n| n.trim().trim_start_matches('@').to_lowercase())
            .filter(|n| !n.is_empty());
        Self { bot_name }
    }

    /// The message mentions the bot by name or replies to it.
    pub fn is_addressed(&self, msg: &ChatMessage) -> bool {
        let mentioned = self
            .bot_name
            .as_deref()
            .is_some_and(|name| msg.text.to_lowercase().contains(name));
        mentioned || msg.is_reply_to_bot
    }

    /// Addressed messages always get an answer; others with
    /// `reply_chance_percent` probability.
    pub fn should_respond<R: Rng + ?Sized>(
        &self,
        msg: &ChatMessage,
        settings: &Settings,
        rng: &mut R,
    ) -> bool {
        self.is_addressed(msg) || rng.gen_range(1..=100u8) <= settings.reply_chance_percent
    }

    /// Build an answer to `text`: a remembered reply 40% of the time when one
    /// matches, a generated one otherwise.
    pub fn compose<R: Rng + ?Sized>(
        &self,
        state: &BrainState,
        text: &str,
        rng: &mut R,
    ) -> Option<String> {
        if state.chains.is_empty() {
            return None;
        }
        if let Some(reply) = matcher::find_reply(&state.replies, text, rng) {
            if rng.gen_bool(MEMORY_PREFERENCE) {
                return Some(reply.to_string());
            }
        }
        generator::generate(&state.chains, Some(text), rng)
    }
}
