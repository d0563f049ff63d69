pub mod config;
pub mod settings;
pub mod tokenizer;

pub use config::{BotConfig, BrainConfig, SglipaConfig};
pub use settings::{Settings, SettingsError};
pub use tokenizer::{is_terminator, tokenize, trigger_key, Tokens, START_MARKER};

use serde::{Deserialize, Serialize};

/// One inbound chat message as seen by the brain.
///
/// The transport layer (whatever delivers chat events) fills this in; the
/// brain never talks to the transport directly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub text: String,
    /// The message is a reply to something the bot itself said.
    #[serde(default)]
    pub is_reply_to_bot: bool,
    /// Text of the message this one replies to, if any.
    #[serde(default)]
    pub reply_to_text: Option<String>,
}

impl ChatMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_reply_to_bot: false,
            reply_to_text: None,
        }
    }

    /// Mark this message as a reply to `original`.
    pub fn replying_to(mut self, original: impl Into<String>, from_bot: bool) -> Self {
        self.reply_to_text = Some(original.into());
        self.is_reply_to_bot = from_bot;
        self
    }
}

/// Aggregate counters exposed to status readers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub vocabulary_size: usize,
    pub transition_key_count: usize,
    pub reply_key_count: usize,
    pub reply_chance_percent: u8,
    pub learning_enabled: bool,
}
