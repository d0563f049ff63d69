//! Text normalization and tokenization.
//!
//! A token is either a run of Cyrillic/Latin letters and digits or a single
//! sentence terminator (`.`, `!`, `?`). Links and @-mentions are dropped
//! before matching, and everything is lower-cased.

use regex::Regex;
use std::sync::LazyLock;

static RE_URL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"http\S+").unwrap());
static RE_MENTION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"@\w+").unwrap());
static RE_TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[а-яёa-z0-9]+|[.!?]").unwrap());

/// Reserved transition-table key for "a learned message started here".
///
/// Contains `_`, which never matches the token pattern, so it cannot
/// collide with a learned token.
pub const START_MARKER: &str = "_start";

/// Number of leading tokens that form a reply trigger key.
pub const TRIGGER_KEY_TOKENS: usize = 3;

/// Strip links and mentions, lower-case and trim.
pub fn normalize(text: &str) -> String {
    let text = RE_URL.replace_all(text, "");
    let text = RE_MENTION.replace_all(&text, "");
    text.to_lowercase().trim().to_string()
}

/// Tokenize `text`. The returned value owns the normalized text and yields
/// tokens lazily; iterate it as many times as needed.
pub fn tokenize(text: &str) -> Tokens {
    Tokens {
        normalized: normalize(text),
    }
}

/// Trigger key of a message: its first three tokens joined by single spaces.
/// `None` when the text has no tokens at all.
pub fn trigger_key(text: &str) -> Option<String> {
    let tokens = tokenize(text);
    let head: Vec<&str> = tokens.iter().take(TRIGGER_KEY_TOKENS).collect();
    if head.is_empty() {
        None
    } else {
        Some(head.join(" "))
    }
}

pub fn is_terminator(token: &str) -> bool {
    matches!(token, "." | "!" | "?")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tokens {
    normalized: String,
}

impl Tokens {
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        RE_TOKEN.find_iter(&self.normalized).map(|m| m.as_str())
    }

    pub fn count(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.iter().map(str::to_string).collect()
    }
}
