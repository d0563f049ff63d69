//! Property-based tests for the tokenizer.
//!
//! Tokens feed every table in the brain, so their shape must hold for
//! arbitrary input, not just chat-looking strings.

use proptest::prelude::*;
use sglipa_core::{is_terminator, tokenize, trigger_key};

fn is_word_char(c: char) -> bool {
    matches!(c, 'а'..='я' | 'ё' | 'a'..='z' | '0'..='9')
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// **Token shape**: every token is a non-empty word run or exactly one terminator.
    #[test]
    fn tokens_are_words_or_single_terminators(s in "\\PC{0,200}") {
        for token in tokenize(&s).iter() {
            prop_assert!(!token.is_empty());
            prop_assert!(
                is_terminator(token) || token.chars().all(is_word_char),
                "bad token {:?} from {:?}", token, s
            );
        }
    }

    /// **Never panics** and is a pure function of its input.
    #[test]
    fn tokenize_is_deterministic(s in "\\PC{0,300}") {
        prop_assert_eq!(tokenize(&s).to_vec(), tokenize(&s).to_vec());
    }

    /// **Case folding**: upper- and lower-case input tokenize identically.
    #[test]
    fn tokenize_ignores_case(s in "[a-zA-Zа-яА-Я .!?]{0,80}") {
        // `http` prefixes are stripped before folding, so keep them out.
        prop_assume!(!s.to_lowercase().contains("http"));
        prop_assert_eq!(tokenize(&s).to_vec(), tokenize(&s.to_uppercase()).to_vec());
    }

    /// **Trigger key**: at most three tokens, all taken from the front.
    #[test]
    fn trigger_key_is_token_prefix(s in "\\PC{0,200}") {
        let tokens = tokenize(&s).to_vec();
        match trigger_key(&s) {
            None => prop_assert!(tokens.is_empty()),
            Some(key) => {
                let parts: Vec<&str> = key.split(' ').collect();
                prop_assert!(parts.len() <= 3);
                prop_assert_eq!(parts, tokens.iter().take(3).map(String::as_str).collect::<Vec<_>>());
            }
        }
    }
}
