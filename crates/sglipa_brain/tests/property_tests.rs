//! Property-based tests for the brain's data structures and generator.

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use sglipa_brain::learner::learn_message;
use sglipa_brain::{generate, weighted_choice, BrainState, Edges, ReplyMemory};
use sglipa_core::{tokenize, Settings};
use std::collections::HashSet;

fn arb_edges() -> impl Strategy<Value = Edges> {
    prop::collection::btree_map("[a-zа-я]{1,6}|[.!?]", 1u32..1000, 1..20)
}

fn arb_message() -> impl Strategy<Value = String> {
    "[а-яa-z]{1,5}( [а-яa-z]{1,5}| ?[.!?]){0,10}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// **Membership**: weighted choice always returns a key of the map.
    #[test]
    fn weighted_choice_returns_member(edges in arb_edges(), seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        for _ in 0..20 {
            let picked = weighted_choice(&edges, &mut rng);
            prop_assert!(picked.is_some_and(|k| edges.contains_key(k)));
        }
    }

    /// **Reply cap**: lists stay ≤ cap, duplicate-free, and keep the newest reply.
    #[test]
    fn reply_memory_bounded_and_unique(
        replies in prop::collection::vec("[a-e]{1,2}", 1..80),
        cap in 1usize..25,
    ) {
        let mut memory = ReplyMemory::new(cap);
        for reply in &replies {
            memory.insert("key", reply);
            let list = memory.get("key").unwrap();
            prop_assert!(list.len() <= cap);
            let unique: HashSet<&String> = list.iter().collect();
            prop_assert_eq!(unique.len(), list.len());
            prop_assert!(list.contains(reply));
        }
    }

    /// **Min tokens**: short messages never change the brain.
    #[test]
    fn short_messages_are_ignored(text in "\\PC{0,40}", min in 1usize..8) {
        let settings = Settings { min_words_to_learn: min, ..Default::default() };
        prop_assume!(tokenize(&text).count() < min);
        let mut state = BrainState::default();
        prop_assert!(!learn_message(&mut state, &settings, &text));
        prop_assert_eq!(state, BrainState::default());
    }

    /// **Rendering**: generated text never has a space before a terminator,
    /// and any learned message of two or more tokens makes generation possible.
    #[test]
    fn generated_text_is_well_formed(
        messages in prop::collection::vec(arb_message(), 1..15),
        seed in any::<u64>(),
    ) {
        let settings = Settings::default();
        let mut state = BrainState::default();
        let mut learned_any = false;
        for m in &messages {
            learned_any |= learn_message(&mut state, &settings, m);
        }
        prop_assume!(learned_any);

        let mut rng = StdRng::seed_from_u64(seed);
        for _ in 0..10 {
            let text = generate(&state.chains, None, &mut rng);
            prop_assert!(text.is_some());
            let text = text.unwrap();
            for p in [" .", " !", " ?"] {
                prop_assert!(!text.contains(p), "{:?}", text);
            }
            prop_assert_eq!(text.trim(), text.as_str());
        }
    }
}
