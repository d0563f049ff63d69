//! The brain as one owned, shareable object.
//!
//! Chat events are processed one at a time by a single writer; status
//! readers may call [`Brain::stats`] concurrently at any moment.

use sglipa_core::{ChatMessage, SglipaConfig, Settings, Stats};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};

use crate::learner;
use crate::persistence::SavePolicy;
use crate::policy::ResponsePolicy;
use crate::store::{self, BrainError, BrainState};
use crate::{generator, matcher};

/// Learned state plus settings, persistence and response policy.
///
/// Lock ordering (to prevent deadlocks):
///   save_gate → state → settings
pub struct Brain {
    state: Arc<RwLock<BrainState>>,
    settings: RwLock<Settings>,
    /// Serializes snapshot writes and holds the debounce timer.
    save_gate: Mutex<SavePolicy>,
    policy: ResponsePolicy,
    brain_path: PathBuf,
    settings_path: PathBuf,
    vocabulary_cap: usize,
}

impl Brain {
    /// Load brain and settings from the paths in `config`. Missing or
    /// unreadable files yield an empty brain and default settings.
    pub async fn open(config: &SglipaConfig) -> Self {
        let state =
            BrainState::load_or_empty(&config.brain.brain_path, config.brain.reply_cap).await;
        let settings = Settings::load_or(&config.brain.settings_path, &config.defaults);
        tracing::info!(
            "Brain ready: reply chance {}%, learning {}",
            settings.reply_chance_percent,
            if settings.learning_enabled { "on" } else { "off" }
        );
        Self::with_state(state, settings, config)
    }

    /// Build around already-loaded state.
    pub fn with_state(state: BrainState, settings: Settings, config: &SglipaConfig) -> Self {
        Self {
            state: Arc::new(RwLock::new(state)),
            settings: RwLock::new(settings),
            save_gate: Mutex::new(SavePolicy::new(Duration::from_secs(
                config.brain.save_interval_secs,
            ))),
            policy: ResponsePolicy::new(config.bot.name.as_deref()),
            brain_path: config.brain.brain_path.clone(),
            settings_path: config.brain.settings_path.clone(),
            vocabulary_cap: config.brain.vocabulary_cap,
        }
    }

    /// Shared handle to the learned state, for read-only observers.
    pub fn state(&self) -> Arc<RwLock<BrainState>> {
        self.state.clone()
    }

    /// Process one inbound chat message: learn from it, maybe answer, and
    /// flush to disk if the debounce interval has passed.
    pub async fn on_message(&self, msg: &ChatMessage) -> Option<String> {
        let settings = self.settings.read().await.clone();
        let reply = {
            let mut state = self.state.write().await;
            learner::learn_message(&mut state, &settings, &msg.text);
            if let Some(original) = msg.reply_to_text.as_deref() {
                learner::learn_reply(&mut state, &settings, original, &msg.text);
            }

            let mut rng = rand::thread_rng();
            if self.policy.should_respond(msg, &settings, &mut rng) {
                self.policy.compose(&state, &msg.text, &mut rng)
            } else {
                None
            }
        };
        tracing::debug!("Processed message, answering: {}", reply.is_some());

        if let Err(e) = self.maybe_save().await {
            tracing::error!("Failed to save brain: {}", e);
        }
        reply
    }

    pub async fn learn_message(&self, text: &str) -> bool {
        let settings = self.settings.read().await.clone();
        let mut state = self.state.write().await;
        learner::learn_message(&mut state, &settings, text)
    }

    pub async fn learn_reply(&self, trigger: &str, reply: &str) -> bool {
        let settings = self.settings.read().await.clone();
        let mut state = self.state.write().await;
        learner::learn_reply(&mut state, &settings, trigger, reply)
    }

    /// Generate text, steered by `seed` when given.
    pub async fn generate(&self, seed: Option<&str>) -> Option<String> {
        let state = self.state.read().await;
        let mut rng = rand::thread_rng();
        generator::generate(&state.chains, seed, &mut rng)
    }

    /// Operator-requested utterance. A blank seed counts as no seed.
    pub async fn say(&self, seed: Option<&str>) -> Option<String> {
        let seed = seed.map(str::trim).filter(|s| !s.is_empty());
        let text = self.generate(seed).await;
        if text.is_none() {
            tracing::debug!("Nothing to say yet");
        }
        text
    }

    pub async fn find_reply(&self, text: &str) -> Option<String> {
        let state = self.state.read().await;
        let mut rng = rand::thread_rng();
        matcher::find_reply(&state.replies, text, &mut rng).map(str::to_string)
    }

    /// Consistent view of all counters.
    pub async fn stats(&self) -> Stats {
        let state = self.state.read().await;
        let settings = self.settings.read().await;
        Stats {
            vocabulary_size: state.words.len(),
            transition_key_count: state.chains.key_count(),
            reply_key_count: state.replies.key_count(),
            reply_chance_percent: settings.reply_chance_percent,
            learning_enabled: settings.learning_enabled,
        }
    }

    pub async fn settings(&self) -> Settings {
        self.settings.read().await.clone()
    }

    /// Write a snapshot if the debounce interval has passed. Returns whether
    /// a write happened.
    pub async fn maybe_save(&self) -> Result<bool, BrainError> {
        let mut gate = self.save_gate.lock().await;
        if !gate.is_due() {
            return Ok(false);
        }
        let bytes = self.encode().await?;
        store::write_snapshot(&self.brain_path, &bytes).await?;
        gate.mark_saved();
        tracing::info!("Brain saved to {}", self.brain_path.display());
        Ok(true)
    }

    /// Write a snapshot now, regardless of the debounce timer.
    pub async fn save(&self) -> Result<(), BrainError> {
        let mut gate = self.save_gate.lock().await;
        let bytes = self.encode().await?;
        store::write_snapshot(&self.brain_path, &bytes).await?;
        gate.mark_saved();
        tracing::info!("Brain saved to {}", self.brain_path.display());
        Ok(())
    }

    /// Forget everything and persist the empty brain immediately.
    ///
    /// The in-memory state is cleared even if the write fails.
    pub async fn reset(&self) -> Result<(), BrainError> {
        let mut gate = self.save_gate.lock().await;
        let bytes = {
            let mut state = self.state.write().await;
            state.clear();
            state.to_json(self.vocabulary_cap)?
        };
        store::write_snapshot(&self.brain_path, &bytes).await?;
        gate.mark_saved();
        tracing::info!("Brain reset");
        Ok(())
    }

    pub async fn set_learning_enabled(&self, enabled: bool) -> Result<(), BrainError> {
        let mut settings = self.settings.write().await;
        settings.learning_enabled = enabled;
        settings.save(&self.settings_path)?;
        Ok(())
    }

    /// Flip learning on/off; returns the new value.
    pub async fn toggle_learning(&self) -> Result<bool, BrainError> {
        let mut settings = self.settings.write().await;
        settings.learning_enabled = !settings.learning_enabled;
        let enabled = settings.learning_enabled;
        settings.save(&self.settings_path)?;
        Ok(enabled)
    }

    /// Set the unprompted reply chance, clamped into 0..=100; returns the
    /// value actually stored.
    pub async fn set_reply_chance_percent(&self, percent: i64) -> Result<u8, BrainError> {
        let mut settings = self.settings.write().await;
        settings.set_reply_chance(percent);
        let stored = settings.reply_chance_percent;
        settings.save(&self.settings_path)?;
        Ok(stored)
    }

    async fn encode(&self) -> Result<Vec<u8>, BrainError> {
        self.state.read().await.to_json(self.vocabulary_cap)
    }
}
