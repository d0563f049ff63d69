use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::Settings;

// ============================================================================
// Top-level config
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SglipaConfig {
    pub brain: BrainConfig,
    pub bot: BotConfig,
    /// Settings used when no settings file has been written yet.
    pub defaults: Settings,
}

impl SglipaConfig {
    /// Load config from a TOML file, falling back to defaults for missing fields.
    /// After loading, env var overrides are applied.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;
        let mut config: SglipaConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML config")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Try to load from path; if file doesn't exist, return defaults with env overrides.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::info!("Config file not found or invalid ({}), using defaults", e);
                let mut cfg = Self::default();
                cfg.apply_env_overrides();
                cfg
            }
        }
    }

    /// Apply environment variable overrides on top of file-based config.
    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("SGLIPA_BRAIN_PATH") {
            self.brain.brain_path = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("SGLIPA_SETTINGS_PATH") {
            self.brain.settings_path = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("SGLIPA_SAVE_INTERVAL_SECS") {
            if let Ok(n) = v.parse() {
                self.brain.save_interval_secs = n;
            }
        }
        if let Ok(v) = std::env::var("SGLIPA_BOT_NAME") {
            self.bot.name = Some(v).filter(|n| !n.trim().is_empty());
        }
    }
}

// ============================================================================
// Sub-configs
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrainConfig {
    pub brain_path: PathBuf,
    pub settings_path: PathBuf,
    /// Minimum seconds between automatic snapshot writes.
    pub save_interval_secs: u64,
    /// How many vocabulary entries a snapshot keeps.
    pub vocabulary_cap: usize,
    /// How many canned replies are kept per trigger key.
    pub reply_cap: usize,
}

impl Default for BrainConfig {
    fn default() -> Self {
        Self {
            brain_path: PathBuf::from("brain.json"),
            settings_path: PathBuf::from("settings.json"),
            save_interval_secs: 60,
            vocabulary_cap: 10_000,
            reply_cap: 20,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Bot username; a message containing it counts as addressed to the bot.
    pub name: Option<String>,
    pub reply_delay_min_ms: u64,
    pub reply_delay_max_ms: u64,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: None,
            reply_delay_min_ms: 500,
            reply_delay_max_ms: 2000,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = SglipaConfig::default();
        assert_eq!(cfg.brain.brain_path, PathBuf::from("brain.json"));
        assert_eq!(cfg.brain.save_interval_secs, 60);
        assert_eq!(cfg.brain.vocabulary_cap, 10_000);
        assert_eq!(cfg.brain.reply_cap, 20);
        assert!(cfg.bot.name.is_none());
        assert_eq!(cfg.defaults, Settings::default());
    }

    #[test]
    fn test_parse_minimal_toml() {
        let toml_str = r#"
[bot]
name = "sglipa_bot"
"#;
        let cfg: SglipaConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.bot.name.as_deref(), Some("sglipa_bot"));
        // Defaults for unspecified fields
        assert_eq!(cfg.bot.reply_delay_max_ms, 2000);
        assert_eq!(cfg.brain.settings_path, PathBuf::from("settings.json"));
    }

    #[test]
    fn test_parse_full_toml() {
        let toml_str = r#"
[brain]
brain_path = "data/brain.json"
settings_path = "data/settings.json"
save_interval_secs = 15
vocabulary_cap = 500
reply_cap = 5

[bot]
name = "parrot"
reply_delay_min_ms = 0
reply_delay_max_ms = 10

[defaults]
reply_chance = 50
learn = false
min_words = 4
"#;
        let cfg: SglipaConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.brain.brain_path, PathBuf::from("data/brain.json"));
        assert_eq!(cfg.brain.save_interval_secs, 15);
        assert_eq!(cfg.brain.vocabulary_cap, 500);
        assert_eq!(cfg.brain.reply_cap, 5);
        assert_eq!(cfg.bot.reply_delay_min_ms, 0);
        assert_eq!(cfg.defaults.reply_chance_percent, 50);
        assert!(!cfg.defaults.learning_enabled);
        assert_eq!(cfg.defaults.min_words_to_learn, 4);
    }

    #[test]
    fn test_env_overrides_and_defaults() {
        // Part 1: env overrides
        std::env::set_var("SGLIPA_BOT_NAME", "envbot");
        std::env::set_var("SGLIPA_SAVE_INTERVAL_SECS", "5");

        let mut cfg = SglipaConfig::default();
        cfg.apply_env_overrides();

        assert_eq!(cfg.bot.name.as_deref(), Some("envbot"));
        assert_eq!(cfg.brain.save_interval_secs, 5);

        // Clean up env vars before testing defaults
        std::env::remove_var("SGLIPA_BOT_NAME");
        std::env::remove_var("SGLIPA_SAVE_INTERVAL_SECS");

        // Part 2: nonexistent path returns defaults (no env interference)
        let cfg = SglipaConfig::load_or_default("/nonexistent/sglipa.toml");
        assert_eq!(cfg.brain.save_interval_secs, 60);
        assert!(cfg.bot.name.is_none());
    }
}
