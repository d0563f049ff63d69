//! Operator-tunable runtime settings, persisted as a small JSON file.

use serde::{Deserialize, Deserializer, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to access settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed settings file {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Runtime behaviour switches.
///
/// Serialized with the short key names used by existing `settings.json`
/// files: `reply_chance`, `learn`, `min_words`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Chance (0..=100) of answering a message nobody addressed to the bot.
    #[serde(rename = "reply_chance", deserialize_with = "clamped_percent")]
    pub reply_chance_percent: u8,
    #[serde(rename = "learn")]
    pub learning_enabled: bool,
    /// Messages with fewer tokens than this are not learned from.
    #[serde(rename = "min_words")]
    pub min_words_to_learn: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            reply_chance_percent: 15,
            learning_enabled: true,
            min_words_to_learn: 2,
        }
    }
}

impl Settings {
    pub const MAX_REPLY_CHANCE: u8 = 100;

    /// Set the reply chance, clamping into 0..=100. Accepts any integer so
    /// raw operator input can be passed straight through.
    pub fn set_reply_chance(&mut self, percent: i64) {
        self.reply_chance_percent = percent.clamp(0, Self::MAX_REPLY_CHANCE as i64) as u8;
    }

    /// Read settings from `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let raw = std::fs::read(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_slice(&raw).map_err(|source| SettingsError::Malformed {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read settings from `path`, falling back to `defaults` when the file
    /// is missing or unreadable.
    pub fn load_or<P: AsRef<Path>>(path: P, defaults: &Settings) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(SettingsError::Io { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                tracing::info!("No settings file yet, using defaults");
                defaults.clone()
            }
            Err(e) => {
                tracing::warn!("{}; using defaults", e);
                defaults.clone()
            }
        }
    }

    /// Persist to `path` via write-temp-then-rename.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SettingsError> {
        let path = path.as_ref();
        let io_err = |source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        };
        let json = serde_json::to_vec(self).map_err(|source| SettingsError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;
        let tmp = tmp_path(path);
        let mut file = std::fs::File::create(&tmp).map_err(io_err)?;
        file.write_all(&json).map_err(io_err)?;
        file.sync_all().map_err(io_err)?;
        std::fs::rename(&tmp, path).map_err(io_err)?;
        Ok(())
    }
}

/// Out-of-range stored chances are clamped rather than rejected, so the
/// other keys in the file survive.
fn clamped_percent<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    let raw = i64::deserialize(deserializer)?;
    Ok(raw.clamp(0, i64::from(Settings::MAX_REPLY_CHANCE)) as u8)
}

/// Sibling temp file used for atomic replacement of `path`.
pub fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
