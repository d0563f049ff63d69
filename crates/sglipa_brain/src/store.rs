//! Brain store: the three learned structures and their JSON snapshot.
//!
//! Snapshot layout (compatible with existing `brain.json` files):
//! `{"chains": {tok: {tok: n}}, "replies": {key: [reply]}, "words": [tok]}`.

use serde::{Deserialize, Serialize};
use sglipa_core::settings::tmp_path;
use sglipa_core::SettingsError;
use std::collections::{BTreeMap, VecDeque};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

use crate::chains::TransitionTable;
use crate::replies::ReplyMemory;
use crate::vocabulary::Vocabulary;

#[derive(Debug, thiserror::Error)]
pub enum BrainError {
    #[error("snapshot I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed snapshot {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),
    #[error(transparent)]
    Settings(#[from] SettingsError),
}

impl BrainError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}

/// On-disk form of the brain, as read back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub chains: BTreeMap<String, BTreeMap<String, u32>>,
    pub replies: BTreeMap<String, Vec<String>>,
    pub words: Vec<String>,
}

#[derive(Serialize)]
struct SnapshotRef<'a> {
    chains: &'a BTreeMap<String, BTreeMap<String, u32>>,
    replies: &'a BTreeMap<String, VecDeque<String>>,
    words: Vec<&'a str>,
}

/// Everything the brain has learned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrainState {
    pub chains: TransitionTable,
    pub replies: ReplyMemory,
    pub words: Vocabulary,
}

impl BrainState {
    pub fn new(reply_cap: usize) -> Self {
        Self {
            chains: TransitionTable::new(),
            replies: ReplyMemory::new(reply_cap),
            words: Vocabulary::new(),
        }
    }

    /// Rebuild state from a snapshot, repairing any broken invariants.
    pub fn from_snapshot(snapshot: Snapshot, reply_cap: usize) -> Self {
        Self {
            chains: TransitionTable::from_raw(snapshot.chains),
            replies: ReplyMemory::from_raw(snapshot.replies, reply_cap),
            words: Vocabulary::from_words(snapshot.words),
        }
    }

    /// Load from `path`; a missing or malformed file yields an empty brain.
    pub async fn load_or_empty(path: &Path, reply_cap: usize) -> Self {
        match read_snapshot(path).await {
            Ok(snapshot) => {
                let state = Self::from_snapshot(snapshot, reply_cap);
                tracing::info!(
                    "Loaded brain from {}: {} words, {} chains, {} reply keys",
                    path.display(),
                    state.words.len(),
                    state.chains.key_count(),
                    state.replies.key_count()
                );
                state
            }
            Err(e) if e.is_not_found() => {
                tracing::info!("No brain snapshot at {}, starting empty", path.display());
                Self::new(reply_cap)
            }
            Err(e) => {
                tracing::warn!("{}; starting with an empty brain", e);
                Self::new(reply_cap)
            }
        }
    }

    /// Serialize, keeping only the `vocabulary_cap` most recent words.
    pub fn to_json(&self, vocabulary_cap: usize) -> Result<Vec<u8>, BrainError> {
        let snapshot = SnapshotRef {
            chains: self.chains.rows(),
            replies: self.replies.entries(),
            words: self.words.snapshot(vocabulary_cap),
        };
        Ok(serde_json::to_vec(&snapshot)?)
    }

    pub fn clear(&mut self) {
        self.chains.clear();
        self.replies.clear();
        self.words.clear();
    }
}

pub async fn read_snapshot(path: &Path) -> Result<Snapshot, BrainError> {
    let raw = tokio::fs::read(path)
        .await
        .map_err(|e| BrainError::io(path, e))?;
    serde_json::from_slice(&raw).map_err(|source| BrainError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}

/// Replace `path` with `bytes` via a sibling temp file and rename, so a
/// crash never leaves a truncated snapshot behind.
pub async fn write_snapshot(path: &Path, bytes: &[u8]) -> Result<(), BrainError> {
    let tmp = tmp_path(path);
    let mut file = tokio::fs::File::create(&tmp)
        .await
        .map_err(|e| BrainError::io(&tmp, e))?;
    file.write_all(bytes)
        .await
        .map_err(|e| BrainError::io(&tmp, e))?;
    file.sync_all()
        .await
        .map_err(|e| BrainError::io(&tmp, e))?;
    drop(file);
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|e| BrainError::io(path, e))
}
