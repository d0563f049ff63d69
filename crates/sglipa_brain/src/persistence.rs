//! Debounced snapshot scheduling.

use std::time::Duration;
use tokio::time::Instant;

pub const DEFAULT_SAVE_INTERVAL: Duration = Duration::from_secs(60);

/// Tracks when the brain was last written and whether another write is due.
#[derive(Debug, Clone)]
pub struct SavePolicy {
    interval: Duration,
    last_save: Instant,
}

impl Default for SavePolicy {
    fn default() -> Self {
        Self::new(DEFAULT_SAVE_INTERVAL)
    }
}

impl SavePolicy {
    /// The interval starts counting now.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_save: Instant::now(),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// A write is due once strictly more than `interval` has passed.
    pub fn is_due(&self) -> bool {
        self.last_save.elapsed() > self.interval
    }

    /// Call only after a write succeeded; a failed write stays due.
    pub fn mark_saved(&mut self) {
        self.last_save = Instant::now();
    }
}
