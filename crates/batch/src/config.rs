//! Scheduler configuration

use turbostack_types::{DEFAULT_BATCH_SIZE, DEFAULT_IDLE_TICKS};

/// Batching thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchConfig {
    /// Queued input count that triggers an immediate flush.
    pub batch_size_threshold: usize,
    /// Consecutive ticks without new input before a flush.
    pub idle_ticks: u32,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size_threshold: DEFAULT_BATCH_SIZE,
            idle_ticks: DEFAULT_IDLE_TICKS,
        }
    }
}

impl BatchConfig {
    pub fn new(batch_size_threshold: usize) -> Self {
        Self {
            batch_size_threshold,
            ..Self::default()
        }
    }

    /// Create from environment variables
    ///
    /// - `TURBOSTACK_BATCH_SIZE`: flush threshold (default 512)
    /// - `TURBOSTACK_IDLE_TICKS`: quiet ticks before flushing (default 3)
    pub fn from_env() -> Self {
        use std::env;

        let batch_size_threshold = env::var("TURBOSTACK_BATCH_SIZE")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(DEFAULT_BATCH_SIZE);

        let idle_ticks = env::var("TURBOSTACK_IDLE_TICKS")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(DEFAULT_IDLE_TICKS);

        Self {
            batch_size_threshold,
            idle_ticks,
        }
        .normalized()
    }

    /// Clamp both thresholds to at least 1.
    pub fn normalized(self) -> Self {
        Self {
            batch_size_threshold: self.batch_size_threshold.max(1),
            idle_ticks: self.idle_ticks.max(1),
        }
    }
}
