//! Engine configuration parameters.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Engine configuration parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Pairs per deck (default: 10, i.e. 20 cards).
    /// Independent of player count.
    pub pair_count: usize,

    /// How long a mismatched pair stays face up, in milliseconds.
    /// Long enough for a human to register both faces.
    pub mismatch_delay_ms: u64,

    /// How long the "just matched" highlight lasts, in milliseconds.
    pub highlight_delay_ms: u64,

    /// How long the score-change flash lasts, in milliseconds.
    pub score_flash_ms: u64,

    /// How long the completion celebration lasts, in milliseconds.
    pub celebration_ms: u64,

    /// Random seed for dealing. `None` seeds from entropy.
    pub seed: Option<u64>,

    /// Longest accepted player name, in characters.
    pub max_name_len: usize,

    /// Buffered UI events per subscriber before the oldest are dropped.
    pub event_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            pair_count: 10,
            mismatch_delay_ms: 1000,
            highlight_delay_ms: 500,
            score_flash_ms: 1000,
            celebration_ms: 5000,
            seed: None,
            max_name_len: 20,
            event_capacity: 64,
        }
    }
}

impl EngineConfig {
    /// Set a fixed dealing seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the number of pairs per deck.
    pub fn with_pair_count(mut self, pairs: usize) -> Self {
        self.pair_count = pairs.max(1);
        self
    }

    /// Set the mismatch reveal delay.
    pub fn with_mismatch_delay(mut self, delay: Duration) -> Self {
        self.mismatch_delay_ms = delay.as_millis() as u64;
        self
    }

    /// Set the match highlight delay.
    pub fn with_highlight_delay(mut self, delay: Duration) -> Self {
        self.highlight_delay_ms = delay.as_millis() as u64;
        self
    }

    /// Set the longest accepted player name.
    pub fn with_max_name_len(mut self, len: usize) -> Self {
        self.max_name_len = len;
        self
    }

    pub fn mismatch_delay(&self) -> Duration {
        Duration::from_millis(self.mismatch_delay_ms)
    }

    pub fn highlight_delay(&self) -> Duration {
        Duration::from_millis(self.highlight_delay_ms)
    }

    pub fn score_flash_delay(&self) -> Duration {
        Duration::from_millis(self.score_flash_ms)
    }

    pub fn celebration_delay(&self) -> Duration {
        Duration::from_millis(self.celebration_ms)
    }
}
