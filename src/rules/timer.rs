//! Session clock.
//!
//! Starts lazily the first time it is asked to, freezes exactly once when the
//! session completes. Time is always passed in, so the clock never reads the
//! system time itself.

use std::time::{Duration, Instant};

/// Elapsed-time tracker for one session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GameClock {
    started_at: Option<Instant>,
    frozen: Option<Duration>,
}

impl GameClock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the clock if it has not started yet. Returns true if this call
    /// started it.
    pub fn ensure_started(&mut self, now: Instant) -> bool {
        if self.started_at.is_some() || self.frozen.is_some() {
            return false;
        }
        self.started_at = Some(now);
        true
    }

    #[must_use]
    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    /// Started and not yet frozen.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.started_at.is_some() && self.frozen.is_none()
    }

    /// Time since start, or the frozen duration once stopped.
    #[must_use]
    pub fn elapsed(&self, now: Instant) -> Duration {
        if let Some(frozen) = self.frozen {
            return frozen;
        }
        self.started_at
            .map_or(Duration::ZERO, |start| now.saturating_duration_since(start))
    }

    /// Stop the clock and return the final duration.
    ///
    /// Only the first call records a value; later calls return it unchanged.
    pub fn freeze(&mut self, now: Instant) -> Duration {
        if let Some(frozen) = self.frozen {
            return frozen;
        }
        let duration = self.elapsed(now);
        self.frozen = Some(duration);
        duration
    }

    /// The recorded final duration, once frozen.
    #[must_use]
    pub fn frozen(&self) -> Option<Duration> {
        self.frozen
    }
}

/// Format a duration as `m:ss.cc` (minutes, seconds, centiseconds).
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let total_centis = duration.as_millis() / 10;
    let minutes = total_centis / 6000;
    let seconds = (total_centis / 100) % 60;
    let centis = total_centis % 100;
    format!("{minutes}:{seconds:02}.{centis:02}")
}
