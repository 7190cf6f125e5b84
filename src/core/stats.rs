//! Solo best-time records.
//!
//! Stats are only meaningful in single-player mode. Durations persist as
//! whole milliseconds (`{"bestTime":41250,"lastGameTime":52800}`).

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Persisted completion times for solo play.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStats {
    #[serde(default, with = "millis")]
    pub best_time: Option<Duration>,
    #[serde(default, with = "millis")]
    pub last_game_time: Option<Duration>,
}

/// Outcome of folding one completed session into the stats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatsUpdate {
    /// Stats before the session was recorded.
    pub previous: GameStats,
    /// Stats to persist.
    pub stats: GameStats,
    /// The session beat (or set the first) best time.
    pub is_new_best: bool,
}

impl GameStats {
    /// True when `duration` beats the recorded best, or no best exists.
    #[must_use]
    pub fn is_new_best(&self, duration: Duration) -> bool {
        self.best_time.map_or(true, |best| duration < best)
    }

    /// Fold a completed session's duration into the stats.
    ///
    /// `best_time` becomes `min(best_time, duration)` and `last_game_time`
    /// is always `duration`.
    #[must_use]
    pub fn record(&self, duration: Duration) -> StatsUpdate {
        let is_new_best = self.is_new_best(duration);
        let stats = GameStats {
            best_time: if is_new_best { Some(duration) } else { self.best_time },
            last_game_time: Some(duration),
        };
        StatsUpdate {
            previous: *self,
            stats,
            is_new_best,
        }
    }
}

impl StatsUpdate {
    /// The best time that was beaten, if this session set a new best over
    /// an existing record.
    #[must_use]
    pub fn previous_best(&self) -> Option<Duration> {
        if self.is_new_best {
            self.previous.best_time
        } else {
            None
        }
    }
}

/// `Option<Duration>` as optional whole milliseconds.
mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(duration) => serializer.serialize_u64(duration.as_millis() as u64),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = Option::<f64>::deserialize(deserializer)?;
        Ok(millis
            .filter(|ms| ms.is_finite() && *ms >= 0.0)
            .map(|ms| Duration::from_millis(ms.round() as u64)))
    }
}
