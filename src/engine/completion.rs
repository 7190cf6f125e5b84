//! What happens when the last pair is found.
//!
//! Multiplayer games only compute the winner. Solo games also run the
//! best-time sequence: read the stored stats, compare, write the new stats
//! back. The duration passed in is the clock's frozen value, so a slow store
//! cannot change it.

use std::time::Duration;

use crate::core::{GameStats, MemoError, Result, StatsUpdate};
use crate::rules::GameResult;
use crate::services::{PendingWrite, Persistence, StorageKey};

/// Result of the solo best-time sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StatsRecord {
    /// New stats computed and written.
    Saved(StatsUpdate),
    /// New stats computed but the write failed; `retry` repeats it.
    Unsaved {
        update: StatsUpdate,
        error: MemoError,
        retry: PendingWrite,
    },
}

impl StatsRecord {
    #[must_use]
    pub fn update(&self) -> &StatsUpdate {
        match self {
            StatsRecord::Saved(update) | StatsRecord::Unsaved { update, .. } => update,
        }
    }
}

/// Fold a solo completion into the stored stats.
///
/// Corrupt stored stats count as no stats. A failed read aborts without
/// writing, so an unreadable record is never overwritten.
pub async fn record_solo_completion(persistence: &Persistence, duration: Duration) -> Result<StatsRecord> {
    let current = match persistence.load::<GameStats>(StorageKey::Stats).await {
        Ok(stats) => stats.unwrap_or_default(),
        Err(error) if error.is_game_state() => {
            tracing::warn!(%error, "stored stats unreadable, starting fresh");
            GameStats::default()
        }
        Err(error) => return Err(error),
    };

    let update = current.record(duration);
    tracing::info!(
        ?duration,
        is_new_best = update.is_new_best,
        previous_best = ?current.best_time,
        "solo game recorded"
    );

    let write = PendingWrite::encode(StorageKey::Stats, &update.stats)?;
    match persistence.write(&write).await {
        Ok(()) => Ok(StatsRecord::Saved(update)),
        Err(error) => Ok(StatsRecord::Unsaved {
            update,
            error,
            retry: write,
        }),
    }
}

/// Whether a finished game earns the victory treatment.
///
/// Solo: only a new best time (`None` until known). Multiplayer: a sole
/// winner; ties do not celebrate.
#[must_use]
pub fn celebrates(result: &GameResult, is_new_best: Option<bool>) -> bool {
    match result {
        GameResult::Solo { .. } => is_new_best.unwrap_or(false),
        GameResult::Winner(_) => true,
        GameResult::Tie(_) => false,
    }
}
