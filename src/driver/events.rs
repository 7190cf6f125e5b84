//! Events broadcast to the UI alongside snapshots.
//!
//! Snapshots say what the board looks like; events say what just happened,
//! for animations and sounds a renderer wants to trigger once.

use std::time::Duration;

use crate::core::{GameStats, PlayerId};
use crate::rules::{GameResult, Generation};
use crate::services::{ErrorNotice, StorageKey};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UiEvent {
    /// A new deck was dealt.
    SessionStarted { generation: Generation },
    CardFlipped { index: usize },
    Matched {
        pair: [usize; 2],
        player: PlayerId,
        score: u32,
    },
    /// A pair did not match; it stays up until `Concealed`.
    Mismatched { pair: [usize; 2] },
    /// A mismatched pair turned back down and the turn passed.
    Concealed { pair: [usize; 2], next_player: usize },
    GameOver {
        generation: Generation,
        result: GameResult,
        duration: Duration,
    },
    /// Solo best-time verdict for a finished game.
    BestTime {
        generation: Generation,
        is_new_best: bool,
        stats: GameStats,
        previous_best: Option<Duration>,
    },
    PlayerRenamed { id: PlayerId, name: String },
    /// Stored data was wiped and the game reset to defaults.
    DataReset,
    /// A retried write went through.
    Saved { key: StorageKey },
    /// Something the user should be told about.
    Notice(ErrorNotice),
}
