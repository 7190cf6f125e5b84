//! Read-only view of the game for the UI.

use std::time::{Duration, Instant};

use im::Vector;
use serde::Serialize;
use smallvec::SmallVec;

use super::game::MemoryGame;
use crate::core::{Card, GameSettings, GameStats, Player};
use crate::rules::{format_duration, GameResult, Generation, SessionStatus};

/// Everything a renderer needs for one frame.
///
/// Cheap to clone: the deck is a persistent vector shared with the engine.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub generation: Generation,
    pub cards: Vector<Card>,
    /// Face-up, unresolved card indices.
    pub selection: SmallVec<[usize; 2]>,
    pub players: Vec<Player>,
    pub current_player_index: usize,
    pub status: SessionStatus,
    pub settings: GameSettings,
    pub stats: GameStats,
    /// Running time, or the frozen duration once over.
    pub elapsed: Duration,
    /// Pair shown as "just matched".
    pub highlight: Option<[usize; 2]>,
    /// Seat whose score is flashing.
    pub score_flash: Option<usize>,
    pub celebrating: bool,
    /// Set once the session is over.
    pub result: Option<GameResult>,
    /// Per-player game-over lines. Empty while the game runs.
    pub summary: Vec<String>,
    /// Solo only, once the stats have been recorded.
    pub is_new_best: Option<bool>,
    /// The record that was beaten, when `is_new_best` replaced one.
    pub previous_best: Option<Duration>,
}

impl GameSnapshot {
    pub(crate) fn capture(game: &MemoryGame, now: Instant) -> Self {
        let session = game.session();
        let update = game.stats_update();
        Self {
            generation: session.generation(),
            cards: session.cards().clone(),
            selection: session.selection().indices().iter().copied().collect(),
            players: game.players().to_vec(),
            current_player_index: session.current_player(),
            status: session.status(),
            settings: game.settings(),
            stats: game.stats(),
            elapsed: session.elapsed(now),
            highlight: session.highlight(),
            score_flash: session.score_flash(),
            celebrating: session.is_celebrating(),
            result: game.completion().map(|c| c.result.clone()),
            summary: if session.is_over() {
                game.scores().summary_lines()
            } else {
                Vec::new()
            },
            is_new_best: update.map(|u| u.is_new_best),
            previous_best: update.and_then(|u| u.previous_best()),
        }
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.status == SessionStatus::Over
    }

    /// Elapsed time as `m:ss.cc`.
    #[must_use]
    pub fn elapsed_label(&self) -> String {
        format_duration(self.elapsed)
    }

    /// Game-over headline, once over.
    #[must_use]
    pub fn headline(&self) -> Option<String> {
        self.result.as_ref().map(GameResult::headline)
    }
}
