//! One dealt game: the deck, the flip buffer, the turn, the clock.
//!
//! ## Generations
//!
//! Every session carries a [`Generation`]. Anything scheduled for later (a
//! mismatch roll-back, a highlight timeout) is a [`Deferred`] tagged with the
//! generation that produced it, and is dropped on arrival if the session has
//! since been replaced. Resetting mid-delay therefore can never flip cards of
//! the new deck or move its turn.

use std::time::{Duration, Instant};

use im::Vector;
use serde::Serialize;

use super::flip::Selection;
use super::timer::GameClock;
use super::turn::TurnOrder;
use crate::core::{Card, Theme};

/// Session identity. Strictly increases every time a session is replaced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Generation(u64);

impl Generation {
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// The generation after this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for Generation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Whether moves are still accepted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum SessionStatus {
    #[default]
    Active,
    /// Every card is matched. Terminal until a new session is dealt.
    Over,
}

/// Work to run once a delay has elapsed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeferredTask {
    /// Turn a mismatched pair back down and pass the turn.
    ConcealMismatch([usize; 2]),
    /// End the "just matched" highlight on this pair.
    ClearHighlight([usize; 2]),
    /// End the score flash on this seat.
    ClearScoreFlash(usize),
    /// End the completion celebration.
    EndCelebration,
}

/// A delayed task bound to the session that scheduled it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Deferred {
    pub generation: Generation,
    pub delay: Duration,
    pub task: DeferredTask,
}

impl Deferred {
    #[must_use]
    pub fn new(generation: Generation, delay: Duration, task: DeferredTask) -> Self {
        Self {
            generation,
            delay,
            task,
        }
    }
}

/// State of one dealt game.
#[derive(Clone, Debug)]
pub struct GameSession {
    pub(super) cards: Vector<Card>,
    pub(super) selection: Selection,
    pub(super) turns: TurnOrder,
    pub(super) clock: GameClock,
    pub(super) status: SessionStatus,
    pub(super) generation: Generation,
    pub(super) theme: Theme,
    pub(super) highlight: Option<[usize; 2]>,
    pub(super) score_flash: Option<usize>,
    pub(super) celebrating: bool,
}

impl GameSession {
    /// Start a session on a freshly dealt deck, seat 0 to move.
    #[must_use]
    pub fn new(cards: Vector<Card>, player_count: usize, theme: Theme, generation: Generation) -> Self {
        Self {
            cards,
            selection: Selection::default(),
            turns: TurnOrder::new(player_count),
            clock: GameClock::new(),
            status: SessionStatus::Active,
            generation,
            theme,
            highlight: None,
            score_flash: None,
            celebrating: false,
        }
    }

    #[must_use]
    pub fn cards(&self) -> &Vector<Card> {
        &self.cards
    }

    #[must_use]
    pub fn card(&self, index: usize) -> Option<&Card> {
        self.cards.get(index)
    }

    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Seat whose turn it is.
    #[must_use]
    pub fn current_player(&self) -> usize {
        self.turns.current()
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.turns.player_count()
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.status == SessionStatus::Over
    }

    #[must_use]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Theme the deck was dealt from.
    #[must_use]
    pub fn theme(&self) -> Theme {
        self.theme
    }

    #[must_use]
    pub fn clock(&self) -> &GameClock {
        &self.clock
    }

    /// Start the clock if it has not been started.
    pub fn start_clock(&mut self, now: Instant) -> bool {
        self.status == SessionStatus::Active && self.clock.ensure_started(now)
    }

    /// Elapsed play time (frozen once the session is over).
    #[must_use]
    pub fn elapsed(&self, now: Instant) -> Duration {
        self.clock.elapsed(now)
    }

    /// Pair currently shown as "just matched".
    #[must_use]
    pub fn highlight(&self) -> Option<[usize; 2]> {
        self.highlight
    }

    /// Seat whose score is flashing.
    #[must_use]
    pub fn score_flash(&self) -> Option<usize> {
        self.score_flash
    }

    #[must_use]
    pub fn is_celebrating(&self) -> bool {
        self.celebrating
    }

    /// Number of matched cards.
    #[must_use]
    pub fn matched_count(&self) -> usize {
        self.cards.iter().filter(|c| c.is_matched()).count()
    }

    /// Number of cards face up but not yet matched.
    #[must_use]
    pub fn face_up_count(&self) -> usize {
        self.cards.iter().filter(|c| c.is_flipped() && !c.is_matched()).count()
    }

    /// Every card is matched.
    #[must_use]
    pub fn all_matched(&self) -> bool {
        !self.cards.is_empty() && self.cards.iter().all(Card::is_matched)
    }

    /// Start the completion celebration; returns the task that ends it.
    pub fn begin_celebration(&mut self, delay: Duration) -> Deferred {
        self.celebrating = true;
        Deferred::new(self.generation, delay, DeferredTask::EndCelebration)
    }
}
