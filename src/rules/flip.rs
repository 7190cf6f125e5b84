//! Flip state machine.
//!
//! A flip is accepted only when the session is active, the buffer has room
//! and the card is face down. The buffer holds at most two indices and stays
//! full for the whole mismatch delay, so nothing else can be turned until
//! the pair is rolled back.

use std::time::Instant;

use smallvec::SmallVec;

use super::session::{GameSession, SessionStatus};

/// The face-up, unresolved selection of the current turn.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    indices: SmallVec<[usize; 2]>,
    resolving: bool,
}

impl Selection {
    pub const CAPACITY: usize = 2;

    #[must_use]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.indices.len() >= Self::CAPACITY
    }

    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }

    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Both indices, once full.
    #[must_use]
    pub fn pair(&self) -> Option<[usize; 2]> {
        match self.indices.as_slice() {
            [first, second] => Some([*first, *second]),
            _ => None,
        }
    }

    /// A full buffer has been handed to the resolver.
    #[must_use]
    pub fn is_resolving(&self) -> bool {
        self.resolving
    }

    pub(super) fn push(&mut self, index: usize) {
        debug_assert!(!self.is_full());
        self.indices.push(index);
    }

    pub(super) fn begin_resolving(&mut self) {
        self.resolving = true;
    }

    pub(super) fn clear(&mut self) {
        self.indices.clear();
        self.resolving = false;
    }
}

/// Why a flip was ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlipRejection {
    /// No card at that index.
    OutOfRange,
    /// Every pair is found.
    SessionOver,
    /// Two cards are already face up and unresolved.
    SelectionFull,
    /// The card is part of a found pair.
    AlreadyMatched,
    /// The card is already face up.
    AlreadyFlipped,
}

impl std::fmt::Display for FlipRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self {
            FlipRejection::OutOfRange => "no such card",
            FlipRejection::SessionOver => "game is over",
            FlipRejection::SelectionFull => "two cards already face up",
            FlipRejection::AlreadyMatched => "card already matched",
            FlipRejection::AlreadyFlipped => "card already face up",
        };
        f.write_str(reason)
    }
}

/// An accepted flip.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flip {
    /// First card of the turn is up.
    First(usize),
    /// Second card is up; the pair now needs resolving.
    Pair([usize; 2]),
}

impl GameSession {
    /// Check whether `index` may be flipped right now.
    pub fn check_flip(&self, index: usize) -> Result<(), FlipRejection> {
        let card = self.cards.get(index).ok_or(FlipRejection::OutOfRange)?;
        if self.status == SessionStatus::Over {
            return Err(FlipRejection::SessionOver);
        }
        if self.selection.is_full() {
            return Err(FlipRejection::SelectionFull);
        }
        if card.is_matched() {
            return Err(FlipRejection::AlreadyMatched);
        }
        if card.is_flipped() {
            return Err(FlipRejection::AlreadyFlipped);
        }
        Ok(())
    }

    /// Turn a card face up and add it to the selection.
    ///
    /// Starts the clock on the first accepted flip if it is not running yet.
    /// A rejected flip leaves the session untouched.
    pub fn request_flip(&mut self, index: usize, now: Instant) -> Result<Flip, FlipRejection> {
        self.check_flip(index)?;

        self.clock.ensure_started(now);
        if let Some(card) = self.cards.get_mut(index) {
            card.reveal();
        }
        self.selection.push(index);

        Ok(match self.selection.pair() {
            Some(pair) => Flip::Pair(pair),
            None => Flip::First(index),
        })
    }
}
