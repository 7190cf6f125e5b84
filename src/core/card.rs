//! Cards and their visibility state.
//!
//! A card moves `Hidden -> Flipped -> Matched`, or back `Flipped -> Hidden`
//! when a mismatch is rolled back. `Matched` is terminal.

use serde::Serialize;

/// Visibility state of a single card.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum CardFace {
    /// Face down.
    #[default]
    Hidden,
    /// Face up, waiting for resolution.
    Flipped,
    /// Part of a found pair. Never changes again.
    Matched,
}

/// A card in a dealt deck.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    /// Unique within a deck, `0..2n`.
    pub id: usize,
    /// The face value; exactly two cards per deck share it.
    pub emoji: &'static str,
    /// Current visibility.
    pub face: CardFace,
}

impl Card {
    /// Create a face-down card.
    #[must_use]
    pub const fn new(id: usize, emoji: &'static str) -> Self {
        Self {
            id,
            emoji,
            face: CardFace::Hidden,
        }
    }

    /// Whether the face is visible (flipped or matched).
    #[must_use]
    pub fn is_flipped(&self) -> bool {
        matches!(self.face, CardFace::Flipped | CardFace::Matched)
    }

    /// Whether this card belongs to a found pair.
    #[must_use]
    pub fn is_matched(&self) -> bool {
        self.face == CardFace::Matched
    }

    /// Whether this card shares its face value with `other`.
    #[must_use]
    pub fn pairs_with(&self, other: &Card) -> bool {
        self.id != other.id && self.emoji == other.emoji
    }

    /// `Hidden -> Flipped`. Returns false for any other starting state.
    pub fn reveal(&mut self) -> bool {
        if self.face != CardFace::Hidden {
            return false;
        }
        self.face = CardFace::Flipped;
        true
    }

    /// `Flipped -> Hidden`. Matched cards stay matched.
    pub fn conceal(&mut self) -> bool {
        if self.face != CardFace::Flipped {
            return false;
        }
        self.face = CardFace::Hidden;
        true
    }

    /// Lock the card as matched.
    pub fn mark_matched(&mut self) {
        self.face = CardFace::Matched;
    }
}
