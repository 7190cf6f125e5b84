//! Turn rotation.
//!
//! The turn only moves on a mismatch: a player who finds a pair keeps going.

/// Whose turn it is, as a 0-based seat.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TurnOrder {
    current: usize,
    player_count: usize,
}

impl TurnOrder {
    /// Start with seat 0.
    #[must_use]
    pub fn new(player_count: usize) -> Self {
        Self {
            current: 0,
            player_count: player_count.max(1),
        }
    }

    /// Seat whose turn it is.
    #[must_use]
    pub fn current(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.player_count
    }

    /// Pass the turn to the next seat, wrapping around.
    pub fn advance(&mut self) -> usize {
        self.current = (self.current + 1) % self.player_count;
        self.current
    }

    /// Back to seat 0.
    pub fn reset(&mut self) {
        self.current = 0;
    }
}
