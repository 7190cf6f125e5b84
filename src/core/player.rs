//! Player identification and roster entries.
//!
//! ## PlayerId
//!
//! Persisted player identifier. Ids are 1-based (`Player 1` has id 1) to
//! stay compatible with stored name lists; seats in the turn order are the
//! 0-based positions of players in the roster.

use serde::{Deserialize, Serialize};

/// Player identifier, 1-based.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Id of the player sitting at the 0-based `seat`. Saturates at
    /// `u8::MAX` for seats past the id range.
    #[must_use]
    pub fn for_seat(seat: usize) -> Self {
        Self(u8::try_from(seat.saturating_add(1)).unwrap_or(u8::MAX))
    }

    /// The 0-based seat this id maps to.
    #[must_use]
    pub const fn seat(self) -> usize {
        (self.0 as usize).saturating_sub(1)
    }

    /// Iterate over all player IDs for `player_count` players.
    ///
    /// ```
    /// use memo_match::core::PlayerId;
    ///
    /// let ids: Vec<_> = PlayerId::all(3).collect();
    /// assert_eq!(ids, vec![PlayerId::new(1), PlayerId::new(2), PlayerId::new(3)]);
    /// ```
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..player_count).map(PlayerId::for_seat)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// A seated player.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Pairs found this session.
    #[serde(default)]
    pub score: u32,
}

impl Player {
    /// A player with the default `Player {n}` name and zero score.
    #[must_use]
    pub fn with_default_name(id: PlayerId) -> Self {
        Self {
            id,
            name: id.to_string(),
            score: 0,
        }
    }

    /// Build a fresh roster of `player_count` default players.
    #[must_use]
    pub fn roster(player_count: usize) -> Vec<Player> {
        PlayerId::all(player_count)
            .map(Player::with_default_name)
            .collect()
    }
}
