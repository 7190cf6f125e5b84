//! Player-facing game settings: player count and card theme.
//!
//! Both values are corrected at the boundary rather than rejected: an
//! out-of-range player count is clamped and an unknown theme name falls back
//! to `Animals`.

use serde::{Deserialize, Serialize};

/// Fewest players at the table.
pub const MIN_PLAYERS: usize = 1;
/// Most players at the table.
pub const MAX_PLAYERS: usize = 4;

/// Named emoji pool used to populate a deck.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Theme {
    #[default]
    Animals,
    Food,
    /// One of the fixed themes, picked per deal.
    Random,
    /// A sample drawn from all fixed themes together.
    Mixed,
}

impl Theme {
    /// Every selectable theme.
    pub const ALL: [Theme; 4] = [Theme::Animals, Theme::Food, Theme::Random, Theme::Mixed];

    /// Persisted and displayed name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Theme::Animals => "Animals",
            Theme::Food => "Food",
            Theme::Random => "Random",
            Theme::Mixed => "Mixed",
        }
    }

    /// Parse a theme name, returning `None` when unknown.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|theme| theme.name() == name.trim())
    }

    /// Parse a theme name, falling back to `Animals` when unknown.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        Self::parse(name).unwrap_or_else(|| {
            tracing::debug!(theme = name, "unknown theme, falling back to Animals");
            Theme::Animals
        })
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl From<String> for Theme {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl From<Theme> for String {
    fn from(theme: Theme) -> Self {
        theme.name().to_string()
    }
}

/// Player count and theme for the next session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSettings {
    pub player_count: usize,
    #[serde(rename = "cardTheme")]
    pub theme: Theme,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            player_count: MIN_PLAYERS,
            theme: Theme::Animals,
        }
    }
}

impl GameSettings {
    /// Create settings, clamping the player count into range.
    #[must_use]
    pub fn new(player_count: usize, theme: Theme) -> Self {
        Self {
            player_count,
            theme,
        }
        .sanitized()
    }

    /// Copy of these settings with the player count clamped to
    /// `MIN_PLAYERS..=MAX_PLAYERS`.
    #[must_use]
    pub fn sanitized(self) -> Self {
        let player_count = self.player_count.clamp(MIN_PLAYERS, MAX_PLAYERS);
        if player_count != self.player_count {
            tracing::debug!(
                requested = self.player_count,
                clamped = player_count,
                "player count out of range"
            );
        }
        Self {
            player_count,
            ..self
        }
    }

    /// Set the theme.
    #[must_use]
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Set the player count (clamped).
    #[must_use]
    pub fn with_player_count(mut self, player_count: usize) -> Self {
        self.player_count = player_count;
        self.sanitized()
    }

    /// Best-time tracking only applies to solo play.
    #[must_use]
    pub fn is_single_player(&self) -> bool {
        self.player_count == 1
    }
}
