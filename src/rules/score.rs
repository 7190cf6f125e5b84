//! Per-player scores and the game-over verdict.
//!
//! Scores are only ever incremented, by one, for the seat that held the turn
//! when a pair was resolved. Every new session starts them at zero.

use serde::Serialize;

use crate::core::{Player, PlayerId};

/// A player's final position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Standing {
    pub id: PlayerId,
    pub name: String,
    pub score: u32,
}

impl From<&Player> for Standing {
    fn from(player: &Player) -> Self {
        Self {
            id: player.id,
            name: player.name.clone(),
            score: player.score,
        }
    }
}

/// Result of a completed game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum GameResult {
    /// Single player: nothing to compare, just the pairs found.
    Solo { pairs_found: u32 },
    /// Exactly one player holds the top score.
    Winner(Standing),
    /// Several players share the top score.
    Tie(Vec<Standing>),
}

impl GameResult {
    /// Check if a player won outright.
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        match self {
            GameResult::Winner(standing) => standing.id == player,
            GameResult::Solo { .. } | GameResult::Tie(_) => false,
        }
    }

    /// Game-over headline.
    #[must_use]
    pub fn headline(&self) -> String {
        match self {
            GameResult::Solo { .. } => "Game Complete!".to_string(),
            GameResult::Winner(standing) => format!("{} wins!", standing.name),
            GameResult::Tie(_) => "It's a tie!".to_string(),
        }
    }
}

impl std::fmt::Display for GameResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.headline())
    }
}

/// Roster with per-player scores.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoreTracker {
    players: Vec<Player>,
}

impl ScoreTracker {
    /// Track scores for `players`, starting them at zero.
    #[must_use]
    pub fn new(mut players: Vec<Player>) -> Self {
        if players.is_empty() {
            players = Player::roster(1);
        }
        for player in &mut players {
            player.score = 0;
        }
        Self { players }
    }

    /// Default-named roster of `player_count` players.
    #[must_use]
    pub fn with_player_count(player_count: usize) -> Self {
        Self::new(Player::roster(player_count))
    }

    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Score of the player at `seat`.
    #[must_use]
    pub fn score(&self, seat: usize) -> u32 {
        self.players.get(seat).map_or(0, |p| p.score)
    }

    /// Pairs found across all players.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.players.iter().map(|p| p.score).sum()
    }

    /// Credit one pair to the player at `seat`. Returns the new score.
    pub fn award(&mut self, seat: usize) -> u32 {
        match self.players.get_mut(seat) {
            Some(player) => {
                player.score += 1;
                player.score
            }
            None => {
                tracing::warn!(seat, "award for unknown seat ignored");
                0
            }
        }
    }

    /// Zero every score, keeping names.
    pub fn reset(&mut self) {
        for player in &mut self.players {
            player.score = 0;
        }
    }

    /// Rename a player. Returns false when no player has `id`.
    pub fn rename(&mut self, id: PlayerId, name: impl Into<String>) -> bool {
        match self.players.iter_mut().find(|p| p.id == id) {
            Some(player) => {
                player.name = name.into();
                true
            }
            None => false,
        }
    }

    /// Copy stored names onto players with matching ids.
    pub fn apply_names(&mut self, stored: &[Player]) {
        for player in &mut self.players {
            if let Some(saved) = stored.iter().find(|s| s.id == player.id) {
                if !saved.name.trim().is_empty() {
                    player.name = saved.name.clone();
                }
            }
        }
    }

    /// Compute the verdict from the current scores.
    #[must_use]
    pub fn winner(&self) -> GameResult {
        if self.players.len() == 1 {
            return GameResult::Solo {
                pairs_found: self.players[0].score,
            };
        }

        let max_score = self.players.iter().map(|p| p.score).max().unwrap_or(0);
        let mut leaders: Vec<Standing> = self
            .players
            .iter()
            .filter(|p| p.score == max_score)
            .map(Standing::from)
            .collect();

        if leaders.len() == 1 {
            GameResult::Winner(leaders.remove(0))
        } else {
            GameResult::Tie(leaders)
        }
    }

    /// Per-player lines for the game-over summary.
    ///
    /// Solo play reports the pairs found; a sole winner gets a trophy.
    #[must_use]
    pub fn summary_lines(&self) -> Vec<String> {
        match self.winner() {
            GameResult::Solo { pairs_found } => vec![format!("Pairs Found: {pairs_found}")],
            result => self
                .players
                .iter()
                .map(|p| {
                    let trophy = if result.is_winner(p.id) { "🏆 " } else { "" };
                    format!("{trophy}{}: {}", p.name, p.score)
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker_with(scores: &[u32]) -> ScoreTracker {
        let mut tracker = ScoreTracker::with_player_count(scores.len());
        for (seat, &score) in scores.iter().enumerate() {
            for _ in 0..score {
                tracker.award(seat);
            }
        }
        tracker
    }

    #[test]
    fn test_award_and_reset() {
        let mut tracker = ScoreTracker::with_player_count(2);
        assert_eq!(tracker.award(1), 1);
        assert_eq!(tracker.award(1), 2);
        assert_eq!(tracker.score(0), 0);
        assert_eq!(tracker.total(), 2);

        tracker.reset();
        assert_eq!(tracker.total(), 0);
    }

    #[test]
    fn test_award_unknown_seat_is_ignored() {
        let mut tracker = ScoreTracker::with_player_count(2);
        assert_eq!(tracker.award(5), 0);
        assert_eq!(tracker.total(), 0);
    }

    #[test]
    fn test_solo_result() {
        let tracker = tracker_with(&[10]);
        assert_eq!(tracker.winner(), GameResult::Solo { pairs_found: 10 });
        assert_eq!(tracker.winner().headline(), "Game Complete!");
        assert_eq!(tracker.summary_lines(), vec!["Pairs Found: 10"]);
    }

    #[test]
    fn test_single_winner() {
        let tracker = tracker_with(&[3, 6, 1]);
        let result = tracker.winner();
        assert!(result.is_winner(PlayerId::new(2)));
        assert!(!result.is_winner(PlayerId::new(1)));
        assert_eq!(result.headline(), "Player 2 wins!");
        assert_eq!(
            tracker.summary_lines(),
            vec!["Player 1: 3", "🏆 Player 2: 6", "Player 3: 1"]
        );
    }

    #[test]
    fn test_tie() {
        let tracker = tracker_with(&[5, 5]);
        match tracker.winner() {
            GameResult::Tie(leaders) => {
                assert_eq!(leaders.len(), 2);
                assert!(leaders.iter().all(|s| s.score == 5));
            }
            other => panic!("expected tie, got {other:?}"),
        }
        assert_eq!(tracker.winner().headline(), "It's a tie!");
        assert!(tracker.summary_lines().iter().all(|l| !l.contains('🏆')));
    }

    #[test]
    fn test_names() {
        let mut tracker = ScoreTracker::with_player_count(3);
        assert!(tracker.rename(PlayerId::new(2), "Grace"));
        assert!(!tracker.rename(PlayerId::new(9), "Nobody"));

        let stored = vec![
            Player {
                id: PlayerId::new(1),
                name: "Ada".into(),
                score: 7,
            },
            Player {
                id: PlayerId::new(4),
                name: "Unseated".into(),
                score: 0,
            },
        ];
        tracker.apply_names(&stored);

        let names: Vec<_> = tracker.players().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Ada", "Grace", "Player 3"]);
        // Stored scores never leak into a session.
        assert_eq!(tracker.total(), 0);
    }
}
