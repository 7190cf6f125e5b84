//! Deck generation: resolve a theme, pair the values, shuffle, number.

use im::Vector;

use super::pools;
use crate::core::{Card, GameRng, Theme};

/// Builds shuffled decks of paired cards.
///
/// Output is deterministic for a given RNG state: the same seed always deals
/// the same deck.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeckGenerator {
    pair_count: usize,
}

impl Default for DeckGenerator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PAIR_COUNT)
    }
}

impl DeckGenerator {
    /// Pairs per deck unless configured otherwise.
    pub const DEFAULT_PAIR_COUNT: usize = 10;

    /// Create a generator dealing `pair_count` pairs.
    #[must_use]
    pub fn new(pair_count: usize) -> Self {
        Self {
            pair_count: pair_count.max(1),
        }
    }

    /// Pairs per generated deck (before pool truncation).
    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.pair_count
    }

    /// Deal a fresh face-down deck for `theme`.
    pub fn generate(&self, theme: Theme, rng: &mut GameRng) -> Vector<Card> {
        let pool = pools::resolve(theme, self.pair_count, rng);
        let deck = Self::deal(&pool, rng);
        tracing::debug!(%theme, cards = deck.len(), seed = rng.seed(), "dealt deck");
        deck
    }

    /// Pair up every value in `pool`, shuffle uniformly, then number the
    /// cards `0..2k` in their shuffled order.
    pub fn deal(pool: &[&'static str], rng: &mut GameRng) -> Vector<Card> {
        let mut faces: Vec<&'static str> = pool.iter().chain(pool.iter()).copied().collect();
        rng.shuffle(&mut faces);

        faces
            .into_iter()
            .enumerate()
            .map(|(id, emoji)| Card::new(id, emoji))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashMap;

    fn counts(deck: &Vector<Card>) -> FxHashMap<&'static str, usize> {
        let mut counts = FxHashMap::default();
        for card in deck {
            *counts.entry(card.emoji).or_insert(0) += 1;
        }
        counts
    }

    #[test]
    fn test_deck_shape() {
        let generator = DeckGenerator::default();
        let mut rng = GameRng::new(42);

        for theme in Theme::ALL {
            let deck = generator.generate(theme, &mut rng);
            assert_eq!(deck.len(), 20, "{theme} deck size");
            assert!(counts(&deck).values().all(|&n| n == 2));
            assert!(deck.iter().all(|c| !c.is_flipped()));

            let ids: Vec<_> = deck.iter().map(|c| c.id).collect();
            assert_eq!(ids, (0..20).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_deterministic_given_seed() {
        let generator = DeckGenerator::default();
        let deck1 = generator.generate(Theme::Mixed, &mut GameRng::new(7));
        let deck2 = generator.generate(Theme::Mixed, &mut GameRng::new(7));
        assert_eq!(deck1, deck2);

        let deck3 = generator.generate(Theme::Mixed, &mut GameRng::new(8));
        assert_ne!(deck1, deck3);
    }

    #[test]
    fn test_deal_any_pool_size() {
        let mut rng = GameRng::new(3);
        let deck = DeckGenerator::deal(&["a", "b", "c"], &mut rng);
        assert_eq!(deck.len(), 6);
        assert!(counts(&deck).values().all(|&n| n == 2));

        assert!(DeckGenerator::deal(&[], &mut rng).is_empty());
    }

    #[test]
    fn test_smaller_pair_count() {
        let generator = DeckGenerator::new(6);
        let deck = generator.generate(Theme::Food, &mut GameRng::new(1));
        assert_eq!(deck.len(), 12);
    }
}
