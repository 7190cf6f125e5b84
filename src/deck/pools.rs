//! Fixed emoji pools and theme resolution.

use crate::core::{GameRng, Theme};

/// Animal faces.
pub static ANIMALS: [&str; 10] = ["🐶", "🐱", "🐭", "🐹", "🐰", "🦊", "🐻", "🐼", "🦁", "🐯"];

/// Food faces.
pub static FOOD: [&str; 10] = ["🍕", "🍔", "🌭", "🍟", "🌮", "🍜", "🍱", "🍎", "🍫", "🍦"];

/// The fixed pools `Random` picks from and `Mixed` unions.
pub static FIXED_POOLS: [&[&str]; 2] = [&ANIMALS, &FOOD];

/// The fixed pool behind a concrete theme, `None` for `Random`/`Mixed`.
#[must_use]
pub fn fixed_pool(theme: Theme) -> Option<&'static [&'static str]> {
    match theme {
        Theme::Animals => Some(&ANIMALS[..]),
        Theme::Food => Some(&FOOD[..]),
        Theme::Random | Theme::Mixed => None,
    }
}

/// Resolve a theme to the emoji values for one deck.
///
/// - `Animals`/`Food`: the fixed set, truncated to `pair_count`.
/// - `Random`: one fixed set chosen uniformly.
/// - `Mixed`: `pair_count` distinct values sampled from the union of all
///   fixed sets.
pub fn resolve(theme: Theme, pair_count: usize, rng: &mut GameRng) -> Vec<&'static str> {
    match theme {
        Theme::Random => {
            let pool = rng.choose(&FIXED_POOLS).copied().unwrap_or(&ANIMALS[..]);
            pool.iter().take(pair_count).copied().collect()
        }
        Theme::Mixed => {
            let union: Vec<&'static str> = FIXED_POOLS.iter().flat_map(|p| p.iter().copied()).collect();
            rng.sample(&union, pair_count)
        }
        fixed => fixed_pool(fixed)
            .unwrap_or(&ANIMALS[..])
            .iter()
            .take(pair_count)
            .copied()
            .collect(),
    }
}
