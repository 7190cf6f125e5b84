//! Core engine types: cards, players, settings, stats, RNG, configuration,
//! errors.
//!
//! These are the plain data building blocks; the rules that move them live in
//! `rules`.

pub mod card;
pub mod config;
pub mod error;
pub mod player;
pub mod rng;
pub mod settings;
pub mod stats;

pub use card::{Card, CardFace};
pub use config::EngineConfig;
pub use error::{ErrorKind, MemoError, Result};
pub use player::{Player, PlayerId};
pub use rng::GameRng;
pub use settings::{GameSettings, Theme, MAX_PLAYERS, MIN_PLAYERS};
pub use stats::{GameStats, StatsUpdate};
