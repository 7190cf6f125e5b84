//! # memo-match
//!
//! Engine for a turn-based memory-matching card game for 1-4 players.
//!
//! ## Design Principles
//!
//! 1. **Sequential Reducer**: Every change is one event applied to the current
//!    state, in order. No two events mutate state concurrently.
//!
//! 2. **N-Player First**: Turns, scores and results work the same for one
//!    player or four. Solo play only adds best-time tracking.
//!
//! 3. **Generation-Tagged Delays**: Delayed work (mismatch roll-back,
//!    highlights) carries the session generation that scheduled it and is
//!    dropped if that session has been replaced.
//!
//! ## Architecture
//!
//! - **Deterministic Core**: Deck dealing runs on a seedable ChaCha RNG; rules
//!   take time as an argument. The same seed and inputs replay the same game.
//!
//! - **Persistent Data Structures**: The deck is an `im::Vector`, so snapshots
//!   for the UI clone in O(1).
//!
//! - **Injected Services**: Storage, audio and haptics are trait objects
//!   passed in, never globals.
//!
//! ## Modules
//!
//! - `core`: Cards, players, settings, stats, RNG, configuration, errors
//! - `deck`: Theme pools and deck generation
//! - `rules`: Flip state machine, match resolution, turns, scores, clock
//! - `engine`: `MemoryGame` reducer, settings controller, completion sequence
//! - `services`: Persistence, audio, haptics, error reporting
//! - `driver`: Tokio task that serialises intents and runs timers

pub mod core;
pub mod deck;
pub mod driver;
pub mod engine;
pub mod rules;
pub mod services;

// Re-export commonly used types
pub use crate::core::{
    Card, CardFace, EngineConfig, ErrorKind, GameRng, GameSettings, GameStats, MemoError, Player,
    PlayerId, StatsUpdate, Theme, MAX_PLAYERS, MIN_PLAYERS,
};

pub use crate::deck::DeckGenerator;

pub use crate::rules::{
    format_duration, Deferred, DeferredTask, FlipRejection, GameResult, GameSession, Generation,
    SessionStatus, Standing,
};

pub use crate::engine::{FlipOutcome, GameSnapshot, MemoryGame, SettingsController, StatsRecord};

pub use crate::services::{
    ErrorNotice, ErrorReporter, KeyValueStore, MemoryStore, PendingWrite, Persistence, Services,
    StorageKey,
};

pub use crate::driver::{GameDriver, GameHandle, UiEvent};
