//! The game engine: a sequential reducer plus the controllers around it.
//!
//! ## Pieces
//!
//! - [`MemoryGame`]: owns all game state and applies one event at a time.
//! - [`SettingsController`]: settings changes, renames and the data wipe,
//!   with the storage writes they imply.
//! - [`completion`]: the solo best-time sequence run when a game ends.
//! - [`GameSnapshot`]: what the UI renders.

pub mod completion;
mod game;
mod settings;
mod snapshot;

pub use completion::{record_solo_completion, StatsRecord};
pub use game::{FlipOutcome, MemoryGame};
pub use settings::{SettingsApplied, SettingsController};
pub use snapshot::GameSnapshot;
