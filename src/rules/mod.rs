//! Game rules: flipping, pair resolution, turns, scoring, timing.
//!
//! Everything here is synchronous and deterministic. Time is passed in as an
//! `Instant`, and delayed work is returned to the caller as [`Deferred`]
//! values instead of being scheduled here, so a rules session can be driven
//! step by step in tests without a runtime.

pub mod flip;
pub mod resolver;
pub mod score;
pub mod session;
pub mod timer;
pub mod turn;

pub use flip::{Flip, FlipRejection, Selection};
pub use resolver::{Completion, MatchReport, MatchResolver, Resolution};
pub use score::{GameResult, ScoreTracker, Standing};
pub use session::{Deferred, DeferredTask, GameSession, Generation, SessionStatus};
pub use timer::{format_duration, GameClock};
pub use turn::TurnOrder;
