//! Messages into the driver task.

use tokio::sync::oneshot;

use crate::core::{GameSettings, PlayerId, Result};
use crate::engine::{FlipOutcome, GameSnapshot, StatsRecord};
use crate::rules::{Deferred, Generation};
use crate::services::PendingWrite;

/// Everything the driver reacts to: UI intents, and the completions of work
/// it spawned itself (timers, writes, the stats sequence).
pub(crate) enum Command {
    Flip {
        index: usize,
        reply: oneshot::Sender<FlipOutcome>,
    },
    ApplySettings {
        settings: GameSettings,
        reply: oneshot::Sender<GameSettings>,
    },
    ResetGame {
        reply: oneshot::Sender<Generation>,
    },
    RenamePlayer {
        id: PlayerId,
        name: String,
        reply: oneshot::Sender<Option<String>>,
    },
    ResetAllData {
        reply: oneshot::Sender<Result<()>>,
    },
    Retry {
        write: PendingWrite,
    },
    Snapshot {
        reply: oneshot::Sender<GameSnapshot>,
    },
    /// A scheduled delay elapsed.
    Deferred(Deferred),
    /// `epoch` is the driver's data epoch when the write was spawned.
    WriteFinished {
        write: PendingWrite,
        result: Result<()>,
        retried: bool,
        epoch: u64,
    },
    StatsRecorded {
        generation: Generation,
        result: Result<StatsRecord>,
        epoch: u64,
    },
    Shutdown,
}
