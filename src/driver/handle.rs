//! Cloneable front end to a running [`GameDriver`](super::GameDriver).

use tokio::sync::{broadcast, mpsc, oneshot, watch};

use super::command::Command;
use super::events::UiEvent;
use crate::core::{GameSettings, MemoError, PlayerId, Result};
use crate::engine::{FlipOutcome, GameSnapshot};
use crate::rules::Generation;
use crate::services::ErrorNotice;

/// Sends intents to the driver and observes its state.
///
/// Request methods return `None` once the driver has stopped.
#[derive(Clone, Debug)]
pub struct GameHandle {
    commands: mpsc::UnboundedSender<Command>,
    snapshots: watch::Receiver<GameSnapshot>,
    events: broadcast::Sender<UiEvent>,
}

impl GameHandle {
    pub(crate) fn new(
        commands: mpsc::UnboundedSender<Command>,
        snapshots: watch::Receiver<GameSnapshot>,
        events: broadcast::Sender<UiEvent>,
    ) -> Self {
        Self {
            commands,
            snapshots,
            events,
        }
    }

    async fn request<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> Command) -> Option<T> {
        let (reply, response) = oneshot::channel();
        self.commands.send(build(reply)).ok()?;
        response.await.ok()
    }

    /// Flip the card at `index`.
    pub async fn flip_card(&self, index: usize) -> Option<FlipOutcome> {
        self.request(|reply| Command::Flip { index, reply }).await
    }

    /// Apply settings and deal a new session. Returns the settings as
    /// applied (after clamping).
    pub async fn apply_settings(&self, settings: GameSettings) -> Option<GameSettings> {
        self.request(|reply| Command::ApplySettings { settings, reply })
            .await
    }

    /// Play again with the same settings and players.
    pub async fn reset_game(&self) -> Option<Generation> {
        self.request(|reply| Command::ResetGame { reply }).await
    }

    /// Rename a player. Returns the stored name, or `None` if the name was
    /// rejected.
    pub async fn edit_player_name(&self, id: PlayerId, name: impl Into<String>) -> Option<String> {
        let name = name.into();
        self.request(|reply| Command::RenamePlayer { id, name, reply })
            .await
            .flatten()
    }

    /// Wipe all stored data and reset to defaults.
    pub async fn reset_all_data(&self) -> Result<()> {
        self.request(|reply| Command::ResetAllData { reply })
            .await
            .unwrap_or_else(|| Err(MemoError::game_state("driver", "game driver has stopped")))
    }

    /// Repeat the write behind `notice`. Returns false if it has nothing to
    /// retry.
    pub fn retry(&self, notice: &ErrorNotice) -> bool {
        let Some(write) = notice.retry.clone() else {
            return false;
        };
        self.commands.send(Command::Retry { write }).is_ok()
    }

    /// A snapshot taken now, with an up-to-date elapsed time.
    pub async fn snapshot(&self) -> Option<GameSnapshot> {
        self.request(|reply| Command::Snapshot { reply }).await
    }

    /// The most recently published snapshot.
    #[must_use]
    pub fn latest(&self) -> GameSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Receive a snapshot after every processed command.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<GameSnapshot> {
        self.snapshots.clone()
    }

    /// Receive UI events from now on.
    #[must_use]
    pub fn events(&self) -> broadcast::Receiver<UiEvent> {
        self.events.subscribe()
    }

    /// Ask the driver to stop after the commands already queued.
    pub fn shutdown(&self) {
        let _ = self.commands.send(Command::Shutdown);
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }
}
