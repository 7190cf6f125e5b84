//! Settings changes, renames and the full data wipe.
//!
//! In-memory changes always land first and never wait on storage. The
//! writes they imply come back as [`PendingWrite`]s, so the caller decides
//! whether to await them or run them in the background. The data wipe is
//! the exception: storage is cleared first, and only on success is the game
//! reset.

use std::time::Instant;

use super::game::MemoryGame;
use crate::core::{GameSettings, PlayerId, Result};
use crate::rules::Generation;
use crate::services::{PendingWrite, Persistence, StorageKey};

/// Outcome of applying settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SettingsApplied {
    /// Settings after clamping.
    pub settings: GameSettings,
    /// The freshly dealt session.
    pub generation: Generation,
    /// Settings write to persist.
    pub write: Option<PendingWrite>,
}

/// Applies settings and persists them through [`Persistence`].
#[derive(Clone, Debug)]
pub struct SettingsController {
    persistence: Persistence,
}

impl SettingsController {
    pub fn new(persistence: Persistence) -> Self {
        Self { persistence }
    }

    #[must_use]
    pub fn persistence(&self) -> &Persistence {
        &self.persistence
    }

    /// Apply `requested` to the game and prepare the settings write.
    pub fn apply(&self, game: &mut MemoryGame, requested: GameSettings, now: Instant) -> SettingsApplied {
        let settings = game.apply_settings(requested, now);
        SettingsApplied {
            settings,
            generation: game.generation(),
            write: encode(StorageKey::Settings, &settings),
        }
    }

    /// Rename a player and prepare the roster write. `None` if the rename
    /// was ignored.
    pub fn rename(&self, game: &mut MemoryGame, id: PlayerId, name: &str) -> Option<(String, Option<PendingWrite>)> {
        let name = game.rename_player(id, name)?;
        Some((name, encode(StorageKey::Players, game.players())))
    }

    /// Perform a prepared write.
    pub async fn persist(&self, write: &PendingWrite) -> Result<()> {
        self.persistence.write(write).await
    }

    /// Apply settings and wait for the write.
    ///
    /// The new session is live even when the write fails.
    pub async fn apply_and_persist(
        &self,
        game: &mut MemoryGame,
        requested: GameSettings,
        now: Instant,
    ) -> (SettingsApplied, Result<()>) {
        let applied = self.apply(game, requested, now);
        let saved = match &applied.write {
            Some(write) => self.persist(write).await,
            None => Ok(()),
        };
        (applied, saved)
    }

    /// Remove every stored key, then reset the game to defaults.
    ///
    /// If the stores cannot be cleared the game is left as it was.
    pub async fn reset_all_data(&self, game: &mut MemoryGame, now: Instant) -> Result<Generation> {
        if let Err(error) = self.persistence.clear_all().await {
            tracing::warn!(%error, "data reset failed, keeping current game");
            return Err(error);
        }
        let generation = game.reset_to_defaults(now);
        tracing::info!(%generation, "all data reset");
        Ok(generation)
    }
}

fn encode<T: serde::Serialize + ?Sized>(key: StorageKey, value: &T) -> Option<PendingWrite> {
    match PendingWrite::encode(key, value) {
        Ok(write) => Some(write),
        Err(error) => {
            tracing::error!(%key, %error, "could not encode value for storage");
            None
        }
    }
}
