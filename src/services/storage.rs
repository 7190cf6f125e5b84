//! Persistence: an async key-value store and a typed JSON layer over it.
//!
//! ## Slots
//!
//! | Key                  | Value                                        |
//! |----------------------|----------------------------------------------|
//! | `memo-game-players`  | `[{"id":1,"name":"Player 1","score":0}]`     |
//! | `memo-game-stats`    | `{"bestTime":41250,"lastGameTime":52800}`    |
//! | `memo-game-settings` | `{"playerCount":2,"cardTheme":"Food"}`       |
//!
//! Each slot loads independently. A failed read is a `Storage` error, a
//! value that does not decode is a `GameState` error; either way the slot
//! falls back to its default and the other slots are unaffected.

use std::sync::Arc;

use async_trait::async_trait;
use rustc_hash::FxHashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::core::{GameSettings, GameStats, MemoError, Player, Result};

/// Async string key-value store.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value. `Ok(None)` when the key is absent.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one.
    async fn set(&self, key: &str, value: String) -> Result<()>;

    /// Remove several keys at once. Absent keys are not an error.
    async fn remove(&self, keys: &[&str]) -> Result<()>;
}

/// In-process store.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<FxHashMap<String, String>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `entries`.
    #[must_use]
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            entries: Arc::new(Mutex::new(map)),
        }
    }

    /// Copy of the raw value under `key`.
    pub async fn raw(&self, key: &str) -> Option<String> {
        self.entries.lock().await.get(key).cloned()
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.entries.lock().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, keys: &[&str]) -> Result<()> {
        let mut entries = self.entries.lock().await;
        for key in keys {
            entries.remove(*key);
        }
        Ok(())
    }
}

/// The persisted slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StorageKey {
    Players,
    Stats,
    Settings,
}

impl StorageKey {
    pub const ALL: [StorageKey; 3] = [StorageKey::Players, StorageKey::Stats, StorageKey::Settings];

    /// Key string in the backing store.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            StorageKey::Players => "memo-game-players",
            StorageKey::Stats => "memo-game-stats",
            StorageKey::Settings => "memo-game-settings",
        }
    }
}

impl std::fmt::Display for StorageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An encoded write, kept so a failed save can be retried verbatim.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingWrite {
    pub key: StorageKey,
    pub value: String,
}

impl PendingWrite {
    /// Encode `value` as JSON for `key`.
    pub fn encode<T: Serialize + ?Sized>(key: StorageKey, value: &T) -> Result<Self> {
        let value = serde_json::to_string(value)
            .map_err(|e| MemoError::game_state(key.as_str(), e.to_string()))?;
        Ok(Self { key, value })
    }
}

/// A value loaded from one slot, with the error that forced a fallback.
#[derive(Clone, Debug, PartialEq)]
pub struct Loaded<T> {
    pub value: T,
    pub error: Option<MemoError>,
}

/// Everything restored at startup.
#[derive(Clone, Debug, PartialEq)]
pub struct StoredState {
    pub settings: GameSettings,
    /// Saved roster; only names are used.
    pub players: Vec<Player>,
    pub stats: GameStats,
    /// Errors from slots that fell back to defaults.
    pub errors: Vec<MemoError>,
}

/// Typed JSON access to the game's slots.
#[derive(Clone)]
pub struct Persistence {
    store: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for Persistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Persistence").finish_non_exhaustive()
    }
}

impl Persistence {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Persistence over a fresh [`MemoryStore`].
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Read and decode a slot. `Ok(None)` when nothing is stored.
    pub async fn load<T: DeserializeOwned>(&self, key: StorageKey) -> Result<Option<T>> {
        let Some(raw) = self.store.get(key.as_str()).await? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| MemoError::game_state(key.as_str(), e.to_string()))
    }

    /// Read a slot, falling back to the default on any failure.
    pub async fn load_or_default<T: DeserializeOwned + Default>(&self, key: StorageKey) -> Loaded<T> {
        match self.load(key).await {
            Ok(value) => Loaded {
                value: value.unwrap_or_default(),
                error: None,
            },
            Err(error) => {
                tracing::warn!(%key, %error, "falling back to defaults");
                Loaded {
                    value: T::default(),
                    error: Some(error),
                }
            }
        }
    }

    /// Perform an encoded write.
    pub async fn write(&self, write: &PendingWrite) -> Result<()> {
        self.store.set(write.key.as_str(), write.value.clone()).await
    }

    /// Encode and write a value.
    pub async fn save<T: Serialize + ?Sized>(&self, key: StorageKey, value: &T) -> Result<()> {
        let write = PendingWrite::encode(key, value)?;
        self.write(&write).await
    }

    /// Remove every slot.
    pub async fn clear_all(&self) -> Result<()> {
        let keys = StorageKey::ALL.map(StorageKey::as_str);
        self.store.remove(&keys).await
    }

    /// Restore settings, names and stats, each slot independently.
    ///
    /// An out-of-range player count is clamped and reported as a `Settings`
    /// error.
    pub async fn load_all(&self) -> StoredState {
        let mut errors = Vec::new();

        let settings: Loaded<GameSettings> = self.load_or_default(StorageKey::Settings).await;
        errors.extend(settings.error);
        let requested = settings.value;
        let settings = requested.sanitized();
        if settings != requested {
            errors.push(MemoError::settings(format!(
                "playerCount {} clamped to {}",
                requested.player_count, settings.player_count
            )));
        }

        let players: Loaded<Vec<Player>> = self.load_or_default(StorageKey::Players).await;
        errors.extend(players.error);

        let stats: Loaded<GameStats> = self.load_or_default(StorageKey::Stats).await;
        errors.extend(stats.error);

        StoredState {
            settings,
            players: players.value,
            stats: stats.value,
            errors,
        }
    }
}
