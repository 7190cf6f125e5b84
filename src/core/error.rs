//! Error types for the memory game engine.
//!
//! Nothing in the engine is fatal to the running process. Every variant is
//! recoverable: the worst case is lost progress or preferences, which the
//! `ErrorReporter` turns into a user-visible, retryable notice.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Category of a [`MemoError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// A persistence read or write failed.
    Storage,
    /// Sound asset load or playback failed.
    Sound,
    /// Persisted data is malformed or unreadable.
    GameState,
    /// Invalid player count or unknown theme.
    Settings,
}

impl ErrorKind {
    /// Tag used in log lines.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Storage => "STORAGE",
            ErrorKind::Sound => "SOUND",
            ErrorKind::GameState => "GAME_STATE",
            ErrorKind::Settings => "SETTINGS",
        }
    }

    /// Errors of this kind are only logged, never shown to the user.
    #[must_use]
    pub const fn is_silent(self) -> bool {
        matches!(self, ErrorKind::Sound | ErrorKind::Settings)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result alias used across the crate.
pub type Result<T, E = MemoError> = std::result::Result<T, E>;

/// Shared error type for the engine and its collaborators.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoError {
    /// Persistence read/write failed.
    #[error("storage {operation} failed for '{key}': {message}")]
    Storage {
        operation: &'static str,
        key: String,
        message: String,
    },

    /// Sound asset load or playback failed.
    #[error("sound '{sound}' failed: {message}")]
    Sound { sound: String, message: String },

    /// Persisted data could not be decoded.
    #[error("malformed data under '{key}': {message}")]
    GameState { key: String, message: String },

    /// A settings value was out of range or unknown.
    #[error("invalid setting: {0}")]
    Settings(String),
}

impl MemoError {
    /// Creates a Storage error.
    pub fn storage(operation: &'static str, key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Storage {
            operation,
            key: key.into(),
            message: message.into(),
        }
    }

    /// Creates a Sound error.
    pub fn sound(sound: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Sound {
            sound: sound.into(),
            message: message.into(),
        }
    }

    /// Creates a GameState error.
    pub fn game_state(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::GameState {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Creates a Settings error.
    pub fn settings(message: impl Into<String>) -> Self {
        Self::Settings(message.into())
    }

    /// The taxonomy category of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Storage { .. } => ErrorKind::Storage,
            Self::Sound { .. } => ErrorKind::Sound,
            Self::GameState { .. } => ErrorKind::GameState,
            Self::Settings(_) => ErrorKind::Settings,
        }
    }

    /// Check if this is a Storage error.
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage { .. })
    }

    /// Check if this is a GameState error.
    pub fn is_game_state(&self) -> bool {
        matches!(self, Self::GameState { .. })
    }

    /// Every engine error can be recovered from without restarting.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        true
    }

    /// Message shown to the user for this error.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self.kind() {
            ErrorKind::Storage => "Unable to save game data. Your progress might be lost.",
            ErrorKind::Sound => "Sound playback failed",
            ErrorKind::GameState => "Game state corrupted. Try resetting the game.",
            ErrorKind::Settings => "Settings were adjusted to valid values.",
        }
    }
}

impl From<serde_json::Error> for MemoError {
    fn from(err: serde_json::Error) -> Self {
        Self::game_state("json", err.to_string())
    }
}
