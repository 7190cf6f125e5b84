//! Collaborators the engine talks to: persistence, audio, haptics and error
//! reporting.
//!
//! Each is an explicitly constructed handle bundled into [`Services`] and
//! passed to the driver. Nothing here is a global.

pub mod audio;
pub mod errors;
pub mod haptics;
pub mod storage;

use std::sync::Arc;

pub use audio::{AudioBackend, SilentAudio, Sound, SoundBoard};
pub use errors::{ErrorNotice, ErrorReporter, RETRY_FAILED_MESSAGE};
pub use haptics::{HapticBackend, HapticPulse, Haptics, NoHaptics};
pub use storage::{
    KeyValueStore, Loaded, MemoryStore, PendingWrite, Persistence, StorageKey, StoredState,
};

/// The engine's service handles.
#[derive(Debug)]
pub struct Services {
    pub persistence: Persistence,
    pub sounds: SoundBoard,
    pub haptics: Haptics,
    pub reporter: ErrorReporter,
}

impl Services {
    /// Services over `store`, with silent audio and no haptics.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            persistence: Persistence::new(store),
            sounds: SoundBoard::default(),
            haptics: Haptics::default(),
            reporter: ErrorReporter::new(),
        }
    }

    /// Everything in memory, nothing audible.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Set the audio backend.
    #[must_use]
    pub fn with_audio(mut self, backend: Arc<dyn AudioBackend>) -> Self {
        self.sounds = SoundBoard::new(backend);
        self
    }

    /// Set the haptics backend.
    #[must_use]
    pub fn with_haptics(mut self, backend: Arc<dyn HapticBackend>) -> Self {
        self.haptics = Haptics::new(backend);
        self
    }
}
