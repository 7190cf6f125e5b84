//! Sound effects.
//!
//! Playback is best effort. Backend failures are logged and swallowed; the
//! game never waits on or fails because of audio.

use std::sync::Arc;

use rustc_hash::FxHashSet;

use crate::core::Result;

/// The game's sound effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sound {
    /// A card was turned face up.
    Flip,
    /// A pair was found.
    Match,
    /// New best time, or a sole winner.
    Victory,
}

impl Sound {
    pub const ALL: [Sound; 3] = [Sound::Flip, Sound::Match, Sound::Victory];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Sound::Flip => "flip",
            Sound::Match => "match",
            Sound::Victory => "victory",
        }
    }
}

impl std::fmt::Display for Sound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Platform audio.
pub trait AudioBackend: Send + Sync {
    /// Prepare a sound for playback.
    fn load(&self, sound: Sound) -> Result<()>;

    /// Start playing a loaded sound. Must not block until playback ends.
    fn play(&self, sound: Sound) -> Result<()>;

    /// Release a loaded sound.
    fn unload(&self, sound: Sound) -> Result<()>;
}

/// Backend that plays nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentAudio;

impl AudioBackend for SilentAudio {
    fn load(&self, _sound: Sound) -> Result<()> {
        Ok(())
    }

    fn play(&self, _sound: Sound) -> Result<()> {
        Ok(())
    }

    fn unload(&self, _sound: Sound) -> Result<()> {
        Ok(())
    }
}

/// Loads sounds once and plays them without ever surfacing a failure.
///
/// Only sounds that loaded successfully are played.
pub struct SoundBoard {
    backend: Arc<dyn AudioBackend>,
    loaded: FxHashSet<Sound>,
}

impl std::fmt::Debug for SoundBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoundBoard")
            .field("loaded", &self.loaded)
            .finish_non_exhaustive()
    }
}

impl Default for SoundBoard {
    fn default() -> Self {
        Self::new(Arc::new(SilentAudio))
    }
}

impl SoundBoard {
    pub fn new(backend: Arc<dyn AudioBackend>) -> Self {
        Self {
            backend,
            loaded: FxHashSet::default(),
        }
    }

    /// Load every sound. Returns how many are ready.
    pub fn load_all(&mut self) -> usize {
        for sound in Sound::ALL {
            if self.loaded.contains(&sound) {
                continue;
            }
            match self.backend.load(sound) {
                Ok(()) => {
                    self.loaded.insert(sound);
                }
                Err(error) => tracing::warn!(%sound, %error, "sound failed to load"),
            }
        }
        self.loaded.len()
    }

    #[must_use]
    pub fn is_loaded(&self, sound: Sound) -> bool {
        self.loaded.contains(&sound)
    }

    /// Play a sound if it is loaded. Returns whether playback started.
    pub fn play(&self, sound: Sound) -> bool {
        if !self.loaded.contains(&sound) {
            tracing::debug!(%sound, "sound not loaded, skipping");
            return false;
        }
        match self.backend.play(sound) {
            Ok(()) => true,
            Err(error) => {
                tracing::warn!(%sound, %error, "sound playback failed");
                false
            }
        }
    }

    /// Release every loaded sound.
    pub fn unload_all(&mut self) {
        for sound in self.loaded.drain() {
            if let Err(error) = self.backend.unload(sound) {
                tracing::warn!(%sound, %error, "sound failed to unload");
            }
        }
    }
}
