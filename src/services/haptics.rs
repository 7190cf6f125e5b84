//! Haptic feedback. Fire and forget, like audio.

use std::sync::Arc;

use crate::core::Result;

/// Events that produce a pulse.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HapticPulse {
    Match,
    Mismatch,
    Completion,
}

/// Platform vibration.
pub trait HapticBackend: Send + Sync {
    fn pulse(&self, pulse: HapticPulse) -> Result<()>;
}

/// Backend without a motor.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoHaptics;

impl HapticBackend for NoHaptics {
    fn pulse(&self, _pulse: HapticPulse) -> Result<()> {
        Ok(())
    }
}

/// Sends pulses, logging and dropping failures.
#[derive(Clone)]
pub struct Haptics {
    backend: Arc<dyn HapticBackend>,
}

impl std::fmt::Debug for Haptics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Haptics").finish_non_exhaustive()
    }
}

impl Default for Haptics {
    fn default() -> Self {
        Self::new(Arc::new(NoHaptics))
    }
}

impl Haptics {
    pub fn new(backend: Arc<dyn HapticBackend>) -> Self {
        Self { backend }
    }

    /// Returns whether the pulse was delivered.
    pub fn pulse(&self, pulse: HapticPulse) -> bool {
        match self.backend.pulse(pulse) {
            Ok(()) => true,
            Err(error) => {
                tracing::warn!(?pulse, %error, "haptic pulse failed");
                false
            }
        }
    }
}
