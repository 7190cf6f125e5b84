//! Shared helpers for the integration suites.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use memo_match::core::Result;
use memo_match::services::{AudioBackend, HapticBackend, HapticPulse, Sound};
use memo_match::{Card, KeyValueStore, MemoError, MemoryStore};
use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

static INITIALIZED: OnceCell<()> = OnceCell::new();

/// Install a test subscriber once. Level comes from `TEST_LOG`, then
/// `RUST_LOG`, then `warn`.
pub fn init_logging() {
    INITIALIZED.get_or_init(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .try_init()
            .ok();
    });
}

/// Index pairs sharing an emoji, in deck order of their first card.
pub fn pairs(cards: &im::Vector<Card>) -> Vec<[usize; 2]> {
    let mut out = Vec::new();
    for (i, card) in cards.iter().enumerate() {
        if let Some(j) = cards.iter().skip(i + 1).position(|c| c.emoji == card.emoji) {
            out.push([i, i + 1 + j]);
        }
    }
    out
}

/// Two indices holding different emoji.
pub fn mismatch(cards: &im::Vector<Card>) -> [usize; 2] {
    let first = cards[0].emoji;
    let other = cards
        .iter()
        .position(|c| c.emoji != first)
        .expect("deck has more than one value");
    [0, other]
}

/// Memory store whose writes and removals can be switched to fail.
#[derive(Clone, Default)]
pub struct FlakyStore {
    pub inner: MemoryStore,
    failing: Arc<AtomicBool>,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_inner(inner: MemoryStore) -> Self {
        Self {
            inner,
            failing: Arc::default(),
        }
    }

    pub fn fail_writes(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self, operation: &'static str, key: &str) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(MemoError::storage(operation, key, "disk full"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl KeyValueStore for FlakyStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.check("set", key)?;
        self.inner.set(key, value).await
    }

    async fn remove(&self, keys: &[&str]) -> Result<()> {
        self.check("remove", &keys.join(","))?;
        self.inner.remove(keys).await
    }
}

/// Memory store whose reads and writes take `delay` on the tokio clock.
/// Removals are immediate.
#[derive(Clone, Default)]
pub struct SlowStore {
    pub inner: MemoryStore,
    delay: Duration,
}

impl SlowStore {
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: MemoryStore::new(),
            delay,
        }
    }
}

#[async_trait]
impl KeyValueStore for SlowStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        tokio::time::sleep(self.delay).await;
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        tokio::time::sleep(self.delay).await;
        self.inner.set(key, value).await
    }

    async fn remove(&self, keys: &[&str]) -> Result<()> {
        self.inner.remove(keys).await
    }
}

/// Records every sound played.
#[derive(Clone, Default)]
pub struct RecordingAudio {
    pub played: Arc<Mutex<Vec<Sound>>>,
}

impl RecordingAudio {
    pub fn played(&self) -> Vec<Sound> {
        self.played.lock().unwrap().clone()
    }
}

impl AudioBackend for RecordingAudio {
    fn load(&self, _sound: Sound) -> Result<()> {
        Ok(())
    }

    fn play(&self, sound: Sound) -> Result<()> {
        self.played.lock().unwrap().push(sound);
        Ok(())
    }

    fn unload(&self, _sound: Sound) -> Result<()> {
        Ok(())
    }
}

/// Records every haptic pulse.
#[derive(Clone, Default)]
pub struct RecordingHaptics {
    pub pulses: Arc<Mutex<Vec<HapticPulse>>>,
}

impl RecordingHaptics {
    pub fn pulses(&self) -> Vec<HapticPulse> {
        self.pulses.lock().unwrap().clone()
    }
}

impl HapticBackend for RecordingHaptics {
    fn pulse(&self, pulse: HapticPulse) -> Result<()> {
        self.pulses.lock().unwrap().push(pulse);
        Ok(())
    }
}
