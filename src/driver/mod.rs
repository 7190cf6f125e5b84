//! Async runtime around [`MemoryGame`].
//!
//! [`GameDriver::spawn`] starts one tokio task that owns the game and
//! processes commands strictly one at a time. UI intents arrive through
//! a [`GameHandle`]. Work that takes time never runs inline:
//!
//! - **Delays** (mismatch roll-back, highlight, score flash, celebration) are
//!   spawned `sleep` tasks that post their [`Deferred`] back into the queue.
//!   The game drops any that belong to a replaced session.
//! - **Writes** and the **solo stats sequence** run in tracked background
//!   tasks and report back as commands. Game transitions never wait on
//!   storage.
//!
//! The only exception is the data wipe. It first waits for every background
//! storage task, then clears storage, then resets the game. Completions that
//! were spawned before a successful wipe are dropped when they come back.
//! Shutdown also waits for background storage work so no write is cut off.
//!
//! After every command the driver publishes a fresh [`GameSnapshot`] on a
//! watch channel; one-off happenings go out as [`UiEvent`]s on a broadcast
//! channel.

mod command;
mod events;
mod handle;

use std::time::{Duration, Instant};

use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinSet;

use command::Command;
pub use events::UiEvent;
pub use handle::GameHandle;

use crate::core::{EngineConfig, GameSettings, PlayerId, Result};
use crate::engine::{self, FlipOutcome, GameSnapshot, MemoryGame, SettingsController, StatsRecord};
use crate::rules::{Deferred, DeferredTask, GameResult, Generation};
use crate::services::{ErrorNotice, HapticPulse, PendingWrite, Services, Sound};

/// Current time on the tokio clock (pausable in tests).
fn now() -> Instant {
    tokio::time::Instant::now().into_std()
}

/// The task that owns the game.
pub struct GameDriver {
    game: MemoryGame,
    controller: SettingsController,
    services: Services,
    commands: mpsc::UnboundedReceiver<Command>,
    loopback: mpsc::WeakUnboundedSender<Command>,
    snapshots: watch::Sender<GameSnapshot>,
    events: broadcast::Sender<UiEvent>,
    /// In-flight writes and stats sequences.
    background: JoinSet<()>,
    /// Bumped by every successful data wipe.
    data_epoch: u64,
}

impl GameDriver {
    /// Start the driver on the current tokio runtime.
    ///
    /// The task loads stored settings, names and stats before handling any
    /// intent; intents sent meanwhile are queued.
    pub fn spawn(config: EngineConfig, services: Services) -> GameHandle {
        let started = now();
        let capacity = config.event_capacity.max(1);
        let game = MemoryGame::new(config, started);

        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(game.snapshot(started));
        let (event_tx, _) = broadcast::channel(capacity);

        let driver = GameDriver {
            game,
            controller: SettingsController::new(services.persistence.clone()),
            services,
            commands: command_rx,
            loopback: command_tx.downgrade(),
            snapshots: snapshot_tx,
            events: event_tx.clone(),
            background: JoinSet::new(),
            data_epoch: 0,
        };
        tokio::spawn(driver.run());

        GameHandle::new(command_tx, snapshot_rx, event_tx)
    }

    async fn run(mut self) {
        self.start().await;
        while let Some(command) = self.commands.recv().await {
            if matches!(command, Command::Shutdown) {
                break;
            }
            self.handle(command).await;
            self.reap();
            self.publish();
        }
        self.drain().await;
        self.services.sounds.unload_all();
        tracing::debug!("game driver stopped");
    }

    async fn start(&mut self) {
        let loaded = self.services.sounds.load_all();
        tracing::debug!(loaded, "sounds ready");

        let stored = self.services.persistence.load_all().await;
        for error in &stored.errors {
            self.notify(self.services.reporter.report(error));
        }
        let generation = self.game.restore(&stored, now());
        self.emit(UiEvent::SessionStarted { generation });
        self.publish();
    }

    async fn handle(&mut self, command: Command) {
        match command {
            Command::Flip { index, reply } => {
                let outcome = self.flip(index);
                let _ = reply.send(outcome);
            }
            Command::ApplySettings { settings, reply } => {
                let applied = self.apply_settings(settings);
                let _ = reply.send(applied);
            }
            Command::ResetGame { reply } => {
                let generation = self.game.play_again(now());
                self.emit(UiEvent::SessionStarted { generation });
                let _ = reply.send(generation);
            }
            Command::RenamePlayer { id, name, reply } => {
                let renamed = self.rename(id, &name);
                let _ = reply.send(renamed);
            }
            Command::ResetAllData { reply } => {
                let result = self.reset_all_data().await;
                let _ = reply.send(result);
            }
            Command::Retry { write } => self.spawn_write(write, true),
            Command::Snapshot { reply } => {
                let _ = reply.send(self.game.snapshot(now()));
            }
            Command::Deferred(deferred) => self.run_deferred(&deferred),
            Command::WriteFinished {
                write,
                result,
                retried,
                epoch,
            } => {
                if self.is_current(epoch) {
                    self.write_finished(write, result, retried);
                }
            }
            Command::StatsRecorded {
                generation,
                result,
                epoch,
            } => {
                if self.is_current(epoch) {
                    self.stats_recorded(generation, result);
                }
            }
            Command::Shutdown => {}
        }
    }

    // === Intents ===

    fn flip(&mut self, index: usize) -> FlipOutcome {
        let outcome = self.game.flip_card(index, now());
        if !outcome.is_accepted() {
            return outcome;
        }

        self.services.sounds.play(Sound::Flip);
        self.emit(UiEvent::CardFlipped { index });

        match &outcome {
            FlipOutcome::Matched(report) => {
                self.services.sounds.play(Sound::Match);
                self.services.haptics.pulse(HapticPulse::Match);
                self.emit(UiEvent::Matched {
                    pair: report.pair,
                    player: PlayerId::for_seat(report.seat),
                    score: report.score,
                });
                if let Some(done) = &report.completion {
                    self.finish(done.result.clone(), done.duration);
                }
            }
            FlipOutcome::Mismatched { pair, .. } => {
                self.services.haptics.pulse(HapticPulse::Mismatch);
                self.emit(UiEvent::Mismatched { pair: *pair });
            }
            FlipOutcome::Ignored(_) | FlipOutcome::Revealed { .. } => {}
        }

        for deferred in outcome.deferred() {
            self.schedule(*deferred);
        }
        outcome
    }

    fn finish(&mut self, result: GameResult, duration: Duration) {
        let generation = self.game.generation();
        self.services.haptics.pulse(HapticPulse::Completion);

        match &result {
            GameResult::Solo { .. } => self.spawn_stats(generation, duration),
            other => {
                if engine::completion::celebrates(other, None) {
                    self.services.sounds.play(Sound::Victory);
                }
            }
        }
        self.emit(UiEvent::GameOver {
            generation,
            result,
            duration,
        });
    }

    fn apply_settings(&mut self, settings: GameSettings) -> GameSettings {
        let applied = self.controller.apply(&mut self.game, settings, now());
        if let Some(write) = applied.write {
            self.spawn_write(write, false);
        }
        self.emit(UiEvent::SessionStarted {
            generation: applied.generation,
        });
        applied.settings
    }

    fn rename(&mut self, id: PlayerId, name: &str) -> Option<String> {
        let (name, write) = self.controller.rename(&mut self.game, id, name)?;
        if let Some(write) = write {
            self.spawn_write(write, false);
        }
        self.emit(UiEvent::PlayerRenamed {
            id,
            name: name.clone(),
        });
        Some(name)
    }

    async fn reset_all_data(&mut self) -> Result<()> {
        // Anything still writing must land before the wipe, not after it.
        self.drain().await;
        match self.controller.reset_all_data(&mut self.game, now()).await {
            Ok(generation) => {
                self.data_epoch += 1;
                self.emit(UiEvent::DataReset);
                self.emit(UiEvent::SessionStarted { generation });
                Ok(())
            }
            Err(error) => {
                self.notify(self.services.reporter.report(&error));
                Err(error)
            }
        }
    }

    // === Spawned work coming back ===

    fn run_deferred(&mut self, deferred: &Deferred) {
        if !self.game.run_deferred(deferred) {
            return;
        }
        if let DeferredTask::ConcealMismatch(pair) = deferred.task {
            self.emit(UiEvent::Concealed {
                pair,
                next_player: self.game.current_player(),
            });
        }
    }

    fn write_finished(&mut self, write: PendingWrite, result: Result<()>, retried: bool) {
        let key = write.key;
        let notice = match result {
            Ok(()) if retried => {
                tracing::info!(%key, "retried write succeeded");
                self.emit(UiEvent::Saved { key });
                return;
            }
            Ok(()) => return,
            Err(error) if retried => Some(self.services.reporter.report_retry_failure(&error)),
            Err(error) => self.services.reporter.report_write(&error, write),
        };
        self.notify(notice);
    }

    fn stats_recorded(&mut self, generation: Generation, result: Result<StatsRecord>) {
        let record = match result {
            Ok(record) => record,
            Err(error) => {
                self.notify(self.services.reporter.report(&error));
                return;
            }
        };

        let update = *record.update();
        if let Some(end) = self.game.record_stats(generation, update) {
            self.services.sounds.play(Sound::Victory);
            self.schedule(end);
        }
        self.emit(UiEvent::BestTime {
            generation,
            is_new_best: update.is_new_best,
            stats: update.stats,
            previous_best: update.previous_best(),
        });

        if let StatsRecord::Unsaved { error, retry, .. } = record {
            self.notify(self.services.reporter.report_write(&error, retry));
        }
    }

    // === Plumbing ===

    fn schedule(&self, deferred: Deferred) {
        let loopback = self.loopback.clone();
        tokio::spawn(async move {
            tokio::time::sleep(deferred.delay).await;
            if let Some(commands) = loopback.upgrade() {
                let _ = commands.send(Command::Deferred(deferred));
            }
        });
    }

    fn spawn_write(&mut self, write: PendingWrite, retried: bool) {
        let persistence = self.services.persistence.clone();
        let loopback = self.loopback.clone();
        let epoch = self.data_epoch;
        self.background.spawn(async move {
            let result = persistence.write(&write).await;
            if let Some(commands) = loopback.upgrade() {
                let _ = commands.send(Command::WriteFinished {
                    write,
                    result,
                    retried,
                    epoch,
                });
            }
        });
    }

    fn spawn_stats(&mut self, generation: Generation, duration: Duration) {
        let persistence = self.services.persistence.clone();
        let loopback = self.loopback.clone();
        let epoch = self.data_epoch;
        self.background.spawn(async move {
            let result = engine::record_solo_completion(&persistence, duration).await;
            if let Some(commands) = loopback.upgrade() {
                let _ = commands.send(Command::StatsRecorded {
                    generation,
                    result,
                    epoch,
                });
            }
        });
    }

    /// Wait for every background storage task.
    async fn drain(&mut self) {
        while let Some(joined) = self.background.join_next().await {
            if let Err(error) = joined {
                tracing::warn!(%error, "background storage task failed");
            }
        }
    }

    /// Forget background tasks that already finished.
    fn reap(&mut self) {
        while let Some(joined) = self.background.try_join_next() {
            if let Err(error) = joined {
                tracing::warn!(%error, "background storage task failed");
            }
        }
    }

    fn is_current(&self, epoch: u64) -> bool {
        if epoch != self.data_epoch {
            tracing::debug!(
                epoch,
                current = self.data_epoch,
                "dropping storage result from before data reset"
            );
            return false;
        }
        true
    }

    fn notify(&self, notice: Option<ErrorNotice>) {
        if let Some(notice) = notice {
            self.emit(UiEvent::Notice(notice));
        }
    }

    fn emit(&self, event: UiEvent) {
        // No receivers is fine.
        let _ = self.events.send(event);
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.game.snapshot(now()));
    }
}
