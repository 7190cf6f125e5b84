//! The sequential game reducer.
//!
//! `MemoryGame` owns the settings, the roster, the stats and the live
//! session. Every method is one event applied to the current state, in
//! order. Nothing here awaits or sleeps: delayed work comes back as
//! [`Deferred`] values for the caller to schedule and feed back through
//! [`MemoryGame::run_deferred`].

use std::time::{Duration, Instant};

use super::completion;
use super::snapshot::GameSnapshot;
use crate::core::{EngineConfig, GameRng, GameSettings, GameStats, Player, PlayerId, StatsUpdate};
use crate::deck::DeckGenerator;
use crate::rules::{
    Completion, Deferred, Flip, FlipRejection, GameSession, Generation, MatchReport, MatchResolver,
    Resolution, ScoreTracker,
};
use crate::services::StoredState;

/// What a flip request did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FlipOutcome {
    /// Not a legal flip right now; nothing changed.
    Ignored(FlipRejection),
    /// First card of the turn is face up.
    Revealed { index: usize },
    /// Second card completed a pair.
    Matched(MatchReport),
    /// Second card did not match; `conceal` turns both back down.
    Mismatched { pair: [usize; 2], conceal: Deferred },
}

impl FlipOutcome {
    /// A card was turned face up.
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        !matches!(self, FlipOutcome::Ignored(_))
    }

    /// Delayed tasks the caller must schedule.
    #[must_use]
    pub fn deferred(&self) -> &[Deferred] {
        match self {
            FlipOutcome::Matched(report) => &report.follow_ups,
            FlipOutcome::Mismatched { conceal, .. } => std::slice::from_ref(conceal),
            FlipOutcome::Ignored(_) | FlipOutcome::Revealed { .. } => &[],
        }
    }

    /// Set when this flip finished the game.
    #[must_use]
    pub fn completion(&self) -> Option<&Completion> {
        match self {
            FlipOutcome::Matched(report) => report.completion.as_ref(),
            _ => None,
        }
    }
}

/// Memory game state and its transitions.
#[derive(Clone, Debug)]
pub struct MemoryGame {
    config: EngineConfig,
    rng: GameRng,
    generator: DeckGenerator,
    resolver: MatchResolver,
    settings: GameSettings,
    session: GameSession,
    scores: ScoreTracker,
    stats: GameStats,
    completion: Option<Completion>,
    stats_update: Option<StatsUpdate>,
    /// First session dealt after the last data wipe.
    wiped_at: Generation,
}

impl MemoryGame {
    /// A game with default settings, dealt and running.
    #[must_use]
    pub fn new(config: EngineConfig, now: Instant) -> Self {
        Self::with_settings(config, GameSettings::default(), now)
    }

    /// A game with `settings`, dealt and running.
    #[must_use]
    pub fn with_settings(config: EngineConfig, settings: GameSettings, now: Instant) -> Self {
        let settings = settings.sanitized();
        let mut rng = GameRng::seeded_or_random(config.seed);
        let generator = DeckGenerator::new(config.pair_count);
        let cards = generator.generate(settings.theme, &mut rng.fork());
        let mut session =
            GameSession::new(cards, settings.player_count, settings.theme, Generation::default());
        session.start_clock(now);

        Self {
            resolver: MatchResolver::new(&config),
            scores: ScoreTracker::with_player_count(settings.player_count),
            config,
            rng,
            generator,
            settings,
            session,
            stats: GameStats::default(),
            completion: None,
            stats_update: None,
            wiped_at: Generation::default(),
        }
    }

    /// Adopt persisted settings, names and stats, and deal a new session.
    pub fn restore(&mut self, stored: &StoredState, now: Instant) -> Generation {
        self.settings = stored.settings.sanitized();
        self.stats = stored.stats;
        self.scores = ScoreTracker::with_player_count(self.settings.player_count);
        self.scores.apply_names(&stored.players);
        self.start_session(now)
    }

    // === Accessors ===

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn settings(&self) -> GameSettings {
        self.settings
    }

    #[must_use]
    pub fn session(&self) -> &GameSession {
        &self.session
    }

    #[must_use]
    pub fn players(&self) -> &[Player] {
        self.scores.players()
    }

    #[must_use]
    pub fn scores(&self) -> &ScoreTracker {
        &self.scores
    }

    #[must_use]
    pub fn stats(&self) -> GameStats {
        self.stats
    }

    #[must_use]
    pub fn generation(&self) -> Generation {
        self.session.generation()
    }

    /// Seat whose turn it is.
    #[must_use]
    pub fn current_player(&self) -> usize {
        self.session.current_player()
    }

    /// Final numbers, once the session is over.
    #[must_use]
    pub fn completion(&self) -> Option<&Completion> {
        self.completion.as_ref()
    }

    /// Best-time outcome recorded for the current session.
    #[must_use]
    pub fn stats_update(&self) -> Option<&StatsUpdate> {
        self.stats_update.as_ref()
    }

    #[must_use]
    pub fn elapsed(&self, now: Instant) -> Duration {
        self.session.elapsed(now)
    }

    // === Intents ===

    /// Flip the card at `index`.
    pub fn flip_card(&mut self, index: usize, now: Instant) -> FlipOutcome {
        let pair = match self.session.request_flip(index, now) {
            Err(rejection) => {
                tracing::debug!(index, %rejection, "flip ignored");
                return FlipOutcome::Ignored(rejection);
            }
            Ok(Flip::First(index)) => return FlipOutcome::Revealed { index },
            Ok(Flip::Pair(pair)) => pair,
        };

        match self.resolver.resolve(&mut self.session, &mut self.scores, now) {
            Some(Resolution::Matched(mut report)) => {
                if let Some(done) = &report.completion {
                    if completion::celebrates(&done.result, None) {
                        let end = self.session.begin_celebration(self.config.celebration_delay());
                        report.follow_ups.push(end);
                    }
                    self.completion = Some(done.clone());
                }
                FlipOutcome::Matched(report)
            }
            Some(Resolution::Mismatched { pair, conceal }) => FlipOutcome::Mismatched { pair, conceal },
            None => {
                tracing::warn!(?pair, "full selection was already resolving");
                FlipOutcome::Ignored(FlipRejection::SelectionFull)
            }
        }
    }

    /// Apply a delayed task. Stale tasks are dropped; returns whether
    /// anything changed.
    pub fn run_deferred(&mut self, deferred: &Deferred) -> bool {
        self.resolver.run_deferred(&mut self.session, deferred)
    }

    /// Deal a new session with the same settings and players. Scores reset.
    pub fn play_again(&mut self, now: Instant) -> Generation {
        self.start_session(now)
    }

    /// Apply new settings and deal a new session.
    ///
    /// The player count is clamped. A changed count rebuilds the roster with
    /// default names; an unchanged count keeps the names.
    pub fn apply_settings(&mut self, requested: GameSettings, now: Instant) -> GameSettings {
        let settings = requested.sanitized();
        if settings.player_count != self.scores.player_count() {
            self.scores = ScoreTracker::with_player_count(settings.player_count);
        }
        self.settings = settings;
        self.start_session(now);
        settings
    }

    /// Back to hard defaults: one player, `Animals`, no stats.
    pub fn reset_to_defaults(&mut self, now: Instant) -> Generation {
        self.settings = GameSettings::default();
        self.stats = GameStats::default();
        self.scores = ScoreTracker::with_player_count(self.settings.player_count);
        self.wiped_at = self.start_session(now);
        self.wiped_at
    }

    /// Rename a player.
    ///
    /// The name is trimmed and cut to the configured maximum length. Empty
    /// names and unknown ids are ignored. Returns the name that was stored.
    pub fn rename_player(&mut self, id: PlayerId, name: &str) -> Option<String> {
        let name: String = name.trim().chars().take(self.config.max_name_len).collect();
        let name = name.trim_end().to_string();
        if name.is_empty() {
            tracing::debug!(%id, "empty player name ignored");
            return None;
        }
        if !self.scores.rename(id, name.clone()) {
            tracing::debug!(%id, "rename for unknown player ignored");
            return None;
        }
        Some(name)
    }

    /// Take in the best-time result for a completed solo session.
    ///
    /// Stats from a session dealt before the last data wipe are dropped.
    /// Otherwise stats always update, and the new-best flag and celebration
    /// only apply if `generation` is still the live session. Returns the task
    /// ending the celebration when one starts.
    pub fn record_stats(&mut self, generation: Generation, update: StatsUpdate) -> Option<Deferred> {
        if generation < self.wiped_at {
            tracing::debug!(%generation, wiped_at = %self.wiped_at, "stats predate data reset");
            return None;
        }
        self.stats = update.stats;
        if generation != self.session.generation() {
            tracing::debug!(%generation, "stats arrived for a replaced session");
            return None;
        }
        self.stats_update = Some(update);

        let result = self.completion.as_ref().map(|c| &c.result)?;
        if completion::celebrates(result, Some(update.is_new_best)) {
            Some(self.session.begin_celebration(self.config.celebration_delay()))
        } else {
            None
        }
    }

    /// Current state for rendering.
    #[must_use]
    pub fn snapshot(&self, now: Instant) -> GameSnapshot {
        GameSnapshot::capture(self, now)
    }

    fn start_session(&mut self, now: Instant) -> Generation {
        let generation = self.session.generation().next();
        let cards = self.generator.generate(self.settings.theme, &mut self.rng.fork());
        self.session = GameSession::new(cards, self.settings.player_count, self.settings.theme, generation);
        self.session.start_clock(now);
        self.scores.reset();
        self.completion = None;
        self.stats_update = None;
        tracing::info!(
            %generation,
            players = self.settings.player_count,
            theme = %self.settings.theme,
            "new session"
        );
        generation
    }
}
