//! Pair resolution and delayed roll-back.
//!
//! A full selection is resolved exactly once:
//!
//! - **Match**: both cards lock as matched, the player holding the turn
//!   scores a point and keeps the turn, and the buffer empties at once. If
//!   that was the last pair, the session ends and the clock freezes.
//! - **Mismatch**: nothing changes yet. The caller receives a [`Deferred`]
//!   roll-back; when it runs (and the session is still the one that issued
//!   it) both cards turn back down, the buffer empties and the turn passes.

use std::time::{Duration, Instant};

use smallvec::SmallVec;

use super::score::{GameResult, ScoreTracker};
use super::session::{Deferred, DeferredTask, GameSession, SessionStatus};
use crate::core::EngineConfig;

/// Final numbers for a completed session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Completion {
    /// Play time, frozen at the moment the last pair was found.
    pub duration: Duration,
    pub result: GameResult,
}

/// A pair was found.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchReport {
    pub pair: [usize; 2],
    /// Seat credited with the pair.
    pub seat: usize,
    /// That seat's new score.
    pub score: u32,
    /// Set when this was the last pair.
    pub completion: Option<Completion>,
    /// Cosmetic timeouts to schedule (highlight, score flash).
    pub follow_ups: SmallVec<[Deferred; 3]>,
}

/// How a full selection resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    Matched(MatchReport),
    /// The pair stays face up until `conceal` runs.
    Mismatched { pair: [usize; 2], conceal: Deferred },
}

/// Resolves full selections and runs the delayed tasks they schedule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchResolver {
    mismatch_delay: Duration,
    highlight_delay: Duration,
    score_flash_delay: Duration,
}

impl MatchResolver {
    #[must_use]
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            mismatch_delay: config.mismatch_delay(),
            highlight_delay: config.highlight_delay(),
            score_flash_delay: config.score_flash_delay(),
        }
    }

    #[must_use]
    pub fn mismatch_delay(&self) -> Duration {
        self.mismatch_delay
    }

    /// Resolve the session's full selection.
    ///
    /// Returns `None` if the selection is not full or is already being
    /// resolved.
    pub fn resolve(
        &self,
        session: &mut GameSession,
        scores: &mut ScoreTracker,
        now: Instant,
    ) -> Option<Resolution> {
        if session.selection.is_resolving() {
            return None;
        }
        let pair = session.selection.pair()?;
        session.selection.begin_resolving();

        let [first, second] = pair;
        let is_match = match (session.cards.get(first), session.cards.get(second)) {
            (Some(a), Some(b)) => a.pairs_with(b),
            _ => false,
        };

        if !is_match {
            tracing::trace!(first, second, "mismatch");
            return Some(Resolution::Mismatched {
                pair,
                conceal: Deferred::new(
                    session.generation,
                    self.mismatch_delay,
                    DeferredTask::ConcealMismatch(pair),
                ),
            });
        }

        for index in pair {
            if let Some(card) = session.cards.get_mut(index) {
                card.mark_matched();
            }
        }
        let seat = session.turns.current();
        let score = scores.award(seat);
        session.selection.clear();
        session.highlight = Some(pair);
        session.score_flash = Some(seat);
        tracing::debug!(first, second, seat, score, "pair matched");

        let mut follow_ups = SmallVec::new();
        follow_ups.push(Deferred::new(
            session.generation,
            self.highlight_delay,
            DeferredTask::ClearHighlight(pair),
        ));
        follow_ups.push(Deferred::new(
            session.generation,
            self.score_flash_delay,
            DeferredTask::ClearScoreFlash(seat),
        ));

        let completion = if session.all_matched() {
            session.status = SessionStatus::Over;
            let duration = session.clock.freeze(now);
            let result = scores.winner();
            tracing::info!(generation = %session.generation, ?duration, %result, "session complete");
            Some(Completion { duration, result })
        } else {
            None
        };

        Some(Resolution::Matched(MatchReport {
            pair,
            seat,
            score,
            completion,
            follow_ups,
        }))
    }

    /// Run a delayed task against `session`.
    ///
    /// Tasks from an earlier generation are dropped. Returns whether the
    /// session changed.
    pub fn run_deferred(&self, session: &mut GameSession, deferred: &Deferred) -> bool {
        if deferred.generation != session.generation {
            tracing::debug!(
                task = ?deferred.task,
                scheduled = %deferred.generation,
                current = %session.generation,
                "dropping stale deferred task"
            );
            return false;
        }

        match deferred.task {
            DeferredTask::ConcealMismatch(pair) => Self::conceal(session, pair),
            DeferredTask::ClearHighlight(pair) => {
                if session.highlight == Some(pair) {
                    session.highlight = None;
                    true
                } else {
                    false
                }
            }
            DeferredTask::ClearScoreFlash(seat) => {
                if session.score_flash == Some(seat) {
                    session.score_flash = None;
                    true
                } else {
                    false
                }
            }
            DeferredTask::EndCelebration => std::mem::replace(&mut session.celebrating, false),
        }
    }

    fn conceal(session: &mut GameSession, pair: [usize; 2]) -> bool {
        if !session.selection.is_resolving() || session.selection.pair() != Some(pair) {
            return false;
        }
        for index in pair {
            if let Some(card) = session.cards.get_mut(index) {
                card.conceal();
            }
        }
        session.selection.clear();
        let next = session.turns.advance();
        tracing::trace!(?pair, next_seat = next, "mismatch rolled back");
        true
    }
}
