//! Session controller
//!
//! Drives one [`RoundEngine`] across runs and is the only thing the host talks
//! to. Raw input comes in, cues and run summaries go out. Score submission and
//! strike resets are asynchronous round trips through external collaborators:
//! the controller hands out a request, keeps playing, and applies the result
//! whenever (and if ever) it comes back.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::arbiter::InputSource;
use super::card::{Card, IncorrectReason, RoundOutcome};
use super::direction::Direction;
use super::engine::{EngineEvent, RoundEngine, RoundPhase, RunStats, SessionState};
use super::gesture::SwipeThresholds;
use crate::Millis;
use crate::config::GameConfig;
use crate::error::{ConfigError, ExternalError};
use crate::platform::cues::{CueSink, SilentCues};
use crate::platform::input::{PointerEvent, PointerTracker, direction_for_key};
use crate::totals::ScoreTotals;

/// Final numbers of a run, handed to game-over consumers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: u64,
    pub seed: u64,
    pub final_score: u64,
    pub strikes: u32,
    pub stats: RunStats,
}

/// Progress of an external round trip
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExternalOpState {
    Idle,
    Pending,
    Succeeded,
    Failed(ExternalError),
}

impl ExternalOpState {
    pub fn is_pending(&self) -> bool {
        matches!(self, ExternalOpState::Pending)
    }
}

/// Payload for the leaderboard collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSubmission {
    pub run_id: u64,
    pub score: u64,
}

/// Payload for the paid strike-reset collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrikeResetRequest {
    pub run_id: u64,
    pub strikes: u32,
}

pub type GameOverHook = Box<dyn FnMut(&RunSummary)>;

pub struct SessionController<C: CueSink = SilentCues> {
    engine: RoundEngine,
    cues: C,
    pointer: PointerTracker,
    totals: ScoreTotals,
    seeder: Pcg32,
    run_id: u64,
    last_summary: Option<RunSummary>,
    game_over_reported: bool,
    on_game_over: Option<GameOverHook>,
    submission: ExternalOpState,
    pending_submission: Option<ScoreSubmission>,
    /// Score of this run already added to the totals
    credited_score: Option<u64>,
    strike_reset: ExternalOpState,
    pending_strike_reset: Option<StrikeResetRequest>,
}

impl<C: CueSink> SessionController<C> {
    /// `totals` is the ledger read at startup; `seed` feeds every run's seed.
    pub fn new(
        config: GameConfig,
        cues: C,
        totals: ScoreTotals,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        let thresholds = SwipeThresholds::from(&config);
        let engine = RoundEngine::new(config, seed)?;
        Ok(Self {
            engine,
            cues,
            pointer: PointerTracker::new(thresholds),
            totals,
            seeder: Pcg32::seed_from_u64(seed),
            run_id: 0,
            last_summary: None,
            game_over_reported: false,
            on_game_over: None,
            submission: ExternalOpState::Idle,
            pending_submission: None,
            credited_score: None,
            strike_reset: ExternalOpState::Idle,
            pending_strike_reset: None,
        })
    }

    /// Called once each time a run ends
    pub fn set_on_game_over(&mut self, hook: GameOverHook) {
        self.on_game_over = Some(hook);
    }

    /// Start a fresh run, abandoning the current one. Returns the run id.
    pub fn start_run(&mut self, now: Millis) -> u64 {
        self.run_id += 1;
        let seed = self.seeder.random::<u64>();
        self.pointer.reset();
        self.last_summary = None;
        self.game_over_reported = false;
        // Results for older runs are ignored when they arrive
        self.submission = ExternalOpState::Idle;
        self.pending_submission = None;
        self.credited_score = None;
        self.strike_reset = ExternalOpState::Idle;
        self.pending_strike_reset = None;

        self.engine.start_run(seed, now);
        self.dispatch_events();
        self.run_id
    }

    /// Keyboard input (`KeyboardEvent.key`). Unmapped keys are ignored.
    pub fn handle_key(&mut self, key: &str, now: Millis) -> Option<RoundOutcome> {
        let direction = direction_for_key(key)?;
        let card = self.engine.card()?;
        self.submit_direction(direction, card.sequence_id(), InputSource::Keyboard, now)
    }

    /// Mouse/touch input. A drag answers the card that was live when it began.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Option<RoundOutcome> {
        let live = self.engine.card().map(|c| c.sequence_id());
        let swipe = self.pointer.handle(event, live)?;
        self.submit_direction(
            swipe.swipe.direction,
            swipe.sequence_id,
            swipe.source,
            swipe.time_ms,
        )
    }

    /// Attempt from any source, for hosts with their own gesture handling
    pub fn submit_direction(
        &mut self,
        direction: Direction,
        sequence_id: u64,
        source: InputSource,
        now: Millis,
    ) -> Option<RoundOutcome> {
        let outcome = self
            .engine
            .submit_attempt(direction, sequence_id, source, now);
        self.dispatch_events();
        outcome
    }

    /// Per-frame tick; resolves the live card on expiry
    pub fn update(&mut self, now: Millis) -> Option<RoundOutcome> {
        let outcome = self.engine.update(now);
        self.dispatch_events();
        outcome
    }

    pub fn pause(&mut self, now: Millis) {
        self.engine.pause(now);
    }

    pub fn resume(&mut self, now: Millis) {
        self.engine.resume(now);
    }

    /// Claim the finished run for submission. `None` unless the run is over
    /// and no submission is pending or already confirmed. A run revived by a
    /// strike reset can be submitted again once it ends.
    pub fn request_score_submission(&mut self) -> Option<ScoreSubmission> {
        if !self.engine.is_game_over() {
            return None;
        }
        if matches!(
            self.submission,
            ExternalOpState::Pending | ExternalOpState::Succeeded
        ) {
            return None;
        }
        let request = ScoreSubmission {
            run_id: self.run_id,
            score: self.engine.state().score,
        };
        self.submission = ExternalOpState::Pending;
        self.pending_submission = Some(request);
        log::info!("Submitting score {} for run {}", request.score, request.run_id);
        Some(request)
    }

    /// Apply the collaborator's answer. Answers for other runs are ignored.
    pub fn finish_score_submission(&mut self, run_id: u64, result: Result<(), ExternalError>) {
        let Some(request) = self.pending_submission.filter(|r| r.run_id == run_id) else {
            log::warn!("Ignoring score submission result for stale run {run_id}");
            return;
        };
        self.pending_submission = None;
        match result {
            Ok(()) => {
                let new_best = match self.credited_score {
                    Some(previous) => self.totals.record_revision(previous, request.score),
                    None => self.totals.record_submission(request.score),
                };
                if new_best {
                    log::info!("New best score: {}", request.score);
                }
                self.credited_score = Some(request.score);
                self.totals.save();
                self.submission = ExternalOpState::Succeeded;
            }
            Err(err) => {
                log::warn!("Score submission failed: {err}");
                self.submission = ExternalOpState::Failed(err);
            }
        }
    }

    /// Ask for a paid strike reset. `None` if there is nothing to reset or a
    /// reset is already in flight. Play continues while it is pending.
    pub fn request_strike_reset(&mut self) -> Option<StrikeResetRequest> {
        if self.engine.phase() == RoundPhase::Idle || self.strike_reset.is_pending() {
            return None;
        }
        let strikes = self.engine.state().strikes;
        if strikes == 0 {
            return None;
        }
        let request = StrikeResetRequest {
            run_id: self.run_id,
            strikes,
        };
        self.strike_reset = ExternalOpState::Pending;
        self.pending_strike_reset = Some(request);
        Some(request)
    }

    /// Apply the collaborator's answer. On success strikes go to zero and play
    /// resumes with score intact.
    pub fn finish_strike_reset(
        &mut self,
        run_id: u64,
        result: Result<(), ExternalError>,
        now: Millis,
    ) {
        if self.pending_strike_reset.filter(|r| r.run_id == run_id).is_none() {
            log::warn!("Ignoring strike reset result for stale run {run_id}");
            return;
        }
        self.pending_strike_reset = None;
        match result {
            Ok(()) => {
                self.pointer.reset();
                let was_over = self.engine.is_game_over();
                if self.engine.reset_strikes(now) {
                    self.game_over_reported = false;
                    self.last_summary = None;
                    if was_over && !self.submission.is_pending() {
                        // The revived run ends with a new final score
                        self.submission = ExternalOpState::Idle;
                    }
                }
                self.strike_reset = ExternalOpState::Succeeded;
                self.dispatch_events();
            }
            Err(err) => {
                log::warn!("Strike reset failed: {err}");
                self.strike_reset = ExternalOpState::Failed(err);
            }
        }
    }

    pub fn engine(&self) -> &RoundEngine {
        &self.engine
    }

    pub fn phase(&self) -> RoundPhase {
        self.engine.phase()
    }

    pub fn card(&self) -> Option<Card> {
        self.engine.card()
    }

    pub fn state(&self) -> &SessionState {
        self.engine.state()
    }

    pub fn remaining_ms(&self, now: Millis) -> Millis {
        self.engine.remaining_ms(now)
    }

    pub fn progress(&self, now: Millis) -> f32 {
        self.engine.progress(now)
    }

    pub fn drag_offset(&self) -> glam::Vec2 {
        self.pointer.drag_offset()
    }

    pub fn run_id(&self) -> u64 {
        self.run_id
    }

    pub fn last_summary(&self) -> Option<&RunSummary> {
        self.last_summary.as_ref()
    }

    pub fn totals(&self) -> &ScoreTotals {
        &self.totals
    }

    pub fn submission_state(&self) -> &ExternalOpState {
        &self.submission
    }

    pub fn strike_reset_state(&self) -> &ExternalOpState {
        &self.strike_reset
    }

    pub fn cues(&self) -> &C {
        &self.cues
    }

    pub fn cues_mut(&mut self) -> &mut C {
        &mut self.cues
    }

    #[cfg(test)]
    pub(crate) fn engine_mut(&mut self) -> &mut RoundEngine {
        &mut self.engine
    }

    fn dispatch_events(&mut self) {
        for event in self.engine.drain_events() {
            match event {
                EngineEvent::Resolved { outcome, .. } => match outcome {
                    RoundOutcome::Correct => self.cues.play_correct_cue(),
                    RoundOutcome::Incorrect(IncorrectReason::Timeout) => {
                        self.cues.play_timeout_cue()
                    }
                    RoundOutcome::Incorrect(IncorrectReason::WrongDirection) => {
                        self.cues.play_incorrect_cue()
                    }
                },
                EngineEvent::Milestone(_) => {
                    if self.engine.config().milestone_cues {
                        self.cues.play_milestone_cue();
                    }
                }
                EngineEvent::GameOver {
                    final_score,
                    strikes,
                } => {
                    if self.game_over_reported {
                        continue;
                    }
                    self.game_over_reported = true;
                    let summary = RunSummary {
                        run_id: self.run_id,
                        seed: self.engine.seed(),
                        final_score,
                        strikes,
                        stats: *self.engine.stats(),
                    };
                    self.last_summary = Some(summary);
                    if let Some(hook) = self.on_game_over.as_mut() {
                        hook(&summary);
                    }
                }
                EngineEvent::CardDealt(_) | EngineEvent::StrikesReset => {}
            }
        }
    }
}
