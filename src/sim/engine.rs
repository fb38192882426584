//! Round engine
//!
//! Owns the current card, the session counters and the per-card deadline.
//! Every mutation happens inside one resolve step, triggered either by an
//! accepted attempt or by deadline expiry, whichever reaches the engine first.
//! Resolving cancels the deadline and disarms the arbiter, so the loser of the
//! race has nothing left to act on.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::arbiter::{InputArbiter, InputSource};
use super::atmosphere::AtmosphereStage;
use super::card::{Card, IncorrectReason, RoundOutcome};
use super::deadline::{ClockState, DeadlineClock};
use super::difficulty::DifficultyCurve;
use super::direction::Direction;
use crate::Millis;
use crate::config::GameConfig;
use crate::error::ConfigError;

/// Where the engine is in the card loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// No run started yet
    Idle,
    /// Between cards
    AwaitingCard,
    /// A card is live and its deadline is running
    CardActive,
    /// Applying the outcome of the live card
    Resolving,
    /// Strikes reached the limit
    GameOver,
}

/// Counters for the current run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub score: u64,
    pub consecutive_correct: u32,
    /// Always `1 + consecutive_correct / streak_window`
    pub multiplier: u32,
    pub strikes: u32,
    /// Sequence id of the latest dealt card (0 = none yet)
    pub card_sequence: u64,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            score: 0,
            consecutive_correct: 0,
            multiplier: 1,
            strikes: 0,
            card_sequence: 0,
        }
    }
}

/// Per-run outcome tallies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RunStats {
    pub cards_dealt: u32,
    pub correct: u32,
    pub wrong_direction: u32,
    pub timeouts: u32,
    pub longest_streak: u32,
}

/// Things the outer layers react to, drained after each engine call
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EngineEvent {
    CardDealt(Card),
    Resolved { card: Card, outcome: RoundOutcome },
    /// Score moved into a deeper stage
    Milestone(AtmosphereStage),
    StrikesReset,
    GameOver { final_score: u64, strikes: u32 },
}

/// Score multiplier for a streak length
pub fn multiplier_for(consecutive_correct: u32, streak_window: u32) -> u32 {
    1 + consecutive_correct / streak_window
}

#[derive(Debug, Clone)]
pub struct RoundEngine {
    config: GameConfig,
    curve: DifficultyCurve,
    seed: u64,
    rng: Pcg32,
    arbiter: InputArbiter,
    clock: DeadlineClock,
    state: SessionState,
    stats: RunStats,
    phase: RoundPhase,
    card: Option<Card>,
    /// Highest sequence id already resolved
    resolved_through: u64,
    /// Host hold in effect; newly dealt cards start paused
    held: bool,
    events: Vec<EngineEvent>,
}

impl RoundEngine {
    /// Build an idle engine. Fails fast on invalid tuning.
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            curve: DifficultyCurve::from_config(&config),
            config,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            arbiter: InputArbiter::new(),
            clock: DeadlineClock::new(),
            state: SessionState::default(),
            stats: RunStats::default(),
            phase: RoundPhase::Idle,
            card: None,
            resolved_through: 0,
            held: false,
            events: Vec::new(),
        })
    }

    /// Back to the zero state. Cancels the live deadline and disarms input so
    /// nothing from the previous run can land.
    pub fn reset(&mut self, seed: u64) {
        self.clock.cancel();
        self.arbiter.disarm();
        self.seed = seed;
        self.rng = Pcg32::seed_from_u64(seed);
        self.state = SessionState::default();
        self.stats = RunStats::default();
        self.phase = RoundPhase::Idle;
        self.card = None;
        self.resolved_through = 0;
        self.held = false;
        self.events.clear();
    }

    /// Reset and deal the first card
    pub fn start_run(&mut self, seed: u64, now: Millis) {
        self.reset(seed);
        log::info!("Run started (seed {seed})");
        self.phase = RoundPhase::AwaitingCard;
        self.deal_card(now);
    }

    /// Offer a player attempt for the card with `sequence_id`.
    ///
    /// Returns the outcome if this attempt resolved the card; `None` when it
    /// was dropped (duplicate, stale card, no live card).
    pub fn submit_attempt(
        &mut self,
        direction: Direction,
        sequence_id: u64,
        source: InputSource,
        now: Millis,
    ) -> Option<RoundOutcome> {
        if self.phase != RoundPhase::CardActive {
            return None;
        }
        let attempt = self
            .arbiter
            .submit_attempt(direction, sequence_id, source, now)?;
        let card = self.card?;
        debug_assert_eq!(attempt.source_sequence_id, card.sequence_id());

        log::debug!(
            "Card #{} answered {:?} via {:?}",
            card.sequence_id(),
            attempt.direction,
            attempt.source
        );
        Some(self.resolve(card, card.judge(attempt.direction), now))
    }

    /// Advance time. Returns the timeout outcome if the live card expired.
    pub fn update(&mut self, now: Millis) -> Option<RoundOutcome> {
        if self.phase != RoundPhase::CardActive || !self.clock.poll(now) {
            return None;
        }
        let card = self.card?;
        log::debug!("Card #{} timed out", card.sequence_id());
        Some(self.resolve(
            card,
            RoundOutcome::Incorrect(IncorrectReason::Timeout),
            now,
        ))
    }

    /// Zero the strikes after an external confirmation. Score and streak are
    /// kept; the live card (if any) is withdrawn and a fresh one dealt.
    ///
    /// Returns `false` if no run has been started.
    pub fn reset_strikes(&mut self, now: Millis) -> bool {
        if self.phase == RoundPhase::Idle {
            return false;
        }
        self.clock.cancel();
        self.arbiter.disarm();
        self.state.strikes = 0;
        self.events.push(EngineEvent::StrikesReset);
        log::info!("Strikes reset at score {}", self.state.score);

        self.phase = RoundPhase::AwaitingCard;
        self.deal_card(now);
        true
    }

    /// Hold the deadline (e.g. during a feedback flash). The hold lasts
    /// until `resume`, across card changes.
    pub fn pause(&mut self, now: Millis) {
        if matches!(self.phase, RoundPhase::Idle | RoundPhase::GameOver) {
            return;
        }
        self.held = true;
        if self.phase == RoundPhase::CardActive {
            self.clock.pause(now);
        }
    }

    pub fn resume(&mut self, now: Millis) {
        self.held = false;
        if self.phase == RoundPhase::CardActive {
            self.clock.resume(now);
        }
    }

    pub fn is_held(&self) -> bool {
        self.held
    }

    /// Take the events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == RoundPhase::GameOver
    }

    /// Live card, if any
    pub fn card(&self) -> Option<Card> {
        match self.phase {
            RoundPhase::CardActive => self.card,
            _ => None,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn curve(&self) -> &DifficultyCurve {
        &self.curve
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn atmosphere(&self) -> AtmosphereStage {
        AtmosphereStage::from_score(self.state.score)
    }

    pub fn clock_state(&self) -> ClockState {
        self.clock.state()
    }

    /// Deadline budget of the live card
    pub fn card_deadline_ms(&self) -> Millis {
        self.clock.duration_ms()
    }

    pub fn remaining_ms(&self, now: Millis) -> Millis {
        self.clock.remaining(now)
    }

    /// Fraction of the live card's budget left, for the countdown bar
    pub fn progress(&self, now: Millis) -> f32 {
        self.clock.progress(now)
    }

    /// Apply one outcome. The only place session counters change.
    fn resolve(&mut self, card: Card, outcome: RoundOutcome, now: Millis) -> RoundOutcome {
        debug_assert!(card.sequence_id() > self.resolved_through);
        self.phase = RoundPhase::Resolving;
        self.clock.cancel();
        self.arbiter.disarm();
        self.resolved_through = card.sequence_id();

        let stage_before = self.atmosphere();
        match outcome {
            RoundOutcome::Correct => {
                self.state.consecutive_correct += 1;
                self.state.multiplier =
                    multiplier_for(self.state.consecutive_correct, self.config.streak_window);
                self.state.score += u64::from(self.state.multiplier);
                self.stats.correct += 1;
                self.stats.longest_streak =
                    self.stats.longest_streak.max(self.state.consecutive_correct);
            }
            RoundOutcome::Incorrect(reason) => {
                self.state.consecutive_correct = 0;
                self.state.multiplier = 1;
                self.state.strikes += 1;
                match reason {
                    IncorrectReason::Timeout => self.stats.timeouts += 1,
                    IncorrectReason::WrongDirection => self.stats.wrong_direction += 1,
                }
            }
        }
        self.events.push(EngineEvent::Resolved { card, outcome });

        let stage_after = self.atmosphere();
        if stage_after > stage_before {
            log::info!("Entered {:?} at score {}", stage_after, self.state.score);
            self.events.push(EngineEvent::Milestone(stage_after));
        }

        if self.state.strikes >= self.config.max_strikes {
            self.phase = RoundPhase::GameOver;
            log::info!(
                "Game over: score {}, strikes {}",
                self.state.score,
                self.state.strikes
            );
            self.events.push(EngineEvent::GameOver {
                final_score: self.state.score,
                strikes: self.state.strikes,
            });
        } else {
            self.phase = RoundPhase::AwaitingCard;
            self.deal_card(now);
        }
        outcome
    }

    fn deal_card(&mut self, now: Millis) {
        let direction = Direction::random(&mut self.rng);
        let joker_chance = self.curve.joker_probability(self.state.score);
        let is_joker = self.rng.random_bool(joker_chance);
        self.install_card(direction, is_joker, now);
    }

    fn install_card(&mut self, direction: Direction, is_joker: bool, now: Millis) {
        debug_assert_eq!(self.phase, RoundPhase::AwaitingCard);
        self.state.card_sequence += 1;
        let card = Card::new(direction, is_joker, self.state.card_sequence);
        let deadline = self.curve.deadline(self.state.score);

        self.card = Some(card);
        self.arbiter.arm(card.sequence_id());
        self.clock.start(deadline, now);
        if self.held {
            self.clock.pause(now);
        }
        self.stats.cards_dealt += 1;
        self.phase = RoundPhase::CardActive;

        log::debug!(
            "Dealt card #{}: {:?}{} ({deadline:.0} ms)",
            card.sequence_id(),
            direction,
            if is_joker { " (joker)" } else { "" }
        );
        self.events.push(EngineEvent::CardDealt(card));
    }

    /// Withdraw the live card and deal a chosen one instead
    #[cfg(test)]
    pub(crate) fn force_card(&mut self, direction: Direction, is_joker: bool, now: Millis) -> Card {
        self.clock.cancel();
        self.arbiter.disarm();
        self.phase = RoundPhase::AwaitingCard;
        self.install_card(direction, is_joker, now);
        self.card.expect("card just installed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use proptest::prelude::*;

    fn started(seed: u64) -> RoundEngine {
        started_with(GameConfig::default(), seed)
    }

    fn started_with(config: GameConfig, seed: u64) -> RoundEngine {
        let mut engine = RoundEngine::new(config, seed).unwrap();
        engine.start_run(seed, 0.0);
        engine
    }

    fn answer(engine: &mut RoundEngine, correct: bool, now: Millis) -> Option<RoundOutcome> {
        let card = engine.card()?;
        let direction = if correct {
            card.target_direction()
        } else {
            card.target_direction().opposite()
        };
        engine.submit_attempt(direction, card.sequence_id(), InputSource::Keyboard, now)
    }

    fn resolved_count(events: &[EngineEvent], sequence_id: u64) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, EngineEvent::Resolved { card, .. } if card.sequence_id() == sequence_id))
            .count()
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = GameConfig {
            start_ms: -1.0,
            ..GameConfig::default()
        };
        assert!(RoundEngine::new(config, 1).is_err());

        let config = GameConfig {
            start_ms: f64::INFINITY,
            ..GameConfig::default()
        };
        assert!(RoundEngine::new(config, 1).is_err());
    }

    #[test]
    fn test_start_run_deals_first_card() {
        let mut engine = RoundEngine::new(GameConfig::default(), 1).unwrap();
        assert_eq!(engine.phase(), RoundPhase::Idle);
        assert!(engine.card().is_none());

        engine.start_run(42, 0.0);
        assert_eq!(engine.phase(), RoundPhase::CardActive);
        let card = engine.card().unwrap();
        assert_eq!(card.sequence_id(), 1);
        assert_eq!(engine.card_deadline_ms(), START_MS);
        assert_eq!(engine.remaining_ms(500.0), START_MS - 500.0);
        assert_eq!(*engine.state(), SessionState { card_sequence: 1, ..SessionState::default() });
        assert_eq!(engine.drain_events(), vec![EngineEvent::CardDealt(card)]);
    }

    #[test]
    fn test_correct_answer_scores_and_advances() {
        let mut engine = started(7);
        assert_eq!(answer(&mut engine, true, 300.0), Some(RoundOutcome::Correct));

        let state = engine.state();
        assert_eq!(state.score, 1);
        assert_eq!(state.consecutive_correct, 1);
        assert_eq!(state.multiplier, 1);
        assert_eq!(state.card_sequence, 2);
        assert_eq!(engine.card().unwrap().sequence_id(), 2);
        // Deadline shrinks with score and restarts from the answer time
        assert!(engine.card_deadline_ms() < START_MS);
        assert_eq!(engine.remaining_ms(300.0), engine.card_deadline_ms());
    }

    #[test]
    fn test_timeout_is_a_strike() {
        let mut engine = started(7);
        assert_eq!(engine.update(1999.0), None);
        assert_eq!(
            engine.update(2000.0),
            Some(RoundOutcome::Incorrect(IncorrectReason::Timeout))
        );
        assert_eq!(engine.state().strikes, 1);
        assert_eq!(engine.stats().timeouts, 1);
        assert_eq!(engine.card().unwrap().sequence_id(), 2);
        // Next card's deadline counts from the expiry
        assert_eq!(engine.update(2000.0 + START_MS - 1.0), None);
    }

    #[test]
    fn test_attempt_then_timeout_resolves_once() {
        let mut engine = started(11);
        let first = engine.card().unwrap();
        assert_eq!(answer(&mut engine, true, 1999.5), Some(RoundOutcome::Correct));
        // 1ms later the old deadline would have fired
        assert_eq!(engine.update(2000.5), None);
        // A late key press for the old card is dropped too
        assert_eq!(
            engine.submit_attempt(first.target_direction(), first.sequence_id(), InputSource::Keyboard, 2000.6),
            None
        );

        let events = engine.drain_events();
        assert_eq!(resolved_count(&events, first.sequence_id()), 1);
        assert_eq!(engine.state().score, 1);
        assert_eq!(engine.state().strikes, 0);
    }

    #[test]
    fn test_timeout_then_attempt_resolves_once() {
        let mut engine = started(11);
        let first = engine.card().unwrap();
        assert!(engine.update(2000.0).is_some());
        assert_eq!(
            engine.submit_attempt(first.target_direction(), first.sequence_id(), InputSource::Touch, 2000.9),
            None
        );
        let events = engine.drain_events();
        assert_eq!(resolved_count(&events, first.sequence_id()), 1);
        assert_eq!(engine.state().score, 0);
        assert_eq!(engine.state().strikes, 1);
    }

    #[test]
    fn test_second_key_after_drag_is_dropped() {
        let mut engine = started(5);
        let card = engine.card().unwrap();
        let drag = engine.submit_attempt(card.target_direction(), card.sequence_id(), InputSource::Mouse, 100.0);
        assert_eq!(drag, Some(RoundOutcome::Correct));
        let snapshot = *engine.state();

        let key = engine.submit_attempt(Direction::Up, card.sequence_id(), InputSource::Keyboard, 101.0);
        assert_eq!(key, None);
        assert_eq!(*engine.state(), snapshot);
    }

    #[test]
    fn test_joker_requires_opposite() {
        let mut engine = started(3);
        let joker = engine.force_card(Direction::Up, true, 0.0);
        assert_eq!(
            engine.submit_attempt(Direction::Up, joker.sequence_id(), InputSource::Touch, 10.0),
            Some(RoundOutcome::Incorrect(IncorrectReason::WrongDirection))
        );

        let joker = engine.force_card(Direction::Up, true, 20.0);
        assert_eq!(
            engine.submit_attempt(Direction::Down, joker.sequence_id(), InputSource::Touch, 30.0),
            Some(RoundOutcome::Correct)
        );
    }

    #[test]
    fn test_three_wrong_answers_end_the_run() {
        let mut engine = started(9);
        for _ in 0..4 {
            assert_eq!(answer(&mut engine, true, 100.0), Some(RoundOutcome::Correct));
        }
        let score_before = engine.state().score;
        engine.drain_events();

        for strike in 1..=3u32 {
            assert_eq!(
                answer(&mut engine, false, 200.0),
                Some(RoundOutcome::Incorrect(IncorrectReason::WrongDirection))
            );
            assert_eq!(engine.state().strikes, strike);
            assert_eq!(engine.is_game_over(), strike == MAX_STRIKES);
        }

        assert_eq!(engine.state().score, score_before);
        assert_eq!(engine.phase(), RoundPhase::GameOver);
        assert!(engine.card().is_none());

        let events = engine.drain_events();
        assert!(matches!(
            events.last(),
            Some(EngineEvent::GameOver { final_score, strikes: 3 }) if *final_score == score_before
        ));
        // No card dealt after the final strike
        let dealt = events.iter().filter(|e| matches!(e, EngineEvent::CardDealt(_))).count();
        assert_eq!(dealt, 2);

        // Nothing moves after game over
        assert_eq!(engine.update(1_000_000.0), None);
        assert_eq!(engine.state().card_sequence, 7);
    }

    #[test]
    fn test_multiplier_grows_with_streak_and_resets() {
        let config = GameConfig {
            streak_window: 2,
            ..GameConfig::default()
        };
        let mut engine = started_with(config, 1);

        let expected = [(1, 1), (2, 3), (2, 5), (3, 8)];
        for (multiplier, score) in expected {
            answer(&mut engine, true, 10.0);
            assert_eq!(engine.state().multiplier, multiplier);
            assert_eq!(engine.state().score, score);
        }

        answer(&mut engine, false, 20.0);
        assert_eq!(engine.state().multiplier, 1);
        assert_eq!(engine.state().consecutive_correct, 0);

        answer(&mut engine, true, 30.0);
        assert_eq!(engine.state().score, 9);
        assert_eq!(engine.stats().longest_streak, 4);
    }

    #[test]
    fn test_reset_strikes_keeps_score_and_streak() {
        let mut engine = started(21);
        answer(&mut engine, false, 0.0);
        answer(&mut engine, true, 0.0);
        answer(&mut engine, true, 0.0);
        answer(&mut engine, false, 0.0);
        answer(&mut engine, true, 0.0);
        let before = *engine.state();
        assert_eq!(before.strikes, 2);
        let stale = engine.card().unwrap();

        assert!(engine.reset_strikes(50.0));
        let after = *engine.state();
        assert_eq!(after.strikes, 0);
        assert_eq!(after.score, before.score);
        assert_eq!(after.consecutive_correct, before.consecutive_correct);
        assert_eq!(after.multiplier, before.multiplier);

        // The withdrawn card can no longer be answered or expire
        assert_eq!(
            engine.submit_attempt(stale.target_direction(), stale.sequence_id(), InputSource::Keyboard, 51.0),
            None
        );
        assert_eq!(engine.card().unwrap().sequence_id(), stale.sequence_id() + 1);
    }

    #[test]
    fn test_reset_strikes_revives_game_over() {
        let mut engine = started(2);
        for _ in 0..3 {
            answer(&mut engine, false, 0.0);
        }
        assert!(engine.is_game_over());
        assert!(engine.reset_strikes(100.0));
        assert_eq!(engine.phase(), RoundPhase::CardActive);
        assert_eq!(engine.state().strikes, 0);

        let mut idle = RoundEngine::new(GameConfig::default(), 2).unwrap();
        assert!(!idle.reset_strikes(0.0));
    }

    #[test]
    fn test_start_run_discards_previous_run() {
        let mut engine = started(4);
        answer(&mut engine, true, 0.0);
        answer(&mut engine, false, 0.0);
        let stale = engine.card().unwrap();

        engine.start_run(5, 10_000.0);
        assert_eq!(engine.state().score, 0);
        assert_eq!(engine.state().strikes, 0);
        assert_eq!(engine.state().card_sequence, 1);
        assert_eq!(engine.stats().cards_dealt, 1);
        // Stale id 3 doesn't match the new card #1
        assert_eq!(
            engine.submit_attempt(stale.target_direction(), stale.sequence_id(), InputSource::Keyboard, 10_001.0),
            None
        );
    }

    #[test]
    fn test_pause_holds_deadline() {
        let mut engine = started(6);
        engine.pause(500.0);
        assert_eq!(engine.update(60_000.0), None);
        engine.resume(60_000.0);
        assert_eq!(engine.remaining_ms(60_000.0), START_MS - 500.0);
        assert!(engine.update(60_000.0 + START_MS - 500.0).is_some());
    }

    #[test]
    fn test_hold_carries_over_to_next_card() {
        let mut engine = started(6);
        engine.pause(300.0);
        // Answered during the hold
        assert_eq!(answer(&mut engine, true, 400.0), Some(RoundOutcome::Correct));
        assert!(engine.is_held());
        assert_eq!(engine.clock_state(), ClockState::Paused);
        let budget = engine.card_deadline_ms();
        assert_eq!(engine.update(100_000.0), None);

        engine.resume(100_000.0);
        assert!(!engine.is_held());
        assert_eq!(engine.clock_state(), ClockState::Running);
        assert_eq!(engine.remaining_ms(100_000.0), budget);
        assert!(engine.update(100_000.0 + budget).is_some());
    }

    #[test]
    fn test_new_run_clears_hold() {
        let mut engine = started(6);
        engine.pause(10.0);
        engine.start_run(7, 20.0);
        assert!(!engine.is_held());
        assert_eq!(engine.clock_state(), ClockState::Running);
    }

    #[test]
    fn test_milestone_at_stage_boundary() {
        // One point per correct answer
        let config = GameConfig {
            streak_window: 1000,
            ..GameConfig::default()
        };
        let mut engine = started_with(config, 8);
        let mut milestones = Vec::new();
        for _ in 0..100 {
            answer(&mut engine, true, 0.0);
            for event in engine.drain_events() {
                if let EngineEvent::Milestone(stage) = event {
                    milestones.push((stage, engine.state().score));
                }
            }
        }
        assert_eq!(engine.state().score, 100);
        assert_eq!(milestones, vec![(AtmosphereStage::Threshold1, 100)]);
    }

    #[test]
    fn test_same_seed_same_cards() {
        let mut a = started(99);
        let mut b = started(99);
        for i in 0..50 {
            assert_eq!(a.card(), b.card());
            let correct = i % 3 != 0 || i > 40;
            answer(&mut a, correct, i as f64);
            answer(&mut b, correct, i as f64);
            if a.is_game_over() {
                break;
            }
        }
        assert_eq!(a.state(), b.state());
    }

    #[test]
    fn test_joker_rate_follows_config() {
        let config = GameConfig {
            joker_probability: 1.0,
            ..GameConfig::default()
        };
        let mut engine = started_with(config, 1);
        for _ in 0..20 {
            assert!(engine.card().unwrap().is_joker());
            answer(&mut engine, true, 0.0);
        }

        let config = GameConfig {
            joker_probability: 0.0,
            ..GameConfig::default()
        };
        let mut engine = started_with(config, 1);
        for _ in 0..20 {
            assert!(!engine.card().unwrap().is_joker());
            answer(&mut engine, true, 0.0);
        }
    }

    #[derive(Debug, Clone)]
    enum Op {
        /// Answer the live card, or the one it replaced
        Attempt { correct: bool, stale: bool },
        Advance(f64),
        Pause,
        Resume,
    }

    fn any_op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (any::<bool>(), any::<bool>()).prop_map(|(correct, stale)| Op::Attempt { correct, stale }),
            (0.0f64..2500.0).prop_map(Op::Advance),
            Just(Op::Pause),
            Just(Op::Resume),
        ]
    }

    proptest! {
        #[test]
        fn every_card_resolves_at_most_once(seed in any::<u64>(), ops in prop::collection::vec(any_op(), 1..120)) {
            let mut engine = started(seed);
            let mut now = 0.0;
            let mut events = engine.drain_events();
            let mut superseded: Option<Card> = None;

            for op in ops {
                let live_before = engine.card();
                match op {
                    Op::Attempt { correct, stale } => {
                        let target = if stale { superseded } else { live_before };
                        if let Some(card) = target {
                            let direction = if correct {
                                card.target_direction()
                            } else {
                                card.target_direction().opposite()
                            };
                            let result = engine.submit_attempt(direction, card.sequence_id(), InputSource::Keyboard, now);
                            if stale {
                                prop_assert!(result.is_none());
                            }
                        }
                    }
                    Op::Advance(dt) => {
                        now += dt;
                        engine.update(now);
                    }
                    Op::Pause => engine.pause(now),
                    Op::Resume => engine.resume(now),
                }
                if let Some(before) = live_before {
                    if engine.card().map(|c| c.sequence_id()) != Some(before.sequence_id()) {
                        superseded = Some(before);
                    }
                }
                events.extend(engine.drain_events());
            }

            let last = engine.state().card_sequence;
            for id in 1..=last {
                let n = resolved_count(&events, id);
                prop_assert!(n <= 1, "card #{} resolved {} times", id, n);
                // Every superseded card was resolved exactly once
                if id < last {
                    prop_assert_eq!(n, 1);
                }
            }

            let state = engine.state();
            prop_assert_eq!(state.multiplier, multiplier_for(state.consecutive_correct, STREAK_WINDOW));
            prop_assert!(state.strikes <= MAX_STRIKES);
        }

        #[test]
        fn multiplier_non_decreasing(streak in 0u32..10_000, window in 1u32..200) {
            prop_assert!(multiplier_for(streak + 1, window) >= multiplier_for(streak, window));
            prop_assert!(multiplier_for(streak, window) >= 1);
        }
    }
}
