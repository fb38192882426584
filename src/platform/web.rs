//! Browser bindings
//!
//! Thin `wasm_bindgen` wrapper around [`SessionController`]. The page forwards
//! DOM events, calls `update` from `requestAnimationFrame`, and plays whatever
//! cues come out of `drain_cues`.

use wasm_bindgen::prelude::*;

use crate::config::GameConfig;
use crate::error::ExternalError;
use crate::platform::cues::CueLog;
use crate::platform::input::{PointerEvent, PointerKind};
use crate::platform::time::{SystemClock, TimeSource};
use crate::sim::{IncorrectReason, RoundOutcome, RoundPhase, SessionController};
use crate::totals::ScoreTotals;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Swipe Reflex core loaded");
}

fn outcome_name(outcome: RoundOutcome) -> String {
    match outcome {
        RoundOutcome::Correct => "correct",
        RoundOutcome::Incorrect(IncorrectReason::Timeout) => "timeout",
        RoundOutcome::Incorrect(IncorrectReason::WrongDirection) => "wrong",
    }
    .to_string()
}

fn external_result(ok: bool, message: String) -> Result<(), ExternalError> {
    if ok {
        Ok(())
    } else if message.is_empty() {
        Err(ExternalError::Unavailable)
    } else {
        Err(ExternalError::Rejected(message))
    }
}

#[wasm_bindgen]
pub struct WebSession {
    session: SessionController<CueLog>,
    clock: SystemClock,
}

#[wasm_bindgen]
impl WebSession {
    /// Build with the stored tuning and totals
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<WebSession, JsValue> {
        let seed = js_sys::Math::random().to_bits() ^ (js_sys::Date::now() as u64);
        let session =
            SessionController::new(GameConfig::load(), CueLog::new(), ScoreTotals::load(), seed)
                .map_err(|err| JsValue::from_str(&err.to_string()))?;
        Ok(WebSession {
            session,
            clock: SystemClock::new(),
        })
    }

    pub fn start_run(&mut self) -> u64 {
        let now = self.clock.now_ms();
        self.session.start_run(now)
    }

    pub fn key_down(&mut self, key: &str) -> Option<String> {
        let now = self.clock.now_ms();
        self.session.handle_key(key, now).map(outcome_name)
    }

    pub fn pointer_down(&mut self, id: u32, is_touch: bool, x: f32, y: f32) {
        let kind = if is_touch {
            PointerKind::Touch
        } else {
            PointerKind::Mouse
        };
        let time_ms = self.clock.now_ms();
        self.session.handle_pointer(PointerEvent::Down {
            id,
            kind,
            x,
            y,
            time_ms,
        });
    }

    pub fn pointer_move(&mut self, id: u32, x: f32, y: f32) {
        self.session.handle_pointer(PointerEvent::Move { id, x, y });
    }

    pub fn pointer_up(&mut self, id: u32, x: f32, y: f32) -> Option<String> {
        let time_ms = self.clock.now_ms();
        self.session
            .handle_pointer(PointerEvent::Up { id, x, y, time_ms })
            .map(outcome_name)
    }

    pub fn pointer_cancel(&mut self, id: u32) {
        self.session.handle_pointer(PointerEvent::Cancel { id });
    }

    /// Call once per animation frame
    pub fn update(&mut self) -> Option<String> {
        let now = self.clock.now_ms();
        self.session.update(now).map(outcome_name)
    }

    pub fn pause(&mut self) {
        let now = self.clock.now_ms();
        self.session.pause(now);
    }

    pub fn resume(&mut self) {
        let now = self.clock.now_ms();
        self.session.resume(now);
    }

    /// Cue names queued since the last call
    pub fn drain_cues(&mut self) -> js_sys::Array {
        self.session
            .cues_mut()
            .drain()
            .into_iter()
            .map(|cue| JsValue::from_str(cue.as_str()))
            .collect()
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.session.cues_mut().set_muted(muted);
    }

    // === Read-only state for rendering ===

    pub fn is_game_over(&self) -> bool {
        self.session.phase() == RoundPhase::GameOver
    }

    pub fn score(&self) -> u64 {
        self.session.state().score
    }

    pub fn strikes(&self) -> u32 {
        self.session.state().strikes
    }

    pub fn multiplier(&self) -> u32 {
        self.session.state().multiplier
    }

    pub fn total_score(&self) -> u64 {
        self.session.totals().total_score
    }

    pub fn card_direction(&self) -> Option<String> {
        self.session
            .card()
            .map(|card| card.direction().as_str().to_string())
    }

    pub fn card_is_joker(&self) -> bool {
        self.session.card().is_some_and(|card| card.is_joker())
    }

    pub fn card_sequence(&self) -> u64 {
        self.session.state().card_sequence
    }

    pub fn progress(&self) -> f32 {
        self.session.progress(self.clock.now_ms())
    }

    pub fn remaining_ms(&self) -> f64 {
        self.session.remaining_ms(self.clock.now_ms())
    }

    pub fn drag_x(&self) -> f32 {
        self.session.drag_offset().x
    }

    pub fn drag_y(&self) -> f32 {
        self.session.drag_offset().y
    }

    // === External round trips ===

    /// Returns the run id to echo back in `finish_score_submission`
    pub fn request_score_submission(&mut self) -> Option<u64> {
        self.session.request_score_submission().map(|r| r.run_id)
    }

    pub fn finish_score_submission(&mut self, run_id: u64, ok: bool, message: String) {
        self.session
            .finish_score_submission(run_id, external_result(ok, message));
    }

    pub fn request_strike_reset(&mut self) -> Option<u64> {
        self.session.request_strike_reset().map(|r| r.run_id)
    }

    pub fn finish_strike_reset(&mut self, run_id: u64, ok: bool, message: String) {
        let now = self.clock.now_ms();
        self.session
            .finish_strike_reset(run_id, external_result(ok, message), now);
    }
}
