//! Swipe recognition
//!
//! Turns a pointer down → moves → up sequence into a direction. Knows nothing
//! about cards or rules; the caller owns raw event subscription.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::direction::Direction;
use crate::Millis;
use crate::config::GameConfig;
use crate::consts::*;

/// Recognition thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwipeThresholds {
    /// Swipes longer than this register regardless of speed (px)
    pub distance_px: f32,
    /// Flicks faster than this register under the distance floor (px/ms)
    pub velocity_px_per_ms: f32,
    /// Flicks must last longer than this to use the velocity branch (ms)
    pub min_duration_ms: f32,
}

impl Default for SwipeThresholds {
    fn default() -> Self {
        Self {
            distance_px: DISTANCE_THRESHOLD,
            velocity_px_per_ms: VELOCITY_THRESHOLD,
            min_duration_ms: MIN_SWIPE_DURATION,
        }
    }
}

impl From<&GameConfig> for SwipeThresholds {
    fn from(config: &GameConfig) -> Self {
        Self {
            distance_px: config.swipe_distance_px,
            velocity_px_per_ms: config.swipe_velocity_px_per_ms,
            min_duration_ms: config.swipe_min_duration_ms,
        }
    }
}

/// A captured pointer position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwipeSample {
    pub pos: Vec2,
    pub time_ms: Millis,
}

impl SwipeSample {
    pub fn new(x: f32, y: f32, time_ms: Millis) -> Self {
        Self {
            pos: Vec2::new(x, y),
            time_ms,
        }
    }
}

/// Which rule recognized the swipe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwipeTrigger {
    Distance,
    Velocity,
}

/// A recognized swipe with the measurements behind it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Swipe {
    pub direction: Direction,
    pub trigger: SwipeTrigger,
    pub distance: f32,
    /// px/ms
    pub velocity: f32,
    pub duration_ms: f32,
}

impl Swipe {
    /// How far past the winning threshold the swipe went, in [0, 1]
    pub fn confidence(&self, thresholds: &SwipeThresholds) -> f32 {
        let ratio = match self.trigger {
            SwipeTrigger::Distance => self.distance / thresholds.distance_px,
            SwipeTrigger::Velocity => self.velocity / thresholds.velocity_px_per_ms,
        };
        // ratio > 1 by construction; 2x the threshold counts as certain
        (ratio - 1.0).clamp(0.0, 1.0)
    }
}

/// Classify a start/end pair. Pure.
///
/// Recognized if `distance > distance_px`, or if `velocity > velocity_px_per_ms`
/// and `duration > min_duration_ms`. Zero-distance taps never register.
pub fn classify_swipe(
    start: SwipeSample,
    end: SwipeSample,
    thresholds: &SwipeThresholds,
) -> Option<Swipe> {
    let delta = end.pos - start.pos;
    let distance = delta.length();
    if distance <= 0.0 || !distance.is_finite() {
        return None;
    }

    let duration_ms = (end.time_ms - start.time_ms).max(0.0) as f32;
    let velocity = if duration_ms > 0.0 {
        distance / duration_ms
    } else {
        f32::INFINITY
    };

    let trigger = if distance > thresholds.distance_px {
        SwipeTrigger::Distance
    } else if velocity > thresholds.velocity_px_per_ms && duration_ms > thresholds.min_duration_ms
    {
        SwipeTrigger::Velocity
    } else {
        return None;
    };

    Some(Swipe {
        direction: Direction::from_angle(delta.y.atan2(delta.x)),
        trigger,
        distance,
        velocity,
        duration_ms,
    })
}

/// Tracks one in-progress drag
#[derive(Debug, Clone, Copy)]
struct Drag {
    start: SwipeSample,
    last: Vec2,
}

/// Stateful resolver fed by the host's pointer events
#[derive(Debug, Clone, Default)]
pub struct GestureResolver {
    thresholds: SwipeThresholds,
    drag: Option<Drag>,
}

impl GestureResolver {
    pub fn new(thresholds: SwipeThresholds) -> Self {
        Self {
            thresholds,
            drag: None,
        }
    }

    pub fn thresholds(&self) -> &SwipeThresholds {
        &self.thresholds
    }

    /// Pointer went down. Restarts any drag already in progress.
    pub fn begin(&mut self, sample: SwipeSample) {
        self.drag = Some(Drag {
            start: sample,
            last: sample.pos,
        });
    }

    /// Pointer moved. Ignored when no drag is active.
    pub fn move_to(&mut self, pos: Vec2) {
        if let Some(drag) = &mut self.drag {
            drag.last = pos;
        }
    }

    /// Pointer released. Consumes the drag.
    pub fn end(&mut self, sample: SwipeSample) -> Option<Swipe> {
        let drag = self.drag.take()?;
        classify_swipe(drag.start, sample, &self.thresholds)
    }

    /// Like [`GestureResolver::end`] but releases at the last moved position
    pub fn end_at_last(&mut self, time_ms: Millis) -> Option<Swipe> {
        let last = self.drag.as_ref()?.last;
        self.end(SwipeSample { pos: last, time_ms })
    }

    /// Drop the drag without resolving (pointer cancel, card changed)
    pub fn cancel(&mut self) {
        self.drag = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Offset from drag start, for the card-follows-finger effect
    pub fn drag_offset(&self) -> Vec2 {
        self.drag
            .map(|drag| drag.last - drag.start.pos)
            .unwrap_or(Vec2::ZERO)
    }
}
