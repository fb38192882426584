//! Raw input adapters
//!
//! Maps keyboard keys and pointer/touch event streams onto directions. The
//! host forwards DOM (or native) events here; nothing in this module knows
//! about scoring.

use glam::Vec2;

use crate::Millis;
use crate::sim::arbiter::InputSource;
use crate::sim::direction::Direction;
use crate::sim::gesture::{GestureResolver, Swipe, SwipeSample, SwipeThresholds};

/// Map a `KeyboardEvent.key` value to a direction. Other keys are ignored.
pub fn direction_for_key(key: &str) -> Option<Direction> {
    match key {
        "ArrowUp" | "w" | "W" => Some(Direction::Up),
        "ArrowDown" | "s" | "S" => Some(Direction::Down),
        "ArrowLeft" | "a" | "A" => Some(Direction::Left),
        "ArrowRight" | "d" | "D" => Some(Direction::Right),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Touch,
}

impl PointerKind {
    pub fn source(self) -> InputSource {
        match self {
            PointerKind::Mouse => InputSource::Mouse,
            PointerKind::Touch => InputSource::Touch,
        }
    }
}

/// A raw pointer event in client coordinates (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down {
        id: u32,
        kind: PointerKind,
        x: f32,
        y: f32,
        time_ms: Millis,
    },
    Move {
        id: u32,
        x: f32,
        y: f32,
    },
    Up {
        id: u32,
        x: f32,
        y: f32,
        time_ms: Millis,
    },
    Cancel {
        id: u32,
    },
}

/// A swipe attributed to the card that was live when the drag began
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSwipe {
    pub swipe: Swipe,
    pub source: InputSource,
    pub sequence_id: u64,
    pub time_ms: Millis,
}

#[derive(Debug, Clone, Copy)]
struct ActivePointer {
    id: u32,
    kind: PointerKind,
    sequence_id: u64,
}

/// Follows a single pointer from down to up
#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    resolver: GestureResolver,
    active: Option<ActivePointer>,
}

impl PointerTracker {
    pub fn new(thresholds: SwipeThresholds) -> Self {
        Self {
            resolver: GestureResolver::new(thresholds),
            active: None,
        }
    }

    /// Feed one event. `live_sequence` is the card on screen right now; a
    /// drag is only started over a live card.
    ///
    /// Returns a swipe when a tracked pointer is released far or fast enough.
    pub fn handle(&mut self, event: PointerEvent, live_sequence: Option<u64>) -> Option<PointerSwipe> {
        match event {
            PointerEvent::Down {
                id,
                kind,
                x,
                y,
                time_ms,
            } => {
                // Second finger while dragging
                if self.active.is_some() {
                    return None;
                }
                let sequence_id = live_sequence?;
                self.active = Some(ActivePointer {
                    id,
                    kind,
                    sequence_id,
                });
                self.resolver.begin(SwipeSample::new(x, y, time_ms));
                None
            }
            PointerEvent::Move { id, x, y } => {
                if self.is_tracking(id) {
                    self.resolver.move_to(Vec2::new(x, y));
                }
                None
            }
            PointerEvent::Up { id, x, y, time_ms } => {
                if !self.is_tracking(id) {
                    return None;
                }
                let active = self.active.take()?;
                let swipe = self.resolver.end(SwipeSample::new(x, y, time_ms))?;
                Some(PointerSwipe {
                    swipe,
                    source: active.kind.source(),
                    sequence_id: active.sequence_id,
                    time_ms,
                })
            }
            PointerEvent::Cancel { id } => {
                if self.is_tracking(id) {
                    self.reset();
                }
                None
            }
        }
    }

    /// Forget any drag in progress
    pub fn reset(&mut self) {
        self.active = None;
        self.resolver.cancel();
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    /// Current drag offset for the card-follows-pointer effect
    pub fn drag_offset(&self) -> Vec2 {
        self.resolver.drag_offset()
    }

    fn is_tracking(&self, id: u32) -> bool {
        self.active.is_some_and(|a| a.id == id)
    }
}
