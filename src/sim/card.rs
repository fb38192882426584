//! Cards and round outcomes

use serde::{Deserialize, Serialize};

use super::direction::Direction;

/// One challenge: an arrow, possibly a joker.
///
/// Cards are never mutated; the engine supersedes each with a new one that
/// carries a strictly larger `sequence_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    direction: Direction,
    is_joker: bool,
    sequence_id: u64,
}

impl Card {
    pub fn new(direction: Direction, is_joker: bool, sequence_id: u64) -> Self {
        Self {
            direction,
            is_joker,
            sequence_id,
        }
    }

    /// Arrow as displayed
    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_joker(&self) -> bool {
        self.is_joker
    }

    /// Correlation token for attempts and expiry
    pub fn sequence_id(&self) -> u64 {
        self.sequence_id
    }

    /// The direction the player must answer with
    pub fn target_direction(&self) -> Direction {
        if self.is_joker {
            self.direction.opposite()
        } else {
            self.direction
        }
    }

    /// Judge an answer against this card
    pub fn judge(&self, answer: Direction) -> RoundOutcome {
        if answer == self.target_direction() {
            RoundOutcome::Correct
        } else {
            RoundOutcome::Incorrect(IncorrectReason::WrongDirection)
        }
    }
}

/// Why a card was failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IncorrectReason {
    Timeout,
    WrongDirection,
}

/// Result of resolving a single card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundOutcome {
    Correct,
    Incorrect(IncorrectReason),
}

impl RoundOutcome {
    pub fn is_correct(&self) -> bool {
        matches!(self, RoundOutcome::Correct)
    }
}
