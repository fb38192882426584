//! Cardinal directions shown on cards and produced by input

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// One of the four arrow directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// The reverse direction. Applying it twice is the identity.
    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Uniform draw over the four directions
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    /// Bucket a screen-space angle (y grows downward) into a 90° sector
    /// centered on each direction.
    ///
    /// Sectors in degrees: right `[-45, 45)`, down `[45, 135)`,
    /// left `[135, 180] ∪ [-180, -135)`, up `[-135, -45)`.
    pub fn from_angle(radians: f32) -> Self {
        let degrees = radians.to_degrees();
        if (-45.0..45.0).contains(&degrees) {
            Direction::Right
        } else if (45.0..135.0).contains(&degrees) {
            Direction::Down
        } else if (-135.0..-45.0).contains(&degrees) {
            Direction::Up
        } else {
            Direction::Left
        }
    }

    /// Screen-space unit vector (y down)
    pub fn unit(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::NEG_Y,
            Direction::Down => Vec2::Y,
            Direction::Left => Vec2::NEG_X,
            Direction::Right => Vec2::X,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}
