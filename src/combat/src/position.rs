//! Continuous world positions and the tile-snapping rule shared by every subsystem.
use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// Maps a continuous coordinate to the tile that contains it.
///
/// Tile `n` covers `[n - 0.5, n + 0.5)`. Geometry, AI, projectile collision and
/// generation all go through this function so occupancy checks agree.
#[inline]
pub fn snap_to_tile(v: f32) -> i32 {
    (v + 0.5).floor() as i32
}

/// Sub-tile position in grid units (tile centres sit on integer coordinates).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

/// Knockback and aim vectors share the position representation.
pub type Velocity = Position;

impl Position {
    pub const ZERO: Position = Position { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Centre of the tile at `(x, y)`.
    pub fn from_tile(x: i32, y: i32) -> Self {
        Self {
            x: x as f32,
            y: y as f32,
        }
    }

    pub fn tile(&self) -> (i32, i32) {
        (snap_to_tile(self.x), snap_to_tile(self.y))
    }

    pub fn distance_to(&self, other: &Position) -> f32 {
        (*other - *self).length()
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Unit vector in the same direction, or zero for a zero vector.
    pub fn normalized(&self) -> Position {
        let len = self.length();
        if len <= f32::EPSILON {
            Position::ZERO
        } else {
            Position::new(self.x / len, self.y / len)
        }
    }

    pub fn lerp(&self, other: &Position, t: f32) -> Position {
        Position::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }

    pub fn dot(&self, other: &Position) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// Rotates the vector by `radians` (counter-clockwise in grid space).
    pub fn rotated(&self, radians: f32) -> Position {
        let (sin, cos) = radians.sin_cos();
        Position::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        Position::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Position {
    type Output = Position;

    fn sub(self, rhs: Position) -> Position {
        Position::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Position {
    type Output = Position;

    fn mul(self, rhs: f32) -> Position {
        Position::new(self.x * rhs, self.y * rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_is_consistent_at_half_tiles() {
        assert_eq!(snap_to_tile(2.49), 2);
        assert_eq!(snap_to_tile(2.5), 3);
        assert_eq!(snap_to_tile(-0.5), 0);
        assert_eq!(snap_to_tile(-0.51), -1);
        assert_eq!(Position::new(3.4, 7.6).tile(), (3, 8));
    }

    #[test]
    fn test_normalized_zero_vector() {
        assert_eq!(Position::ZERO.normalized(), Position::ZERO);
        let n = Position::new(3.0, 4.0).normalized();
        assert!((n.length() - 1.0).abs() < 1e-6);
    }
}
