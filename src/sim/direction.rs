//! Cardinal directions shared by every grid game

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Fixed enumeration order; ties in rival selection go to the earliest entry.
pub const DIRECTIONS: [Direction; 4] = [
    Direction::Up,
    Direction::Down,
    Direction::Left,
    Direction::Right,
];

impl Direction {
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Unit step in screen space (y grows downward)
    pub fn as_vec2(self) -> Vec2 {
        self.as_ivec2().as_vec2()
    }

    pub fn as_ivec2(self) -> IVec2 {
        match self {
            Direction::Up => -IVec2::Y,
            Direction::Down => IVec2::Y,
            Direction::Left => -IVec2::X,
            Direction::Right => IVec2::X,
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_opposite() {
        for dir in DIRECTIONS {
            assert_eq!(dir.opposite().opposite(), dir);
            assert_ne!(dir.opposite(), dir);
        }
    }

    #[test]
    fn test_direction_vectors() {
        assert_eq!(Direction::Up.as_ivec2(), IVec2::new(0, -1));
        assert_eq!(Direction::Right.as_vec2(), Vec2::new(1.0, 0.0));
        assert!(Direction::Left.is_horizontal());
        assert!(!Direction::Down.is_horizontal());
    }
}
