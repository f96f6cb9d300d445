//! Actor state for the maze game

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::direction::Direction;
use crate::consts::FRIGHTENED_SPEED_FACTOR;

/// Shared kinematic state of every moving entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    /// Top-left corner in pixels
    pub pos: Vec2,
    /// Current heading (`None` while standing still)
    pub direction: Option<Direction>,
    /// Pixels per tick
    pub speed: f32,
}

impl Actor {
    pub fn new(pos: Vec2, direction: Option<Direction>, speed: f32) -> Self {
        Self {
            pos,
            direction,
            speed,
        }
    }
}

/// The player-controlled actor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub actor: Actor,
    /// Buffered input, applied as soon as the turn becomes legal
    pub queued: Option<Direction>,
    pub spawn: Vec2,
}

impl Player {
    pub fn new(spawn: Vec2, speed: f32) -> Self {
        Self {
            actor: Actor::new(spawn, None, speed),
            queued: None,
            spawn,
        }
    }

    /// Back to spawn, standing still with no buffered input
    pub fn reset(&mut self) {
        self.actor.pos = self.spawn;
        self.actor.direction = None;
        self.queued = None;
    }
}

/// Rival behaviour mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RivalMode {
    /// Pursue the player
    Chase,
    /// Wander (uniform random)
    Scatter,
    /// Vulnerable: slowed, wandering, capturable
    Frightened,
}

/// Non-player actor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rival {
    pub name: String,
    pub actor: Actor,
    pub mode: RivalMode,
    /// Mode to restore when vulnerability ends
    pub prior_mode: RivalMode,
    pub home: Vec2,
    pub home_direction: Direction,
}

impl Rival {
    pub fn new(name: &str, home: Vec2, direction: Direction, speed: f32) -> Self {
        Self {
            name: name.to_string(),
            actor: Actor::new(home, Some(direction), speed),
            mode: RivalMode::Scatter,
            prior_mode: RivalMode::Scatter,
            home,
            home_direction: direction,
        }
    }

    pub fn is_frightened(&self) -> bool {
        self.mode == RivalMode::Frightened
    }

    /// Speed for this tick
    pub fn current_speed(&self) -> f32 {
        if self.is_frightened() {
            self.actor.speed * FRIGHTENED_SPEED_FACTOR
        } else {
            self.actor.speed
        }
    }

    /// Enter vulnerable mode, remembering the mode to return to
    pub fn frighten(&mut self) {
        if !self.is_frightened() {
            self.prior_mode = self.mode;
        }
        self.mode = RivalMode::Frightened;
    }

    /// Leave vulnerable mode
    pub fn recover(&mut self) {
        if self.is_frightened() {
            self.mode = self.prior_mode;
        }
    }

    /// Apply a base-mode switch; frightened rivals only update their memory
    pub fn set_base_mode(&mut self, mode: RivalMode) {
        if self.is_frightened() {
            self.prior_mode = mode;
        } else {
            self.mode = mode;
            self.prior_mode = mode;
        }
    }

    /// Return home in the given mode
    pub fn send_home(&mut self, mode: RivalMode) {
        self.actor.pos = self.home;
        self.actor.direction = Some(self.home_direction);
        self.mode = mode;
        self.prior_mode = mode;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frighten_remembers_prior_mode() {
        let mut rival = Rival::new("Blinky", Vec2::ZERO, Direction::Up, 1.8);
        rival.set_base_mode(RivalMode::Chase);
        rival.frighten();
        rival.frighten();
        assert!(rival.is_frightened());
        assert!((rival.current_speed() - 1.8 * FRIGHTENED_SPEED_FACTOR).abs() < 1e-6);
        rival.recover();
        assert_eq!(rival.mode, RivalMode::Chase);
    }

    #[test]
    fn test_base_mode_switch_while_frightened() {
        let mut rival = Rival::new("Pinky", Vec2::ZERO, Direction::Down, 1.6);
        rival.frighten();
        rival.set_base_mode(RivalMode::Chase);
        assert!(rival.is_frightened());
        rival.recover();
        assert_eq!(rival.mode, RivalMode::Chase);
    }

    #[test]
    fn test_player_reset() {
        let mut player = Player::new(Vec2::new(32.0, 48.0), 2.0);
        player.actor.pos = Vec2::new(100.0, 100.0);
        player.actor.direction = Some(Direction::Left);
        player.queued = Some(Direction::Up);
        player.reset();
        assert_eq!(player.actor.pos, Vec2::new(32.0, 48.0));
        assert_eq!(player.actor.direction, None);
        assert_eq!(player.queued, None);
    }
}
