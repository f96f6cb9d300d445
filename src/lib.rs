//! Retro Arcade - deterministic grid-game simulations
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid model, movement, interactions, games)
//! - `driver`: Fixed-timestep tick driver and phase state machine
//! - `games` / `session`: Per-game driver adapters and playable screens
//! - `render`: Snapshot to draw-command mapping
//! - `input`: Key bindings and normalized intents
//! - `highscores` / `persistence`: Named high-score values and their stores
//! - `embed`: Handle-based integration of the third-party parallax demo
//! - `platform`: Browser/native platform glue

pub mod driver;
pub mod embed;
pub mod error;
pub mod games;
pub mod highscores;
pub mod input;
pub mod persistence;
pub mod platform;
pub mod render;
pub mod session;
pub mod settings;
pub mod sim;

pub use driver::{Simulation, TickDriver};
pub use error::ArcadeError;
pub use highscores::{GameId, HighScores};
pub use session::{Screen, Session, open_screen};
pub use settings::Settings;

use glam::{IVec2, Vec2};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per display frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Ticks per simulated second
    pub const TICKS_PER_SECOND: u64 = 60;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta fed to the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Maze cell edge in pixels
    pub const CELL_SIZE: f32 = 16.0;
    /// Player speed (pixels per tick)
    pub const PLAYER_SPEED: f32 = 2.0;
    /// Rival speed multiplier while frightened
    pub const FRIGHTENED_SPEED_FACTOR: f32 = 0.6;
    /// Overlap distance between player and rival, in cells
    pub const CAPTURE_RADIUS_CELLS: f32 = 0.8;

    pub const DOT_POINTS: u64 = 10;
    pub const PELLET_POINTS: u64 = 50;
    pub const CAPTURE_BONUS: u64 = 200;
    pub const STARTING_LIVES: u8 = 3;

    /// Power pellet duration (10 seconds)
    pub const VULNERABLE_TICKS: u64 = 10 * TICKS_PER_SECOND;
    /// Scatter phase of the rival mode cycle (7 seconds)
    pub const SCATTER_TICKS: u64 = 7 * TICKS_PER_SECOND;
    /// Chase phase of the rival mode cycle (20 seconds)
    pub const CHASE_TICKS: u64 = 20 * TICKS_PER_SECOND;
}

/// Cell containing a continuous position (floored)
#[inline]
pub fn cell_of(pos: Vec2, cell_size: f32) -> IVec2 {
    (pos / cell_size).floor().as_ivec2()
}

/// Top-left pixel position of a cell
#[inline]
pub fn cell_origin(cell: IVec2, cell_size: f32) -> Vec2 {
    cell.as_vec2() * cell_size
}

/// Manhattan distance between two continuous positions
#[inline]
pub fn manhattan(a: Vec2, b: Vec2) -> f32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_of_floors_negative() {
        assert_eq!(cell_of(Vec2::new(-2.0, 15.9), 16.0), IVec2::new(-1, 0));
        assert_eq!(cell_of(Vec2::new(16.0, 32.0), 16.0), IVec2::new(1, 2));
    }

    #[test]
    fn test_manhattan() {
        assert_eq!(manhattan(Vec2::new(1.0, 2.0), Vec2::new(4.0, -2.0)), 7.0);
    }
}
