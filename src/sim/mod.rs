//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (fixed direction order, rivals by index)
//! - No rendering or platform dependencies

pub mod actor;
pub mod bomber;
pub mod direction;
pub mod grid;
pub mod interaction;
pub mod merge;
pub mod movement;
pub mod phase;
pub mod rival;
pub mod rng;
pub mod state;
pub mod tetris;
pub mod tick;
pub mod timeline;

pub use actor::{Actor, Player, Rival, RivalMode};
pub use bomber::{ArenaInput, ArenaSnapshot, ArenaState};
pub use direction::{DIRECTIONS, Direction};
pub use grid::{Cell, Grid, GridError};
pub use merge::{MergeInput, MergeSnapshot, MergeState};
pub use movement::{Playfield, can_step, resolve_move, resolve_step};
pub use phase::GamePhase;
pub use rng::{RandomSource, SimRng};
pub use state::{MazeEvent, MazeSnapshot, MazeState, MazeTuning};
pub use tetris::{FallingInput, FallingSnapshot, FallingState};
pub use tick::{TickInput, tick};
pub use timeline::Timeline;
