//! Colors for game elements

use crate::sim::actor::RivalMode;
use crate::sim::tetris::Tetromino;

use super::Color;

pub const BACKGROUND: Color = [0.0, 0.0, 0.0, 1.0];
pub const TEXT: Color = [1.0, 1.0, 1.0, 1.0];
pub const OVERLAY: Color = [0.0, 0.0, 0.0, 0.6];

// Maze
pub const MAZE_WALL: Color = [0.13, 0.13, 0.87, 1.0];
pub const GATE: Color = [1.0, 0.72, 1.0, 1.0];
pub const DOT: Color = [1.0, 0.72, 0.68, 1.0];
pub const PLAYER: Color = [1.0, 1.0, 0.0, 1.0];
pub const FRIGHTENED: Color = [0.13, 0.13, 1.0, 1.0];
/// Frightened flash when the countdown is almost over
pub const FRIGHTENED_ENDING: Color = [1.0, 1.0, 1.0, 1.0];

// Falling shapes
pub const BOARD_GRID: Color = [0.2, 0.2, 0.2, 1.0];

// Merge
pub const MERGE_BOARD: Color = [0.73, 0.68, 0.63, 1.0];
pub const MERGE_EMPTY: Color = [0.8, 0.76, 0.71, 1.0];
pub const TILE_DARK_TEXT: Color = [0.47, 0.43, 0.4, 1.0];

// Bomb arena
pub const ARENA_FLOOR: Color = [0.2, 0.55, 0.2, 1.0];
pub const ARENA_WALL: Color = [0.4, 0.4, 0.4, 1.0];
pub const BRICK: Color = [0.6, 0.35, 0.15, 1.0];
pub const BOMB: Color = [0.1, 0.1, 0.1, 1.0];
pub const FLAME: Color = [1.0, 0.5, 0.0, 0.9];
pub const POWER_UP: Color = [0.95, 0.85, 0.2, 1.0];
pub const SEATS: [Color; 2] = [[1.0, 1.0, 1.0, 1.0], [0.9, 0.2, 0.2, 1.0]];

/// Rival body color by name; unknown names get orange
pub fn rival(name: &str, mode: Option<RivalMode>, ending: bool) -> Color {
    if mode == Some(RivalMode::Frightened) {
        return if ending { FRIGHTENED_ENDING } else { FRIGHTENED };
    }
    match name {
        "Blinky" => [1.0, 0.0, 0.0, 1.0],
        "Pinky" => [1.0, 0.72, 1.0, 1.0],
        "Inky" => [0.0, 1.0, 1.0, 1.0],
        _ => [1.0, 0.72, 0.32, 1.0],
    }
}

pub fn tetromino(kind: Tetromino) -> Color {
    match kind {
        Tetromino::I => [0.0, 0.94, 0.94, 1.0],
        Tetromino::J => [0.0, 0.0, 0.94, 1.0],
        Tetromino::L => [0.94, 0.63, 0.0, 1.0],
        Tetromino::O => [0.94, 0.94, 0.0, 1.0],
        Tetromino::S => [0.0, 0.94, 0.0, 1.0],
        Tetromino::T => [0.63, 0.0, 0.94, 1.0],
        Tetromino::Z => [0.94, 0.0, 0.0, 1.0],
    }
}

/// Tile background, darker to brighter orange as values grow
pub fn tile(value: u32) -> Color {
    match value {
        0 => MERGE_EMPTY,
        2 => [0.93, 0.89, 0.85, 1.0],
        4 => [0.93, 0.88, 0.78, 1.0],
        8 => [0.95, 0.69, 0.47, 1.0],
        16 => [0.96, 0.58, 0.39, 1.0],
        32 => [0.96, 0.49, 0.37, 1.0],
        64 => [0.96, 0.37, 0.23, 1.0],
        128 => [0.93, 0.81, 0.45, 1.0],
        256 => [0.93, 0.8, 0.38, 1.0],
        512 => [0.93, 0.78, 0.31, 1.0],
        1024 => [0.93, 0.77, 0.25, 1.0],
        2048 => [0.93, 0.76, 0.18, 1.0],
        _ => [0.24, 0.23, 0.2, 1.0],
    }
}

pub fn tile_text(value: u32) -> Color {
    if value <= 4 { TILE_DARK_TEXT } else { TEXT }
}
