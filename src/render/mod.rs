//! Snapshot to draw-command mapping
//!
//! Every function here is pure: it reads a snapshot and returns the commands
//! a backend (canvas, terminal, test) needs to paint one frame. No rule logic
//! lives here and nothing is read back from the backend.

pub mod colors;

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use crate::consts::TICKS_PER_SECOND;
use crate::sim::bomber::{ArenaCell, ArenaSnapshot, PowerUp};
use crate::sim::grid::Cell;
use crate::sim::merge::{MergeSnapshot, SIZE};
use crate::sim::phase::GamePhase;
use crate::sim::state::MazeSnapshot;
use crate::sim::tetris::{BOARD_HEIGHT, BOARD_WIDTH, FallingSnapshot};

/// RGBA, 0.0 - 1.0
pub type Color = [f32; 4];

/// Falling-shape cell edge (pixels)
pub const BLOCK_SIZE: f32 = 24.0;
/// Merge tile edge and gap (pixels)
pub const TILE_SIZE: f32 = 100.0;
pub const TILE_GAP: f32 = 10.0;
/// Bomb arena cell edge (pixels)
pub const ARENA_CELL: f32 = 32.0;
/// Frightened rivals flash during the last two seconds
const FLASH_TICKS: u64 = 2 * TICKS_PER_SECOND;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    Clear(Color),
    Rect {
        pos: Vec2,
        size: Vec2,
        color: Color,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    Text {
        pos: Vec2,
        text: String,
        size: f32,
        color: Color,
    },
}

impl DrawCommand {
    pub fn rect(pos: Vec2, size: Vec2, color: Color) -> Self {
        DrawCommand::Rect { pos, size, color }
    }

    pub fn square(cell: IVec2, edge: f32, color: Color) -> Self {
        Self::rect(cell.as_vec2() * edge, Vec2::splat(edge), color)
    }

    pub fn circle(center: Vec2, radius: f32, color: Color) -> Self {
        DrawCommand::Circle {
            center,
            radius,
            color,
        }
    }

    pub fn text(pos: Vec2, text: impl Into<String>, size: f32, color: Color) -> Self {
        DrawCommand::Text {
            pos,
            text: text.into(),
            size,
            color,
        }
    }
}

/// Centered banner for non-running phases
fn phase_overlay(phase: GamePhase, area: Vec2, out: &mut Vec<DrawCommand>) {
    let message = match phase {
        GamePhase::Running => return,
        GamePhase::NotStarted => "PRESS START",
        GamePhase::Paused => "PAUSED",
        GamePhase::Over => "GAME OVER",
        GamePhase::Won => "YOU WIN!",
    };
    out.push(DrawCommand::rect(Vec2::ZERO, area, colors::OVERLAY));
    out.push(DrawCommand::text(area * 0.5, message, 24.0, colors::TEXT));
}

pub fn describe_maze(snap: &MazeSnapshot) -> Vec<DrawCommand> {
    let cs = snap.cell_size;
    let area = snap.grid.size().as_vec2() * cs;
    let mut out = vec![DrawCommand::Clear(colors::BACKGROUND)];

    for (cell, kind) in snap.grid.iter() {
        let origin = cell.as_vec2() * cs;
        let center = origin + Vec2::splat(cs / 2.0);
        match kind {
            Cell::Wall => out.push(DrawCommand::square(cell, cs, colors::MAZE_WALL)),
            Cell::Gate => out.push(DrawCommand::rect(
                origin + Vec2::new(0.0, cs * 0.4),
                Vec2::new(cs, cs * 0.2),
                colors::GATE,
            )),
            Cell::Dot => out.push(DrawCommand::circle(center, cs * 0.125, colors::DOT)),
            Cell::PowerPellet => out.push(DrawCommand::circle(center, cs * 0.375, colors::DOT)),
            Cell::Empty => {}
        }
    }

    let ending = snap.vulnerable_ticks_left.is_some_and(|t| t <= FLASH_TICKS && (t / 10) % 2 == 0);
    for rival in &snap.rivals {
        let center = rival.pos + Vec2::splat(cs / 2.0);
        let color = colors::rival(&rival.name, rival.mode, ending);
        out.push(DrawCommand::circle(center, cs * 0.45, color));
    }
    out.push(DrawCommand::circle(
        snap.player.pos + Vec2::splat(cs / 2.0),
        cs * 0.45,
        colors::PLAYER,
    ));

    out.push(DrawCommand::text(
        Vec2::new(4.0, area.y + 4.0),
        format!("SCORE {}", snap.score),
        14.0,
        colors::TEXT,
    ));
    out.push(DrawCommand::text(
        Vec2::new(area.x - 80.0, area.y + 4.0),
        format!("LIVES {}", snap.lives),
        14.0,
        colors::TEXT,
    ));

    phase_overlay(snap.phase, area, &mut out);
    out
}

pub fn describe_falling(snap: &FallingSnapshot) -> Vec<DrawCommand> {
    let area = Vec2::new(BOARD_WIDTH as f32, BOARD_HEIGHT as f32) * BLOCK_SIZE;
    let mut out = vec![
        DrawCommand::Clear(colors::BACKGROUND),
        DrawCommand::rect(Vec2::ZERO, area, colors::BOARD_GRID),
    ];

    for (y, row) in snap.board.rows().iter().enumerate() {
        for (x, kind) in row.iter().enumerate() {
            if let Some(kind) = kind {
                let cell = IVec2::new(x as i32, y as i32);
                out.push(DrawCommand::square(cell, BLOCK_SIZE, colors::tetromino(*kind)));
            }
        }
    }

    if let Some(piece) = &snap.piece {
        let color = colors::tetromino(piece.kind);
        // Cells above the top edge are not drawn
        for cell in piece.cells().filter(|c| c.y >= 0) {
            out.push(DrawCommand::square(cell, BLOCK_SIZE, color));
        }
    }

    // Preview to the right of the board
    let side = area.x + BLOCK_SIZE;
    out.push(DrawCommand::text(Vec2::new(side, 0.0), "NEXT", 14.0, colors::TEXT));
    let color = colors::tetromino(snap.next);
    for offset in snap.next.shape().offsets() {
        let pos = Vec2::new(side, BLOCK_SIZE) + offset.as_vec2() * BLOCK_SIZE;
        out.push(DrawCommand::rect(pos, Vec2::splat(BLOCK_SIZE), color));
    }

    let stats = [
        format!("SCORE {}", snap.score),
        format!("LEVEL {}", snap.level),
        format!("LINES {}", snap.lines),
    ];
    for (i, line) in stats.into_iter().enumerate() {
        let pos = Vec2::new(side, BLOCK_SIZE * (6.0 + i as f32));
        out.push(DrawCommand::text(pos, line, 14.0, colors::TEXT));
    }

    phase_overlay(snap.phase, area, &mut out);
    out
}

pub fn describe_merge(snap: &MergeSnapshot) -> Vec<DrawCommand> {
    let edge = SIZE as f32 * TILE_SIZE + (SIZE as f32 + 1.0) * TILE_GAP;
    let area = Vec2::splat(edge);
    let mut out = vec![
        DrawCommand::Clear(colors::BACKGROUND),
        DrawCommand::rect(Vec2::ZERO, area, colors::MERGE_BOARD),
    ];

    for (y, row) in snap.tiles.iter().enumerate() {
        for (x, &value) in row.iter().enumerate() {
            let pos = Vec2::new(x as f32, y as f32) * (TILE_SIZE + TILE_GAP) + Vec2::splat(TILE_GAP);
            out.push(DrawCommand::rect(pos, Vec2::splat(TILE_SIZE), colors::tile(value)));
            if value > 0 {
                let size = match value {
                    0..=64 => 48.0,
                    65..=512 => 40.0,
                    _ => 32.0,
                };
                out.push(DrawCommand::text(
                    pos + Vec2::splat(TILE_SIZE / 2.0),
                    value.to_string(),
                    size,
                    colors::tile_text(value),
                ));
            }
        }
    }

    out.push(DrawCommand::text(
        Vec2::new(0.0, edge + 8.0),
        format!("SCORE {}", snap.score),
        18.0,
        colors::TEXT,
    ));

    phase_overlay(snap.phase, area, &mut out);
    out
}

pub fn describe_arena(snap: &ArenaSnapshot) -> Vec<DrawCommand> {
    let area = snap.grid.size().as_vec2() * ARENA_CELL;
    let half = Vec2::splat(ARENA_CELL / 2.0);
    let mut out = vec![
        DrawCommand::Clear(colors::BACKGROUND),
        DrawCommand::rect(Vec2::ZERO, area, colors::ARENA_FLOOR),
    ];

    for (cell, kind) in snap.grid.iter() {
        match kind {
            ArenaCell::Wall => out.push(DrawCommand::square(cell, ARENA_CELL, colors::ARENA_WALL)),
            ArenaCell::Brick => out.push(DrawCommand::square(cell, ARENA_CELL, colors::BRICK)),
            ArenaCell::PowerUp(kind) => {
                let center = cell.as_vec2() * ARENA_CELL + half;
                out.push(DrawCommand::circle(center, ARENA_CELL * 0.3, colors::POWER_UP));
                let label = match kind {
                    PowerUp::Bomb => "B",
                    PowerUp::Flame => "F",
                    PowerUp::Speed => "S",
                };
                out.push(DrawCommand::text(center, label, 14.0, colors::BACKGROUND));
            }
            ArenaCell::Empty => {}
        }
    }

    for bomb in &snap.bombs {
        let center = bomb.cell.as_vec2() * ARENA_CELL + half;
        out.push(DrawCommand::circle(center, ARENA_CELL * 0.4, colors::BOMB));
    }
    for &cell in &snap.flames {
        out.push(DrawCommand::square(cell, ARENA_CELL, colors::FLAME));
    }
    for bomber in snap.bombers.iter().filter(|b| b.alive) {
        let center = bomber.pos * ARENA_CELL + half;
        let color = colors::SEATS[bomber.seat.index()];
        out.push(DrawCommand::circle(center, ARENA_CELL * 0.4, color));
    }

    for bomber in &snap.bombers {
        let i = bomber.seat.index();
        out.push(DrawCommand::text(
            Vec2::new(4.0 + i as f32 * area.x / 2.0, area.y + 4.0),
            format!("P{} {}", i + 1, bomber.score),
            14.0,
            colors::SEATS[i],
        ));
    }

    if snap.phase == GamePhase::Over {
        let message = match snap.winner {
            Some(seat) => format!("PLAYER {} WINS", seat.index() + 1),
            None => "DRAW".to_string(),
        };
        out.push(DrawCommand::rect(Vec2::ZERO, area, colors::OVERLAY));
        out.push(DrawCommand::text(area * 0.5, message, 24.0, colors::TEXT));
    } else {
        phase_overlay(snap.phase, area, &mut out);
    }
    out
}

/// Snapshots that know how to describe themselves
pub trait Drawable {
    fn draw(&self) -> Vec<DrawCommand>;
}

impl Drawable for MazeSnapshot {
    fn draw(&self) -> Vec<DrawCommand> {
        describe_maze(self)
    }
}

impl Drawable for FallingSnapshot {
    fn draw(&self) -> Vec<DrawCommand> {
        describe_falling(self)
    }
}

impl Drawable for MergeSnapshot {
    fn draw(&self) -> Vec<DrawCommand> {
        describe_merge(self)
    }
}

impl Drawable for ArenaSnapshot {
    fn draw(&self) -> Vec<DrawCommand> {
        describe_arena(self)
    }
}
