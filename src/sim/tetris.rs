//! Falling-shape game
//!
//! A 10×20 well, seven tetrominoes, gravity on a tick interval that shortens
//! with level. Pieces that cannot fall are baked into the board and full rows
//! collapse.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::phase::GamePhase;
use super::rng::{RandomSource, SimRng};
use crate::consts::TICKS_PER_SECOND;

pub const BOARD_WIDTH: i32 = 10;
pub const BOARD_HEIGHT: i32 = 20;
/// Spawn column (`BOARD_WIDTH / 2 - 2`)
pub const SPAWN_X: i32 = BOARD_WIDTH / 2 - 2;
/// Points per simultaneous line clear, multiplied by level
pub const LINE_POINTS: [u64; 5] = [0, 40, 100, 300, 1200];
pub const LINES_PER_LEVEL: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tetromino {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

impl Tetromino {
    pub const ALL: [Tetromino; 7] = [
        Tetromino::I,
        Tetromino::J,
        Tetromino::L,
        Tetromino::O,
        Tetromino::S,
        Tetromino::T,
        Tetromino::Z,
    ];

    /// Spawn orientation
    pub fn shape(self) -> Shape {
        let rows: &[&[u8]] = match self {
            Tetromino::I => &[&[0, 0, 0, 0], &[1, 1, 1, 1], &[0, 0, 0, 0], &[0, 0, 0, 0]],
            Tetromino::J => &[&[1, 0, 0], &[1, 1, 1], &[0, 0, 0]],
            Tetromino::L => &[&[0, 0, 1], &[1, 1, 1], &[0, 0, 0]],
            Tetromino::O => &[&[1, 1], &[1, 1]],
            Tetromino::S => &[&[0, 1, 1], &[1, 1, 0], &[0, 0, 0]],
            Tetromino::T => &[&[0, 1, 0], &[1, 1, 1], &[0, 0, 0]],
            Tetromino::Z => &[&[1, 1, 0], &[0, 1, 1], &[0, 0, 0]],
        };
        Shape(
            rows.iter()
                .map(|row| row.iter().map(|&v| v != 0).collect())
                .collect(),
        )
    }

    fn random<R: RandomSource>(rng: &mut R) -> Self {
        Self::ALL[rng.below(Self::ALL.len())]
    }
}

/// Square occupancy matrix of a piece
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shape(pub Vec<Vec<bool>>);

impl Shape {
    /// Clockwise rotation (transpose, then reverse each row)
    pub fn rotated(&self) -> Shape {
        let n = self.0.len();
        Shape(
            (0..n)
                .map(|i| (0..n).rev().map(|j| self.0[j][i]).collect())
                .collect(),
        )
    }

    /// Offsets of the filled cells
    pub fn offsets(&self) -> impl Iterator<Item = IVec2> + '_ {
        self.0.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter(|&(_, &filled)| filled)
                .map(move |(x, _)| IVec2::new(x as i32, y as i32))
        })
    }
}

/// The falling piece
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Piece {
    pub kind: Tetromino,
    /// Board position of the shape's top-left corner
    pub pos: IVec2,
    pub shape: Shape,
}

impl Piece {
    pub fn spawn(kind: Tetromino) -> Self {
        Self {
            kind,
            pos: IVec2::new(SPAWN_X, 0),
            shape: kind.shape(),
        }
    }

    /// Board cells covered by the piece
    pub fn cells(&self) -> impl Iterator<Item = IVec2> + '_ {
        self.shape.offsets().map(move |o| self.pos + o)
    }

    fn moved(&self, by: IVec2) -> Piece {
        Piece {
            pos: self.pos + by,
            ..self.clone()
        }
    }
}

/// Settled cells, row-major, top row first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    rows: Vec<Vec<Option<Tetromino>>>,
}

impl Default for Board {
    fn default() -> Self {
        Self {
            rows: (0..BOARD_HEIGHT).map(|_| Self::empty_row()).collect(),
        }
    }
}

impl Board {
    fn empty_row() -> Vec<Option<Tetromino>> {
        vec![None; BOARD_WIDTH as usize]
    }

    pub fn get(&self, cell: IVec2) -> Option<Tetromino> {
        if cell.x < 0 || cell.y < 0 {
            return None;
        }
        self.rows
            .get(cell.y as usize)
            .and_then(|row| row.get(cell.x as usize))
            .copied()
            .flatten()
    }

    pub fn set(&mut self, cell: IVec2, value: Option<Tetromino>) {
        if cell.x < 0 || cell.y < 0 {
            return;
        }
        if let Some(slot) = self
            .rows
            .get_mut(cell.y as usize)
            .and_then(|row| row.get_mut(cell.x as usize))
        {
            *slot = value;
        }
    }

    /// Whether a piece overlaps settled cells or leaves the well.
    /// Cells above the top edge are allowed.
    pub fn collides(&self, piece: &Piece) -> bool {
        piece.cells().any(|c| {
            c.x < 0 || c.x >= BOARD_WIDTH || c.y >= BOARD_HEIGHT || (c.y >= 0 && self.get(c).is_some())
        })
    }

    /// Bake a piece into the board
    pub fn lock(&mut self, piece: &Piece) {
        for cell in piece.cells() {
            self.set(cell, Some(piece.kind));
        }
    }

    /// Remove full rows, shifting everything above down. Returns rows removed.
    pub fn clear_full_rows(&mut self) -> u32 {
        let before = self.rows.len();
        self.rows.retain(|row| row.iter().any(Option::is_none));
        let cleared = before - self.rows.len();
        for _ in 0..cleared {
            self.rows.insert(0, Self::empty_row());
        }
        cleared as u32
    }

    pub fn rows(&self) -> &[Vec<Option<Tetromino>>] {
        &self.rows
    }

    /// Column heights and covered holes, for placement scoring
    fn profile(&self) -> (Vec<i32>, i32) {
        let mut heights = vec![0; BOARD_WIDTH as usize];
        let mut holes = 0;
        for x in 0..BOARD_WIDTH {
            let mut seen_top = false;
            for y in 0..BOARD_HEIGHT {
                let filled = self.get(IVec2::new(x, y)).is_some();
                if filled && !seen_top {
                    seen_top = true;
                    heights[x as usize] = BOARD_HEIGHT - y;
                } else if !filled && seen_top {
                    holes += 1;
                }
            }
        }
        (heights, holes)
    }
}

/// Gravity interval in ticks for a level
pub fn gravity_interval(level: u32) -> f32 {
    TICKS_PER_SECOND as f32 / (1.0 + (level.max(1) - 1) as f32 * 0.2)
}

/// Input commands for a single tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FallingInput {
    /// -1 left, +1 right
    pub shift: i32,
    pub rotate: bool,
    pub soft_drop: bool,
    pub hard_drop: bool,
    /// Idle/demo mode - autopilot places pieces
    pub autopilot: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FallingEvent {
    Locked,
    LinesCleared(u32),
    LevelUp(u32),
    GameOver,
}

/// Placement the autopilot is steering towards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Plan {
    rotations: u8,
    x: i32,
}

#[derive(Debug, Clone)]
pub struct FallingState {
    pub seed: u64,
    rng: SimRng,
    pub board: Board,
    pub piece: Option<Piece>,
    pub next: Tetromino,
    pub score: u64,
    pub level: u32,
    pub lines: u32,
    pub phase: GamePhase,
    pub time_ticks: u64,
    /// Ticks accumulated towards the next gravity step
    gravity_elapsed: f32,
    plan: Option<Plan>,
    pub events: Vec<FallingEvent>,
}

impl FallingState {
    pub fn new(seed: u64) -> Self {
        let mut rng = SimRng::new(seed);
        let first = Tetromino::random(&mut rng);
        let next = Tetromino::random(&mut rng);
        Self {
            seed,
            rng,
            board: Board::default(),
            piece: Some(Piece::spawn(first)),
            next,
            score: 0,
            level: 1,
            lines: 0,
            phase: GamePhase::NotStarted,
            time_ticks: 0,
            gravity_elapsed: 0.0,
            plan: None,
            events: Vec::new(),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.seed);
    }

    /// Shift one column; rejected on collision
    pub fn shift(&mut self, dx: i32) -> bool {
        self.try_replace(|p| p.moved(IVec2::new(dx.signum(), 0)))
    }

    /// Rotate clockwise; rejected on collision, no wall kicks
    pub fn rotate(&mut self) -> bool {
        self.try_replace(|p| Piece {
            shape: p.shape.rotated(),
            ..p.clone()
        })
    }

    fn try_replace(&mut self, f: impl FnOnce(&Piece) -> Piece) -> bool {
        let Some(piece) = &self.piece else {
            return false;
        };
        let candidate = f(piece);
        if self.board.collides(&candidate) {
            return false;
        }
        self.piece = Some(candidate);
        true
    }

    /// Move the piece to the lowest legal row; the next gravity step locks it
    pub fn hard_drop(&mut self) {
        let Some(piece) = &self.piece else {
            return;
        };
        let mut landed = piece.clone();
        while !self.board.collides(&landed.moved(IVec2::Y)) {
            landed = landed.moved(IVec2::Y);
        }
        self.piece = Some(landed);
    }

    /// One gravity step: fall a row, or lock and spawn the next piece
    pub fn step_down(&mut self) {
        let Some(piece) = self.piece.take() else {
            return;
        };
        let lower = piece.moved(IVec2::Y);
        if !self.board.collides(&lower) {
            self.piece = Some(lower);
            return;
        }

        // Blocked before it ever left the spawn row
        if piece.pos.y < 1 {
            self.piece = Some(piece);
            self.game_over();
            return;
        }

        self.board.lock(&piece);
        self.events.push(FallingEvent::Locked);
        let cleared = self.board.clear_full_rows();
        self.award_lines(cleared);
        self.spawn_next();
    }

    fn award_lines(&mut self, cleared: u32) {
        if cleared == 0 {
            return;
        }
        let points = LINE_POINTS[(cleared as usize).min(LINE_POINTS.len() - 1)];
        self.score += points * self.level as u64;
        self.events.push(FallingEvent::LinesCleared(cleared));

        let before = self.lines;
        self.lines += cleared;
        if self.lines / LINES_PER_LEVEL > before / LINES_PER_LEVEL {
            self.level += 1;
            self.events.push(FallingEvent::LevelUp(self.level));
            log::debug!("Level {} (gravity every {:.1} ticks)", self.level, gravity_interval(self.level));
        }
    }

    fn spawn_next(&mut self) {
        let piece = Piece::spawn(self.next);
        self.next = Tetromino::random(&mut self.rng);
        self.plan = None;
        let blocked = self.board.collides(&piece);
        self.piece = Some(piece);
        if blocked {
            self.game_over();
        }
    }

    fn game_over(&mut self) {
        self.phase = GamePhase::Over;
        self.events.push(FallingEvent::GameOver);
        log::info!("Falling-shape game over: score {} level {} lines {}", self.score, self.level, self.lines);
    }

    /// Choose the next autopilot command
    fn autopilot_input(&mut self) -> FallingInput {
        let Some(piece) = &self.piece else {
            return FallingInput::default();
        };
        let plan = *self
            .plan
            .get_or_insert_with(|| best_placement(&self.board, piece).unwrap_or(Plan {
                rotations: 0,
                x: piece.pos.x,
            }));

        let mut input = FallingInput::default();
        if plan.rotations > 0 {
            input.rotate = true;
            self.plan = Some(Plan {
                rotations: plan.rotations - 1,
                ..plan
            });
        } else if piece.pos.x != plan.x {
            input.shift = (plan.x - piece.pos.x).signum();
        } else {
            input.hard_drop = true;
        }
        input
    }

    pub fn snapshot(&self) -> FallingSnapshot {
        FallingSnapshot {
            board: self.board.clone(),
            piece: self.piece.clone(),
            next: self.next,
            score: self.score,
            level: self.level,
            lines: self.lines,
            phase: self.phase,
            tick: self.time_ticks,
        }
    }
}

/// Lowest-cost resting place for a piece, trying every rotation and column
fn best_placement(board: &Board, piece: &Piece) -> Option<Plan> {
    let mut best: Option<(i32, Plan)> = None;
    let mut shape = piece.shape.clone();
    for rotations in 0..4u8 {
        for x in -3..BOARD_WIDTH {
            let mut trial = Piece {
                kind: piece.kind,
                pos: IVec2::new(x, piece.pos.y),
                shape: shape.clone(),
            };
            if board.collides(&trial) {
                continue;
            }
            while !board.collides(&trial.moved(IVec2::Y)) {
                trial = trial.moved(IVec2::Y);
            }
            let mut after = board.clone();
            after.lock(&trial);
            let cleared = after.clear_full_rows() as i32;
            let (heights, holes) = after.profile();
            let aggregate: i32 = heights.iter().sum();
            let bumpiness: i32 = heights.windows(2).map(|w| (w[0] - w[1]).abs()).sum();
            let cost = aggregate + holes * 8 + bumpiness - cleared * 10;
            if best.is_none_or(|(c, _)| cost < c) {
                best = Some((cost, Plan { rotations, x }));
            }
        }
        shape = shape.rotated();
    }
    best.map(|(_, plan)| plan)
}

/// Advance the falling-shape game by one fixed timestep
pub fn tick(state: &mut FallingState, input: &FallingInput) {
    if !state.phase.is_running() {
        return;
    }
    state.events.clear();
    state.time_ticks += 1;

    let input = if input.autopilot {
        state.autopilot_input()
    } else {
        input.clone()
    };

    if input.shift != 0 {
        state.shift(input.shift);
    }
    if input.rotate {
        state.rotate();
    }
    if input.hard_drop {
        state.hard_drop();
    }
    if input.soft_drop {
        state.step_down();
    }

    if !state.phase.is_running() {
        return;
    }

    state.gravity_elapsed += 1.0;
    let interval = gravity_interval(state.level);
    if state.gravity_elapsed >= interval {
        state.gravity_elapsed -= interval;
        state.step_down();
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallingSnapshot {
    pub board: Board,
    pub piece: Option<Piece>,
    pub next: Tetromino,
    pub score: u64,
    pub level: u32,
    pub lines: u32,
    pub phase: GamePhase,
    pub tick: u64,
}
