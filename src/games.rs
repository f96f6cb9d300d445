//! Driver adapters for each game
//!
//! Each adapter owns one game state plus the input buffered for its next
//! tick. Key presses land between frames; the buffered input is applied at
//! the start of the next tick and one-shot parts are cleared afterwards.

use crate::driver::Simulation;
use crate::highscores::GameId;
use crate::input::{Action, InputEvent, Intent, KeyState};
use crate::sim::bomber::{self, ArenaInput, ArenaSnapshot, ArenaState};
use crate::sim::direction::Direction;
use crate::sim::grid::Grid;
use crate::sim::merge::{self, MergeInput, MergeSnapshot, MergeState};
use crate::sim::phase::GamePhase;
use crate::sim::state::{MazeSnapshot, MazeSpawns, MazeState, MazeTuning};
use crate::sim::tetris::{self, FallingInput, FallingSnapshot, FallingState};
use crate::sim::tick::{self, TickInput};

/// Maze chase
#[derive(Debug, Clone)]
pub struct MazeGame {
    pub state: MazeState,
    input: TickInput,
}

impl MazeGame {
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(MazeTuning::default(), seed)
    }

    pub fn with_tuning(tuning: MazeTuning, seed: u64) -> Self {
        Self {
            state: MazeState::with_layout(Grid::classic(), MazeSpawns::classic(), tuning, seed),
            input: TickInput::default(),
        }
    }
}

impl Simulation for MazeGame {
    type Snapshot = MazeSnapshot;

    fn id(&self) -> GameId {
        GameId::Maze
    }

    fn phase(&self) -> GamePhase {
        self.state.phase
    }

    fn set_phase(&mut self, phase: GamePhase) {
        self.state.phase = phase;
    }

    fn handle(&mut self, event: &InputEvent) {
        if let (Intent::Move(dir), KeyState::Down) = (event.intent, event.state) {
            self.input.steer = Some(dir);
        }
    }

    fn step(&mut self) {
        tick::tick(&mut self.state, &self.input);
        // The player keeps its own queued turn
        self.input.steer = None;
    }

    fn score(&self) -> u64 {
        self.state.score
    }

    fn snapshot(&self) -> MazeSnapshot {
        self.state.snapshot()
    }

    fn reset(&mut self) {
        self.state.reset();
        self.input.steer = None;
    }

    fn set_autopilot(&mut self, on: bool) {
        self.input.autopilot = on;
    }
}

/// Falling blocks
#[derive(Debug, Clone)]
pub struct FallingGame {
    pub state: FallingState,
    input: FallingInput,
}

impl FallingGame {
    pub fn new(seed: u64) -> Self {
        Self {
            state: FallingState::new(seed),
            input: FallingInput::default(),
        }
    }
}

impl Simulation for FallingGame {
    type Snapshot = FallingSnapshot;

    fn id(&self) -> GameId {
        GameId::FallingShape
    }

    fn phase(&self) -> GamePhase {
        self.state.phase
    }

    fn set_phase(&mut self, phase: GamePhase) {
        self.state.phase = phase;
    }

    fn handle(&mut self, event: &InputEvent) {
        if event.state != KeyState::Down {
            return;
        }
        match event.intent {
            Intent::Move(Direction::Left) => self.input.shift = -1,
            Intent::Move(Direction::Right) => self.input.shift = 1,
            Intent::Move(Direction::Down) => self.input.soft_drop = true,
            Intent::Action(Action::Rotate) => self.input.rotate = true,
            Intent::Action(Action::HardDrop) => self.input.hard_drop = true,
            _ => {}
        }
    }

    fn step(&mut self) {
        tetris::tick(&mut self.state, &self.input);
        self.input = FallingInput {
            autopilot: self.input.autopilot,
            ..FallingInput::default()
        };
    }

    fn score(&self) -> u64 {
        self.state.score
    }

    fn snapshot(&self) -> FallingSnapshot {
        self.state.snapshot()
    }

    fn reset(&mut self) {
        self.state.reset();
        self.input = FallingInput {
            autopilot: self.input.autopilot,
            ..FallingInput::default()
        };
    }

    fn set_autopilot(&mut self, on: bool) {
        self.input.autopilot = on;
    }
}

/// Tile merge
#[derive(Debug, Clone)]
pub struct MergeGame {
    pub state: MergeState,
    input: MergeInput,
}

impl MergeGame {
    pub fn new(seed: u64) -> Self {
        Self {
            state: MergeState::new(seed),
            input: MergeInput::default(),
        }
    }
}

impl Simulation for MergeGame {
    type Snapshot = MergeSnapshot;

    fn id(&self) -> GameId {
        GameId::Merge
    }

    fn phase(&self) -> GamePhase {
        self.state.phase
    }

    fn set_phase(&mut self, phase: GamePhase) {
        self.state.phase = phase;
    }

    fn handle(&mut self, event: &InputEvent) {
        if let (Intent::Move(dir), KeyState::Down) = (event.intent, event.state) {
            self.input.slide = Some(dir);
        }
    }

    fn step(&mut self) {
        merge::tick(&mut self.state, &self.input);
        self.input.slide = None;
    }

    fn score(&self) -> u64 {
        self.state.score
    }

    fn snapshot(&self) -> MergeSnapshot {
        self.state.snapshot()
    }

    fn reset(&mut self) {
        self.state.reset();
        self.input.slide = None;
    }

    fn set_autopilot(&mut self, on: bool) {
        self.input.autopilot = on;
    }

    fn continue_after_win(&mut self) -> bool {
        self.state.keep_playing();
        self.state.phase.is_running()
    }
}

/// Two-seat bomb arena
#[derive(Debug, Clone)]
pub struct ArenaGame {
    pub state: ArenaState,
    input: ArenaInput,
}

impl ArenaGame {
    pub fn new(seed: u64) -> Self {
        Self {
            state: ArenaState::new(seed),
            input: ArenaInput::default(),
        }
    }
}

impl Simulation for ArenaGame {
    type Snapshot = ArenaSnapshot;

    fn id(&self) -> GameId {
        GameId::BombArena
    }

    fn phase(&self) -> GamePhase {
        self.state.phase
    }

    fn set_phase(&mut self, phase: GamePhase) {
        self.state.phase = phase;
    }

    fn handle(&mut self, event: &InputEvent) {
        let seat = &mut self.input.seats[event.seat.index()];
        match (event.intent, event.state) {
            (Intent::Move(dir), KeyState::Down) => {
                if !seat.held.contains(&dir) {
                    seat.held.push(dir);
                }
            }
            (Intent::Move(dir), KeyState::Up) => seat.held.retain(|&d| d != dir),
            (Intent::Action(Action::PlaceDevice), KeyState::Down) => seat.place_bomb = true,
            _ => {}
        }
    }

    fn step(&mut self) {
        bomber::tick(&mut self.state, &self.input);
        for seat in &mut self.input.seats {
            seat.place_bomb = false;
        }
    }

    fn score(&self) -> u64 {
        self.state.best_score()
    }

    fn snapshot(&self) -> ArenaSnapshot {
        self.state.snapshot()
    }

    fn reset(&mut self) {
        self.state.reset();
        self.input = ArenaInput {
            autopilot: self.input.autopilot,
            ..ArenaInput::default()
        };
    }

    fn set_autopilot(&mut self, on: bool) {
        self.input.autopilot = on;
    }
}
