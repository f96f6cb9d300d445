//! Maze game state and core simulation types
//!
//! Everything one maze run needs lives here; the per-tick pipeline is in
//! `tick.rs` and the scoring rules in `interaction.rs`.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::actor::{Player, Rival, RivalMode};
use super::direction::Direction;
use super::grid::{Cell, Grid};
use super::movement::Playfield;
use super::phase::GamePhase;
use super::rng::SimRng;
use super::timeline::Timeline;
use crate::consts::*;
use crate::{cell_of, cell_origin};

/// Data-driven maze balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MazeTuning {
    pub lives: u8,
    pub player_speed: f32,
    pub vulnerable_ticks: u64,
    pub scatter_ticks: u64,
    pub chase_ticks: u64,
}

impl Default for MazeTuning {
    fn default() -> Self {
        Self {
            lives: STARTING_LIVES,
            player_speed: PLAYER_SPEED,
            vulnerable_ticks: VULNERABLE_TICKS,
            scatter_ticks: SCATTER_TICKS,
            chase_ticks: CHASE_TICKS,
        }
    }
}

/// Where a rival starts and how fast it moves
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RivalSpawn {
    pub name: String,
    pub cell: IVec2,
    pub direction: Direction,
    pub speed: f32,
}

/// Start positions for one layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MazeSpawns {
    pub player: IVec2,
    pub rivals: Vec<RivalSpawn>,
}

impl MazeSpawns {
    /// Start cells matching [`Grid::classic`]
    pub fn classic() -> Self {
        let rival = |name: &str, x, y, direction, speed| RivalSpawn {
            name: name.to_string(),
            cell: IVec2::new(x, y),
            direction,
            speed,
        };
        Self {
            player: IVec2::new(14, 23),
            rivals: vec![
                rival("Blinky", 14, 11, Direction::Up, 1.8),
                rival("Pinky", 14, 14, Direction::Down, 1.6),
                rival("Inky", 12, 14, Direction::Up, 1.7),
                rival("Clyde", 16, 14, Direction::Up, 1.5),
            ],
        }
    }
}

/// Who is walking: gates stop the player but let rivals out of their house
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Walker {
    Player,
    Rival,
}

/// Grid view used by the movement resolver
pub struct MazeField<'a> {
    grid: &'a Grid,
    walker: Walker,
}

impl<'a> MazeField<'a> {
    pub fn new(grid: &'a Grid, walker: Walker) -> Self {
        Self { grid, walker }
    }
}

impl Playfield for MazeField<'_> {
    fn size(&self) -> IVec2 {
        self.grid.size()
    }

    fn cell_size(&self) -> f32 {
        CELL_SIZE
    }

    fn passable(&self, cell: IVec2) -> bool {
        match self.grid.get(cell) {
            Some(Cell::Wall) | None => false,
            Some(Cell::Gate) => self.walker == Walker::Rival,
            Some(_) => true,
        }
    }

    fn is_tunnel_row(&self, row: i32) -> bool {
        self.grid.is_tunnel_row(row)
    }
}

/// Deferred maze effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MazeEffect {
    /// Vulnerability countdown expired
    EndVulnerability,
    /// Scatter/chase cycle switches to this mode
    ModeSwitch(RivalMode),
}

impl MazeEffect {
    pub fn is_vulnerability(&self) -> bool {
        matches!(self, MazeEffect::EndVulnerability)
    }
}

/// Things that happened during the last tick (sound/UI hooks)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MazeEvent {
    DotEaten,
    PelletEaten,
    RivalCaptured { name: String },
    LifeLost { remaining: u8 },
    MazeCleared,
    GameOver,
}

/// Complete maze game state
#[derive(Debug, Clone)]
pub struct MazeState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: SimRng,
    pub tuning: MazeTuning,
    /// Pristine layout, restored on reset
    layout: Grid,
    spawns: MazeSpawns,
    pub grid: Grid,
    pub player: Player,
    pub rivals: Vec<Rival>,
    pub score: u64,
    pub lives: u8,
    pub level: u32,
    /// Collectibles left on the grid
    pub remaining: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    /// Mode the scatter/chase cycle is currently in
    pub base_mode: RivalMode,
    pub timeline: Timeline<MazeEffect>,
    /// Events raised by the most recent running tick
    pub events: Vec<MazeEvent>,
}

impl MazeState {
    /// Classic maze with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_layout(Grid::classic(), MazeSpawns::classic(), MazeTuning::default(), seed)
    }

    pub fn with_layout(layout: Grid, spawns: MazeSpawns, tuning: MazeTuning, seed: u64) -> Self {
        let player = Player::new(cell_origin(spawns.player, CELL_SIZE), tuning.player_speed);
        let rivals = spawns
            .rivals
            .iter()
            .map(|s| Rival::new(&s.name, cell_origin(s.cell, CELL_SIZE), s.direction, s.speed))
            .collect();

        let mut state = Self {
            seed,
            rng: SimRng::new(seed),
            lives: tuning.lives,
            remaining: layout.count_collectibles(),
            grid: layout.clone(),
            layout,
            spawns,
            tuning,
            player,
            rivals,
            score: 0,
            level: 1,
            time_ticks: 0,
            phase: GamePhase::NotStarted,
            base_mode: RivalMode::Scatter,
            timeline: Timeline::new(),
            events: Vec::new(),
        };
        state.schedule_mode_cycle();
        state
    }

    /// Fresh run on the same layout and seed
    pub fn reset(&mut self) {
        *self = Self::with_layout(
            self.layout.clone(),
            self.spawns.clone(),
            self.tuning.clone(),
            self.seed,
        );
    }

    /// Restart the scatter/chase cycle from scatter
    pub(crate) fn schedule_mode_cycle(&mut self) {
        self.base_mode = RivalMode::Scatter;
        let at = self.time_ticks + self.tuning.scatter_ticks;
        self.timeline.replace(at, MazeEffect::ModeSwitch(RivalMode::Chase), |e| {
            matches!(e, MazeEffect::ModeSwitch(_))
        });
    }

    /// Player and rivals back to their start cells after a lost life
    pub(crate) fn reset_positions(&mut self) {
        self.player.reset();
        for rival in &mut self.rivals {
            rival.send_home(RivalMode::Scatter);
        }
        self.timeline.cancel(MazeEffect::is_vulnerability);
        self.schedule_mode_cycle();
    }

    /// Cell the player is mostly over (centre point floored)
    pub fn player_cell(&self) -> IVec2 {
        cell_of(self.player.actor.pos + Vec2::splat(CELL_SIZE / 2.0), CELL_SIZE)
    }

    /// Armed vulnerability countdowns (never more than one)
    pub fn vulnerability_countdowns(&self) -> usize {
        self.timeline.count(MazeEffect::is_vulnerability)
    }

    /// Ticks until vulnerability ends, if active
    pub fn vulnerable_ticks_left(&self) -> Option<u64> {
        self.timeline
            .next_expiry(MazeEffect::is_vulnerability)
            .map(|at| at.saturating_sub(self.time_ticks))
    }
}

/// Read-only view of an actor for renderers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorView {
    pub name: String,
    pub pos: Vec2,
    pub direction: Option<Direction>,
    pub mode: Option<RivalMode>,
}

/// Read-only view of a maze run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MazeSnapshot {
    pub grid: Grid,
    pub cell_size: f32,
    pub player: ActorView,
    pub rivals: Vec<ActorView>,
    pub score: u64,
    pub lives: u8,
    pub level: u32,
    pub remaining: u32,
    pub phase: GamePhase,
    pub vulnerable_ticks_left: Option<u64>,
    pub tick: u64,
}

impl MazeState {
    pub fn snapshot(&self) -> MazeSnapshot {
        MazeSnapshot {
            grid: self.grid.clone(),
            cell_size: CELL_SIZE,
            player: ActorView {
                name: "Player".to_string(),
                pos: self.player.actor.pos,
                direction: self.player.actor.direction,
                mode: None,
            },
            rivals: self
                .rivals
                .iter()
                .map(|r| ActorView {
                    name: r.name.clone(),
                    pos: r.actor.pos,
                    direction: r.actor.direction,
                    mode: Some(r.mode),
                })
                .collect(),
            score: self.score,
            lives: self.lives,
            level: self.level,
            remaining: self.remaining,
            phase: self.phase,
            vulnerable_ticks_left: self.vulnerable_ticks_left(),
            tick: self.time_ticks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let state = MazeState::new(7);
        assert_eq!(state.phase, GamePhase::NotStarted);
        assert_eq!(state.lives, STARTING_LIVES);
        assert_eq!(state.rivals.len(), 4);
        assert_eq!(state.remaining, state.grid.count_collectibles());
        assert_eq!(state.player.actor.pos, Vec2::new(14.0 * CELL_SIZE, 23.0 * CELL_SIZE));
        assert_eq!(state.vulnerability_countdowns(), 0);
        // First scatter -> chase switch is pending
        assert_eq!(state.timeline.len(), 1);
    }

    #[test]
    fn test_spawns_are_open_cells() {
        let grid = Grid::classic();
        let spawns = MazeSpawns::classic();
        assert!(!grid.is_wall(spawns.player));
        for rival in &spawns.rivals {
            assert!(!grid.is_wall(rival.cell), "{} spawns in a wall", rival.name);
        }
    }

    #[test]
    fn test_gate_blocks_player_only() {
        let grid = Grid::parse(&["#-#"]).unwrap();
        let gate = IVec2::new(1, 0);
        assert!(!MazeField::new(&grid, Walker::Player).passable(gate));
        assert!(MazeField::new(&grid, Walker::Rival).passable(gate));
        assert!(!MazeField::new(&grid, Walker::Rival).passable(IVec2::new(0, 0)));
    }

    #[test]
    fn test_reset_restores_layout() {
        let mut state = MazeState::new(3);
        state.grid.take_collectible(IVec2::new(1, 1));
        state.score = 500;
        state.phase = GamePhase::Over;
        state.reset();
        assert_eq!(state.grid, Grid::classic());
        assert_eq!(state.score, 0);
        assert_eq!(state.phase, GamePhase::NotStarted);
    }
}
