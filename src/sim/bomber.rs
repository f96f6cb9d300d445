//! Bomb arena
//!
//! Two seats on a 15×13 arena of fixed pillars and destructible bricks. Bombs
//! and flames are timeline entries: a fuse is a scheduled detonation and every
//! blast schedules its own cleanup. Positions are continuous in cell units and
//! discretize by rounding.

use std::collections::VecDeque;

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::direction::{DIRECTIONS, Direction};
use super::movement::{Playfield, can_step, resolve_move};
use super::phase::GamePhase;
use super::rng::{RandomSource, SimRng};
use super::timeline::Timeline;
use crate::consts::{SIM_DT, TICKS_PER_SECOND};
use crate::input::Seat;

pub const ARENA_WIDTH: usize = 15;
pub const ARENA_HEIGHT: usize = 13;
pub const BRICK_CHANCE: f32 = 0.6;
pub const POWER_UP_CHANCE: f32 = 0.3;
pub const FUSE_TICKS: u64 = 3 * TICKS_PER_SECOND;
pub const FLAME_TICKS: u64 = TICKS_PER_SECOND;
/// Cells per second at speed 1
pub const MOVE_SCALE: f32 = 5.0;
pub const KILL_POINTS: i64 = 100;
pub const SELF_KILL_PENALTY: i64 = 50;
pub const POWER_UP_POINTS: i64 = 10;
pub const SPEED_BONUS: f32 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUp {
    /// One more bomb at a time
    Bomb,
    /// Longer blast rays
    Flame,
    Speed,
}

impl PowerUp {
    pub const ALL: [PowerUp; 3] = [PowerUp::Bomb, PowerUp::Flame, PowerUp::Speed];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArenaCell {
    Empty,
    Wall,
    Brick,
    PowerUp(PowerUp),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArenaGrid {
    width: usize,
    height: usize,
    cells: Vec<ArenaCell>,
}

impl ArenaGrid {
    /// Border walls, pillars on even coordinates, bricks elsewhere by chance.
    /// Both start corners and their neighbours stay clear.
    pub fn generate<R: RandomSource>(rng: &mut R) -> Self {
        let (w, h) = (ARENA_WIDTH as i32, ARENA_HEIGHT as i32);
        let clear = [
            IVec2::new(1, 1),
            IVec2::new(1, 2),
            IVec2::new(2, 1),
            IVec2::new(w - 2, h - 2),
            IVec2::new(w - 2, h - 3),
            IVec2::new(w - 3, h - 2),
        ];
        let mut cells = Vec::with_capacity(ARENA_WIDTH * ARENA_HEIGHT);
        for y in 0..h {
            for x in 0..w {
                let border = x == 0 || y == 0 || x == w - 1 || y == h - 1;
                let cell = if border || (x % 2 == 0 && y % 2 == 0) {
                    ArenaCell::Wall
                } else if clear.contains(&IVec2::new(x, y)) {
                    ArenaCell::Empty
                } else if rng.chance(BRICK_CHANCE) {
                    ArenaCell::Brick
                } else {
                    ArenaCell::Empty
                };
                cells.push(cell);
            }
        }
        Self {
            width: ARENA_WIDTH,
            height: ARENA_HEIGHT,
            cells,
        }
    }

    /// `#` wall, `+` brick, anything else empty
    pub fn parse<S: AsRef<str>>(rows: &[S]) -> Self {
        let width = rows.iter().map(|r| r.as_ref().chars().count()).max().unwrap_or(0);
        let mut cells = vec![ArenaCell::Empty; width * rows.len()];
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.as_ref().chars().enumerate() {
                cells[y * width + x] = match ch {
                    '#' => ArenaCell::Wall,
                    '+' => ArenaCell::Brick,
                    _ => ArenaCell::Empty,
                };
            }
        }
        Self {
            width,
            height: rows.len(),
            cells,
        }
    }

    pub fn size(&self) -> IVec2 {
        IVec2::new(self.width as i32, self.height as i32)
    }

    fn index(&self, cell: IVec2) -> Option<usize> {
        let in_bounds = cell.x >= 0
            && cell.y >= 0
            && (cell.x as usize) < self.width
            && (cell.y as usize) < self.height;
        in_bounds.then(|| cell.y as usize * self.width + cell.x as usize)
    }

    pub fn get(&self, cell: IVec2) -> Option<ArenaCell> {
        self.index(cell).map(|i| self.cells[i])
    }

    pub fn set(&mut self, cell: IVec2, value: ArenaCell) {
        if let Some(i) = self.index(cell) {
            self.cells[i] = value;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (IVec2, ArenaCell)> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &c)| (IVec2::new((i % width) as i32, (i / width) as i32), c))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bomber {
    pub seat: Seat,
    /// Continuous position in cell units
    pub pos: Vec2,
    pub speed: f32,
    pub max_bombs: u32,
    pub power: i32,
    pub score: i64,
    pub alive: bool,
}

impl Bomber {
    fn new(seat: Seat, cell: IVec2) -> Self {
        Self {
            seat,
            pos: cell.as_vec2(),
            speed: 1.0,
            max_bombs: 1,
            power: 1,
            score: 0,
            alive: true,
        }
    }

    pub fn cell(&self) -> IVec2 {
        self.pos.round().as_ivec2()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bomb {
    pub id: u32,
    pub owner: Seat,
    pub cell: IVec2,
    pub power: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArenaEffect {
    Detonate(u32),
    ClearFlames(Vec<IVec2>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArenaEvent {
    BombPlaced { seat: Seat, cell: IVec2 },
    Detonated { owner: Seat, cell: IVec2 },
    BrickDestroyed { cell: IVec2, drop: Option<PowerUp> },
    PowerUpCollected { seat: Seat, kind: PowerUp },
    Killed { victim: Seat, by: Seat },
    /// `None` is a draw
    Ended { winner: Option<Seat> },
}

/// Grid view for the resolver: walls, bricks and armed bombs block
struct ArenaField<'a> {
    grid: &'a ArenaGrid,
    bombs: &'a [Bomb],
}

impl Playfield for ArenaField<'_> {
    fn size(&self) -> IVec2 {
        self.grid.size()
    }

    fn cell_size(&self) -> f32 {
        1.0
    }

    fn passable(&self, cell: IVec2) -> bool {
        let open = matches!(
            self.grid.get(cell),
            Some(ArenaCell::Empty | ArenaCell::PowerUp(_))
        );
        open && !self.bombs.iter().any(|b| b.cell == cell)
    }

    fn discretize(&self, pos: Vec2) -> IVec2 {
        pos.round().as_ivec2()
    }
}

/// What one seat does this tick
#[derive(Debug, Clone, Default)]
pub struct SeatInput {
    /// Directions currently held
    pub held: Vec<Direction>,
    pub place_bomb: bool,
}

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct ArenaInput {
    pub seats: [SeatInput; 2],
    /// Idle/demo mode - both seats wander and bomb bricks
    pub autopilot: bool,
}

#[derive(Debug, Clone)]
pub struct ArenaState {
    pub seed: u64,
    rng: SimRng,
    pub grid: ArenaGrid,
    starts: [IVec2; 2],
    pub bombers: [Bomber; 2],
    pub bombs: Vec<Bomb>,
    /// Burning cells; a cell hit by overlapping blasts appears once per blast
    pub flames: Vec<IVec2>,
    pub timeline: Timeline<ArenaEffect>,
    next_bomb_id: u32,
    pub phase: GamePhase,
    pub winner: Option<Seat>,
    pub time_ticks: u64,
    headings: [Option<Direction>; 2],
    pub events: Vec<ArenaEvent>,
}

impl ArenaState {
    /// Random arena with seats in opposite corners
    pub fn new(seed: u64) -> Self {
        let mut rng = SimRng::new(seed);
        let grid = ArenaGrid::generate(&mut rng);
        let starts = [
            IVec2::new(1, 1),
            IVec2::new(ARENA_WIDTH as i32 - 2, ARENA_HEIGHT as i32 - 2),
        ];
        let mut state = Self::with_grid(grid, starts, seed);
        state.rng = rng;
        state
    }

    pub fn with_grid(grid: ArenaGrid, starts: [IVec2; 2], seed: u64) -> Self {
        Self {
            seed,
            rng: SimRng::new(seed),
            grid,
            starts,
            bombers: [Bomber::new(Seat::One, starts[0]), Bomber::new(Seat::Two, starts[1])],
            bombs: Vec::new(),
            flames: Vec::new(),
            timeline: Timeline::new(),
            next_bomb_id: 0,
            phase: GamePhase::NotStarted,
            winner: None,
            time_ticks: 0,
            headings: [None; 2],
            events: Vec::new(),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.seed);
    }

    pub fn bomber(&self, seat: Seat) -> &Bomber {
        &self.bombers[seat.index()]
    }

    pub fn bomber_mut(&mut self, seat: Seat) -> &mut Bomber {
        &mut self.bombers[seat.index()]
    }

    /// Best seat score, floored at zero
    pub fn best_score(&self) -> u64 {
        self.bombers.iter().map(|b| b.score.max(0) as u64).max().unwrap_or(0)
    }

    fn field(&self) -> ArenaField<'_> {
        ArenaField {
            grid: &self.grid,
            bombs: &self.bombs,
        }
    }

    /// Arm a bomb on a cell; the fuse is a scheduled detonation
    pub fn arm(&mut self, owner: Seat, cell: IVec2, power: i32) -> u32 {
        let id = self.next_bomb_id;
        self.next_bomb_id += 1;
        self.bombs.push(Bomb {
            id,
            owner,
            cell,
            power,
        });
        self.timeline
            .schedule(self.time_ticks + FUSE_TICKS, ArenaEffect::Detonate(id));
        id
    }

    /// Place a bomb under a seat if it is under its limit and the cell is free
    pub fn place_bomb(&mut self, seat: Seat) -> bool {
        let bomber = self.bomber(seat);
        if !bomber.alive {
            return false;
        }
        let cell = bomber.cell();
        let active = self.bombs.iter().filter(|b| b.owner == seat).count() as u32;
        if active >= bomber.max_bombs || self.bombs.iter().any(|b| b.cell == cell) {
            return false;
        }
        let power = bomber.power;
        self.arm(seat, cell, power);
        self.events.push(ArenaEvent::BombPlaced { seat, cell });
        true
    }

    /// Ticks until a bomb detonates
    pub fn fuse_left(&self, id: u32) -> Option<u64> {
        self.timeline
            .next_expiry(|e| *e == ArenaEffect::Detonate(id))
            .map(|at| at.saturating_sub(self.time_ticks))
    }

    /// Detonate a bomb and every bomb its blast reaches, in this tick
    pub fn detonate(&mut self, id: u32) {
        let mut queue = VecDeque::from([id]);
        while let Some(id) = queue.pop_front() {
            let Some(index) = self.bombs.iter().position(|b| b.id == id) else {
                continue;
            };
            let bomb = self.bombs.remove(index);
            self.timeline.cancel(|e| *e == ArenaEffect::Detonate(id));
            self.events.push(ArenaEvent::Detonated {
                owner: bomb.owner,
                cell: bomb.cell,
            });

            let cells = self.blast(&bomb, &mut queue);
            self.burn(&cells, bomb.owner);
            self.flames.extend(cells.iter().copied());
            self.timeline
                .schedule(self.time_ticks + FLAME_TICKS, ArenaEffect::ClearFlames(cells));
        }
    }

    /// Cells reached by a blast. Bricks break and stop the ray, other bombs
    /// join the chain and stop the ray.
    fn blast(&mut self, bomb: &Bomb, chain: &mut VecDeque<u32>) -> Vec<IVec2> {
        let mut cells = vec![bomb.cell];
        for dir in DIRECTIONS {
            for reach in 1..=bomb.power {
                let cell = bomb.cell + dir.as_ivec2() * reach;
                match self.grid.get(cell) {
                    None | Some(ArenaCell::Wall) => break,
                    Some(ArenaCell::Brick) => {
                        let drop = self
                            .rng
                            .chance(POWER_UP_CHANCE)
                            .then(|| self.rng.pick(&PowerUp::ALL).copied())
                            .flatten();
                        self.grid
                            .set(cell, drop.map_or(ArenaCell::Empty, ArenaCell::PowerUp));
                        self.events.push(ArenaEvent::BrickDestroyed { cell, drop });
                        cells.push(cell);
                        break;
                    }
                    Some(_) => {}
                }
                if let Some(other) = self.bombs.iter().find(|b| b.cell == cell) {
                    chain.push_back(other.id);
                    break;
                }
                cells.push(cell);
            }
        }
        cells
    }

    /// Kill every seat standing in the blast and settle scores
    fn burn(&mut self, cells: &[IVec2], owner: Seat) {
        for i in 0..self.bombers.len() {
            let victim = &mut self.bombers[i];
            if !victim.alive || !cells.contains(&victim.cell()) {
                continue;
            }
            victim.alive = false;
            let victim = victim.seat;
            let scorer = self.bomber_mut(owner);
            if victim == owner {
                scorer.score -= SELF_KILL_PENALTY;
            } else {
                scorer.score += KILL_POINTS;
            }
            self.events.push(ArenaEvent::Killed { victim, by: owner });
            log::debug!("{:?} caught in {:?}'s blast", victim, owner);
        }
    }

    fn clear_flames(&mut self, cells: &[IVec2]) {
        for cell in cells {
            if let Some(i) = self.flames.iter().position(|f| f == cell) {
                self.flames.swap_remove(i);
            }
        }
    }

    fn move_bomber(&mut self, seat: Seat, held: &[Direction]) {
        if !self.bomber(seat).alive || held.is_empty() {
            return;
        }
        let bomber = self.bomber(seat);
        let step = bomber.speed * MOVE_SCALE * SIM_DT;
        let delta: Vec2 = held.iter().map(|d| d.as_vec2() * step).sum();
        let pos = resolve_move(&self.field(), bomber.pos, delta);
        self.bomber_mut(seat).pos = pos;
    }

    fn collect_power_ups(&mut self) {
        for i in 0..self.bombers.len() {
            let bomber = &self.bombers[i];
            if !bomber.alive {
                continue;
            }
            let cell = bomber.cell();
            let Some(ArenaCell::PowerUp(kind)) = self.grid.get(cell) else {
                continue;
            };
            self.grid.set(cell, ArenaCell::Empty);
            let bomber = &mut self.bombers[i];
            match kind {
                PowerUp::Bomb => bomber.max_bombs += 1,
                PowerUp::Flame => bomber.power += 1,
                PowerUp::Speed => bomber.speed += SPEED_BONUS,
            }
            bomber.score += POWER_UP_POINTS;
            let seat = bomber.seat;
            self.events.push(ArenaEvent::PowerUpCollected { seat, kind });
        }
    }

    fn check_end(&mut self) {
        let [one, two] = [&self.bombers[0], &self.bombers[1]];
        let winner = match (one.alive, two.alive) {
            (true, true) => return,
            (true, false) => Some(Seat::One),
            (false, true) => Some(Seat::Two),
            (false, false) => None,
        };
        self.phase = GamePhase::Over;
        self.winner = winner;
        self.events.push(ArenaEvent::Ended { winner });
        match winner {
            Some(seat) => log::info!("Bomb arena won by {:?}", seat),
            None => log::info!("Bomb arena ended in a draw"),
        }
    }

    /// Wander: keep heading until blocked, bomb bricks now and then
    fn autopilot_input(&mut self) -> ArenaInput {
        let mut input = ArenaInput::default();
        for seat in Seat::ALL {
            let i = seat.index();
            let bomber = &self.bombers[i];
            if !bomber.alive {
                continue;
            }
            let field = self.field();
            let speed = bomber.speed * MOVE_SCALE * SIM_DT;
            let blocked = self.headings[i].is_none_or(|d| !can_step(&field, bomber.pos, d, speed));
            let cell = bomber.cell();
            let near_brick = DIRECTIONS
                .iter()
                .any(|d| self.grid.get(cell + d.as_ivec2()) == Some(ArenaCell::Brick));

            if blocked {
                let open: Vec<Direction> = DIRECTIONS
                    .into_iter()
                    .filter(|&d| can_step(&field, bomber.pos, d, speed))
                    .collect();
                self.headings[i] = self.rng.pick(&open).copied();
            }
            if let Some(dir) = self.headings[i] {
                input.seats[i].held.push(dir);
            }
            input.seats[i].place_bomb = near_brick && self.rng.chance(0.02);
        }
        input
    }

    pub fn snapshot(&self) -> ArenaSnapshot {
        ArenaSnapshot {
            grid: self.grid.clone(),
            bombers: self.bombers.clone(),
            bombs: self
                .bombs
                .iter()
                .map(|b| BombView {
                    owner: b.owner,
                    cell: b.cell,
                    fuse_left: self.fuse_left(b.id).unwrap_or(0),
                })
                .collect(),
            flames: self.flames.clone(),
            phase: self.phase,
            winner: self.winner,
            tick: self.time_ticks,
        }
    }
}

/// Advance the arena by one fixed timestep
pub fn tick(state: &mut ArenaState, input: &ArenaInput) {
    if !state.phase.is_running() {
        return;
    }
    state.events.clear();

    // 1. Input
    let input = if input.autopilot {
        state.autopilot_input()
    } else {
        input.clone()
    };
    for seat in Seat::ALL {
        if input.seats[seat.index()].place_bomb {
            state.place_bomb(seat);
        }
    }

    state.time_ticks += 1;

    // 2. Fuses and flame cleanup
    for effect in state.timeline.drain_due(state.time_ticks) {
        match effect {
            ArenaEffect::Detonate(id) => state.detonate(id),
            ArenaEffect::ClearFlames(cells) => state.clear_flames(&cells),
        }
    }

    // 3. Movement
    for seat in Seat::ALL {
        state.move_bomber(seat, &input.seats[seat.index()].held);
    }

    // 4 + 5. Pickups and terminal checks
    state.collect_power_ups();
    state.check_end();
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BombView {
    pub owner: Seat,
    pub cell: IVec2,
    pub fuse_left: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArenaSnapshot {
    pub grid: ArenaGrid,
    pub bombers: [Bomber; 2],
    pub bombs: Vec<BombView>,
    pub flames: Vec<IVec2>,
    pub phase: GamePhase,
    pub winner: Option<Seat>,
    pub tick: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOM: [&str; 5] = ["#######", "#     #", "# # # #", "#     #", "#######"];

    fn room(one: IVec2, two: IVec2) -> ArenaState {
        let mut state = ArenaState::with_grid(ArenaGrid::parse(&ROOM), [one, two], 1);
        state.phase = GamePhase::Running;
        state
    }

    fn idle() -> ArenaInput {
        ArenaInput::default()
    }

    fn holding(seat: Seat, dir: Direction) -> ArenaInput {
        let mut input = ArenaInput::default();
        input.seats[seat.index()].held.push(dir);
        input
    }

    #[test]
    fn test_generated_arena_layout() {
        let state = ArenaState::new(2024);
        let grid = &state.grid;
        assert_eq!(grid.size(), IVec2::new(15, 13));
        for (cell, kind) in grid.iter() {
            let border = cell.x == 0 || cell.y == 0 || cell.x == 14 || cell.y == 12;
            if border || (cell.x % 2 == 0 && cell.y % 2 == 0) {
                assert_eq!(kind, ArenaCell::Wall, "{:?}", cell);
            }
        }
        for cell in [IVec2::new(1, 1), IVec2::new(1, 2), IVec2::new(2, 1), IVec2::new(13, 11), IVec2::new(13, 10), IVec2::new(12, 11)] {
            assert_eq!(grid.get(cell), Some(ArenaCell::Empty));
        }
        assert!(grid.iter().any(|(_, c)| c == ArenaCell::Brick));
        assert_eq!(ArenaState::new(2024).grid, state.grid);
    }

    #[test]
    fn test_bomb_limit_and_one_per_cell() {
        let mut state = room(IVec2::new(1, 1), IVec2::new(5, 3));
        assert!(state.place_bomb(Seat::One));
        assert!(!state.place_bomb(Seat::One));
        state.bomber_mut(Seat::One).max_bombs = 2;
        // Still standing on the first bomb
        assert!(!state.place_bomb(Seat::One));
        assert_eq!(state.bombs.len(), 1);
        assert_eq!(state.fuse_left(0), Some(FUSE_TICKS));
    }

    #[test]
    fn test_owner_walks_off_bomb_but_others_are_blocked() {
        let mut state = room(IVec2::new(3, 1), IVec2::new(5, 1));
        state.place_bomb(Seat::One);
        for _ in 0..20 {
            tick(&mut state, &holding(Seat::One, Direction::Left));
        }
        assert_eq!(state.bomber(Seat::One).cell(), IVec2::new(1, 1));

        for _ in 0..30 {
            tick(&mut state, &holding(Seat::Two, Direction::Left));
        }
        let two = state.bomber(Seat::Two);
        assert_eq!(two.cell(), IVec2::new(4, 1));
        assert!(two.pos.x >= 3.5);
    }

    #[test]
    fn test_fuse_detonates_on_schedule() {
        let mut state = room(IVec2::new(1, 3), IVec2::new(5, 3));
        state.arm(Seat::One, IVec2::new(3, 1), 1);
        for _ in 0..FUSE_TICKS - 1 {
            tick(&mut state, &idle());
        }
        assert_eq!(state.bombs.len(), 1);
        assert_eq!(state.fuse_left(0), Some(1));
        tick(&mut state, &idle());
        assert!(state.bombs.is_empty());
        assert!(state.flames.contains(&IVec2::new(3, 1)));
        assert!(state.flames.contains(&IVec2::new(3, 2)));
        assert!(!state.flames.contains(&IVec2::new(3, 0)));
    }

    #[test]
    fn test_chain_detonation_same_tick() {
        let mut state = room(IVec2::new(5, 1), IVec2::new(5, 3));
        let first = state.arm(Seat::One, IVec2::new(1, 1), 2);
        state.arm(Seat::Two, IVec2::new(3, 1), 1);

        state.detonate(first);

        assert!(state.bombs.is_empty());
        assert_eq!(state.timeline.count(|e| matches!(e, ArenaEffect::Detonate(_))), 0);
        let detonations = state
            .events
            .iter()
            .filter(|e| matches!(e, ArenaEvent::Detonated { .. }))
            .count();
        assert_eq!(detonations, 2);
        // Second bomb's own blast
        assert!(state.flames.contains(&IVec2::new(4, 1)));
        assert!(state.flames.contains(&IVec2::new(3, 2)));
        assert!(state.bombers.iter().all(|b| b.alive));
    }

    #[test]
    fn test_brick_breaks_and_stops_ray() {
        let grid = ArenaGrid::parse(&["#######", "# ++  #", "#######"]);
        let mut state = ArenaState::with_grid(grid, [IVec2::new(5, 1), IVec2::new(5, 1)], 3);
        let id = state.arm(Seat::One, IVec2::new(1, 1), 3);
        state.detonate(id);

        assert_ne!(state.grid.get(IVec2::new(2, 1)), Some(ArenaCell::Brick));
        assert_eq!(state.grid.get(IVec2::new(3, 1)), Some(ArenaCell::Brick));
        assert!(state.flames.contains(&IVec2::new(2, 1)));
        assert!(!state.flames.contains(&IVec2::new(3, 1)));
        assert!(state.events.iter().any(|e| matches!(e, ArenaEvent::BrickDestroyed { .. })));
    }

    #[test]
    fn test_kill_scores_and_ends_game() {
        let mut state = room(IVec2::new(1, 1), IVec2::new(2, 1));
        let id = state.arm(Seat::One, IVec2::new(4, 1), 2);
        state.detonate(id);
        state.check_end();

        assert!(state.bomber(Seat::One).alive);
        assert!(!state.bomber(Seat::Two).alive);
        assert_eq!(state.bomber(Seat::One).score, KILL_POINTS);
        assert_eq!(state.phase, GamePhase::Over);
        assert_eq!(state.winner, Some(Seat::One));
    }

    #[test]
    fn test_self_kill_penalty_and_draw() {
        let mut state = room(IVec2::new(1, 1), IVec2::new(2, 1));
        let id = state.arm(Seat::One, IVec2::new(1, 1), 1);
        state.detonate(id);
        state.check_end();

        assert_eq!(state.bomber(Seat::One).score, KILL_POINTS - SELF_KILL_PENALTY);
        assert_eq!(state.winner, None);
        assert_eq!(state.phase, GamePhase::Over);
        assert!(state.events.contains(&ArenaEvent::Ended { winner: None }));
    }

    #[test]
    fn test_flames_clear_after_a_second() {
        let mut state = room(IVec2::new(1, 3), IVec2::new(5, 3));
        let id = state.arm(Seat::One, IVec2::new(3, 1), 1);
        state.detonate(id);
        assert!(!state.flames.is_empty());
        for _ in 0..FLAME_TICKS - 1 {
            tick(&mut state, &idle());
        }
        assert!(!state.flames.is_empty());
        tick(&mut state, &idle());
        assert!(state.flames.is_empty());
    }

    #[test]
    fn test_power_up_pickup() {
        let mut state = room(IVec2::new(1, 1), IVec2::new(5, 3));
        state.grid.set(IVec2::new(1, 1), ArenaCell::PowerUp(PowerUp::Flame));
        tick(&mut state, &idle());
        let one = state.bomber(Seat::One);
        assert_eq!(one.power, 2);
        assert_eq!(one.score, POWER_UP_POINTS);
        assert_eq!(state.grid.get(IVec2::new(1, 1)), Some(ArenaCell::Empty));
    }

    #[test]
    fn test_paused_arena_does_not_burn_fuses() {
        let mut state = room(IVec2::new(1, 3), IVec2::new(5, 3));
        state.arm(Seat::One, IVec2::new(3, 1), 1);
        state.phase = GamePhase::Paused;
        for _ in 0..FUSE_TICKS * 2 {
            tick(&mut state, &idle());
        }
        assert_eq!(state.bombs.len(), 1);
        assert_eq!(state.fuse_left(0), Some(FUSE_TICKS));
    }
}
