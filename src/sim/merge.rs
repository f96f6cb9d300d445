//! Tile-merge game
//!
//! 4×4 board of powers of two. A move slides every line toward one edge,
//! merging equal neighbours once per move, then spawns one tile if anything
//! changed.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::direction::{DIRECTIONS, Direction};
use super::phase::GamePhase;
use super::rng::{RandomSource, SimRng};

pub const SIZE: usize = 4;
pub const WINNING_TILE: u32 = 2048;
/// Chance a spawned tile is a 2 rather than a 4
pub const TWO_CHANCE: f32 = 0.9;

/// Tile values, row-major; 0 is empty
pub type Tiles = [[u32; SIZE]; SIZE];

/// Slide one line toward index 0, merging equal neighbours once.
/// Returns the new line and the points gained.
pub fn slide_line(line: [u32; SIZE]) -> ([u32; SIZE], u64) {
    let (out, gained, _) = collapse(line);
    (out, gained)
}

/// Slide plus the largest tile produced by a merge
fn collapse(line: [u32; SIZE]) -> ([u32; SIZE], u64, u32) {
    let tiles: Vec<u32> = line.into_iter().filter(|&v| v != 0).collect();
    let mut out = [0; SIZE];
    let mut gained = 0;
    let mut largest = 0;
    let mut write = 0;
    let mut i = 0;
    while i < tiles.len() {
        if i + 1 < tiles.len() && tiles[i] == tiles[i + 1] {
            let merged = tiles[i] * 2;
            out[write] = merged;
            gained += merged as u64;
            largest = largest.max(merged);
            i += 2;
        } else {
            out[write] = tiles[i];
            i += 1;
        }
        write += 1;
    }
    (out, gained, largest)
}

/// Cells of line `index`, ordered from the edge the tiles slide toward
fn line_cells(dir: Direction, index: usize) -> [IVec2; SIZE] {
    let i = index as i32;
    let last = SIZE as i32 - 1;
    std::array::from_fn(|k| {
        let k = k as i32;
        match dir {
            Direction::Left => IVec2::new(k, i),
            Direction::Right => IVec2::new(last - k, i),
            Direction::Up => IVec2::new(i, k),
            Direction::Down => IVec2::new(i, last - k),
        }
    })
}

/// Result of sliding a whole board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slide {
    pub tiles: Tiles,
    pub gained: u64,
    pub moved: bool,
    pub largest_merge: u32,
}

pub fn slide(tiles: &Tiles, dir: Direction) -> Slide {
    let mut out = *tiles;
    let mut gained = 0;
    let mut largest_merge = 0;
    for index in 0..SIZE {
        let cells = line_cells(dir, index);
        let line = cells.map(|c| tiles[c.y as usize][c.x as usize]);
        let (slid, points, largest) = collapse(line);
        gained += points;
        largest_merge = largest_merge.max(largest);
        for (cell, value) in cells.iter().zip(slid) {
            out[cell.y as usize][cell.x as usize] = value;
        }
    }
    Slide {
        moved: out != *tiles,
        tiles: out,
        gained,
        largest_merge,
    }
}

/// Whether any slide would change the board
pub fn can_move(tiles: &Tiles) -> bool {
    for y in 0..SIZE {
        for x in 0..SIZE {
            let v = tiles[y][x];
            if v == 0 {
                return true;
            }
            if x + 1 < SIZE && tiles[y][x + 1] == v {
                return true;
            }
            if y + 1 < SIZE && tiles[y + 1][x] == v {
                return true;
            }
        }
    }
    false
}

fn empty_cells(tiles: &Tiles) -> Vec<IVec2> {
    let mut cells = Vec::new();
    for (y, row) in tiles.iter().enumerate() {
        for (x, &v) in row.iter().enumerate() {
            if v == 0 {
                cells.push(IVec2::new(x as i32, y as i32));
            }
        }
    }
    cells
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MergeEvent {
    Slid { gained: u64 },
    Spawned { cell: IVec2, value: u32 },
    Won,
    GameOver,
}

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct MergeInput {
    pub slide: Option<Direction>,
    /// Idle/demo mode - greedy autopilot
    pub autopilot: bool,
}

#[derive(Debug, Clone)]
pub struct MergeState {
    pub seed: u64,
    rng: SimRng,
    pub tiles: Tiles,
    pub score: u64,
    pub phase: GamePhase,
    /// Set after a win to keep sliding without re-triggering it
    pub keep_playing: bool,
    pub time_ticks: u64,
    pub events: Vec<MergeEvent>,
}

impl MergeState {
    /// Fresh board with two spawned tiles
    pub fn new(seed: u64) -> Self {
        let mut state = Self::with_tiles([[0; SIZE]; SIZE], seed);
        state.spawn_tile();
        state.spawn_tile();
        state.events.clear();
        state
    }

    pub fn with_tiles(tiles: Tiles, seed: u64) -> Self {
        Self {
            seed,
            rng: SimRng::new(seed),
            tiles,
            score: 0,
            phase: GamePhase::NotStarted,
            keep_playing: false,
            time_ticks: 0,
            events: Vec::new(),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.seed);
    }

    /// Continue after reaching the winning tile. A winning move that also
    /// locked the board goes straight to Over.
    pub fn keep_playing(&mut self) {
        if self.phase != GamePhase::Won {
            return;
        }
        self.keep_playing = true;
        if can_move(&self.tiles) {
            self.phase = GamePhase::Running;
            log::info!("Continuing past {}", WINNING_TILE);
        } else {
            self.phase = GamePhase::Over;
            self.events.push(MergeEvent::GameOver);
            log::info!("No moves left, score {}", self.score);
        }
    }

    fn spawn_tile(&mut self) -> Option<IVec2> {
        let empty = empty_cells(&self.tiles);
        let cell = *self.rng.pick(&empty)?;
        let value = if self.rng.chance(TWO_CHANCE) { 2 } else { 4 };
        self.tiles[cell.y as usize][cell.x as usize] = value;
        self.events.push(MergeEvent::Spawned { cell, value });
        Some(cell)
    }

    /// Apply one move; returns whether anything moved
    pub fn apply(&mut self, dir: Direction) -> bool {
        let result = slide(&self.tiles, dir);
        if !result.moved {
            return false;
        }
        self.tiles = result.tiles;
        self.score += result.gained;
        self.events.push(MergeEvent::Slid {
            gained: result.gained,
        });
        self.spawn_tile();

        if result.largest_merge >= WINNING_TILE && !self.keep_playing {
            self.phase = GamePhase::Won;
            self.events.push(MergeEvent::Won);
            log::info!("Reached {} with score {}", WINNING_TILE, self.score);
        } else if !can_move(&self.tiles) {
            self.phase = GamePhase::Over;
            self.events.push(MergeEvent::GameOver);
            log::info!("No moves left, score {}", self.score);
        }
        true
    }

    /// Greedy choice: most points, then most empty cells
    fn autopilot_direction(&self) -> Option<Direction> {
        DIRECTIONS
            .into_iter()
            .filter_map(|dir| {
                let result = slide(&self.tiles, dir);
                result
                    .moved
                    .then(|| (dir, (result.gained, empty_cells(&result.tiles).len())))
            })
            // First enumerated direction wins ties
            .min_by_key(|&(_, key)| std::cmp::Reverse(key))
            .map(|(dir, _)| dir)
    }

    pub fn snapshot(&self) -> MergeSnapshot {
        MergeSnapshot {
            tiles: self.tiles,
            score: self.score,
            phase: self.phase,
            keep_playing: self.keep_playing,
            tick: self.time_ticks,
        }
    }
}

/// Advance the merge game by one tick (moves are the only thing that happens)
pub fn tick(state: &mut MergeState, input: &MergeInput) {
    if !state.phase.is_running() {
        return;
    }
    state.events.clear();
    state.time_ticks += 1;

    let dir = if input.autopilot {
        state.autopilot_direction()
    } else {
        input.slide
    };
    if let Some(dir) = dir {
        state.apply(dir);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeSnapshot {
    pub tiles: Tiles,
    pub score: u64,
    pub phase: GamePhase,
    pub keep_playing: bool,
    pub tick: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running(tiles: Tiles) -> MergeState {
        let mut state = MergeState::with_tiles(tiles, 9);
        state.phase = GamePhase::Running;
        state
    }

    fn count(tiles: &Tiles) -> usize {
        tiles.iter().flatten().filter(|&&v| v != 0).count()
    }

    #[test]
    fn test_slide_line_merges_once() {
        assert_eq!(slide_line([2, 2, 0, 0]), ([4, 0, 0, 0], 4));
        assert_eq!(slide_line([2, 2, 2, 2]), ([4, 4, 0, 0], 8));
        assert_eq!(slide_line([4, 4, 8, 0]), ([8, 8, 0, 0], 8));
        assert_eq!(slide_line([0, 2, 0, 2]), ([4, 0, 0, 0], 4));
        assert_eq!(slide_line([2, 4, 2, 4]), ([2, 4, 2, 4], 0));
    }

    #[test]
    fn test_scenario_left_merge() {
        let mut state = running([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
        tick(&mut state, &MergeInput { slide: Some(Direction::Left), autopilot: false });

        assert_eq!(state.tiles[0][0], 4);
        assert_eq!(state.score, 4);
        assert_eq!(count(&state.tiles), 2);
        let spawned: Vec<_> = state
            .events
            .iter()
            .filter(|e| matches!(e, MergeEvent::Spawned { .. }))
            .collect();
        assert_eq!(spawned.len(), 1);
        if let MergeEvent::Spawned { cell, value } = spawned[0] {
            assert_ne!(*cell, IVec2::ZERO);
            assert!(*value == 2 || *value == 4);
        }
    }

    #[test]
    fn test_slide_right_and_down() {
        let tiles = [[2, 0, 0, 2], [0; 4], [0, 4, 0, 0], [0, 4, 0, 0]];
        let right = slide(&tiles, Direction::Right);
        assert_eq!(right.tiles[0], [0, 0, 0, 4]);
        let down = slide(&tiles, Direction::Down);
        assert_eq!(down.tiles[3][1], 8);
        assert_eq!(down.tiles[2][1], 0);
        assert_eq!(down.gained, 8);
    }

    #[test]
    fn test_no_change_spawns_nothing() {
        let mut state = running([[2, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);
        assert!(!state.apply(Direction::Left));
        assert!(!state.apply(Direction::Up));
        assert_eq!(count(&state.tiles), 1);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_reaching_goal_wins_then_keep_playing() {
        let mut state = running([[1024, 1024, 0, 0], [0; 4], [0; 4], [0; 4]]);
        state.apply(Direction::Left);
        assert_eq!(state.phase, GamePhase::Won);
        assert!(state.events.contains(&MergeEvent::Won));

        state.keep_playing();
        assert_eq!(state.phase, GamePhase::Running);
        state.tiles = [[1024, 1024, 0, 0], [0; 4], [0; 4], [0; 4]];
        state.apply(Direction::Left);
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_winning_move_that_locks_the_board_ends_on_continue() {
        let mut state = running([
            [1024, 1024, 4, 8],
            [4, 2, 4, 16],
            [2, 4, 2, 4],
            [4, 2, 4, 2],
        ]);
        assert!(state.apply(Direction::Left));
        assert_eq!(state.phase, GamePhase::Won);
        // The one hole is refilled by a 2 or 4, and nothing pairs up
        assert!(!can_move(&state.tiles));

        state.keep_playing();
        assert_eq!(state.phase, GamePhase::Over);
        assert!(state.events.contains(&MergeEvent::GameOver));
        for dir in DIRECTIONS {
            tick(&mut state, &MergeInput { slide: Some(dir), autopilot: false });
        }
        assert_eq!(state.phase, GamePhase::Over);
    }

    #[test]
    fn test_full_board_without_pairs_is_over() {
        let mut state = running([
            [2, 4, 2, 4],
            [4, 2, 4, 2],
            [2, 4, 2, 4],
            [4, 2, 4, 4],
        ]);
        // Merging the 4s leaves one hole; the spawned tile fills it
        state.apply(Direction::Left);
        assert_eq!(state.tiles[3][..3], [4, 2, 8]);
        assert_eq!(count(&state.tiles), 16);
        // A spawned 4 pairs with the 4 above it, a 2 leaves nothing to merge
        let expected = if state.tiles[3][3] == 2 {
            GamePhase::Over
        } else {
            GamePhase::Running
        };
        assert_eq!(state.phase, expected);
    }

    #[test]
    fn test_can_move() {
        let stuck = [[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]];
        assert!(!can_move(&stuck));
        let mut pair = stuck;
        pair[3][3] = 4;
        assert!(can_move(&pair));
    }

    #[test]
    fn test_new_game_has_two_tiles() {
        let state = MergeState::new(77);
        assert_eq!(count(&state.tiles), 2);
        assert_eq!(state.phase, GamePhase::NotStarted);
    }

    #[test]
    fn test_autopilot_prefers_merges() {
        let mut state = running([[0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [2, 2, 0, 0]]);
        tick(&mut state, &MergeInput { slide: None, autopilot: true });
        assert_eq!(state.score, 4);
    }
}
