//! Movement and collision resolver
//!
//! Converts a continuous position plus a requested per-axis delta into a
//! validated position. Axes resolve independently (horizontal first), so an
//! actor pressed against a wall can still slide along it. The resolver never
//! fails: a rejected axis simply keeps its coordinate.

use glam::{IVec2, Vec2};

use super::direction::Direction;

/// What the resolver needs to know about a board
pub trait Playfield {
    /// Board size in cells
    fn size(&self) -> IVec2;

    /// Edge length of one cell in position units
    fn cell_size(&self) -> f32;

    /// Whether an in-bounds cell can be entered by this walker
    fn passable(&self, cell: IVec2) -> bool;

    /// Whether this row wraps horizontally
    fn is_tunnel_row(&self, _row: i32) -> bool {
        false
    }

    /// Cell an actor at `pos` occupies (floored by default)
    fn discretize(&self, pos: Vec2) -> IVec2 {
        crate::cell_of(pos, self.cell_size())
    }

    fn in_bounds(&self, cell: IVec2) -> bool {
        let size = self.size();
        cell.x >= 0 && cell.y >= 0 && cell.x < size.x && cell.y < size.y
    }
}

/// Wrap a horizontal coordinate through a tunnel row, if the row has one
pub fn wrap_tunnel<F: Playfield + ?Sized>(field: &F, pos: Vec2) -> Vec2 {
    let row = field.discretize(pos).y;
    if !field.is_tunnel_row(row) {
        return pos;
    }
    let width = field.size().x as f32 * field.cell_size();
    if pos.x < 0.0 {
        Vec2::new(width - field.cell_size(), pos.y)
    } else if pos.x >= width {
        Vec2::new(0.0, pos.y)
    } else {
        pos
    }
}

/// Whether an actor currently in `from` may occupy `candidate`
fn admits<F: Playfield + ?Sized>(field: &F, from: IVec2, candidate: Vec2) -> bool {
    let target = field.discretize(candidate);
    // Staying inside the current cell is always allowed (e.g. standing on a
    // freshly placed bomb)
    target == from || (field.in_bounds(target) && field.passable(target))
}

/// Resolve a move by `delta`, horizontal axis first.
pub fn resolve_move<F: Playfield + ?Sized>(field: &F, pos: Vec2, delta: Vec2) -> Vec2 {
    let mut resolved = pos;

    if delta.x != 0.0 {
        let from = field.discretize(resolved);
        let candidate = wrap_tunnel(field, Vec2::new(resolved.x + delta.x, resolved.y));
        if admits(field, from, candidate) {
            resolved = candidate;
        }
    }

    if delta.y != 0.0 {
        let from = field.discretize(resolved);
        let candidate = Vec2::new(resolved.x, resolved.y + delta.y);
        if admits(field, from, candidate) {
            resolved = candidate;
        }
    }

    resolved
}

/// Resolve a single-direction step of `speed` units
pub fn resolve_step<F: Playfield + ?Sized>(
    field: &F,
    pos: Vec2,
    dir: Direction,
    speed: f32,
) -> Vec2 {
    resolve_move(field, pos, dir.as_vec2() * speed)
}

/// Whether a step in `dir` would be accepted
pub fn can_step<F: Playfield + ?Sized>(field: &F, pos: Vec2, dir: Direction, speed: f32) -> bool {
    let mut candidate = pos + dir.as_vec2() * speed;
    if dir.is_horizontal() {
        candidate = wrap_tunnel(field, candidate);
    }
    admits(field, field.discretize(pos), candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::grid::{Cell, Grid};
    use proptest::prelude::*;

    /// Walls block, everything else passes
    struct Walls<'a>(&'a Grid);

    impl Playfield for Walls<'_> {
        fn size(&self) -> IVec2 {
            self.0.size()
        }
        fn cell_size(&self) -> f32 {
            16.0
        }
        fn passable(&self, cell: IVec2) -> bool {
            self.0.get(cell).is_some_and(|c| c != Cell::Wall)
        }
        fn is_tunnel_row(&self, row: i32) -> bool {
            self.0.is_tunnel_row(row)
        }
    }

    fn corridor() -> Grid {
        Grid::parse(&["#####", "     ", "#####"]).unwrap()
    }

    #[test]
    fn test_tunnel_wrap_left_edge() {
        let grid = corridor();
        let field = Walls(&grid);
        let pos = resolve_step(&field, Vec2::new(0.0, 16.0), Direction::Left, 2.0);
        assert_eq!(pos, Vec2::new(4.0 * 16.0, 16.0));
    }

    #[test]
    fn test_tunnel_wrap_right_edge() {
        let grid = corridor();
        let field = Walls(&grid);
        let pos = resolve_step(&field, Vec2::new(79.0, 16.0), Direction::Right, 2.0);
        assert_eq!(pos, Vec2::new(0.0, 16.0));
    }

    #[test]
    fn test_non_tunnel_edge_rejected() {
        let grid = Grid::parse(&["     "]).unwrap();
        let field = Walls(&grid);
        // Moving up out of the board is never wrapped
        let pos = resolve_step(&field, Vec2::new(16.0, 0.0), Direction::Up, 2.0);
        assert_eq!(pos, Vec2::new(16.0, 0.0));
    }

    #[test]
    fn test_wall_rejects_axis_but_allows_orthogonal() {
        let grid = Grid::parse(&["#####", "#  ##", "#   #", "#####"]).unwrap();
        let field = Walls(&grid);
        // At (2,1) heading right into the wall at (3,1) while also moving down
        let start = Vec2::new(2.0 * 16.0 + 14.0, 16.0);
        let pos = resolve_move(&field, start, Vec2::new(2.0, 2.0));
        assert_eq!(pos.x, start.x);
        assert_eq!(pos.y, 18.0);
    }

    #[test]
    fn test_movement_inside_cell_always_allowed() {
        let grid = Grid::parse(&["#.#"]).unwrap();
        let field = Walls(&grid);
        let pos = resolve_step(&field, Vec2::new(16.0, 0.0), Direction::Right, 2.0);
        assert_eq!(pos, Vec2::new(18.0, 0.0));
        assert!(can_step(&field, Vec2::new(16.0, 0.0), Direction::Right, 2.0));
        assert!(!can_step(&field, Vec2::new(16.0, 0.0), Direction::Left, 2.0));
    }

    proptest! {
        #[test]
        fn prop_resolved_cell_never_wall(
            steps in proptest::collection::vec((0usize..4, 0.5f32..6.0), 1..200)
        ) {
            let grid = Grid::classic();
            let field = Walls(&grid);
            let mut pos = Vec2::new(14.0 * 16.0, 23.0 * 16.0);
            for (d, speed) in steps {
                let dir = crate::sim::direction::DIRECTIONS[d];
                pos = resolve_step(&field, pos, dir, speed);
                let cell = field.discretize(pos);
                prop_assert!(!grid.is_wall(cell), "landed in wall at {:?}", cell);
                prop_assert!(grid.in_bounds(cell));
            }
        }
    }
}
