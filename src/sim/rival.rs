//! Rival behaviour selector
//!
//! Each tick a rival re-evaluates its heading: enumerate open directions in
//! fixed order (up, down, left, right), drop the reversal unless frightened,
//! then pick by mode.

use glam::Vec2;

use super::actor::{Rival, RivalMode};
use super::direction::{DIRECTIONS, Direction};
use super::movement::{Playfield, can_step};
use super::rng::RandomSource;
use crate::manhattan;

/// Open directions for this tick, in enumeration order
pub fn candidate_directions<F: Playfield + ?Sized>(field: &F, rival: &Rival) -> Vec<Direction> {
    let speed = rival.current_speed();
    let reverse = rival.actor.direction.map(Direction::opposite);
    DIRECTIONS
        .into_iter()
        .filter(|&dir| rival.is_frightened() || Some(dir) != reverse)
        .filter(|&dir| can_step(field, rival.actor.pos, dir, speed))
        .collect()
}

/// Heading for this tick. Falls back to reversing when boxed in.
pub fn choose_direction<F, R>(field: &F, rival: &Rival, target: Vec2, rng: &mut R) -> Option<Direction>
where
    F: Playfield + ?Sized,
    R: RandomSource,
{
    let candidates = candidate_directions(field, rival);
    if candidates.is_empty() {
        return rival.actor.direction.map(Direction::opposite);
    }

    match rival.mode {
        RivalMode::Frightened | RivalMode::Scatter => rng.pick(&candidates).copied(),
        RivalMode::Chase => {
            let pos = rival.actor.pos;
            let speed = rival.current_speed();
            // min_by keeps the first of equal elements
            candidates
                .into_iter()
                .map(|dir| (dir, manhattan(pos + dir.as_vec2() * speed, target)))
                .min_by(|a, b| a.1.total_cmp(&b.1))
                .map(|(dir, _)| dir)
        }
    }
}
