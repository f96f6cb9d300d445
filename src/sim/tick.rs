//! Fixed timestep simulation tick
//!
//! Core maze loop that advances simulation deterministically.

use super::direction::{DIRECTIONS, Direction};
use super::interaction;
use super::movement::{can_step, resolve_step};
use super::rival::choose_direction;
use super::state::{MazeField, MazeState, Walker};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Requested heading, buffered until the turn is legal
    pub steer: Option<Direction>,
    /// Idle/demo mode - autopilot steers the player
    pub autopilot: bool,
}

/// Advance the maze by one fixed timestep
pub fn tick(state: &mut MazeState, input: &TickInput) {
    // Don't tick unless running
    if !state.phase.is_running() {
        return;
    }

    state.events.clear();

    // 1. Input
    let steer = if input.autopilot {
        autopilot_heading(state)
    } else {
        input.steer
    };
    if let Some(dir) = steer {
        state.player.queued = Some(dir);
    }

    state.time_ticks += 1;

    // 2. Deferred effects
    for effect in state.timeline.drain_due(state.time_ticks) {
        interaction::apply_effect(state, effect);
    }

    // 3. Movement
    move_player(state);
    move_rivals(state);

    // 4 + 5. Interactions and terminal checks
    interaction::resolve(state);
}

fn move_player(state: &mut MazeState) {
    let field = MazeField::new(&state.grid, Walker::Player);
    let player = &mut state.player;

    if let Some(queued) = player.queued
        && can_step(&field, player.actor.pos, queued, player.actor.speed)
    {
        player.actor.direction = Some(queued);
        player.queued = None;
    }

    if let Some(dir) = player.actor.direction {
        player.actor.pos = resolve_step(&field, player.actor.pos, dir, player.actor.speed);
    }
}

fn move_rivals(state: &mut MazeState) {
    let field = MazeField::new(&state.grid, Walker::Rival);
    let target = state.player.actor.pos;

    for rival in &mut state.rivals {
        let Some(dir) = choose_direction(&field, rival, target, &mut state.rng) else {
            continue;
        };
        rival.actor.direction = Some(dir);
        rival.actor.pos = resolve_step(&field, rival.actor.pos, dir, rival.current_speed());
    }
}

/// Keep going straight; at a wall take the next open non-reversing turn.
fn autopilot_heading(state: &MazeState) -> Option<Direction> {
    let field = MazeField::new(&state.grid, Walker::Player);
    let actor = &state.player.actor;

    if let Some(dir) = actor.direction
        && can_step(&field, actor.pos, dir, actor.speed)
    {
        return None;
    }

    let reverse = actor.direction.map(Direction::opposite);
    let open: Vec<Direction> = DIRECTIONS
        .into_iter()
        .filter(|&d| Some(d) != reverse && can_step(&field, actor.pos, d, actor.speed))
        .collect();
    if open.is_empty() {
        return reverse;
    }
    open.get(state.time_ticks as usize % open.len()).copied()
}
