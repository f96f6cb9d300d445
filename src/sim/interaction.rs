//! Interaction resolver for the maze game
//!
//! Runs after every actor has moved: collectibles under the player first, then
//! player/rival contact. Terminal phases are set here, on the same tick as the
//! event that causes them.

use super::actor::RivalMode;
use super::grid::Cell;
use super::phase::GamePhase;
use super::state::{MazeEffect, MazeEvent, MazeState};
use crate::consts::{CAPTURE_BONUS, CAPTURE_RADIUS_CELLS, CELL_SIZE};

/// Resolve all interactions for the current tick
pub fn resolve(state: &mut MazeState) {
    collect(state);
    if state.phase.is_terminal() {
        return;
    }
    contact(state);
}

/// Consume whatever collectible sits under the player
pub fn collect(state: &mut MazeState) -> Option<Cell> {
    let cell = state.player_cell();
    let found = state.grid.take_collectible(cell)?;

    state.score += found.points();
    state.remaining = state.remaining.saturating_sub(1);

    if found == Cell::PowerPellet {
        for rival in &mut state.rivals {
            rival.frighten();
        }
        let at = state.time_ticks + state.tuning.vulnerable_ticks;
        state
            .timeline
            .replace(at, MazeEffect::EndVulnerability, MazeEffect::is_vulnerability);
        state.events.push(MazeEvent::PelletEaten);
        log::debug!("Power pellet at {:?}, rivals vulnerable until tick {}", cell, at);
    } else {
        state.events.push(MazeEvent::DotEaten);
    }

    if state.remaining == 0 {
        state.phase = GamePhase::Won;
        state.events.push(MazeEvent::MazeCleared);
        log::info!("Maze cleared with score {}", state.score);
    }

    Some(found)
}

/// Resolve the first rival overlapping the player, if any
pub fn contact(state: &mut MazeState) {
    let radius = CELL_SIZE * CAPTURE_RADIUS_CELLS;
    let player_pos = state.player.actor.pos;
    let Some(index) = state
        .rivals
        .iter()
        .position(|r| r.actor.pos.distance(player_pos) < radius)
    else {
        return;
    };

    if state.rivals[index].is_frightened() {
        let rival = &mut state.rivals[index];
        let mode = rival.prior_mode;
        rival.send_home(mode);
        state.score += CAPTURE_BONUS;
        state.events.push(MazeEvent::RivalCaptured {
            name: rival.name.clone(),
        });
        return;
    }

    state.lives = state.lives.saturating_sub(1);
    state.events.push(MazeEvent::LifeLost {
        remaining: state.lives,
    });

    if state.lives == 0 {
        state.phase = GamePhase::Over;
        state.events.push(MazeEvent::GameOver);
        log::info!("Game over with score {}", state.score);
    } else {
        log::debug!("Caught by {}, {} lives left", state.rivals[index].name, state.lives);
        state.reset_positions();
    }
}

/// Apply an expired deferred effect
pub fn apply_effect(state: &mut MazeState, effect: MazeEffect) {
    match effect {
        MazeEffect::EndVulnerability => {
            for rival in &mut state.rivals {
                rival.recover();
            }
        }
        MazeEffect::ModeSwitch(mode) => {
            state.base_mode = mode;
            for rival in &mut state.rivals {
                rival.set_base_mode(mode);
            }
            let (next, after) = match mode {
                RivalMode::Chase => (RivalMode::Scatter, state.tuning.chase_ticks),
                _ => (RivalMode::Chase, state.tuning.scatter_ticks),
            };
            state
                .timeline
                .schedule(state.time_ticks + after, MazeEffect::ModeSwitch(next));
        }
    }
}
