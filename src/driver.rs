//! Fixed timestep tick driver
//!
//! Owns one game and advances it from wall-clock frame deltas. The phase
//! state machine lives here:
//!
//! ```text
//! NotStarted --start--> Running <--pause/resume--> Paused
//! Running --lives/collectibles exhausted--> Over | Won --restart--> NotStarted
//! ```
//!
//! A driver is registered while it may still tick. Reaching a terminal phase
//! or calling [`TickDriver::stop`] deregisters it; only a restart brings it
//! back.

use serde::Serialize;

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::highscores::GameId;
use crate::input::{Action, InputEvent, Intent, KeyState};
use crate::settings::Settings;
use crate::sim::phase::GamePhase;

/// A game the driver can advance
pub trait Simulation {
    type Snapshot: Clone + Serialize;

    fn id(&self) -> GameId;

    fn phase(&self) -> GamePhase;

    fn set_phase(&mut self, phase: GamePhase);

    /// Buffer a gameplay intent for the next tick
    fn handle(&mut self, event: &InputEvent);

    /// Run exactly one fixed tick
    fn step(&mut self);

    /// Value compared against the stored high score
    fn score(&self) -> u64;

    fn snapshot(&self) -> Self::Snapshot;

    /// Fresh game in `NotStarted`
    fn reset(&mut self);

    /// Idle/demo mode
    fn set_autopilot(&mut self, on: bool);

    /// Resume a won game. Games that end on a win return false.
    fn continue_after_win(&mut self) -> bool {
        false
    }
}

#[derive(Debug)]
pub struct TickDriver<S> {
    sim: S,
    sim_dt: f32,
    max_substeps: u32,
    max_frame_dt: f32,
    accumulator: f32,
    registered: bool,
}

impl<S: Simulation> TickDriver<S> {
    pub fn new(sim: S) -> Self {
        Self {
            sim,
            sim_dt: SIM_DT,
            max_substeps: MAX_SUBSTEPS,
            max_frame_dt: MAX_FRAME_DT,
            accumulator: 0.0,
            registered: true,
        }
    }

    pub fn with_settings(sim: S, settings: &Settings) -> Self {
        Self {
            sim_dt: settings.sim_dt(),
            max_substeps: settings.max_substeps,
            max_frame_dt: settings.max_frame_dt,
            ..Self::new(sim)
        }
    }

    /// Route one input event.
    ///
    /// Start, pause and restart always apply. Key releases always reach the
    /// game so held input never outlives the key. Presses reach it only
    /// while it is running.
    pub fn handle_input(&mut self, event: &InputEvent) {
        if let Intent::Action(action) = event.intent
            && action.is_control()
        {
            if event.state == KeyState::Down {
                match action {
                    Action::Start => self.start(),
                    Action::Pause => self.toggle_pause(),
                    Action::Restart => self.restart(),
                    _ => {}
                }
            }
            return;
        }

        if self.sim.phase().is_running() || event.state == KeyState::Up {
            self.sim.handle(event);
        } else {
            log::debug!("Discarding {:?} while {:?}", event.intent, self.sim.phase());
        }
    }

    /// Feed a frame delta; returns the number of ticks run
    pub fn advance(&mut self, dt: f32) -> u32 {
        if !self.registered {
            return 0;
        }
        if !self.sim.phase().is_running() {
            self.accumulator = 0.0;
            return 0;
        }

        self.accumulator += dt.clamp(0.0, self.max_frame_dt);

        let mut substeps = 0;
        while self.accumulator >= self.sim_dt && substeps < self.max_substeps {
            self.sim.step();
            self.accumulator -= self.sim_dt;
            substeps += 1;

            let phase = self.sim.phase();
            if phase.is_terminal() {
                log::info!("{} ended: {:?}, score {}", self.sim.id(), phase, self.sim.score());
                self.deregister();
                break;
            }
        }

        // Drop time we could not catch up on
        if substeps == self.max_substeps {
            self.accumulator = self.accumulator.min(self.sim_dt);
        }
        substeps
    }

    /// NotStarted -> Running. On a won game that can keep going, resume it.
    pub fn start(&mut self) {
        match self.sim.phase() {
            GamePhase::NotStarted => {
                self.sim.set_phase(GamePhase::Running);
                log::info!("{} started", self.sim.id());
            }
            GamePhase::Won if self.sim.continue_after_win() => {
                self.registered = true;
                log::info!("{} continuing after win", self.sim.id());
            }
            _ => {}
        }
    }

    pub fn pause(&mut self) {
        if self.sim.phase() == GamePhase::Running {
            self.sim.set_phase(GamePhase::Paused);
            log::info!("{} paused", self.sim.id());
        }
    }

    pub fn resume(&mut self) {
        if self.sim.phase() == GamePhase::Paused {
            self.sim.set_phase(GamePhase::Running);
            self.accumulator = 0.0;
            log::info!("{} resumed", self.sim.id());
        }
    }

    pub fn toggle_pause(&mut self) {
        match self.sim.phase() {
            GamePhase::Running => self.pause(),
            GamePhase::Paused => self.resume(),
            _ => {}
        }
    }

    /// Deregister; no ticks run until restart
    pub fn stop(&mut self) {
        if self.registered {
            log::info!("{} stopped", self.sim.id());
        }
        self.deregister();
    }

    /// Fresh game in NotStarted, registered again
    pub fn restart(&mut self) {
        self.sim.reset();
        self.accumulator = 0.0;
        self.registered = true;
        log::info!("{} restarted", self.sim.id());
    }

    fn deregister(&mut self) {
        self.registered = false;
        self.accumulator = 0.0;
    }

    pub fn is_registered(&self) -> bool {
        self.registered
    }

    pub fn phase(&self) -> GamePhase {
        self.sim.phase()
    }

    pub fn snapshot(&self) -> S::Snapshot {
        self.sim.snapshot()
    }

    pub fn sim(&self) -> &S {
        &self.sim
    }

    pub fn sim_mut(&mut self) -> &mut S {
        &mut self.sim
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Seat;
    use crate::sim::direction::Direction;

    /// Counts ticks; ends after `ends_after` of them
    #[derive(Debug, Default)]
    struct Counter {
        phase: GamePhase,
        ticks: u64,
        handled: Vec<Intent>,
        ends_after: Option<u64>,
        resets: u32,
    }

    impl Simulation for Counter {
        type Snapshot = u64;

        fn id(&self) -> GameId {
            GameId::Maze
        }

        fn phase(&self) -> GamePhase {
            self.phase
        }

        fn set_phase(&mut self, phase: GamePhase) {
            self.phase = phase;
        }

        fn handle(&mut self, event: &InputEvent) {
            self.handled.push(event.intent);
        }

        fn step(&mut self) {
            if !self.phase.is_running() {
                return;
            }
            self.ticks += 1;
            if self.ends_after == Some(self.ticks) {
                self.phase = GamePhase::Over;
            }
        }

        fn score(&self) -> u64 {
            self.ticks
        }

        fn snapshot(&self) -> u64 {
            self.ticks
        }

        fn reset(&mut self) {
            self.phase = GamePhase::NotStarted;
            self.ticks = 0;
            self.resets += 1;
        }

        fn set_autopilot(&mut self, _on: bool) {}
    }

    fn control(action: Action) -> InputEvent {
        InputEvent::down(Seat::One, Intent::Action(action))
    }

    fn running() -> TickDriver<Counter> {
        let mut driver = TickDriver::new(Counter::default());
        driver.start();
        driver
    }

    #[test]
    fn test_not_started_runs_nothing() {
        let mut driver = TickDriver::new(Counter::default());
        assert_eq!(driver.advance(0.05), 0);
        assert_eq!(driver.sim().ticks, 0);
    }

    #[test]
    fn test_fixed_steps_from_frame_time() {
        let mut driver = running();
        assert_eq!(driver.advance(SIM_DT * 3.5), 3);
        // Leftover half step carries into the next frame
        assert_eq!(driver.advance(SIM_DT * 0.6), 1);
        assert_eq!(driver.sim().ticks, 4);
    }

    #[test]
    fn test_substeps_capped() {
        let settings = Settings {
            max_frame_dt: 1.0,
            ..Settings::default()
        };
        let mut driver = TickDriver::with_settings(Counter::default(), &settings);
        driver.start();
        assert_eq!(driver.advance(1.0), 8);
        // The backlog is dropped, not replayed
        assert!(driver.advance(0.0) <= 1);
    }

    #[test]
    fn test_frame_delta_clamped() {
        // A long stall counts as 0.1 s
        let mut stalled = running();
        let mut normal = running();
        let ticks = stalled.advance(5.0);
        assert_eq!(ticks, normal.advance(MAX_FRAME_DT));
        assert!((5..=6).contains(&ticks));
    }

    #[test]
    fn test_pause_and_resume() {
        let mut driver = running();
        driver.handle_input(&control(Action::Pause));
        assert_eq!(driver.phase(), GamePhase::Paused);
        assert_eq!(driver.advance(0.05), 0);

        driver.handle_input(&control(Action::Pause));
        assert_eq!(driver.phase(), GamePhase::Running);
        assert_eq!(driver.advance(SIM_DT * 1.5), 1);
    }

    #[test]
    fn test_gameplay_discarded_unless_running() {
        let mut driver = TickDriver::new(Counter::default());
        let steer = InputEvent::down(Seat::One, Intent::Move(Direction::Left));
        driver.handle_input(&steer);
        assert!(driver.sim().handled.is_empty());

        driver.handle_input(&control(Action::Start));
        driver.handle_input(&steer);
        assert_eq!(driver.sim().handled, vec![Intent::Move(Direction::Left)]);

        // Key-up of a control does nothing
        driver.handle_input(&InputEvent::up(Seat::One, Intent::Action(Action::Pause)));
        assert_eq!(driver.phase(), GamePhase::Running);
    }

    #[test]
    fn test_key_release_reaches_paused_game() {
        let mut driver = TickDriver::new(Counter::default());
        driver.start();
        driver.pause();
        driver.handle_input(&InputEvent::down(Seat::One, Intent::Move(Direction::Up)));
        assert!(driver.sim().handled.is_empty());

        driver.handle_input(&InputEvent::up(Seat::One, Intent::Move(Direction::Right)));
        assert_eq!(driver.sim().handled, vec![Intent::Move(Direction::Right)]);
        assert_eq!(driver.phase(), GamePhase::Paused);
        assert_eq!(driver.advance(SIM_DT * 2.5), 0);
    }

    #[test]
    fn test_terminal_phase_deregisters() {
        let mut driver = TickDriver::new(Counter {
            ends_after: Some(2),
            ..Counter::default()
        });
        driver.start();
        assert_eq!(driver.advance(SIM_DT * 5.5), 2);
        assert_eq!(driver.phase(), GamePhase::Over);
        assert!(!driver.is_registered());
        assert_eq!(driver.advance(0.1), 0);

        driver.handle_input(&control(Action::Restart));
        assert!(driver.is_registered());
        assert_eq!(driver.phase(), GamePhase::NotStarted);
        assert_eq!(driver.sim().resets, 1);
    }

    #[test]
    fn test_stopped_driver_never_ticks() {
        let mut driver = running();
        driver.stop();
        assert!(!driver.is_registered());
        for _ in 0..10 {
            assert_eq!(driver.advance(0.1), 0);
        }
        assert_eq!(driver.sim().ticks, 0);
    }
}
