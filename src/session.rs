//! One playable game screen: driver, key bindings and high score

use crate::driver::{Simulation, TickDriver};
use crate::games::{ArenaGame, FallingGame, MazeGame, MergeGame};
use crate::highscores::{GameId, HighScores};
use crate::input::{KeyBindings, KeyState};
use crate::persistence::KeyValueStore;
use crate::render::{DrawCommand, Drawable};
use crate::settings::Settings;
use crate::sim::phase::GamePhase;

pub struct Session<S, K> {
    driver: TickDriver<S>,
    bindings: KeyBindings,
    scores: HighScores<K>,
    /// Best score as of the last write, read once at start
    best: u64,
    /// Set when this run beat the stored best; announced when the run ends
    new_best: bool,
}

impl<S: Simulation, K: KeyValueStore> Session<S, K> {
    pub fn new(driver: TickDriver<S>, scores: HighScores<K>) -> Self {
        let game = driver.sim().id();
        let best = scores.best(game);
        log::info!("{game} high score: {best}");
        Self {
            bindings: KeyBindings::for_game(game),
            driver,
            scores,
            best,
            new_best: false,
        }
    }

    pub fn with_bindings(mut self, bindings: KeyBindings) -> Self {
        self.bindings = bindings;
        self
    }

    /// Translate and route a raw key; returns whether the key is bound
    pub fn key(&mut self, key: &str, state: KeyState) -> bool {
        match self.bindings.translate(key, state) {
            Some(event) => {
                self.driver.handle_input(&event);
                true
            }
            None => false,
        }
    }

    /// Advance by a frame delta, then persist any new best
    pub fn frame(&mut self, dt: f32) -> u32 {
        let ticks = self.driver.advance(dt);
        if ticks > 0 {
            self.sync_high_score();
            if self.new_best && self.driver.phase().is_terminal() {
                self.new_best = false;
                log::info!("New {} high score: {}", self.driver.sim().id(), self.best);
            }
        }
        ticks
    }

    fn sync_high_score(&mut self) {
        let score = self.driver.sim().score();
        if score <= self.best {
            return;
        }
        let game = self.driver.sim().id();
        match self.scores.record(game, score) {
            Ok(_) => {
                self.best = score;
                self.new_best = true;
            }
            // Keep playing; try again on the next improvement
            Err(e) => log::warn!("Failed to save {game} high score: {e}"),
        }
    }

    pub fn best(&self) -> u64 {
        self.best
    }

    pub fn driver(&self) -> &TickDriver<S> {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut TickDriver<S> {
        &mut self.driver
    }

    pub fn scores(&self) -> &HighScores<K> {
        &self.scores
    }
}

/// Game-erased view of a session for front ends that pick the game at runtime
pub trait Screen {
    fn game(&self) -> GameId;

    fn key(&mut self, key: &str, state: KeyState) -> bool;

    fn frame(&mut self, dt: f32) -> u32;

    fn draw(&self) -> Vec<DrawCommand>;

    fn phase(&self) -> GamePhase;

    fn score(&self) -> u64;

    fn best(&self) -> u64;

    fn start(&mut self);

    fn restart(&mut self);

    fn set_autopilot(&mut self, on: bool);

    /// Snapshot as JSON for external renderers
    fn snapshot_json(&self) -> serde_json::Result<String>;
}

impl<S, K> Screen for Session<S, K>
where
    S: Simulation,
    S::Snapshot: Drawable,
    K: KeyValueStore,
{
    fn game(&self) -> GameId {
        self.driver.sim().id()
    }

    fn key(&mut self, key: &str, state: KeyState) -> bool {
        Session::key(self, key, state)
    }

    fn frame(&mut self, dt: f32) -> u32 {
        Session::frame(self, dt)
    }

    fn draw(&self) -> Vec<DrawCommand> {
        self.driver.snapshot().draw()
    }

    fn phase(&self) -> GamePhase {
        self.driver.phase()
    }

    fn score(&self) -> u64 {
        self.driver.sim().score()
    }

    fn best(&self) -> u64 {
        self.best
    }

    fn start(&mut self) {
        self.driver.start();
    }

    fn restart(&mut self) {
        self.driver.restart();
    }

    fn set_autopilot(&mut self, on: bool) {
        self.driver.sim_mut().set_autopilot(on);
    }

    fn snapshot_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.driver.snapshot())
    }
}

/// Build a session for `game` backed by `store`
pub fn open_screen<K>(game: GameId, settings: &Settings, store: K, seed: u64) -> Box<dyn Screen>
where
    K: KeyValueStore + 'static,
{
    let scores = HighScores::new(store);
    match game {
        GameId::Maze => {
            let sim = MazeGame::with_tuning(settings.maze.clone(), seed);
            Box::new(Session::new(TickDriver::with_settings(sim, settings), scores))
        }
        GameId::FallingShape => {
            let sim = FallingGame::new(seed);
            Box::new(Session::new(TickDriver::with_settings(sim, settings), scores))
        }
        GameId::Merge => {
            let sim = MergeGame::new(seed);
            Box::new(Session::new(TickDriver::with_settings(sim, settings), scores))
        }
        GameId::BombArena => {
            let sim = ArenaGame::new(seed);
            Box::new(Session::new(TickDriver::with_settings(sim, settings), scores))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::input::Seat;
    use crate::persistence::MemoryStore;
    use crate::sim::merge::MergeState;

    fn maze_session(store: MemoryStore) -> Session<MazeGame, MemoryStore> {
        Session::new(TickDriver::new(MazeGame::new(11)), HighScores::new(store))
    }

    #[test]
    fn test_keys_drive_the_game() {
        let mut session = maze_session(MemoryStore::new());
        assert!(session.key("Enter", KeyState::Down));
        assert_eq!(session.driver().phase(), GamePhase::Running);
        assert!(session.key("p", KeyState::Down));
        assert_eq!(session.driver().phase(), GamePhase::Paused);
        assert!(!session.key("F12", KeyState::Down));
    }

    #[test]
    fn test_new_best_written_while_playing() {
        let mut store = MemoryStore::new();
        store.set(GameId::Maze.storage_key(), "20").unwrap();
        let mut session = maze_session(store);
        assert_eq!(session.best(), 20);

        session.key("Enter", KeyState::Down);
        session.key("ArrowLeft", KeyState::Down);
        for _ in 0..60 {
            session.frame(SIM_DT * 1.01);
        }

        let score = session.driver().sim().score();
        assert!(score > 20);
        assert_eq!(session.best(), score);
        assert_eq!(session.scores().best(GameId::Maze), score);
    }

    #[test]
    fn test_key_released_while_paused_stops_bomber() {
        let mut session = Session::new(
            TickDriver::new(ArenaGame::new(5)),
            HighScores::new(MemoryStore::new()),
        );
        session.key("Tab", KeyState::Down);
        session.key("d", KeyState::Down);
        session.frame(SIM_DT * 1.01);
        let moved = session.driver().sim().state.bomber(Seat::One).pos;
        assert!(moved.x > 1.0);

        session.key("p", KeyState::Down);
        session.key("d", KeyState::Up);
        session.key("p", KeyState::Down);
        assert_eq!(session.driver().phase(), GamePhase::Running);
        for _ in 0..30 {
            session.frame(SIM_DT * 1.01);
        }
        assert_eq!(session.driver().sim().state.bomber(Seat::One).pos, moved);
    }

    #[test]
    fn test_new_best_settles_when_the_run_ends() {
        let mut session = Session::new(
            TickDriver::new(MergeGame::new(3)),
            HighScores::new(MemoryStore::new()),
        );
        let tiles = [[1024, 1024, 4, 8], [4, 2, 4, 16], [2, 4, 2, 4], [4, 2, 4, 2]];
        session.driver_mut().sim_mut().state = MergeState::with_tiles(tiles, 3);
        session.key("Enter", KeyState::Down);
        session.key("ArrowLeft", KeyState::Down);
        session.frame(SIM_DT * 1.01);

        assert_eq!(session.driver().phase(), GamePhase::Won);
        assert_eq!(session.best(), 2048);
        assert_eq!(session.scores().best(GameId::Merge), 2048);
        assert!(!session.new_best);
    }

    #[test]
    fn test_open_every_screen() {
        for game in GameId::ALL {
            let mut screen = open_screen(game, &Settings::default(), MemoryStore::new(), 21);
            assert_eq!(screen.game(), game);
            assert_eq!(screen.phase(), GamePhase::NotStarted);
            assert!(!screen.draw().is_empty());

            screen.set_autopilot(true);
            screen.start();
            assert_eq!(screen.phase(), GamePhase::Running);
            for _ in 0..120 {
                screen.frame(SIM_DT * 1.01);
            }
            assert!(screen.best() >= screen.score() || screen.phase().is_terminal());
            assert!(screen.snapshot_json().unwrap().contains("phase"));
        }
    }

    #[test]
    fn test_lower_score_keeps_stored_best() {
        let mut store = MemoryStore::new();
        store.set(GameId::Maze.storage_key(), "100000").unwrap();
        let mut session = maze_session(store);
        session.key("Enter", KeyState::Down);
        for _ in 0..30 {
            session.frame(SIM_DT * 1.01);
        }
        assert_eq!(session.scores().best(GameId::Maze), 100_000);
    }
}
