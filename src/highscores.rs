//! High score tracking
//!
//! One best value per game, persisted through any [`KeyValueStore`].
//! Values are stored as plain decimal strings under fixed keys.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ArcadeError;
use crate::persistence::{KeyValueStore, StoreError};

/// Games in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameId {
    Maze,
    FallingShape,
    Merge,
    BombArena,
}

impl GameId {
    pub const ALL: [GameId; 4] = [
        GameId::Maze,
        GameId::FallingShape,
        GameId::Merge,
        GameId::BombArena,
    ];

    /// Persisted key for this game's best score
    pub fn storage_key(self) -> &'static str {
        match self {
            GameId::Maze => "pacman-high-score",
            GameId::FallingShape => "tetris-high-score",
            GameId::Merge => "2048-best-score",
            GameId::BombArena => "bomberman-high-score",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            GameId::Maze => "maze",
            GameId::FallingShape => "falling-shape",
            GameId::Merge => "merge",
            GameId::BombArena => "bomb-arena",
        }
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GameId {
    type Err = ArcadeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "maze" | "pacman" => Ok(GameId::Maze),
            "falling-shape" | "tetris" => Ok(GameId::FallingShape),
            "merge" | "2048" => Ok(GameId::Merge),
            "bomb-arena" | "bomberman" => Ok(GameId::BombArena),
            _ => Err(ArcadeError::UnknownGame(s.to_string())),
        }
    }
}

/// Best scores backed by a store
#[derive(Debug)]
pub struct HighScores<S> {
    store: S,
}

impl<S: KeyValueStore> HighScores<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Stored best for a game; missing, unreadable or malformed reads as 0
    pub fn best(&self, game: GameId) -> u64 {
        let key = game.storage_key();
        match self.store.get(key) {
            Ok(Some(raw)) => raw.trim().parse().unwrap_or_else(|_| {
                log::warn!("Malformed high score {raw:?} under {key}, using 0");
                0
            }),
            Ok(None) => 0,
            Err(e) => {
                log::warn!("Failed to read {key}: {e}");
                0
            }
        }
    }

    /// Persist `score` if it beats the stored best.
    ///
    /// Returns whether a new best was written.
    pub fn record(&mut self, game: GameId, score: u64) -> Result<bool, StoreError> {
        if score <= self.best(game) {
            return Ok(false);
        }
        self.store.set(game.storage_key(), &score.to_string())?;
        log::debug!("Saved {game} high score: {score}");
        Ok(true)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_missing_reads_zero() {
        let scores = HighScores::new(MemoryStore::new());
        for game in GameId::ALL {
            assert_eq!(scores.best(game), 0);
        }
    }

    #[test]
    fn test_malformed_reads_zero() {
        let mut store = MemoryStore::new();
        store.set("pacman-high-score", "lots").unwrap();
        store.set("tetris-high-score", "-5").unwrap();
        store.set("2048-best-score", " 512 ").unwrap();
        let scores = HighScores::new(store);
        assert_eq!(scores.best(GameId::Maze), 0);
        assert_eq!(scores.best(GameId::FallingShape), 0);
        assert_eq!(scores.best(GameId::Merge), 512);
    }

    #[test]
    fn test_record_only_improvements() {
        let mut scores = HighScores::new(MemoryStore::new());
        assert!(scores.record(GameId::Merge, 300).unwrap());
        assert!(!scores.record(GameId::Merge, 300).unwrap());
        assert!(!scores.record(GameId::Merge, 120).unwrap());
        assert!(scores.record(GameId::Merge, 301).unwrap());
        assert_eq!(scores.best(GameId::Merge), 301);
        assert_eq!(
            scores.store().get("2048-best-score").unwrap().as_deref(),
            Some("301")
        );
    }

    #[test]
    fn test_malformed_value_is_overwritten() {
        let mut store = MemoryStore::new();
        store.set("bomberman-high-score", "{}").unwrap();
        let mut scores = HighScores::new(store);
        assert!(scores.record(GameId::BombArena, 10).unwrap());
        assert_eq!(scores.best(GameId::BombArena), 10);
    }

    #[test]
    fn test_game_names_parse() {
        for game in GameId::ALL {
            assert_eq!(game.name().parse::<GameId>().unwrap(), game);
        }
        assert_eq!("Tetris".parse::<GameId>().unwrap(), GameId::FallingShape);
        assert!(matches!(
            "pong".parse::<GameId>(),
            Err(ArcadeError::UnknownGame(name)) if name == "pong"
        ));
    }
}
