//! Native platform glue

use std::time::{SystemTime, UNIX_EPOCH};

use crate::persistence::FileStore;
use crate::settings::Settings;

/// Milliseconds since the epoch; 0 if the clock is before it
pub fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// High score file named by the settings
pub fn score_store(settings: &Settings) -> FileStore {
    FileStore::open_or_empty(&settings.score_file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::{GameId, HighScores};

    #[test]
    fn test_configured_seed_wins() {
        let settings = Settings {
            seed: Some(12345),
            ..Settings::default()
        };
        assert_eq!(crate::platform::seed(&settings), 12345);
        assert!(clock_seed() > 0);
    }

    #[test]
    fn test_score_store_from_settings() {
        let dir = tempfile::TempDir::new().unwrap();
        let settings = Settings {
            score_file: dir.path().join("scores.json"),
            ..Settings::default()
        };
        let mut scores = HighScores::new(score_store(&settings));
        scores.record(GameId::FallingShape, 40).unwrap();

        let scores = HighScores::new(score_store(&settings));
        assert_eq!(scores.best(GameId::FallingShape), 40);
    }
}
