//! Game phase flag and its transitions

use serde::{Deserialize, Serialize};

/// Current phase of a game instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Created, waiting for start input
    #[default]
    NotStarted,
    /// Active gameplay
    Running,
    /// Game is paused
    Paused,
    /// Run ended (lives exhausted or board locked)
    Over,
    /// Goal reached
    Won,
}

impl GamePhase {
    /// Only a running game advances its simulation
    pub fn is_running(self) -> bool {
        self == GamePhase::Running
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, GamePhase::Over | GamePhase::Won)
    }

    /// NotStarted -> Running
    pub fn start(self) -> Self {
        match self {
            GamePhase::NotStarted => GamePhase::Running,
            other => other,
        }
    }

    /// Running <-> Paused; other phases ignore the toggle
    pub fn toggle_pause(self) -> Self {
        match self {
            GamePhase::Running => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Running,
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_transitions() {
        assert_eq!(GamePhase::NotStarted.start(), GamePhase::Running);
        assert_eq!(GamePhase::Paused.start(), GamePhase::Paused);
        assert_eq!(GamePhase::Running.toggle_pause(), GamePhase::Paused);
        assert_eq!(GamePhase::Paused.toggle_pause(), GamePhase::Running);
        assert_eq!(GamePhase::Over.toggle_pause(), GamePhase::Over);
        assert_eq!(GamePhase::NotStarted.toggle_pause(), GamePhase::NotStarted);
    }

    #[test]
    fn test_terminal_phases() {
        assert!(GamePhase::Over.is_terminal());
        assert!(GamePhase::Won.is_terminal());
        assert!(!GamePhase::Paused.is_terminal());
    }
}
