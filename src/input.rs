//! Key bindings and normalized input intents
//!
//! Platform layers hand over raw key names (as `KeyboardEvent.key` reports
//! them) and get back seat-tagged intents. Games never see key names.

use serde::{Deserialize, Serialize};

use crate::highscores::GameId;
use crate::sim::direction::Direction;

/// Player seat; single-player games only use `One`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Seat {
    #[default]
    One,
    Two,
}

impl Seat {
    pub const ALL: [Seat; 2] = [Seat::One, Seat::Two];

    pub fn index(self) -> usize {
        match self {
            Seat::One => 0,
            Seat::Two => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Start,
    Pause,
    Rotate,
    HardDrop,
    PlaceDevice,
    Restart,
}

impl Action {
    /// Phase controls still apply while the game is not running
    pub fn is_control(self) -> bool {
        matches!(self, Action::Start | Action::Pause | Action::Restart)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    Move(Direction),
    Action(Action),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyState {
    Down,
    Up,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputEvent {
    pub seat: Seat,
    pub intent: Intent,
    pub state: KeyState,
}

impl InputEvent {
    pub fn down(seat: Seat, intent: Intent) -> Self {
        Self {
            seat,
            intent,
            state: KeyState::Down,
        }
    }

    pub fn up(seat: Seat, intent: Intent) -> Self {
        Self {
            seat,
            intent,
            state: KeyState::Up,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    pub key: String,
    pub seat: Seat,
    pub intent: Intent,
}

/// Key name -> intent table for one game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBindings {
    bindings: Vec<Binding>,
}

/// Single characters compare case-insensitively ("P" and "p" are one key)
fn normalize(key: &str) -> String {
    if key.chars().count() == 1 {
        key.to_lowercase()
    } else {
        key.to_string()
    }
}

const ARROWS: [(&str, Direction); 4] = [
    ("ArrowUp", Direction::Up),
    ("ArrowDown", Direction::Down),
    ("ArrowLeft", Direction::Left),
    ("ArrowRight", Direction::Right),
];

impl KeyBindings {
    pub fn new(bindings: Vec<Binding>) -> Self {
        let bindings = bindings
            .into_iter()
            .map(|b| Binding {
                key: normalize(&b.key),
                ..b
            })
            .collect();
        Self { bindings }
    }

    /// Default layout for a game
    pub fn for_game(game: GameId) -> Self {
        let mut b = Vec::new();
        let mut bind = |key: &str, seat: Seat, intent: Intent| {
            b.push(Binding {
                key: key.to_string(),
                seat,
                intent,
            })
        };
        let one = Seat::One;

        match game {
            GameId::Maze | GameId::Merge => {
                for (key, dir) in ARROWS {
                    bind(key, one, Intent::Move(dir));
                }
                bind("p", one, Intent::Action(Action::Pause));
                bind("Enter", one, Intent::Action(Action::Start));
                bind("r", one, Intent::Action(Action::Restart));
            }
            GameId::FallingShape => {
                bind("ArrowLeft", one, Intent::Move(Direction::Left));
                bind("ArrowRight", one, Intent::Move(Direction::Right));
                bind("ArrowDown", one, Intent::Move(Direction::Down));
                bind("ArrowUp", one, Intent::Action(Action::Rotate));
                bind(" ", one, Intent::Action(Action::HardDrop));
                bind("p", one, Intent::Action(Action::Pause));
                bind("Enter", one, Intent::Action(Action::Start));
                bind("r", one, Intent::Action(Action::Restart));
            }
            GameId::BombArena => {
                let wasd = [
                    ("w", Direction::Up),
                    ("s", Direction::Down),
                    ("a", Direction::Left),
                    ("d", Direction::Right),
                ];
                for (key, dir) in wasd {
                    bind(key, one, Intent::Move(dir));
                }
                bind(" ", one, Intent::Action(Action::PlaceDevice));
                for (key, dir) in ARROWS {
                    bind(key, Seat::Two, Intent::Move(dir));
                }
                bind("Enter", Seat::Two, Intent::Action(Action::PlaceDevice));
                // Enter belongs to seat two here
                bind("Tab", one, Intent::Action(Action::Start));
                bind("p", one, Intent::Action(Action::Pause));
                bind("r", one, Intent::Action(Action::Restart));
            }
        }
        Self::new(b)
    }

    pub fn translate(&self, key: &str, state: KeyState) -> Option<InputEvent> {
        let key = normalize(key);
        self.bindings
            .iter()
            .find(|b| b.key == key)
            .map(|b| InputEvent {
                seat: b.seat,
                intent: b.intent,
                state,
            })
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maze_arrows_and_pause() {
        let keys = KeyBindings::for_game(GameId::Maze);
        assert_eq!(
            keys.translate("ArrowLeft", KeyState::Down),
            Some(InputEvent::down(Seat::One, Intent::Move(Direction::Left)))
        );
        assert_eq!(
            keys.translate("P", KeyState::Down),
            Some(InputEvent::down(Seat::One, Intent::Action(Action::Pause)))
        );
        assert_eq!(keys.translate("x", KeyState::Down), None);
    }

    #[test]
    fn test_falling_shape_layout() {
        let keys = KeyBindings::for_game(GameId::FallingShape);
        let intent = |k| keys.translate(k, KeyState::Down).map(|e| e.intent);
        assert_eq!(intent("ArrowUp"), Some(Intent::Action(Action::Rotate)));
        assert_eq!(intent(" "), Some(Intent::Action(Action::HardDrop)));
        assert_eq!(intent("ArrowDown"), Some(Intent::Move(Direction::Down)));
    }

    #[test]
    fn test_bomb_arena_two_seats() {
        let keys = KeyBindings::for_game(GameId::BombArena);
        assert_eq!(
            keys.translate("W", KeyState::Up),
            Some(InputEvent::up(Seat::One, Intent::Move(Direction::Up)))
        );
        assert_eq!(
            keys.translate("ArrowUp", KeyState::Down),
            Some(InputEvent::down(Seat::Two, Intent::Move(Direction::Up)))
        );
        assert_eq!(
            keys.translate(" ", KeyState::Down).map(|e| (e.seat, e.intent)),
            Some((Seat::One, Intent::Action(Action::PlaceDevice)))
        );
        assert_eq!(
            keys.translate("Enter", KeyState::Down).map(|e| (e.seat, e.intent)),
            Some((Seat::Two, Intent::Action(Action::PlaceDevice)))
        );
    }

    #[test]
    fn test_control_actions() {
        assert!(Action::Pause.is_control());
        assert!(Action::Restart.is_control());
        assert!(!Action::Rotate.is_control());
        assert!(!Action::PlaceDevice.is_control());
    }
}
