//! Keyboard input: maps key presses to game and host commands

use crate::difficulty::Difficulty;
use crate::game::Action;
use crate::settings::Settings;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What a key press asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Forward to the engine
    Game(Action),
    /// Start over with the current difficulty
    Restart,
    /// Start over with a specific difficulty
    SelectDifficulty(Difficulty),
    ToggleMute,
    Quit,
}

/// Key bindings configuration - supports multiple keys per action
#[derive(Debug, Clone)]
pub struct KeyBindings {
    pub move_left: Vec<KeyCode>,
    pub move_right: Vec<KeyCode>,
    pub soft_drop: Vec<KeyCode>,
    pub hard_drop: Vec<KeyCode>,
    pub rotate_cw: Vec<KeyCode>,
    pub rotate_ccw: Vec<KeyCode>,
    pub pause: Vec<KeyCode>,
    pub restart: Vec<KeyCode>,
    pub mute: Vec<KeyCode>,
    pub quit: Vec<KeyCode>,
}

impl KeyBindings {
    /// Parse a key name into a KeyCode
    fn parse_key(s: &str) -> Option<KeyCode> {
        let lower = s.to_lowercase();
        let code = match lower.as_str() {
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "space" => KeyCode::Char(' '),
            "enter" => KeyCode::Enter,
            "tab" => KeyCode::Tab,
            "esc" | "escape" => KeyCode::Esc,
            _ => {
                let mut chars = lower.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => KeyCode::Char(c),
                    _ => return None,
                }
            }
        };
        Some(code)
    }

    /// Parse a list of key names, skipping unknown ones
    fn parse_keys(keys: &[String]) -> Vec<KeyCode> {
        keys.iter().filter_map(|s| Self::parse_key(s)).collect()
    }

    /// Create keybindings from settings
    pub fn from_settings(settings: &Settings) -> Self {
        let keys = &settings.keys;
        Self {
            move_left: Self::parse_keys(&keys.move_left),
            move_right: Self::parse_keys(&keys.move_right),
            soft_drop: Self::parse_keys(&keys.soft_drop),
            hard_drop: Self::parse_keys(&keys.hard_drop),
            rotate_cw: Self::parse_keys(&keys.rotate_cw),
            rotate_ccw: Self::parse_keys(&keys.rotate_ccw),
            pause: Self::parse_keys(&keys.pause),
            restart: Self::parse_keys(&keys.restart),
            mute: Self::parse_keys(&keys.mute),
            quit: Self::parse_keys(&keys.quit),
        }
    }

    /// Translate a key press. Digits 1-3 pick a difficulty.
    pub fn command_for(&self, key: KeyEvent) -> Option<Command> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Command::Quit);
        }

        let code = normalize_key(key.code);
        let command = if self.move_left.contains(&code) {
            Command::Game(Action::MoveLeft)
        } else if self.move_right.contains(&code) {
            Command::Game(Action::MoveRight)
        } else if self.soft_drop.contains(&code) {
            Command::Game(Action::SoftDrop)
        } else if self.hard_drop.contains(&code) {
            Command::Game(Action::HardDrop)
        } else if self.rotate_cw.contains(&code) {
            Command::Game(Action::RotateCW)
        } else if self.rotate_ccw.contains(&code) {
            Command::Game(Action::RotateCCW)
        } else if self.pause.contains(&code) {
            Command::Game(Action::TogglePause)
        } else if self.restart.contains(&code) {
            Command::Restart
        } else if self.mute.contains(&code) {
            Command::ToggleMute
        } else if self.quit.contains(&code) {
            Command::Quit
        } else {
            match code {
                KeyCode::Char('1') => Command::SelectDifficulty(Difficulty::Easy),
                KeyCode::Char('2') => Command::SelectDifficulty(Difficulty::Medium),
                KeyCode::Char('3') => Command::SelectDifficulty(Difficulty::Hard),
                _ => return None,
            }
        };
        Some(command)
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// Normalize key codes for consistent handling
fn normalize_key(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}
