//! Settings persistence using TOML
//!
//! Stores settings in ~/.config/stackfall/settings.toml (or platform equivalent)

use crate::difficulty::Difficulty;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::warn;

/// Game settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Keybindings
    pub keys: KeyBindings,
    /// Gameplay settings
    pub gameplay: GameplaySettings,
    /// Audio settings
    pub audio: AudioSettings,
    /// Best score ever reached
    pub high_score: HighScore,
}

/// Key bindings (stored as strings for easy editing)
/// Each action can have one or more keys bound to it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    #[serde(with = "one_or_many")]
    pub move_left: Vec<String>,
    #[serde(with = "one_or_many")]
    pub move_right: Vec<String>,
    #[serde(with = "one_or_many")]
    pub soft_drop: Vec<String>,
    #[serde(with = "one_or_many")]
    pub hard_drop: Vec<String>,
    #[serde(with = "one_or_many")]
    pub rotate_cw: Vec<String>,
    #[serde(with = "one_or_many")]
    pub rotate_ccw: Vec<String>,
    #[serde(with = "one_or_many")]
    pub pause: Vec<String>,
    #[serde(with = "one_or_many")]
    pub restart: Vec<String>,
    #[serde(with = "one_or_many")]
    pub mute: Vec<String>,
    #[serde(with = "one_or_many")]
    pub quit: Vec<String>,
}

/// A key list written as either `"x"` or `["x", "Up"]`
mod one_or_many {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Keys {
        One(String),
        Many(Vec<String>),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Keys::deserialize(deserializer)? {
            Keys::One(key) => vec![key],
            Keys::Many(keys) => keys,
        })
    }

    pub fn serialize<S>(keys: &[String], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match keys {
            [key] => key.serialize(serializer),
            _ => keys.serialize(serializer),
        }
    }
}

/// Gameplay settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameplaySettings {
    /// Difficulty used for new games
    pub difficulty: Difficulty,
}

/// Audio settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// BGM volume (0-100)
    pub bgm_volume: u32,
    /// SFX volume (0-100)
    pub sfx_volume: u32,
    /// Silence everything
    pub muted: bool,
}

/// The single best score
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HighScore {
    pub best: u64,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            move_left: vec!["Left".to_string()],
            move_right: vec!["Right".to_string()],
            soft_drop: vec!["Down".to_string()],
            hard_drop: vec!["Space".to_string()],
            rotate_cw: vec!["w".to_string(), "Up".to_string()],
            rotate_ccw: vec!["q".to_string()],
            pause: vec!["p".to_string()],
            restart: vec!["r".to_string()],
            mute: vec!["m".to_string()],
            quit: vec!["Esc".to_string()],
        }
    }
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            bgm_volume: 50,
            sfx_volume: 100,
            muted: false,
        }
    }
}

impl Settings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("com", "stackfall", "stackfall").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the settings file path
    fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("settings.toml"))
    }

    /// Load settings from file, or fall back to defaults
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            return Self::default();
        };

        match fs::read_to_string(&path) {
            Ok(contents) => Self::parse(&contents).unwrap_or_else(|e| {
                warn!("Ignoring malformed {}: {}", path.display(), e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Save settings to file
    pub fn save(&self) -> Result<(), String> {
        let Some(dir) = Self::config_dir() else {
            return Err("Could not determine config directory".to_string());
        };

        let Some(path) = Self::settings_path() else {
            return Err("Could not determine settings path".to_string());
        };

        fs::create_dir_all(&dir).map_err(|e| format!("Failed to create config dir: {}", e))?;

        let contents =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize: {}", e))?;

        fs::write(&path, contents).map_err(|e| format!("Failed to write settings: {}", e))?;

        Ok(())
    }

    /// Keep the higher of `score` and the stored best. Returns true if the
    /// stored best changed.
    pub fn record_score(&mut self, score: u64) -> bool {
        if score > self.high_score.best {
            self.high_score.best = score;
            true
        } else {
            false
        }
    }
}
