//! Difficulty profiles: Easy, Medium, Hard

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Available difficulty profiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn name(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    /// Gravity interval the game starts with at level 1
    pub fn initial_drop_interval(&self) -> Duration {
        match self {
            Difficulty::Easy => Duration::from_millis(1500),
            Difficulty::Medium => Duration::from_millis(1000),
            Difficulty::Hard => Duration::from_millis(800),
        }
    }

    pub fn all() -> &'static [Difficulty] {
        &[Difficulty::Easy, Difficulty::Medium, Difficulty::Hard]
    }
}
