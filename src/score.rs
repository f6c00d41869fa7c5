//! Scoring, leveling and the gravity speed curve

use std::time::Duration;

/// Lines needed for each level-up
pub const LEVEL_UP_THRESHOLD: u32 = 15;
/// Drop interval multiplier applied on each level-up
pub const SPEED_INCREASE_FACTOR: f64 = 0.85;
/// Gravity never gets faster than this
pub const MIN_DROP_INTERVAL: Duration = Duration::from_millis(100);

/// Base points for clearing 1-4 rows in one lock
pub fn line_clear_points(rows: usize) -> u64 {
    match rows {
        1 => 40,
        2 => 100,
        3 => 300,
        4 => 1200,
        _ => 0,
    }
}

/// Score and level tracking
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreKeeper {
    /// Current score
    pub points: u64,
    /// Current level, starting at 1
    pub level: u32,
    /// Lines cleared towards the next level (always below the threshold)
    pub lines_toward_level: u32,
    /// Total lines cleared this game
    pub total_lines: u32,
    drop_interval: Duration,
}

impl ScoreKeeper {
    pub fn new(initial_drop_interval: Duration) -> Self {
        Self {
            points: 0,
            level: 1,
            lines_toward_level: 0,
            total_lines: 0,
            drop_interval: initial_drop_interval.max(MIN_DROP_INTERVAL),
        }
    }

    /// Time between automatic one-row drops at the current level
    pub fn drop_interval(&self) -> Duration {
        self.drop_interval
    }

    /// Account for `rows` cleared by one lock. Returns the number of
    /// levels gained.
    pub fn record_clear(&mut self, rows: usize) -> u32 {
        if rows == 0 {
            return 0;
        }

        self.points += line_clear_points(rows) * self.level as u64;
        self.lines_toward_level += rows as u32;
        self.total_lines += rows as u32;

        let mut gained = 0;
        while self.lines_toward_level >= LEVEL_UP_THRESHOLD {
            self.level += 1;
            self.lines_toward_level -= LEVEL_UP_THRESHOLD;
            self.drop_interval = self
                .drop_interval
                .mul_f64(SPEED_INCREASE_FACTOR)
                .max(MIN_DROP_INTERVAL);
            gained += 1;
        }
        gained
    }
}
