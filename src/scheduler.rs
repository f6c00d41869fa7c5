//! Tick scheduling handle
//!
//! The host owns the actual periodic timer and forwards every firing to
//! [`crate::game::Game::tick`]. This handle decides whether a firing counts
//! and how much time it represents.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Default)]
pub struct TickScheduler {
    armed: bool,
    /// Instant of the previous counted tick; None right after arming
    last_tick: Option<Instant>,
}

impl TickScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the schedule. The first tick afterwards only sets the baseline.
    pub fn start(&mut self) {
        self.armed = true;
        self.last_tick = None;
    }

    /// Cancel the schedule and forget the baseline
    pub fn stop(&mut self) {
        self.armed = false;
        self.last_tick = None;
    }

    /// Register a tick at `now`. Returns the time elapsed since the previous
    /// tick, or None when the schedule is not armed.
    pub fn on_tick(&mut self, now: Instant) -> Option<Duration> {
        if !self.armed {
            return None;
        }
        let delta = self
            .last_tick
            .map_or(Duration::ZERO, |last| now.saturating_duration_since(last));
        self.last_tick = Some(now);
        Some(delta)
    }
}
