use std::time::{SystemTime, UNIX_EPOCH};

use bevy_ecs::prelude::*;

pub const MS_PER_MINUTE: u64 = 60_000;

/// Global resource holding the instant the current schedule run observes.
/// The host sets it before every run; nothing in the game reads the wall clock itself.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameClock {
    pub now_ms: u64,
}

impl GameClock {
    pub fn at(now_ms: u64) -> Self {
        Self { now_ms }
    }

    /// Moves the clock forward; it never runs backwards.
    pub fn advance_to(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
    }

    pub fn wall_clock_ms() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as u64)
            .unwrap_or(0)
    }
}

pub fn minutes_to_ms(minutes: u32) -> u64 {
    minutes as u64 * MS_PER_MINUTE
}
