use std::collections::VecDeque;

use bevy_ecs::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const WORK_MINUTES: (u32, u32) = (2, 10);
pub const WORK_REWARD_PER_MINUTE: i64 = 20;
pub const MAX_SHIFT_MINUTES: u32 = 8 * 60;

pub const PRISON_SEVERITY: u32 = 10;
pub const UNLAWFUL_KILL_SEVERITY: u32 = 25;

pub const HUSTLE_SUCCESS: f64 = 0.5;
pub const HUSTLE_REWARD_STEPS: (u32, u32) = (2, 5);
pub const HUSTLE_REWARD_PER_STEP: i64 = 100;
pub const HUSTLE_POLICE_SHARE: f64 = 0.5;

pub const KILL_SUCCESS: f64 = 0.6;
pub const KILL_COST_FLOOR: f64 = 100.0;
pub const KILL_ATTEMPT_BOUNTY_SHARE: f64 = 0.25;

pub const BREAKOUT_SUCCESS: f64 = 0.65;
pub const BREAKOUT_REWARD_STEPS: (u32, u32) = (2, 5);
pub const BREAKOUT_REWARD_PER_STEP: i64 = 50;
pub const BREAKOUT_INMATE_BOUNTY_SHARE: f64 = 0.5;

pub const BRIBE_LEVERAGE: f64 = 4.2;

/// Source of randomness for every gamble. Seeded, so runs are reproducible.
#[derive(Resource, Debug)]
pub struct Dice {
    rng: StdRng,
    scripted: VecDeque<f64>,
}

impl Dice {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            scripted: VecDeque::new(),
        }
    }

    /// Queues fixed values in `[0, 1)` that the next probability rolls return.
    pub fn scripted(seed: u64, rolls: impl IntoIterator<Item = f64>) -> Self {
        let mut dice = Self::new(seed);
        dice.scripted.extend(rolls);
        dice
    }

    /// True with probability `probability`.
    pub fn chance(&mut self, probability: f64) -> bool {
        let roll = match self.scripted.pop_front() {
            Some(roll) => roll,
            None => self.rng.random::<f64>(),
        };
        roll < probability
    }

    /// Uniform draw from the inclusive range.
    pub fn between(&mut self, min: u32, max: u32) -> u32 {
        if max <= min {
            return min;
        }
        self.rng.random_range(min..=max)
    }

    pub fn work_minutes(&mut self) -> u32 {
        self.between(WORK_MINUTES.0, WORK_MINUTES.1)
    }

    /// Sentence length; unlawful killings scale the severity.
    pub fn prison_minutes(&mut self, unlawful_kill: bool) -> u32 {
        let severity = if unlawful_kill {
            UNLAWFUL_KILL_SEVERITY
        } else {
            PRISON_SEVERITY
        };
        self.between(severity, severity * 2)
    }
}

pub fn work_reward(minutes: u32, multiplier: f64) -> i64 {
    (minutes as f64 * WORK_REWARD_PER_MINUTE as f64 * multiplier).round() as i64
}

pub fn hustle_reward(steps: u32, multiplier: f64) -> i64 {
    (steps as f64 * HUSTLE_REWARD_PER_STEP as f64 * multiplier).round() as i64
}

/// Flat victim-wealth formula with a floor, so poor targets are never cheap.
pub fn kill_cost(actor_score: i64, target_score: i64, fraction: f64) -> i64 {
    let cost = actor_score as f64 * fraction + target_score as f64 * fraction;
    cost.max(KILL_COST_FLOOR).round() as i64
}

pub fn bribe_success_chance(amount: i64, total_funds: i64) -> f64 {
    if total_funds <= 0 || amount <= 0 {
        return 0.0;
    }
    (amount as f64 / total_funds as f64 * BRIBE_LEVERAGE).min(1.0)
}
