use rand::Rng;

use super::enemy::{Enemy, EnemyType};
use super::pickup::{PowerUp, PowerUpKind};

/// Enemies appear this far right of the camera's left edge, just off screen
const SPAWN_OFFSET_X: f32 = 850.0;
const SPAWN_Y: f32 = 500.0;
/// Chance that a new enemy is a sniper
const SNIPER_CHANCE: f64 = 0.2;

pub const BASE_SPAWN_DELAY_MS: u64 = 2000;
const MIN_SPAWN_DELAY_MS: u64 = 750;
const SPAWN_DELAY_STEP_MS: u64 = 250;

const POWER_UP_INTERVAL_MS: u64 = 10_000;
const POWER_UP_CHANCE: f64 = 0.5;
const POWER_UP_Y: f32 = 100.0;

/// Delay between enemy spawns on a given stage
pub fn spawn_delay_for_stage(stage: u32) -> u64 {
    let step = SPAWN_DELAY_STEP_MS * stage.saturating_sub(1) as u64;
    BASE_SPAWN_DELAY_MS
        .saturating_sub(step)
        .max(MIN_SPAWN_DELAY_MS)
}

/// Periodically drops a new enemy in from the right edge of the view
#[derive(Debug, Clone)]
pub struct EnemySpawner {
    pub next_spawn_at: u64,
    pub spawn_delay: u64,
}

impl Default for EnemySpawner {
    fn default() -> Self {
        Self::new()
    }
}

impl EnemySpawner {
    pub fn new() -> Self {
        Self {
            next_spawn_at: 0,
            spawn_delay: BASE_SPAWN_DELAY_MS,
        }
    }

    pub fn set_difficulty(&mut self, delay: u64) {
        self.spawn_delay = delay;
    }

    pub fn update<R: Rng>(&mut self, rng: &mut R, now: u64, camera_x: f32) -> Option<Enemy> {
        if now < self.next_spawn_at {
            return None;
        }
        self.next_spawn_at = now + self.spawn_delay;
        Some(self.spawn_enemy(rng, now, camera_x))
    }

    fn spawn_enemy<R: Rng>(&self, rng: &mut R, now: u64, camera_x: f32) -> Enemy {
        let enemy_type = if rng.random_bool(SNIPER_CHANCE) {
            EnemyType::Sniper
        } else {
            EnemyType::Soldier
        };
        Enemy::new(camera_x + SPAWN_OFFSET_X, SPAWN_Y, enemy_type, now)
    }
}

/// Every so often, maybe drops a random power-up into view
#[derive(Debug, Clone)]
pub struct PowerUpSpawner {
    pub next_roll_at: u64,
}

impl Default for PowerUpSpawner {
    fn default() -> Self {
        Self::new()
    }
}

impl PowerUpSpawner {
    pub fn new() -> Self {
        Self {
            next_roll_at: POWER_UP_INTERVAL_MS,
        }
    }

    pub fn update<R: Rng>(&mut self, rng: &mut R, now: u64, camera_x: f32) -> Option<PowerUp> {
        if now < self.next_roll_at {
            return None;
        }
        self.next_roll_at = now + POWER_UP_INTERVAL_MS;

        if !rng.random_bool(POWER_UP_CHANCE) {
            return None;
        }
        let x = camera_x + rng.random_range(200.0..600.0);
        Some(PowerUp::new(x, POWER_UP_Y, PowerUpKind::random(rng)))
    }
}
