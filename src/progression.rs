//! Score, lives, stage and boss bookkeeping, and the state carried across a
//! scene restart.

use crate::entities::{TURRET_COUNT, WeaponType};
use crate::scene::RunSetup;

pub const STARTING_LIVES: u32 = 3;

/// Everything a restarted scene inherits from the one before it
#[derive(Debug, Clone, PartialEq)]
pub struct Carryover {
    pub setup: RunSetup,
    pub stage: u32,
    pub score: u32,
    pub lives: u32,
}

impl Carryover {
    /// A brand-new run
    pub fn fresh(setup: RunSetup) -> Self {
        Self {
            setup,
            stage: 1,
            score: 0,
            lives: STARTING_LIVES,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Progression {
    pub player_name: String,
    pub stage: u32,
    pub score: u32,
    pub lives: u32,
    pub boss_parts_alive: u32,
}

impl Progression {
    pub fn new(carry: &Carryover) -> Self {
        Self {
            player_name: carry.setup.player_name.clone(),
            stage: carry.stage,
            score: carry.score,
            lives: carry.lives,
            boss_parts_alive: TURRET_COUNT as u32,
        }
    }

    pub fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    /// Returns the lives left
    pub fn lose_life(&mut self) -> u32 {
        self.lives = self.lives.saturating_sub(1);
        self.lives
    }

    /// Returns the boss parts still standing
    pub fn destroy_boss_part(&mut self) -> u32 {
        self.boss_parts_alive = self.boss_parts_alive.saturating_sub(1);
        self.boss_parts_alive
    }

    /// State for the next stage: same soldier, same gun, score and lives kept
    pub fn next_stage(&self, weapon: WeaponType) -> Carryover {
        Carryover {
            setup: RunSetup {
                player_name: self.player_name.clone(),
                weapon_type: weapon,
            },
            stage: self.stage + 1,
            score: self.score,
            lives: self.lives,
        }
    }

    /// State after a game over: only the name survives
    pub fn game_over(&self) -> Carryover {
        Carryover::fresh(RunSetup::new(&self.player_name, WeaponType::Normal))
    }
}
