use rand::Rng;

use crate::collision::{Collider, Hitbox};
use crate::world::Body;

use super::weapon::WeaponType;

/// Extra gravity on falling power-ups
const POWER_UP_GRAVITY: f32 = 200.0;
/// Horizontal sway amplitude in px
const SWAY_AMPLITUDE: f32 = 50.0;
/// Sway period divisor, ms per radian
const SWAY_PERIOD: f32 = 500.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerUpKind {
    Spread,
    Laser,
    MachineGun,
    Rapid,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 4] = [
        PowerUpKind::Spread,
        PowerUpKind::Laser,
        PowerUpKind::MachineGun,
        PowerUpKind::Rapid,
    ];

    pub fn weapon(&self) -> WeaponType {
        match self {
            PowerUpKind::Spread => WeaponType::Spread,
            PowerUpKind::Laser => WeaponType::Laser,
            PowerUpKind::MachineGun => WeaponType::MachineGun,
            PowerUpKind::Rapid => WeaponType::Rapid,
        }
    }

    pub fn get_char(&self) -> char {
        match self {
            PowerUpKind::Spread => 'S',
            PowerUpKind::Laser => 'L',
            PowerUpKind::MachineGun => 'M',
            PowerUpKind::Rapid => 'R',
        }
    }

    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

#[derive(Debug, Clone)]
pub struct PowerUp {
    pub kind: PowerUpKind,
    pub body: Body,
    pub base_x: f32,
    /// Time alive, drives the sway
    pub elapsed_ms: u64,
}

impl PowerUp {
    pub fn new(x: f32, y: f32, kind: PowerUpKind) -> Self {
        Self {
            kind,
            body: Body::new(x, y, 20.0, 20.0).with_gravity(POWER_UP_GRAVITY),
            base_x: x,
            elapsed_ms: 0,
        }
    }

    pub fn sway_offset(&self) -> f32 {
        (self.elapsed_ms as f32 / SWAY_PERIOD).sin() * SWAY_AMPLITUDE
    }

    pub fn update(&mut self, dt_ms: u64) {
        self.elapsed_ms += dt_ms;
        self.body.integrate(dt_ms);
        self.body.x = self.base_x + self.sway_offset();
    }
}

impl Collider for PowerUp {
    fn hitbox(&self) -> Hitbox {
        Hitbox::new(self.body.x, self.body.y, self.body.width, self.body.height)
    }
}
