use crate::collision::{Collider, Hitbox};

use super::projectile::Projectile;

/// Number of turrets on the bunker
pub const TURRET_COUNT: usize = 3;
/// Turret column, just in front of the bunker wall
pub const TURRET_X: f32 = 1900.0;
/// Bunker wall centre and width
pub const BUNKER_X: f32 = 1950.0;
pub const BUNKER_WIDTH: f32 = 100.0;

const TURRET_SIZE: f32 = 40.0;
const TURRET_FIRE_RATE_MS: u64 = 2500;
const TURRET_FIRE_STAGGER_MS: u64 = 500;
const DAMAGE_FLASH_MS: u64 = 50;

/// Outcome of a hit on a live turret
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurretHit {
    Damaged,
    Destroyed,
}

#[derive(Debug, Clone)]
pub struct Turret {
    pub x: f32,
    pub y: f32,
    pub health: u32,
    pub max_health: u32,
    pub is_alive: bool,
    pub next_fire_at: u64,
    pub flash_until: u64,
}

impl Turret {
    pub fn max_health_for_stage(stage: u32) -> u32 {
        20 + stage * 10
    }

    pub fn hit(&mut self, damage: u8, now: u64) -> TurretHit {
        self.health = self.health.saturating_sub(damage as u32);
        if self.health == 0 {
            self.is_alive = false;
            TurretHit::Destroyed
        } else {
            self.flash_until = now + DAMAGE_FLASH_MS;
            TurretHit::Damaged
        }
    }

    pub fn is_flashing(&self, now: u64) -> bool {
        now < self.flash_until
    }

    /// Half or less of its armour left
    pub fn is_critical(&self) -> bool {
        self.health * 2 <= self.max_health
    }

    /// Aimed shot at `target` if the cannon is ready
    pub fn try_fire(&mut self, now: u64, target: (f32, f32)) -> Option<Projectile> {
        if !self.is_alive || now < self.next_fire_at {
            return None;
        }
        self.next_fire_at = now + TURRET_FIRE_RATE_MS;

        let muzzle_x = self.x - TURRET_SIZE / 2.0;
        Some(Projectile::enemy_shot(
            muzzle_x,
            self.y,
            target.0 - muzzle_x,
            target.1 - self.y,
            now,
        ))
    }
}

impl Collider for Turret {
    fn hitbox(&self) -> Hitbox {
        Hitbox::new(self.x, self.y, TURRET_SIZE, TURRET_SIZE)
    }
}

/// The bunker at the end of the level: a wall carrying independent turrets
#[derive(Debug, Clone)]
pub struct Boss {
    pub turrets: Vec<Turret>,
}

impl Boss {
    pub fn new(stage: u32, now: u64) -> Self {
        let health = Turret::max_health_for_stage(stage);
        let turrets = (0..TURRET_COUNT)
            .map(|i| Turret {
                x: TURRET_X,
                y: 150.0 + i as f32 * 150.0,
                health,
                max_health: health,
                is_alive: true,
                next_fire_at: now + TURRET_FIRE_RATE_MS + i as u64 * TURRET_FIRE_STAGGER_MS,
                flash_until: 0,
            })
            .collect();

        Self { turrets }
    }

    pub fn alive_count(&self) -> usize {
        self.turrets.iter().filter(|t| t.is_alive).count()
    }

    pub fn is_destroyed(&self) -> bool {
        self.alive_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turret_health_scales_with_stage() {
        assert_eq!(Turret::max_health_for_stage(1), 30);
        assert_eq!(Turret::max_health_for_stage(2), 40);

        let boss = Boss::new(3, 0);
        assert_eq!(boss.turrets.len(), 3);
        assert!(boss.turrets.iter().all(|t| t.health == 50));
    }

    #[test]
    fn test_turret_layout() {
        let boss = Boss::new(1, 0);
        let ys: Vec<f32> = boss.turrets.iter().map(|t| t.y).collect();
        assert_eq!(ys, vec![150.0, 300.0, 450.0]);
        assert!(boss.turrets.iter().all(|t| t.x == TURRET_X));
    }

    #[test]
    fn test_turret_destroyed_after_health_hits() {
        let mut boss = Boss::new(1, 0);
        let turret = &mut boss.turrets[0];
        for _ in 0..29 {
            assert_eq!(turret.hit(1, 0), TurretHit::Damaged);
        }
        assert_eq!(turret.hit(1, 0), TurretHit::Destroyed);
        assert!(!turret.is_alive);
        assert_eq!(boss.alive_count(), 2);
        assert!(!boss.is_destroyed());
    }

    #[test]
    fn test_turret_turns_critical_at_half_health() {
        let mut turret = Boss::new(1, 0).turrets.remove(0);
        for _ in 0..14 {
            turret.hit(1, 0);
        }
        assert!(!turret.is_critical());
        turret.hit(1, 0);
        assert!(turret.is_critical());
    }

    #[test]
    fn test_turrets_fire_staggered() {
        let mut boss = Boss::new(1, 0);
        let target = (1500.0, 540.0);
        assert!(boss.turrets[0].try_fire(2499, target).is_none());
        assert!(boss.turrets[0].try_fire(2500, target).is_some());
        assert!(boss.turrets[1].try_fire(2500, target).is_none());
        assert!(boss.turrets[1].try_fire(3000, target).is_some());
    }

    #[test]
    fn test_dead_turret_does_not_fire() {
        let mut boss = Boss::new(1, 0);
        boss.turrets[2].is_alive = false;
        assert!(boss.turrets[2].try_fire(10_000, (0.0, 0.0)).is_none());
    }
}
