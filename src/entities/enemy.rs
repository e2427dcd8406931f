use crate::collision::{Collider, Hitbox};
use crate::world::Body;

use super::projectile::Projectile;

/// Enemies are dropped once they walk this far past the left edge
const DESPAWN_X: f32 = -50.0;
/// Shots leave the muzzle at this offset from the body centre
const MUZZLE_OFFSET: (f32, f32) = (-20.0, -5.0);
const DAMAGE_FLASH_MS: u64 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyType {
    /// Walks left firing straight ahead
    Soldier,
    /// Holds position and aims at the player
    Sniper,
}

impl EnemyType {
    pub fn max_health(&self) -> u8 {
        match self {
            EnemyType::Soldier => 2,
            EnemyType::Sniper => 1,
        }
    }

    /// Horizontal walking speed in px/s
    pub fn speed(&self) -> f32 {
        match self {
            EnemyType::Soldier => -100.0,
            EnemyType::Sniper => 0.0,
        }
    }

    pub fn fire_rate_ms(&self) -> u64 {
        match self {
            EnemyType::Soldier => 3000,
            EnemyType::Sniper => 2000,
        }
    }

    pub fn points(&self) -> u32 {
        100
    }
}

#[derive(Debug, Clone)]
pub struct Enemy {
    pub body: Body,
    pub health: u8,
    pub enemy_type: EnemyType,
    pub next_fire_at: u64,
    pub active: bool,
    pub flash_until: u64,
}

impl Enemy {
    pub fn new(x: f32, y: f32, enemy_type: EnemyType, now: u64) -> Self {
        let mut body = Body::new(x, y, 32.0, 48.0);
        body.vx = enemy_type.speed();

        Self {
            body,
            health: enemy_type.max_health(),
            enemy_type,
            next_fire_at: now + enemy_type.fire_rate_ms(),
            active: true,
            flash_until: 0,
        }
    }

    pub fn update(&mut self, dt_ms: u64) {
        self.body.integrate(dt_ms);
        if self.body.x < DESPAWN_X {
            self.active = false;
        }
    }

    /// Fire on the enemy's own cadence. Soldiers shoot straight left,
    /// snipers aim at `target`.
    pub fn try_fire(&mut self, now: u64, target: (f32, f32)) -> Option<Projectile> {
        if !self.active || now < self.next_fire_at {
            return None;
        }
        self.next_fire_at += self.enemy_type.fire_rate_ms();

        let (dx, dy) = match self.enemy_type {
            EnemyType::Soldier => (-1.0, 0.0),
            EnemyType::Sniper => (target.0 - self.body.x, target.1 - self.body.y),
        };
        let x = self.body.x + MUZZLE_OFFSET.0;
        let y = self.body.y + MUZZLE_OFFSET.1;
        Some(Projectile::enemy_shot(x, y, dx, dy, now))
    }

    /// Returns true when the hit was fatal
    pub fn take_damage(&mut self, damage: u8, now: u64) -> bool {
        self.health = self.health.saturating_sub(damage);
        if self.health == 0 {
            self.active = false;
            return true;
        }
        self.flash_until = now + DAMAGE_FLASH_MS;
        false
    }

    pub fn is_flashing(&self, now: u64) -> bool {
        now < self.flash_until
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn get_points(&self) -> u32 {
        self.enemy_type.points()
    }
}

impl Collider for Enemy {
    fn hitbox(&self) -> Hitbox {
        Hitbox::new(self.body.x, self.body.y, self.body.width, self.body.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enemy_health_by_type() {
        let soldier = Enemy::new(900.0, 500.0, EnemyType::Soldier, 0);
        assert_eq!(soldier.health, 2);

        let sniper = Enemy::new(900.0, 500.0, EnemyType::Sniper, 0);
        assert_eq!(sniper.health, 1);
    }

    #[test]
    fn test_soldier_walks_left_sniper_holds() {
        let mut soldier = Enemy::new(900.0, 540.0, EnemyType::Soldier, 0);
        let mut sniper = Enemy::new(900.0, 540.0, EnemyType::Sniper, 0);
        soldier.update(1000);
        sniper.update(1000);
        assert_eq!(soldier.body.x, 800.0);
        assert_eq!(sniper.body.x, 900.0);
    }

    #[test]
    fn test_enemy_take_damage() {
        let mut soldier = Enemy::new(900.0, 500.0, EnemyType::Soldier, 0);
        assert!(!soldier.take_damage(1, 100));
        assert!(soldier.is_flashing(120));
        assert!(soldier.active);

        assert!(soldier.take_damage(1, 200));
        assert!(!soldier.is_alive());
        assert!(!soldier.active);
    }

    #[test]
    fn test_sniper_dies_in_one_hit() {
        let mut sniper = Enemy::new(900.0, 500.0, EnemyType::Sniper, 0);
        assert!(sniper.take_damage(1, 0));
    }

    #[test]
    fn test_fire_cadence() {
        let mut soldier = Enemy::new(900.0, 540.0, EnemyType::Soldier, 1000);
        assert!(soldier.try_fire(3999, (100.0, 540.0)).is_none());
        let shot = soldier.try_fire(4000, (100.0, 540.0)).unwrap();
        assert_eq!(shot.x, 880.0);
        assert_eq!(shot.y, 535.0);
        assert!(shot.velocity_x < 0.0);
        assert_eq!(shot.velocity_y, 0.0);
        assert!(soldier.try_fire(4016, (100.0, 540.0)).is_none());
        assert!(soldier.try_fire(7000, (100.0, 540.0)).is_some());
    }

    #[test]
    fn test_sniper_aims_at_target() {
        let mut sniper = Enemy::new(900.0, 540.0, EnemyType::Sniper, 0);
        let shot = sniper.try_fire(2000, (900.0, 140.0)).unwrap();
        // straight up
        assert!(shot.velocity_x.abs() < 1e-3);
        assert!(shot.velocity_y < 0.0);
    }

    #[test]
    fn test_enemy_despawns_off_left_edge() {
        let mut soldier = Enemy::new(-40.0, 540.0, EnemyType::Soldier, 0);
        soldier.update(200);
        assert!(!soldier.active);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_enemy_dies_after_max_health_hits(
                enemy_type in prop::sample::select(vec![EnemyType::Soldier, EnemyType::Sniper]),
            ) {
                let mut enemy = Enemy::new(900.0, 500.0, enemy_type, 0);
                let hits = enemy_type.max_health();
                for i in 1..=hits {
                    let killed = enemy.take_damage(1, 0);
                    prop_assert_eq!(killed, i == hits);
                }
            }
        }
    }
}
