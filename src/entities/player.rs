use crate::collision::{Collider, Hitbox};
use crate::world::Body;

use super::pickup::PowerUpKind;
use super::projectile::{Projectile, ProjectileOwner, ProjectileType};
use super::weapon::WeaponType;

/// Horizontal run speed in px/s
pub const RUN_SPEED: f32 = 200.0;
/// Upward launch speed of a grounded jump
pub const JUMP_FORCE: f32 = -450.0;
/// A mid-air jump is weaker
const DOUBLE_JUMP_FACTOR: f32 = 0.8;
/// Player gravity on top of the world's
const PLAYER_GRAVITY: f32 = 600.0;
/// Pause after a power-up during which the sprite flashes
const POWER_UP_FLASH_MS: u64 = 100;

/// Held and freshly pressed buttons for one simulation step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Controls {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Edge-triggered: true only on the step the jump key went down
    pub jump: bool,
    pub fire: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    Left,
    Right,
}

#[derive(Debug, Clone)]
pub struct Player {
    pub name: String,
    pub body: Body,
    pub weapon: WeaponType,
    pub fire_rate: u64,
    pub bullet_speed_multiplier: f32,
    pub last_fired: Option<u64>,
    pub facing: Facing,
    /// Unnormalized aim, each axis in -1..=1
    pub shoot_direction: (i8, i8),
    pub can_double_jump: bool,
    pub is_dead: bool,
    pub invulnerable_until: Option<u64>,
    pub flash_until: u64,
}

impl Player {
    pub fn new(x: f32, y: f32, name: &str, weapon: WeaponType) -> Self {
        let mut player = Self {
            name: name.to_string(),
            body: Body::new(x, y, 32.0, 48.0).with_gravity(PLAYER_GRAVITY),
            weapon,
            fire_rate: 0,
            bullet_speed_multiplier: 1.0,
            last_fired: None,
            facing: Facing::Right,
            shoot_direction: (1, 0),
            can_double_jump: true,
            is_dead: false,
            invulnerable_until: None,
            flash_until: 0,
        };
        player.update_weapon_config(weapon);
        player
    }

    pub fn x(&self) -> f32 {
        self.body.x
    }

    pub fn y(&self) -> f32 {
        self.body.y
    }

    pub fn update_weapon_config(&mut self, weapon: WeaponType) {
        let stats = weapon.stats();
        self.weapon = weapon;
        self.fire_rate = stats.fire_rate_ms;
        self.bullet_speed_multiplier = stats.speed_multiplier;
    }

    /// Apply one step of input: run, jump and aim
    pub fn apply_controls(&mut self, controls: &Controls) {
        if self.is_dead {
            return;
        }

        self.body.vx = 0.0;
        if controls.left {
            self.body.vx = -RUN_SPEED;
            self.facing = Facing::Left;
        } else if controls.right {
            self.body.vx = RUN_SPEED;
            self.facing = Facing::Right;
        }

        if controls.jump {
            if self.body.on_ground {
                self.body.vy = JUMP_FORCE;
                self.can_double_jump = true;
            } else if self.can_double_jump {
                self.body.vy = JUMP_FORCE * DOUBLE_JUMP_FACTOR;
                self.can_double_jump = false;
            }
        }

        self.update_shoot_direction(controls);
    }

    fn update_shoot_direction(&mut self, controls: &Controls) {
        let dx = if controls.left {
            -1
        } else if controls.right {
            1
        } else {
            0
        };
        let dy = if controls.up {
            -1
        } else if controls.down {
            1
        } else {
            0
        };

        self.shoot_direction = if dx == 0 && dy == 0 {
            match self.facing {
                Facing::Left => (-1, 0),
                Facing::Right => (1, 0),
            }
        } else {
            (dx, dy)
        };
    }

    pub fn can_fire(&self, now: u64) -> bool {
        match self.last_fired {
            Some(last) => now >= last + self.fire_rate,
            None => true,
        }
    }

    /// Attempts to fire the current weapon.
    /// Returns the new projectiles, or an empty vec while the weapon cools down.
    pub fn try_fire(&mut self, now: u64) -> Vec<Projectile> {
        if self.is_dead || !self.can_fire(now) {
            return vec![];
        }
        self.last_fired = Some(now);

        let stats = self.weapon.stats();
        let speed = stats.projectile_speed * self.bullet_speed_multiplier;
        let projectile_type = if self.weapon == WeaponType::Laser {
            ProjectileType::Laser
        } else {
            ProjectileType::Bullet
        };
        let (dx, dy) = self.shoot_direction;

        self.weapon
            .pellet_directions(dx as f32, dy as f32)
            .into_iter()
            .map(|(ux, uy)| {
                Projectile::new_with_type(
                    self.body.x,
                    self.body.y,
                    ux,
                    uy,
                    speed,
                    ProjectileOwner::Player,
                    projectile_type,
                    stats.damage,
                    now,
                )
            })
            .collect()
    }

    pub fn apply_power_up(&mut self, kind: PowerUpKind, now: u64) {
        self.update_weapon_config(kind.weapon());
        self.flash_until = now + POWER_UP_FLASH_MS;
    }

    pub fn is_invulnerable(&self, now: u64) -> bool {
        self.invulnerable_until.is_some_and(|until| now < until)
    }

    pub fn is_flashing(&self, now: u64) -> bool {
        now < self.flash_until
    }

    /// Knock the player out: weapon lost, a little hop, and no more contact
    /// with the ground or anything else until respawn.
    pub fn die(&mut self) {
        self.is_dead = true;
        self.update_weapon_config(WeaponType::Normal);
        self.body.set_velocity(0.0, -400.0);
        self.body.collides = false;
    }

    pub fn respawn(&mut self, x: f32, y: f32, invulnerable_until: u64) {
        self.is_dead = false;
        self.body.collides = true;
        self.body.x = x;
        self.body.y = y;
        self.body.stop();
        self.can_double_jump = true;
        self.invulnerable_until = Some(invulnerable_until);
    }

    pub fn update(&mut self, dt_ms: u64) {
        self.body.integrate(dt_ms);
        self.body.clamp_to_world();
    }
}

impl Collider for Player {
    fn hitbox(&self) -> Hitbox {
        Hitbox::new(self.body.x, self.body.y, self.body.width, self.body.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::FRAME_MS;

    fn grounded_player() -> Player {
        let mut player = Player::new(100.0, 450.0, "TEST", WeaponType::Normal);
        for _ in 0..100 {
            player.update(FRAME_MS);
        }
        assert!(player.body.on_ground);
        player
    }

    #[test]
    fn test_player_new() {
        let player = Player::new(100.0, 450.0, "TEST", WeaponType::Normal);
        assert_eq!(player.name, "TEST");
        assert_eq!(player.weapon, WeaponType::Normal);
        assert_eq!(player.fire_rate, 200);
        assert_eq!(player.bullet_speed_multiplier, 1.0);
        assert!(!player.is_dead);
    }

    #[test]
    fn test_update_weapon_config() {
        let mut player = Player::new(100.0, 100.0, "TEST", WeaponType::Normal);

        player.update_weapon_config(WeaponType::Spread);
        assert_eq!(player.weapon, WeaponType::Spread);
        assert_eq!(player.fire_rate, 400);

        player.update_weapon_config(WeaponType::Laser);
        assert_eq!(player.fire_rate, 100);

        player.update_weapon_config(WeaponType::MachineGun);
        assert_eq!(player.fire_rate, 80);

        player.update_weapon_config(WeaponType::Rapid);
        assert_eq!(player.weapon, WeaponType::Rapid);
        assert_eq!(player.bullet_speed_multiplier, 2.0);
    }

    #[test]
    fn test_movement_sets_velocity_and_facing() {
        let mut player = grounded_player();
        player.apply_controls(&Controls {
            left: true,
            ..Default::default()
        });
        assert_eq!(player.body.vx, -RUN_SPEED);
        assert_eq!(player.facing, Facing::Left);

        player.apply_controls(&Controls::default());
        assert_eq!(player.body.vx, 0.0);
        assert_eq!(player.facing, Facing::Left);
    }

    #[test]
    fn test_jump_and_double_jump() {
        let mut player = grounded_player();
        let jump = Controls {
            jump: true,
            ..Default::default()
        };

        player.apply_controls(&jump);
        assert_eq!(player.body.vy, JUMP_FORCE);
        player.update(FRAME_MS);
        assert!(!player.body.on_ground);

        player.apply_controls(&jump);
        assert_eq!(player.body.vy, JUMP_FORCE * 0.8);
        assert!(!player.can_double_jump);

        // no third jump
        let vy = player.body.vy;
        player.apply_controls(&jump);
        assert_eq!(player.body.vy, vy);
    }

    #[test]
    fn test_shoot_direction_defaults_to_facing() {
        let mut player = grounded_player();
        player.apply_controls(&Controls::default());
        assert_eq!(player.shoot_direction, (1, 0));

        player.apply_controls(&Controls {
            left: true,
            ..Default::default()
        });
        player.apply_controls(&Controls::default());
        assert_eq!(player.shoot_direction, (-1, 0));

        player.apply_controls(&Controls {
            up: true,
            right: true,
            ..Default::default()
        });
        assert_eq!(player.shoot_direction, (1, -1));
    }

    #[test]
    fn test_fire_rate_gates_shots() {
        let mut player = Player::new(100.0, 100.0, "TEST", WeaponType::Normal);
        assert_eq!(player.try_fire(1000).len(), 1);
        assert!(player.try_fire(1100).is_empty());
        assert!(player.try_fire(1199).is_empty());
        assert_eq!(player.try_fire(1200).len(), 1);
    }

    #[test]
    fn test_spread_fires_five() {
        let mut player = Player::new(100.0, 100.0, "TEST", WeaponType::Spread);
        let shots = player.try_fire(0);
        assert_eq!(shots.len(), 5);
        assert!(shots.iter().all(|p| p.owner == ProjectileOwner::Player));
    }

    #[test]
    fn test_laser_is_fast() {
        let mut player = Player::new(100.0, 100.0, "TEST", WeaponType::Laser);
        let shots = player.try_fire(0);
        assert_eq!(shots.len(), 1);
        assert_eq!(shots[0].projectile_type, ProjectileType::Laser);
        assert_eq!(shots[0].velocity_x, 800.0);
    }

    #[test]
    fn test_rapid_bullets_fly_twice_as_fast() {
        let mut player = Player::new(100.0, 100.0, "TEST", WeaponType::Rapid);
        let shots = player.try_fire(0);
        assert_eq!(shots[0].velocity_x, 800.0);
        assert_eq!(shots[0].projectile_type, ProjectileType::Bullet);
    }

    #[test]
    fn test_power_up_changes_weapon() {
        let mut player = Player::new(100.0, 100.0, "TEST", WeaponType::Normal);
        player.apply_power_up(PowerUpKind::Spread, 500);
        assert_eq!(player.weapon, WeaponType::Spread);
        assert!(player.is_flashing(550));
        assert!(!player.is_flashing(600));

        player.apply_power_up(PowerUpKind::MachineGun, 700);
        assert_eq!(player.fire_rate, 80);
    }

    #[test]
    fn test_death_drops_weapon_and_blocks_fire() {
        let mut player = Player::new(100.0, 100.0, "TEST", WeaponType::Laser);
        player.die();
        assert!(player.is_dead);
        assert_eq!(player.weapon, WeaponType::Normal);
        assert_eq!(player.body.vy, -400.0);
        assert!(player.try_fire(10_000).is_empty());
    }

    #[test]
    fn test_respawn_grants_invulnerability() {
        let mut player = Player::new(100.0, 100.0, "TEST", WeaponType::Normal);
        player.die();
        player.respawn(300.0, 200.0, 5000);
        assert!(!player.is_dead);
        assert_eq!(player.x(), 300.0);
        assert_eq!(player.y(), 200.0);
        assert!(player.is_invulnerable(4999));
        assert!(!player.is_invulnerable(5000));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_player_stays_in_world(
                moves in prop::collection::vec(0u8..4, 0..300)
            ) {
                let mut player = Player::new(100.0, 450.0, "TEST", WeaponType::Normal);
                for m in moves {
                    let controls = Controls {
                        left: m == 0,
                        right: m == 1,
                        jump: m == 2,
                        ..Default::default()
                    };
                    player.apply_controls(&controls);
                    player.update(FRAME_MS);
                }
                prop_assert!(player.x() >= 16.0 && player.x() <= crate::world::WORLD_WIDTH - 16.0);
                prop_assert!(player.body.bottom() <= crate::world::GROUND_TOP + 0.001);
            }

            #[test]
            fn test_shots_never_closer_than_fire_rate(
                weapon in prop::sample::select(vec![
                    WeaponType::Normal,
                    WeaponType::Spread,
                    WeaponType::Laser,
                    WeaponType::MachineGun,
                    WeaponType::Rapid,
                ]),
                times in prop::collection::vec(0u64..50, 1..100)
            ) {
                let mut player = Player::new(100.0, 100.0, "TEST", weapon);
                let mut now = 0;
                let mut last_shot: Option<u64> = None;
                for step in times {
                    now += step;
                    if !player.try_fire(now).is_empty() {
                        if let Some(last) = last_shot {
                            prop_assert!(now - last >= player.fire_rate);
                        }
                        last_shot = Some(now);
                    }
                }
            }
        }
    }
}
