//! Overlap tests and the hooks that resolve what happens when two kinds of
//! body touch.

use log::debug;

use crate::entities::{ProjectileOwner, TurretHit};
use crate::game::{Game, GameEvent};

/// Centre-origin axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hitbox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Hitbox {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn left(&self) -> f32 {
        self.x - self.width / 2.0
    }

    pub fn right(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn top(&self) -> f32 {
        self.y - self.height / 2.0
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height / 2.0
    }

    pub fn overlaps(&self, other: &Hitbox) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }
}

/// Anything that can take part in an overlap check
pub trait Collider {
    fn hitbox(&self) -> Hitbox;

    fn overlaps<C: Collider>(&self, other: &C) -> bool
    where
        Self: Sized,
    {
        self.hitbox().overlaps(&other.hitbox())
    }
}

/// Points for a destroyed turret
pub const TURRET_POINTS: u32 = 1000;

impl Game {
    /// Run every overlap hook once for the current step
    pub(crate) fn resolve_collisions(&mut self) {
        self.handle_bullet_enemy_collisions();
        self.handle_bullet_boss_collisions();
        self.handle_player_enemy_collisions();
        self.handle_player_bullet_collisions();
        self.handle_player_power_up_collisions();
    }

    fn handle_bullet_enemy_collisions(&mut self) {
        let now = self.now;
        for bullet in self.bullets.active_mut() {
            let Some(enemy) = self
                .enemies
                .iter_mut()
                .find(|e| e.active && e.overlaps(&*bullet))
            else {
                continue;
            };

            self.effects.spawn_sparks(&mut self.rng, bullet.x, bullet.y, now);
            bullet.kill();

            if enemy.take_damage(bullet.damage, now) {
                let points = enemy.get_points();
                self.progression.add_score(points);
                self.effects.spawn_floating_score(enemy.body.x, enemy.body.y, points, now);
                debug!("{:?} down at x={:.0}", enemy.enemy_type, enemy.body.x);
                self.events.push(GameEvent::EnemyKilled {
                    enemy_type: enemy.enemy_type,
                    points,
                });
            }
        }
    }

    fn handle_bullet_boss_collisions(&mut self) {
        let now = self.now;
        let mut boss_down = false;
        for bullet in self.bullets.active_mut() {
            let Some(turret) = self
                .boss
                .turrets
                .iter_mut()
                .find(|t| t.is_alive && t.overlaps(&*bullet))
            else {
                continue;
            };

            self.effects.spawn_sparks(&mut self.rng, bullet.x, bullet.y, now);
            bullet.kill();

            match turret.hit(bullet.damage, now) {
                TurretHit::Damaged => {}
                TurretHit::Destroyed => {
                    self.progression.add_score(TURRET_POINTS);
                    self.effects
                        .spawn_floating_score(turret.x, turret.y, TURRET_POINTS, now);
                    let remaining = self.progression.destroy_boss_part();
                    self.events.push(GameEvent::TurretDestroyed { remaining });
                    if self.boss.is_destroyed() {
                        boss_down = true;
                        break;
                    }
                }
            }
        }

        if boss_down {
            self.clear_stage();
        }
    }

    fn handle_player_enemy_collisions(&mut self) {
        if self.player.is_dead || self.player.is_invulnerable(self.now) {
            return;
        }
        let touched = self
            .enemies
            .iter()
            .any(|e| e.active && e.overlaps(&self.player));
        if touched {
            self.handle_player_death();
        }
    }

    fn handle_player_bullet_collisions(&mut self) {
        if self.player.is_dead {
            return;
        }
        let now = self.now;
        let mut hit = false;
        for shot in self.enemy_bullets.active_mut() {
            if shot.owner != ProjectileOwner::Enemy || !shot.overlaps(&self.player) {
                continue;
            }
            self.effects.spawn_sparks(&mut self.rng, shot.x, shot.y, now);
            shot.kill();
            hit = true;
        }

        if hit && !self.player.is_invulnerable(now) {
            self.handle_player_death();
        }
    }

    fn handle_player_power_up_collisions(&mut self) {
        if self.player.is_dead {
            return;
        }
        let now = self.now;
        let player = &mut self.player;
        let events = &mut self.events;
        self.power_ups.retain(|power_up| {
            if !power_up.overlaps(&*player) {
                return true;
            }
            player.apply_power_up(power_up.kind, now);
            events.push(GameEvent::PowerUpCollected {
                kind: power_up.kind,
                weapon: player.weapon,
            });
            false
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlapping_boxes() {
        let a = Hitbox::new(100.0, 100.0, 32.0, 48.0);
        let b = Hitbox::new(110.0, 110.0, 12.0, 12.0);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Hitbox::new(0.0, 0.0, 10.0, 10.0);
        let b = Hitbox::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn test_far_apart_boxes() {
        let a = Hitbox::new(100.0, 100.0, 32.0, 48.0);
        let b = Hitbox::new(400.0, 100.0, 32.0, 48.0);
        assert!(!a.overlaps(&b));
    }

    mod hooks {
        use super::*;
        use crate::entities::{
            Enemy, EnemyType, PowerUp, PowerUpKind, Projectile, ProjectileType, WeaponType,
        };
        use crate::game::GameState;
        use crate::scene::RunSetup;

        fn game() -> Game {
            let mut game = Game::with_seed(RunSetup::new("TEST", WeaponType::Normal), 9);
            game.drain_events();
            game
        }

        fn rifle_shot(x: f32, y: f32) -> Projectile {
            Projectile::new_with_type(
                x,
                y,
                1.0,
                0.0,
                400.0,
                ProjectileOwner::Player,
                ProjectileType::Bullet,
                1,
                0,
            )
        }

        #[test]
        fn test_bullet_kills_enemy_and_scores() {
            let mut game = game();
            game.enemies = vec![Enemy::new(500.0, 300.0, EnemyType::Sniper, 0)];
            game.bullets.spawn(rifle_shot(500.0, 300.0));

            game.resolve_collisions();

            assert_eq!(game.progression.score, 100);
            assert!(!game.enemies[0].active);
            assert_eq!(game.bullets.active_count(), 0);
            assert_eq!(game.effects.floating_texts.len(), 1);
            assert_eq!(game.effects.sparks.len(), 5);
            assert_eq!(
                game.drain_events(),
                vec![GameEvent::EnemyKilled {
                    enemy_type: EnemyType::Sniper,
                    points: 100
                }]
            );
        }

        #[test]
        fn test_one_bullet_hits_one_enemy() {
            let mut game = game();
            game.enemies = vec![
                Enemy::new(500.0, 300.0, EnemyType::Soldier, 0),
                Enemy::new(505.0, 300.0, EnemyType::Soldier, 0),
            ];
            game.bullets.spawn(rifle_shot(502.0, 300.0));

            game.resolve_collisions();

            let hurt = game.enemies.iter().filter(|e| e.health == 1).count();
            assert_eq!(hurt, 1);
            assert_eq!(game.progression.score, 0);
        }

        #[test]
        fn test_last_turret_clears_stage() {
            let mut game = game();
            for turret in &mut game.boss.turrets[1..] {
                turret.is_alive = false;
            }
            game.progression.boss_parts_alive = 1;
            let (x, y) = (game.boss.turrets[0].x, game.boss.turrets[0].y);
            game.boss.turrets[0].health = 1;
            game.bullets.spawn(rifle_shot(x, y));

            game.resolve_collisions();

            assert_eq!(game.progression.score, TURRET_POINTS);
            assert_eq!(game.state(), GameState::StageClear);
            let events = game.drain_events();
            assert!(events.contains(&GameEvent::TurretDestroyed { remaining: 0 }));
            assert!(events.contains(&GameEvent::StageCleared { stage: 1 }));
        }

        #[test]
        fn test_dead_turret_lets_bullets_through() {
            let mut game = game();
            game.boss.turrets[0].is_alive = false;
            let (x, y) = (game.boss.turrets[0].x, game.boss.turrets[0].y);
            game.bullets.spawn(rifle_shot(x, y));

            game.resolve_collisions();

            assert_eq!(game.bullets.active_count(), 1);
        }

        #[test]
        fn test_enemy_shot_kills_player() {
            let mut game = game();
            let (x, y) = (game.player.x(), game.player.y());
            game.enemy_bullets
                .spawn(Projectile::enemy_shot(x, y, -1.0, 0.0, 0));

            game.resolve_collisions();

            assert!(game.player.is_dead);
            assert_eq!(game.progression.lives, 2);
            assert_eq!(game.enemy_bullets.active_count(), 0);
        }

        #[test]
        fn test_barrier_absorbs_enemy_shot() {
            let mut game = game();
            game.player.invulnerable_until = Some(game.now + 1000);
            let (x, y) = (game.player.x(), game.player.y());
            game.enemy_bullets
                .spawn(Projectile::enemy_shot(x, y, -1.0, 0.0, 0));

            game.resolve_collisions();

            assert!(!game.player.is_dead);
            assert_eq!(game.progression.lives, 3);
            assert_eq!(game.enemy_bullets.active_count(), 0);
        }

        #[test]
        fn test_touching_enemy_kills_player() {
            let mut game = game();
            let (x, y) = (game.player.x(), game.player.y());
            game.enemies = vec![Enemy::new(x + 10.0, y, EnemyType::Soldier, 0)];

            game.resolve_collisions();

            assert!(game.player.is_dead);
            assert_eq!(game.player.weapon, WeaponType::Normal);
        }

        #[test]
        fn test_barrier_ignores_touching_enemy() {
            let mut game = game();
            game.player.invulnerable_until = Some(game.now + 1000);
            let (x, y) = (game.player.x(), game.player.y());
            game.enemies = vec![Enemy::new(x + 10.0, y, EnemyType::Soldier, 0)];

            game.resolve_collisions();

            assert!(!game.player.is_dead);
            assert_eq!(game.progression.lives, 3);
            assert!(game.enemies[0].active);
            assert!(game.drain_events().is_empty());
        }

        #[test]
        fn test_dead_player_leaves_power_up_falling() {
            let mut game = game();
            game.player.die();
            let (x, y) = (game.player.x(), game.player.y());
            game.power_ups = vec![PowerUp::new(x, y, PowerUpKind::Laser)];

            game.resolve_collisions();

            assert_eq!(game.power_ups.len(), 1);
            assert_eq!(game.player.weapon, WeaponType::Normal);
        }

        #[test]
        fn test_power_up_is_collected() {
            let mut game = game();
            let (x, y) = (game.player.x(), game.player.y());
            game.power_ups = vec![PowerUp::new(x, y, PowerUpKind::Laser)];

            game.resolve_collisions();

            assert!(game.power_ups.is_empty());
            assert_eq!(game.player.weapon, WeaponType::Laser);
            assert_eq!(
                game.drain_events(),
                vec![GameEvent::PowerUpCollected {
                    kind: PowerUpKind::Laser,
                    weapon: WeaponType::Laser
                }]
            );
        }
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_overlap_is_symmetric(
                ax in -500f32..500.0, ay in -500f32..500.0,
                bx in -500f32..500.0, by in -500f32..500.0,
                aw in 1f32..100.0, ah in 1f32..100.0,
                bw in 1f32..100.0, bh in 1f32..100.0,
            ) {
                let a = Hitbox::new(ax, ay, aw, ah);
                let b = Hitbox::new(bx, by, bw, bh);
                prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
            }
        }
    }
}
