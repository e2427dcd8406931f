use crate::collision::{Collider, Hitbox};
use crate::world::{WORLD_HEIGHT, WORLD_WIDTH};

use super::weapon::normalize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectileOwner {
    Player,
    Enemy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectileType {
    Bullet,
    Laser,
    EnemyShot,
}

impl ProjectileType {
    /// Milliseconds before the projectile is recycled
    pub fn lifetime_ms(&self) -> u64 {
        match self {
            ProjectileType::Bullet | ProjectileType::Laser => 2000,
            ProjectileType::EnemyShot => 3000,
        }
    }

    pub fn size(&self) -> (f32, f32) {
        match self {
            ProjectileType::Bullet => (12.0, 12.0),
            ProjectileType::Laser => (40.0, 10.0),
            ProjectileType::EnemyShot => (12.0, 12.0),
        }
    }
}

/// Speed of every enemy shot in px/s
pub const ENEMY_SHOT_SPEED: f32 = 300.0;

#[derive(Debug, Clone)]
pub struct Projectile {
    pub x: f32,
    pub y: f32,
    pub velocity_x: f32,
    pub velocity_y: f32,
    pub owner: ProjectileOwner,
    pub projectile_type: ProjectileType,
    pub damage: u8,
    pub active: bool,
    pub expires_at: u64,
}

impl Projectile {
    /// Launch from `(x, y)` along `(dx, dy)` at `speed`. The direction does
    /// not need to be normalized.
    #[allow(clippy::too_many_arguments)]
    pub fn new_with_type(
        x: f32,
        y: f32,
        dx: f32,
        dy: f32,
        speed: f32,
        owner: ProjectileOwner,
        projectile_type: ProjectileType,
        damage: u8,
        now: u64,
    ) -> Self {
        let (ux, uy) = normalize(dx, dy);
        Self {
            x,
            y,
            velocity_x: ux * speed,
            velocity_y: uy * speed,
            owner,
            projectile_type,
            damage,
            active: true,
            expires_at: now + projectile_type.lifetime_ms(),
        }
    }

    pub fn enemy_shot(x: f32, y: f32, dx: f32, dy: f32, now: u64) -> Self {
        Self::new_with_type(
            x,
            y,
            dx,
            dy,
            ENEMY_SHOT_SPEED,
            ProjectileOwner::Enemy,
            ProjectileType::EnemyShot,
            1,
            now,
        )
    }

    pub fn update(&mut self, dt_ms: u64, now: u64) {
        if !self.active {
            return;
        }

        let dt = dt_ms as f32 / 1000.0;
        self.x += self.velocity_x * dt;
        self.y += self.velocity_y * dt;

        if now >= self.expires_at || self.is_out_of_bounds() {
            self.kill();
        }
    }

    /// Player rounds are recycled as soon as they leave the level; enemy
    /// shots only expire on their timer.
    pub fn is_out_of_bounds(&self) -> bool {
        self.owner == ProjectileOwner::Player
            && (self.y < 0.0 || self.y > WORLD_HEIGHT || self.x < 0.0 || self.x > WORLD_WIDTH)
    }

    pub fn kill(&mut self) {
        self.active = false;
        self.velocity_x = 0.0;
        self.velocity_y = 0.0;
    }
}

impl Collider for Projectile {
    fn hitbox(&self) -> Hitbox {
        let (w, h) = self.projectile_type.size();
        Hitbox::new(self.x, self.y, w, h)
    }
}

/// Recycling store of projectiles. Dead slots are reused before the pool
/// grows; a capped pool refuses new shots once every slot is live.
#[derive(Debug, Clone, Default)]
pub struct ProjectilePool {
    slots: Vec<Projectile>,
    max_size: Option<usize>,
}

impl ProjectilePool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_size(max_size: usize) -> Self {
        Self {
            slots: Vec::with_capacity(max_size),
            max_size: Some(max_size),
        }
    }

    /// Place a projectile into a free slot. Returns false when the pool is
    /// full.
    pub fn spawn(&mut self, projectile: Projectile) -> bool {
        if let Some(slot) = self.slots.iter_mut().find(|p| !p.active) {
            *slot = projectile;
            return true;
        }

        if self.max_size.is_some_and(|max| self.slots.len() >= max) {
            return false;
        }
        self.slots.push(projectile);
        true
    }

    pub fn update(&mut self, dt_ms: u64, now: u64) {
        for projectile in &mut self.slots {
            projectile.update(dt_ms, now);
        }
    }

    pub fn active(&self) -> impl Iterator<Item = &Projectile> {
        self.slots.iter().filter(|p| p.active)
    }

    pub fn active_mut(&mut self) -> impl Iterator<Item = &mut Projectile> {
        self.slots.iter_mut().filter(|p| p.active)
    }

    pub fn active_count(&self) -> usize {
        self.active().count()
    }

    /// Slot count including recycled ones
    pub fn capacity_used(&self) -> usize {
        self.slots.len()
    }
}
