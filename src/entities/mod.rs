mod boss;
mod enemy;
mod particle;
mod pickup;
mod player;
mod projectile;
mod spawner;
mod weapon;

// Re-export all public types
pub use boss::{BUNKER_WIDTH, BUNKER_X, Boss, TURRET_COUNT, Turret, TurretHit};
pub use enemy::{Enemy, EnemyType};
pub use particle::{Effects, FloatingText, Spark, lerp};
pub use pickup::{PowerUp, PowerUpKind};
pub use player::{Controls, Facing, JUMP_FORCE, Player, RUN_SPEED};
pub use projectile::{ENEMY_SHOT_SPEED, Projectile, ProjectileOwner, ProjectilePool, ProjectileType};
pub use spawner::{BASE_SPAWN_DELAY_MS, EnemySpawner, PowerUpSpawner, spawn_delay_for_stage};
pub use weapon::{WeaponStats, WeaponType, normalize};
