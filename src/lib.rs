// Library exports for testing
pub use entities::{
    Boss, Controls, Enemy, EnemyType, Player, PowerUp, PowerUpKind, Projectile, ProjectileOwner,
    ProjectileType, WeaponType,
};
pub use game::{Game, GameEvent, GameState};
pub use scene::RunSetup;

pub mod app;
pub mod audio;
pub mod collision;
pub mod config;
pub mod entities;
pub mod game;
pub mod hud;
pub mod input;
pub mod progression;
pub mod renderer;
pub mod scene;
pub mod welcome;
pub mod world;
