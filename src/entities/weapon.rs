use serde::{Deserialize, Serialize};

/// Weapon the player is carrying. Serialized as the upper-case tag used in
/// scene transition data and the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WeaponType {
    #[default]
    Normal,
    Spread,
    Laser,
    MachineGun,
    Rapid,
}

/// Tuning row for one weapon
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponStats {
    /// Minimum time between shots
    pub fire_rate_ms: u64,
    /// Base projectile speed in px/s
    pub projectile_speed: f32,
    pub pellets: u8,
    /// Angle between neighbouring pellets, radians
    pub spread_angle: f32,
    pub damage: u8,
    pub speed_multiplier: f32,
}

impl WeaponType {
    /// Weapons offered on the welcome form
    pub const SELECTABLE: [WeaponType; 3] =
        [WeaponType::Normal, WeaponType::Spread, WeaponType::Laser];

    pub fn stats(&self) -> WeaponStats {
        match self {
            WeaponType::Normal => WeaponStats {
                fire_rate_ms: 200,
                projectile_speed: 400.0,
                pellets: 1,
                spread_angle: 0.0,
                damage: 1,
                speed_multiplier: 1.0,
            },
            WeaponType::Spread => WeaponStats {
                fire_rate_ms: 400,
                projectile_speed: 400.0,
                pellets: 5,
                spread_angle: 0.2,
                damage: 1,
                speed_multiplier: 1.0,
            },
            WeaponType::Laser => WeaponStats {
                fire_rate_ms: 100,
                projectile_speed: 800.0,
                pellets: 1,
                spread_angle: 0.0,
                damage: 1,
                speed_multiplier: 1.0,
            },
            WeaponType::MachineGun => WeaponStats {
                fire_rate_ms: 80,
                projectile_speed: 400.0,
                pellets: 1,
                spread_angle: 0.0,
                damage: 1,
                speed_multiplier: 1.0,
            },
            WeaponType::Rapid => WeaponStats {
                fire_rate_ms: 200,
                projectile_speed: 400.0,
                pellets: 1,
                spread_angle: 0.0,
                damage: 1,
                speed_multiplier: 2.0,
            },
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            WeaponType::Normal => "NORMAL",
            WeaponType::Spread => "SPREAD",
            WeaponType::Laser => "LASER",
            WeaponType::MachineGun => "MACHINE_GUN",
            WeaponType::Rapid => "RAPID",
        }
    }

    /// Parse a weapon tag. Anything unrecognised is a plain rifle.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_uppercase().as_str() {
            "SPREAD" => WeaponType::Spread,
            "LASER" => WeaponType::Laser,
            "MACHINE_GUN" => WeaponType::MachineGun,
            "RAPID" => WeaponType::Rapid,
            _ => WeaponType::Normal,
        }
    }

    pub fn get_name(&self) -> &'static str {
        match self {
            WeaponType::Normal => "NORMAL RIFLE",
            WeaponType::Spread => "SPREAD GUN",
            WeaponType::Laser => "LASER BEAM",
            WeaponType::MachineGun => "MACHINE GUN",
            WeaponType::Rapid => "RAPID FIRE",
        }
    }

    /// Effective projectile speed including the multiplier
    pub fn projectile_speed(&self) -> f32 {
        let stats = self.stats();
        stats.projectile_speed * stats.speed_multiplier
    }

    /// Unit directions of every pellet fired towards `(dx, dy)`
    pub fn pellet_directions(&self, dx: f32, dy: f32) -> Vec<(f32, f32)> {
        let stats = self.stats();
        if stats.pellets <= 1 {
            return vec![normalize(dx, dy)];
        }

        let base = dy.atan2(dx);
        let half = (stats.pellets / 2) as i32;
        (-half..=half)
            .map(|i| {
                let angle = base + i as f32 * stats.spread_angle;
                (angle.cos(), angle.sin())
            })
            .collect()
    }
}

/// Unit vector along `(dx, dy)`; a zero vector points left
pub fn normalize(dx: f32, dy: f32) -> (f32, f32) {
    let mag = (dx * dx + dy * dy).sqrt();
    if mag <= f32::EPSILON {
        (-1.0, 0.0)
    } else {
        (dx / mag, dy / mag)
    }
}
