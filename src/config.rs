//! Optional TOML settings: form defaults and audio switches.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::entities::WeaponType;
use crate::scene::DEFAULT_PLAYER_NAME;

/// File looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "contra.toml";
/// Environment variable overriding the config path
pub const CONFIG_ENV: &str = "CONTRA_CONFIG";

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub player: PlayerConfig,
    pub audio: AudioConfig,
}

/// Values pre-filled on the welcome form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub name: String,
    pub weapon: WeaponType,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_PLAYER_NAME.to_string(),
            weapon: WeaponType::Normal,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub enabled: bool,
    /// 0.0 - 1.0
    pub sfx_volume: f32,
    /// 0.0 - 1.0
    pub music_volume: f32,
    pub sounds_dir: PathBuf,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sfx_volume: 0.5,
            music_volume: 0.5,
            sounds_dir: PathBuf::from("assets/sounds"),
        }
    }
}

impl GameConfig {
    pub fn from_toml_str(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from `path`; a missing file means defaults
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_toml_str(&contents, path),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    /// Path from `$CONTRA_CONFIG`, else `contra.toml`
    pub fn default_path() -> PathBuf {
        std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }
}
