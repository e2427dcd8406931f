//! Data handed from the welcome form to the level, and from one level to the
//! next.

use serde::{Deserialize, Serialize};

use crate::entities::WeaponType;

pub const DEFAULT_PLAYER_NAME: &str = "RECRUIT";
pub const MAX_NAME_LEN: usize = 12;

/// Scene transition data: who is playing and with which gun
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawRunSetup")]
pub struct RunSetup {
    pub player_name: String,
    pub weapon_type: WeaponType,
}

/// Transition data as written by hand; unknown weapon tags fall back to
/// NORMAL and the name goes through the same rules as the form.
#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawRunSetup {
    player_name: String,
    weapon_type: String,
}

impl From<RawRunSetup> for RunSetup {
    fn from(raw: RawRunSetup) -> Self {
        RunSetup::new(&raw.player_name, WeaponType::from_tag(&raw.weapon_type))
    }
}

impl Default for RunSetup {
    fn default() -> Self {
        Self {
            player_name: DEFAULT_PLAYER_NAME.to_string(),
            weapon_type: WeaponType::Normal,
        }
    }
}

impl RunSetup {
    pub fn new(player_name: &str, weapon_type: WeaponType) -> Self {
        Self {
            player_name: normalize_name(player_name),
            weapon_type,
        }
    }
}

/// Upper-case, trimmed and capped; a blank name becomes the default.
pub fn normalize_name(raw: &str) -> String {
    // upper-casing can grow a name ("ß" becomes "SS"), so cap afterwards
    let name: String = raw
        .trim()
        .to_uppercase()
        .chars()
        .filter(|c| !c.is_control())
        .take(MAX_NAME_LEN)
        .collect();

    if name.trim().is_empty() {
        DEFAULT_PLAYER_NAME.to_string()
    } else {
        name.trim().to_string()
    }
}
