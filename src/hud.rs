//! Text for the heads-up display and the stage banners.

use crate::game::{Game, GameState};

/// Lines of the HUD, top to bottom
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HudText {
    pub score: String,
    pub stage: String,
    pub weapon: String,
    pub lives: String,
}

pub fn score_line(name: &str, score: u32) -> String {
    format!("{name}: {score:06}")
}

/// Shows the shield instead of the gun while the respawn barrier is up
pub fn weapon_line(weapon_tag: &str, invulnerable: bool) -> String {
    let name = if invulnerable { "BARRIER" } else { weapon_tag };
    format!("WEAPON: {name}")
}

impl HudText {
    pub fn from_game(game: &Game) -> Self {
        let progression = game.progression();
        let player = game.player();
        Self {
            score: score_line(&progression.player_name, progression.score),
            stage: format!("STAGE: {}", progression.stage),
            weapon: weapon_line(player.weapon.tag(), player.is_invulnerable(game.now())),
            lives: format!("LIVES: {}", progression.lives),
        }
    }
}

/// Centre-screen message for the current state, if any
pub fn banner(game: &Game) -> Option<String> {
    match game.state() {
        GameState::Playing => None,
        GameState::Paused => Some("PAUSED".to_string()),
        GameState::StageClear => Some(format!("STAGE {} CLEAR!", game.progression().stage)),
        GameState::GameOver => Some("GAME OVER".to_string()),
    }
}
