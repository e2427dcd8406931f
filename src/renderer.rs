use crate::entities::{
    BUNKER_WIDTH, BUNKER_X, EnemyType, Facing, Player, PowerUpKind, Projectile, ProjectileOwner,
    ProjectileType, WeaponType,
};
use crate::game::{Game, GameState};
use crate::hud::{HudText, banner};
use crate::welcome::WelcomeForm;
use crate::world::{GROUND_TOP, VIEW_HEIGHT, VIEW_WIDTH};
use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

/// Top of the bunker wall behind the turrets
const BUNKER_TOP: f32 = 100.0;

/// View struct that holds all game state needed for rendering
pub struct RenderView<'a> {
    pub game: &'a Game,
    pub hud: HudText,
    pub area: Rect,
    pub fps: u32,
}

/// Maps world pixels inside the camera's view onto terminal cells
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub area: Rect,
    pub scroll_x: f32,
}

impl Viewport {
    pub fn new(area: Rect, scroll_x: f32) -> Self {
        Self { area, scroll_x }
    }

    /// Cell for a world point, or None when it falls outside the view
    pub fn to_cell(&self, x: f32, y: f32) -> Option<(u16, u16)> {
        if self.area.width == 0 || self.area.height == 0 {
            return None;
        }
        let rel_x = (x - self.scroll_x) / VIEW_WIDTH;
        let rel_y = y / VIEW_HEIGHT;
        if !(0.0..1.0).contains(&rel_x) || !(0.0..1.0).contains(&rel_y) {
            return None;
        }
        let col = (rel_x * self.area.width as f32) as u16;
        let row = (rel_y * self.area.height as f32) as u16;
        Some((self.area.x + col, self.area.y + row))
    }

    /// Draw `text` starting at a world point, clipped to the view
    fn put(&self, buffer: &mut Buffer, x: f32, y: f32, text: &str, style: Style) {
        let Some((col, row)) = self.to_cell(x, y) else {
            return;
        };
        let room = (self.area.x + self.area.width).saturating_sub(col) as usize;
        buffer.set_stringn(col, row, text, room, style);
    }

    /// Draw sprite rows centred on a world point
    fn put_sprite(&self, buffer: &mut Buffer, x: f32, y: f32, lines: &[&str], style: Style) {
        let Some((col, row)) = self.to_cell(x, y) else {
            return;
        };
        let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) as u16;
        let left = col.saturating_sub(width / 2).max(self.area.x);
        let top = row.saturating_sub(lines.len() as u16 / 2).max(self.area.y);
        let bottom = self.area.y + self.area.height;
        let room = (self.area.x + self.area.width).saturating_sub(left) as usize;
        for (i, line) in lines.iter().enumerate() {
            let r = top + i as u16;
            if r >= bottom {
                break;
            }
            buffer.set_stringn(left, r, *line, room, style);
        }
    }
}

fn player_sprite(player: &Player) -> [&'static str; 3] {
    match (player.is_dead, player.facing) {
        (true, _) => ["\\ /", " X ", "/ \\"],
        (false, Facing::Right) => [" o ", "/|=", "/ \\"],
        (false, Facing::Left) => [" o ", "=|\\", "/ \\"],
    }
}

fn projectile_glyph(projectile: &Projectile) -> (&'static str, Color) {
    match (projectile.projectile_type, projectile.owner) {
        (ProjectileType::Laser, _) => ("==", Color::Cyan),
        (ProjectileType::Bullet, ProjectileOwner::Player) => ("•", Color::Yellow),
        (_, ProjectileOwner::Enemy) | (ProjectileType::EnemyShot, _) => ("*", Color::LightRed),
    }
}

fn power_up_color(kind: PowerUpKind) -> Color {
    match kind {
        PowerUpKind::Spread => Color::LightRed,
        PowerUpKind::Laser => Color::Cyan,
        PowerUpKind::MachineGun => Color::Yellow,
        PowerUpKind::Rapid => Color::LightGreen,
    }
}

/// Handles all rendering responsibilities for the game
#[derive(Default)]
pub struct GameRenderer {}

impl GameRenderer {
    /// Creates a new GameRenderer
    pub fn new() -> Self {
        Self {}
    }

    /// Draws the level, the HUD and any state banner
    pub fn render(&self, frame: &mut Frame, view: &RenderView) {
        self.render_game(frame, view);
        if let Some(text) = banner(view.game) {
            self.render_banner(frame, view, &text);
        }
    }

    /// Renders the active gameplay screen
    fn render_game(&self, frame: &mut Frame, view: &RenderView) {
        let area = view.area;
        let game = view.game;
        let now = game.now();

        // HUD takes the top two rows, the controls hint the bottom one
        let play_area = Rect {
            x: area.x,
            y: area.y + 2,
            width: area.width,
            height: area.height.saturating_sub(3),
        };
        let vp = Viewport::new(play_area, game.camera().scroll_x);
        let buffer = frame.buffer_mut();

        // Ground strip
        if let Some((_, row)) = vp.to_cell(vp.scroll_x, GROUND_TOP) {
            let ground = "▀".repeat(play_area.width as usize);
            buffer.set_string(play_area.x, row, ground, Style::default().fg(Color::Green));
        }

        // Bunker wall, one column per cell it covers
        let mut wall_x = BUNKER_X;
        while wall_x < BUNKER_X + BUNKER_WIDTH {
            let mut wall_y = BUNKER_TOP;
            while wall_y < GROUND_TOP {
                vp.put(buffer, wall_x, wall_y, "▒", Style::default().fg(Color::DarkGray));
                wall_y += VIEW_HEIGHT / play_area.height.max(1) as f32;
            }
            wall_x += VIEW_WIDTH / play_area.width.max(1) as f32;
        }

        for turret in game.boss().turrets.iter().filter(|t| t.is_alive) {
            let color = if turret.is_flashing(now) {
                Color::White
            } else {
                Color::Red
            };
            let sprite = if turret.is_critical() { "[x]" } else { "[#]" };
            vp.put_sprite(
                buffer,
                turret.x,
                turret.y,
                &[sprite],
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            );
        }

        for enemy in game.enemies() {
            let color = if enemy.is_flashing(now) {
                Color::White
            } else {
                match enemy.enemy_type {
                    EnemyType::Soldier => Color::Red,
                    EnemyType::Sniper => Color::Magenta,
                }
            };
            let sprite: &[&str] = match enemy.enemy_type {
                EnemyType::Soldier => &[" x ", "<|\\", "/ \\"],
                EnemyType::Sniper => &[" x ", "-|\\", "| |"],
            };
            vp.put_sprite(
                buffer,
                enemy.body.x,
                enemy.body.y,
                sprite,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            );
        }

        // Player flashes white while the barrier is up or right after a pickup
        let player = game.player();
        let blink = player.is_invulnerable(now) && (now / 100) % 2 == 0;
        let player_color = if player.is_flashing(now) || blink {
            Color::White
        } else if player.is_dead {
            Color::DarkGray
        } else {
            Color::LightBlue
        };
        vp.put_sprite(
            buffer,
            player.x(),
            player.y(),
            &player_sprite(player),
            Style::default()
                .fg(player_color)
                .add_modifier(Modifier::BOLD),
        );

        for projectile in game.bullets().active().chain(game.enemy_bullets().active()) {
            let (glyph, color) = projectile_glyph(projectile);
            vp.put(buffer, projectile.x, projectile.y, glyph, Style::default().fg(color));
        }

        for power_up in game.power_ups() {
            let label = format!("({})", power_up.kind.get_char());
            vp.put_sprite(
                buffer,
                power_up.body.x,
                power_up.body.y,
                &[label.as_str()],
                Style::default()
                    .fg(power_up_color(power_up.kind))
                    .add_modifier(Modifier::BOLD),
            );
        }

        let effects = game.effects();
        for spark in &effects.sparks {
            let color = if spark.alpha(now) > 0.5 {
                Color::Yellow
            } else {
                Color::LightRed
            };
            vp.put(buffer, spark.x, spark.y, "+", Style::default().fg(color));
        }
        for text in &effects.floating_texts {
            let alpha = text.alpha(now);
            if alpha <= 0.2 {
                continue;
            }
            let color = if alpha > 0.6 {
                Color::Yellow
            } else {
                Color::DarkGray
            };
            vp.put(
                buffer,
                text.x,
                text.y(now),
                &text.text,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            );
        }

        self.render_hud(frame, view);
    }

    fn render_hud(&self, frame: &mut Frame, view: &RenderView) {
        let area = view.area;
        let hud = &view.hud;

        let top = Line::from(vec![
            Span::styled(
                hud.score.clone(),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(hud.stage.clone(), Style::default().fg(Color::White)),
            Span::raw("  "),
            Span::styled(hud.lives.clone(), Style::default().fg(Color::LightRed)),
        ]);
        let second = Line::from(vec![
            Span::styled(
                hud.weapon.clone(),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  FPS: {}", view.fps),
                Style::default().fg(Color::DarkGray),
            ),
        ]);

        let hud_area = Rect {
            x: area.x + 1,
            y: area.y,
            width: area.width.saturating_sub(2),
            height: 2.min(area.height),
        };
        frame.render_widget(Paragraph::new(vec![top, second]), hud_area);

        // Controls hint at bottom
        let controls = Line::from(vec![Span::styled(
            "[WASD/Arrows: Move, W: Jump] [Space: Fire] [P: Pause] [Q: Quit]",
            Style::default().fg(Color::DarkGray),
        )]);
        let controls_area = Rect {
            x: area.x + 1,
            y: area.y + area.height.saturating_sub(1),
            width: area.width.saturating_sub(2),
            height: 1.min(area.height),
        };
        frame.render_widget(Paragraph::new(controls).centered(), controls_area);
    }

    /// Boxed message over the level
    fn render_banner(&self, frame: &mut Frame, view: &RenderView, text: &str) {
        let area = view.area;
        let (color, hint) = match view.game.state() {
            GameState::Paused => (Color::Yellow, "Press P to resume".to_string()),
            GameState::StageClear => (Color::Green, "Next stage incoming...".to_string()),
            GameState::GameOver => (
                Color::Red,
                format!("Final score: {}", view.game.progression().score),
            ),
            GameState::Playing => (Color::White, String::new()),
        };

        let lines = vec![
            Line::from(""),
            Line::from(text.to_string()).centered().bold().fg(color),
            Line::from(""),
            Line::from(hint).centered().white(),
        ];

        let width = 34.min(area.width);
        let height = 6.min(area.height);
        let banner_area = Rect {
            x: area.x + (area.width - width) / 2,
            y: area.y + (area.height - height) / 2,
            width,
            height,
        };

        frame.render_widget(
            Paragraph::new(lines)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(color)),
                )
                .alignment(Alignment::Center),
            banner_area,
        );
    }

    /// Renders the name entry and weapon choice screen
    pub fn render_welcome(&self, frame: &mut Frame, form: &WelcomeForm, area: Rect) {
        let mut lines = vec![
            Line::from(""),
            Line::from("C O N T R A").centered().red().bold(),
            Line::from("R E B O R N").centered().yellow().bold(),
            Line::from(""),
            Line::from("ENTER YOUR NAME").centered().white(),
            Line::from(format!("[ {:<12}_]", form.name))
                .centered()
                .cyan()
                .bold(),
            Line::from(""),
            Line::from("CHOOSE YOUR WEAPON").centered().white(),
        ];

        for (i, weapon) in WeaponType::SELECTABLE.iter().enumerate() {
            let stats = weapon.stats();
            let text = format!(
                "{:<12} {:>4} ms  x{}",
                weapon.get_name(),
                stats.fire_rate_ms,
                stats.pellets
            );
            let line = if i == form.selected {
                Line::from(format!("> {text} <")).centered().yellow().bold()
            } else {
                Line::from(format!("  {text}  ")).centered().dark_gray()
            };
            lines.push(line);
        }

        lines.extend([
            Line::from(""),
            Line::from("WASD to MOVE | SPACE to SHOOT").centered().white(),
            Line::from("Up/Down: weapon  Enter: start  Esc: quit")
                .centered()
                .dark_gray(),
        ]);

        frame.render_widget(
            Paragraph::new(lines)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::DarkGray)),
                )
                .alignment(Alignment::Center),
            area,
        );
    }
}
