use color_eyre::Result;
use log::{debug, info};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::time::{Duration, Instant};

use crate::audio::AudioManager;
use crate::config::GameConfig;
use crate::game::{Game, GameEvent, GameState};
use crate::hud::HudText;
use crate::input::{InputAction, InputManager, InputMode, controls_from_actions};
use crate::renderer::{GameRenderer, RenderView};
use crate::welcome::WelcomeForm;
use crate::world::FRAME_MS;

/// Longest stretch of real time simulated in one frame, so a stall does not
/// turn into a burst of catch-up steps
const MAX_FRAME_BACKLOG_MS: u64 = 250;

/// Which scene currently owns the screen
pub enum Screen {
    Welcome(WelcomeForm),
    InGame(Box<Game>),
}

/// The main application which holds the state and logic of the application.
pub struct App {
    running: bool,
    screen: Screen,
    /// Real time not yet simulated
    accumulator_ms: u64,
    last_frame_time: Instant,
    fps: u32,
    /// internal components
    input_manager: InputManager,
    renderer: GameRenderer,
    audio_manager: AudioManager,
}

impl App {
    /// Construct a new instance of [`App`] showing the welcome form.
    pub fn new(config: &GameConfig) -> Self {
        Self {
            running: true,
            screen: Screen::Welcome(WelcomeForm::new(
                &config.player.name,
                config.player.weapon,
            )),
            accumulator_ms: 0,
            last_frame_time: Instant::now(),
            fps: 0,
            input_manager: InputManager::new(),
            renderer: GameRenderer::new(),
            audio_manager: AudioManager::new(&config.audio),
        }
    }

    fn input_mode(&self) -> InputMode {
        match &self.screen {
            Screen::Welcome(_) => InputMode::Form,
            Screen::InGame(game) => match game.state() {
                GameState::Playing => InputMode::Playing,
                GameState::Paused => InputMode::Paused,
                GameState::StageClear | GameState::GameOver => InputMode::Locked,
            },
        }
    }

    /// Run the application's main loop.
    pub fn run(mut self, terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) -> Result<()> {
        while self.running {
            // Calculate FPS
            let now = Instant::now();
            let frame_time = now.duration_since(self.last_frame_time);
            self.last_frame_time = now;
            if frame_time.as_micros() > 0 {
                self.fps = (1_000_000 / frame_time.as_micros()) as u32;
            }
            self.accumulator_ms = (self.accumulator_ms + frame_time.as_millis() as u64)
                .min(MAX_FRAME_BACKLOG_MS);

            // Render the frame
            terminal.draw(|frame| {
                let area = frame.area();
                match &self.screen {
                    Screen::Welcome(form) => self.renderer.render_welcome(frame, form, area),
                    Screen::InGame(game) => {
                        let view = RenderView {
                            game,
                            hud: HudText::from_game(game),
                            area,
                            fps: self.fps,
                        };
                        self.renderer.render(frame, &view);
                    }
                }
            })?;

            // Poll input events and get actions
            let mode = self.input_mode();
            self.input_manager.poll_events(mode)?;
            let actions = self.input_manager.get_actions(mode);

            // Process all actions
            self.process_actions(&actions);

            // Update game state
            self.update_game(&actions);

            // Small sleep to maintain ~60 FPS and prevent CPU spinning
            std::thread::sleep(Duration::from_millis(8));
        }

        self.audio_manager.stop_music();
        Ok(())
    }

    /// Handles screen-level actions; movement is folded into controls later
    fn process_actions(&mut self, actions: &[InputAction]) {
        for action in actions {
            match (action, &mut self.screen) {
                (InputAction::Quit, _) => {
                    info!("quit requested");
                    self.running = false;
                    return;
                }
                (InputAction::TypeChar(c), Screen::Welcome(form)) => form.type_char(*c),
                (InputAction::Backspace, Screen::Welcome(form)) => form.backspace(),
                (InputAction::SelectPrev, Screen::Welcome(form)) => form.select_prev(),
                (InputAction::SelectNext, Screen::Welcome(form)) => form.select_next(),
                (InputAction::Submit, Screen::Welcome(form)) => {
                    let setup = form.submit();
                    info!(
                        "mission start: {} with {}",
                        setup.player_name,
                        setup.weapon_type.tag()
                    );
                    self.screen = Screen::InGame(Box::new(Game::new(setup)));
                    self.accumulator_ms = 0;
                    self.input_manager.release_all();
                    self.audio_manager.start_music();
                    return;
                }
                (InputAction::Pause | InputAction::Resume, Screen::InGame(game)) => {
                    game.toggle_pause();
                    debug!("pause toggled, now {:?}", game.state());
                }
                _ => {}
            }
        }
    }

    /// Step the scene in fixed increments for the real time that passed
    fn update_game(&mut self, actions: &[InputAction]) {
        let Screen::InGame(game) = &mut self.screen else {
            self.accumulator_ms = 0;
            return;
        };

        let mut controls = controls_from_actions(actions);
        while self.accumulator_ms >= FRAME_MS {
            game.update(FRAME_MS, &controls);
            self.accumulator_ms -= FRAME_MS;
            // a jump press belongs to one step only
            controls.jump = false;
        }

        for event in game.drain_events() {
            log_event(&event);
            self.audio_manager.handle_event(&event);
        }
    }
}

fn log_event(event: &GameEvent) {
    match event {
        GameEvent::PlayerFired { .. } => {}
        GameEvent::EnemyKilled { enemy_type, points } => {
            debug!("{:?} killed for {} points", enemy_type, points)
        }
        GameEvent::TurretDestroyed { remaining } => info!("turret down, {} left", remaining),
        GameEvent::PowerUpCollected { kind, weapon } => {
            info!("picked up {:?}, now using {}", kind, weapon.tag())
        }
        other => debug!("{:?}", other),
    }
}
