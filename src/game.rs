//! The level scene: owns every entity, advances them in fixed steps and
//! turns collisions and timers into score, deaths and stage changes.

use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::entities::{
    Boss, Controls, Effects, Enemy, EnemyType, EnemySpawner, Player, PowerUp, PowerUpKind,
    PowerUpSpawner, ProjectilePool, WeaponType, spawn_delay_for_stage,
};
use crate::progression::{Carryover, Progression};
use crate::scene::RunSetup;
use crate::world::Camera;

/// Live player rounds at once
pub const MAX_PLAYER_BULLETS: usize = 100;
pub const PLAYER_START: (f32, f32) = (100.0, 450.0);
/// Height a respawned player drops in from
const RESPAWN_Y: f32 = 200.0;
const RESPAWN_DELAY_MS: u64 = 1000;
const INVULNERABLE_MS: u64 = 2200;
const RESTART_DELAY_MS: u64 = 3000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Playing,
    Paused,
    /// Boss destroyed, waiting to roll into the next stage
    StageClear,
    /// Out of lives, waiting to restart
    GameOver,
}

/// Something that happened this step, for sound and logging
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    PlayerFired { weapon: WeaponType },
    EnemyKilled { enemy_type: EnemyType, points: u32 },
    TurretDestroyed { remaining: u32 },
    PowerUpCollected { kind: PowerUpKind, weapon: WeaponType },
    PlayerDied { lives_left: u32 },
    PlayerRespawned,
    StageCleared { stage: u32 },
    GameOver { score: u32 },
    StageStarted { stage: u32 },
}

/// Scene work scheduled for later
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeferredAction {
    Respawn,
    ShowGameOver,
    RestartRun,
    NextStage,
}

#[derive(Debug, Clone, Copy)]
struct Deferred {
    at: u64,
    action: DeferredAction,
}

pub struct Game {
    pub(crate) state: GameState,
    /// Scene time in ms
    pub(crate) now: u64,
    pub(crate) player: Player,
    pub(crate) enemies: Vec<Enemy>,
    pub(crate) bullets: ProjectilePool,
    pub(crate) enemy_bullets: ProjectilePool,
    pub(crate) power_ups: Vec<PowerUp>,
    pub(crate) boss: Boss,
    pub(crate) effects: Effects,
    pub(crate) camera: Camera,
    pub(crate) progression: Progression,
    pub(crate) enemy_spawner: EnemySpawner,
    pub(crate) power_up_spawner: PowerUpSpawner,
    pub(crate) rng: StdRng,
    pub(crate) events: Vec<GameEvent>,
    deferred: Vec<Deferred>,
}

impl Game {
    /// Start a new run
    pub fn new(setup: RunSetup) -> Self {
        Self::from_carryover(Carryover::fresh(setup), StdRng::from_os_rng())
    }

    /// Start a new run with a fixed random seed
    pub fn with_seed(setup: RunSetup, seed: u64) -> Self {
        Self::from_carryover(Carryover::fresh(setup), StdRng::seed_from_u64(seed))
    }

    fn from_carryover(carry: Carryover, rng: StdRng) -> Self {
        let mut game = Self {
            state: GameState::Playing,
            now: 0,
            player: Player::new(
                PLAYER_START.0,
                PLAYER_START.1,
                &carry.setup.player_name,
                carry.setup.weapon_type,
            ),
            enemies: Vec::new(),
            bullets: ProjectilePool::with_max_size(MAX_PLAYER_BULLETS),
            enemy_bullets: ProjectilePool::new(),
            power_ups: Vec::new(),
            boss: Boss::new(carry.stage, 0),
            effects: Effects::default(),
            camera: Camera::new(),
            progression: Progression::new(&carry),
            enemy_spawner: EnemySpawner::new(),
            power_up_spawner: PowerUpSpawner::new(),
            rng,
            events: Vec::new(),
            deferred: Vec::new(),
        };
        game.start_scene();
        game
    }

    fn start_scene(&mut self) {
        let stage = self.progression.stage;
        self.enemy_spawner
            .set_difficulty(spawn_delay_for_stage(stage));
        self.camera.snap_to(self.player.x());
        info!(
            "stage {} start: {} with {} (score {}, lives {})",
            stage,
            self.progression.player_name,
            self.player.weapon.tag(),
            self.progression.score,
            self.progression.lives
        );
        self.events.push(GameEvent::StageStarted { stage });
    }

    /// Replace this scene with a fresh one built from `carry`, keeping the
    /// random stream.
    fn restart(&mut self, carry: Carryover) {
        let rng = std::mem::replace(&mut self.rng, StdRng::seed_from_u64(0));
        let events = std::mem::take(&mut self.events);
        *self = Self::from_carryover(carry, rng);
        // the old scene's last events still need reporting
        let fresh = std::mem::replace(&mut self.events, events);
        self.events.extend(fresh);
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn bullets(&self) -> &ProjectilePool {
        &self.bullets
    }

    pub fn enemy_bullets(&self) -> &ProjectilePool {
        &self.enemy_bullets
    }

    pub fn power_ups(&self) -> &[PowerUp] {
        &self.power_ups
    }

    pub fn boss(&self) -> &Boss {
        &self.boss
    }

    pub fn effects(&self) -> &Effects {
        &self.effects
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn progression(&self) -> &Progression {
        &self.progression
    }

    /// Take everything that happened since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn toggle_pause(&mut self) {
        self.state = match self.state {
            GameState::Playing => GameState::Paused,
            GameState::Paused => GameState::Playing,
            other => other,
        };
    }

    /// Advance the scene by one step of `dt_ms`
    pub fn update(&mut self, dt_ms: u64, controls: &Controls) {
        if self.state == GameState::Paused {
            return;
        }
        self.now += dt_ms;

        if self.state == GameState::Playing {
            self.update_player(controls);
        }
        self.player.update(dt_ms);
        self.camera.follow(self.player.x());

        self.spawn();
        self.update_enemies(dt_ms);
        self.update_boss();

        self.bullets.update(dt_ms, self.now);
        self.enemy_bullets.update(dt_ms, self.now);
        for power_up in &mut self.power_ups {
            power_up.update(dt_ms);
        }
        self.effects.update(dt_ms, self.now);

        if self.state == GameState::Playing {
            self.resolve_collisions();
        }

        self.run_deferred();
    }

    fn update_player(&mut self, controls: &Controls) {
        self.player.apply_controls(controls);
        if !controls.fire {
            return;
        }

        let shots = self.player.try_fire(self.now);
        if shots.is_empty() {
            return;
        }
        let mut spawned = false;
        for shot in shots {
            spawned |= self.bullets.spawn(shot);
        }
        if !spawned {
            debug!(
                "bullet pool full ({} slots), shot dropped",
                self.bullets.capacity_used()
            );
            return;
        }
        self.events.push(GameEvent::PlayerFired {
            weapon: self.player.weapon,
        });
    }

    fn spawn(&mut self) {
        let camera_x = self.camera.scroll_x;
        if let Some(enemy) = self.enemy_spawner.update(&mut self.rng, self.now, camera_x) {
            debug!("spawned {:?} at x={:.0}", enemy.enemy_type, enemy.body.x);
            self.enemies.push(enemy);
        }
        if let Some(power_up) = self
            .power_up_spawner
            .update(&mut self.rng, self.now, camera_x)
        {
            debug!("dropped {:?} power-up at x={:.0}", power_up.kind, power_up.body.x);
            self.power_ups.push(power_up);
        }
    }

    fn update_enemies(&mut self, dt_ms: u64) {
        let target = (self.player.x(), self.player.y());
        for enemy in &mut self.enemies {
            enemy.update(dt_ms);
            if let Some(shot) = enemy.try_fire(self.now, target) {
                self.enemy_bullets.spawn(shot);
            }
        }
        self.enemies.retain(|e| e.active);
    }

    fn update_boss(&mut self) {
        if self.state != GameState::Playing || self.player.is_dead {
            return;
        }
        let target = (self.player.x(), self.player.y());
        for turret in &mut self.boss.turrets {
            if !self.camera.is_visible(turret.x) {
                continue;
            }
            if let Some(shot) = turret.try_fire(self.now, target) {
                self.enemy_bullets.spawn(shot);
            }
        }
    }

    fn schedule(&mut self, delay_ms: u64, action: DeferredAction) {
        self.deferred.push(Deferred {
            at: self.now + delay_ms,
            action,
        });
    }

    fn run_deferred(&mut self) {
        let now = self.now;
        let (due, pending): (Vec<_>, Vec<_>) =
            self.deferred.drain(..).partition(|d| d.at <= now);
        self.deferred = pending;

        for deferred in due {
            match deferred.action {
                DeferredAction::Respawn => self.respawn_player(),
                DeferredAction::ShowGameOver => self.game_over(),
                DeferredAction::RestartRun => {
                    let carry = self.progression.game_over();
                    self.restart(carry);
                    // the old schedule belongs to the old scene
                    return;
                }
                DeferredAction::NextStage => {
                    let carry = self.progression.next_stage(self.player.weapon);
                    self.restart(carry);
                    return;
                }
            }
        }
    }

    pub(crate) fn handle_player_death(&mut self) {
        if self.player.is_dead {
            return;
        }
        self.player.die();
        let lives_left = self.progression.lose_life();
        info!("player down, {} lives left", lives_left);
        self.events.push(GameEvent::PlayerDied { lives_left });

        if lives_left > 0 {
            self.schedule(RESPAWN_DELAY_MS, DeferredAction::Respawn);
        } else {
            self.schedule(RESPAWN_DELAY_MS, DeferredAction::ShowGameOver);
        }
    }

    fn respawn_player(&mut self) {
        let safe_x = (self.camera.scroll_x + 100.0).max(100.0);
        self.player
            .respawn(safe_x, RESPAWN_Y, self.now + INVULNERABLE_MS);
        self.events.push(GameEvent::PlayerRespawned);
    }

    fn game_over(&mut self) {
        self.state = GameState::GameOver;
        let score = self.progression.score;
        info!("game over, final score {}", score);
        self.events.push(GameEvent::GameOver { score });
        self.schedule(RESTART_DELAY_MS, DeferredAction::RestartRun);
    }

    pub(crate) fn clear_stage(&mut self) {
        // a pending game over wins over a boss that fell after the last life
        if self.state != GameState::Playing || self.progression.lives == 0 {
            return;
        }
        self.state = GameState::StageClear;
        let stage = self.progression.stage;
        info!("stage {} clear, score {}", stage, self.progression.score);
        self.events.push(GameEvent::StageCleared { stage });
        self.schedule(RESTART_DELAY_MS, DeferredAction::NextStage);
    }
}
