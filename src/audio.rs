use log::{info, warn};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source, source::Buffered};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::config::AudioConfig;
use crate::game::GameEvent;

type Sound = Buffered<Decoder<BufReader<File>>>;

/// Named clips looked up as `<sounds_dir>/<name>.wav`
pub const SOUND_NAMES: [&str; 5] = [
    "sfx_shoot",
    "sfx_explosion",
    "sfx_death",
    "sfx_powerup",
    "bgm_jungle",
];

const MUSIC: &str = "bgm_jungle";

/// Clip to play for an event, if any
pub fn sound_for(event: &GameEvent) -> Option<&'static str> {
    match event {
        GameEvent::PlayerFired { .. } => Some("sfx_shoot"),
        GameEvent::EnemyKilled { .. } | GameEvent::TurretDestroyed { .. } => {
            Some("sfx_explosion")
        }
        GameEvent::PlayerDied { .. } => Some("sfx_death"),
        GameEvent::PowerUpCollected { .. } => Some("sfx_powerup"),
        GameEvent::PlayerRespawned
        | GameEvent::StageCleared { .. }
        | GameEvent::GameOver { .. }
        | GameEvent::StageStarted { .. } => None,
    }
}

/// Plays sound effects and the looping stage music
pub struct AudioManager {
    /// Keeps the device open; None when there is no output device
    output: Option<(OutputStream, OutputStreamHandle)>,
    sounds: HashMap<&'static str, Sound>,
    music: Option<Sink>,
    sfx_volume: f32,
    music_volume: f32,
}

impl AudioManager {
    /// Open the default output and pre-load every clip found. Missing clips
    /// or a missing device leave the game silent rather than failing.
    pub fn new(config: &AudioConfig) -> Self {
        let mut manager = Self::silent();
        if !config.enabled {
            info!("audio disabled by config");
            return manager;
        }

        match OutputStream::try_default() {
            Ok(output) => manager.output = Some(output),
            Err(err) => {
                warn!("failed to open audio output: {}", err);
                return manager;
            }
        }

        manager.sfx_volume = config.sfx_volume.clamp(0.0, 1.0);
        manager.music_volume = config.music_volume.clamp(0.0, 1.0);
        for name in SOUND_NAMES {
            match load_sound(&config.sounds_dir, name) {
                Ok(sound) => {
                    manager.sounds.insert(name, sound);
                }
                Err(err) => warn!("failed to load sound {}: {}", name, err),
            }
        }
        manager
    }

    /// A manager that never makes a sound
    pub fn silent() -> Self {
        Self {
            output: None,
            sounds: HashMap::new(),
            music: None,
            sfx_volume: 0.0,
            music_volume: 0.0,
        }
    }

    /// Play a one-off clip at the effects volume
    pub fn play(&self, name: &str) {
        let (Some((_, handle)), Some(sound)) = (&self.output, self.sounds.get(name)) else {
            return;
        };
        // Ignore errors for sound playback - don't want to crash the game
        if let Ok(sink) = Sink::try_new(handle) {
            sink.set_volume(self.sfx_volume);
            sink.append(sound.clone());
            sink.detach();
        }
    }

    pub fn handle_event(&self, event: &GameEvent) {
        if let Some(name) = sound_for(event) {
            self.play(name);
        }
    }

    /// Start the stage music if it is not already playing
    pub fn start_music(&mut self) {
        if self.music.is_some() {
            return;
        }
        let (Some((_, handle)), Some(track)) = (&self.output, self.sounds.get(MUSIC)) else {
            return;
        };
        if let Ok(sink) = Sink::try_new(handle) {
            sink.set_volume(self.music_volume);
            sink.append(track.clone().repeat_infinite());
            self.music = Some(sink);
        }
    }

    pub fn stop_music(&mut self) {
        if let Some(sink) = self.music.take() {
            sink.stop();
        }
    }
}

fn load_sound(dir: &Path, name: &str) -> Result<Sound, Box<dyn std::error::Error>> {
    let file = File::open(dir.join(format!("{name}.wav")))?;
    let source = Decoder::new(BufReader::new(file))?;
    Ok(source.buffered())
}
