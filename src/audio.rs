//! Audio cue synthesis
//!
//! Procedurally generated sound effects: every cue is a handful of simple
//! oscillator tones. The manager turns a cue into tone descriptions scaled
//! by the player's volume; the host plays them on whatever backend it has.

use serde::Serialize;

use crate::settings::Settings;
use crate::sim::AudioCue;

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    Sine,
    Square,
    Triangle,
    Sawtooth,
}

/// One oscillator burst
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Tone {
    pub freq: f32,
    pub waveform: Waveform,
    /// Seconds
    pub duration: f32,
    /// Peak gain after volume scaling
    pub volume: f32,
    /// Start offset from the trigger (ms)
    pub delay_ms: u32,
}

impl Tone {
    const fn new(freq: f32, waveform: Waveform, duration: f32, volume: f32) -> Self {
        Self {
            freq,
            waveform,
            duration,
            volume,
            delay_ms: 0,
        }
    }

    const fn after(mut self, delay_ms: u32) -> Self {
        self.delay_ms = delay_ms;
        self
    }
}

/// Semitone ratio used to climb the combo cue
const SEMITONE: f32 = 1.059;

/// Unscaled tones for a cue
pub fn tones(cue: AudioCue) -> Vec<Tone> {
    use Waveform::*;
    match cue {
        AudioCue::Shoot => vec![Tone::new(880.0, Square, 0.1, 0.05)],
        AudioCue::EnemyShoot => vec![Tone::new(220.0, Triangle, 0.1, 0.05)],
        AudioCue::Explosion => vec![
            Tone::new(60.0, Sawtooth, 0.6, 0.2),
            Tone::new(40.0, Square, 0.4, 0.1),
        ],
        AudioCue::Hit => vec![Tone::new(440.0, Sine, 0.05, 0.1)],
        AudioCue::Damage => vec![Tone::new(150.0, Square, 0.3, 0.2)],
        AudioCue::PowerUp => vec![
            Tone::new(600.0, Sine, 0.1, 0.1),
            Tone::new(900.0, Sine, 0.1, 0.1).after(80),
            Tone::new(1200.0, Sine, 0.2, 0.1).after(160),
        ],
        AudioCue::Bomb => vec![
            Tone::new(300.0, Sawtooth, 1.0, 0.3),
            Tone::new(100.0, Sawtooth, 1.0, 0.3),
        ],
        AudioCue::Combo(count) => {
            vec![Tone::new(220.0 * SEMITONE.powi(count as i32), Sine, 0.1, 0.1)]
        }
    }
}

/// Audio manager for the game
#[derive(Debug, Clone)]
pub struct AudioManager {
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let mut audio = Self::new();
        audio.apply_settings(settings);
        audio
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.set_master_volume(settings.master_volume);
        self.set_sfx_volume(settings.sfx_volume);
        self.set_muted(settings.muted);
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Tones to play for a cue at the current volume (empty when silent)
    pub fn play(&self, cue: AudioCue) -> Vec<Tone> {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return Vec::new();
        }
        tones(cue)
            .into_iter()
            .map(|tone| Tone {
                volume: tone.volume * vol,
                ..tone
            })
            .collect()
    }
}
