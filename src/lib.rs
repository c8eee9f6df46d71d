//! Overheat - a vertical bullet-hell survival shooter
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (entities, spawning, combat, timers, progression)
//! - `game`: App state machine that owns a run and drives the simulation
//! - `scheduler`: Deferred tasks bound to a run identity
//! - `platform`: Buffered player input
//! - `audio`: Named audio cues and their tone descriptions
//! - `persistence`: Key-value seam for high score / unlock progress
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod game;
pub mod persistence;
pub mod platform;
pub mod scheduler;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use game::{AppState, Collaborators, Game};
pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Simulation runs one tick per display refresh at 60 Hz
    pub const FRAME_RATE: u32 = 60;
    pub const FRAME_DT: f32 = 1.0 / FRAME_RATE as f32;
    /// Maximum ticks per host callback to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Playfield dimensions (logical pixels, y grows downward)
    pub const SCREEN_WIDTH: f32 = 320.0;
    pub const SCREEN_HEIGHT: f32 = 480.0;

    pub const PLAYER_SIZE: f32 = 16.0;
    /// Player row (top edge)
    pub const PLAYER_Y: f32 = SCREEN_HEIGHT - 40.0;
    /// Pointer easing per frame
    pub const PLAYER_FOLLOW: f32 = 0.4;

    pub const BULLET_SIZE: f32 = 4.0;
    pub const ENEMY_SIZE: f32 = 16.0;
    pub const BOSS_SIZE: f32 = 64.0;
    pub const POWER_UP_SIZE: f32 = 16.0;
    pub const PLATFORM_WIDTH: f32 = 32.0;
    pub const PLATFORM_HEIGHT: f32 = 8.0;

    /// Bullets despawn once this far beyond the top/bottom edge
    pub const BULLET_MARGIN: f32 = 20.0;

    pub const START_LIVES: u32 = 3;
    pub const MAX_LIVES: u32 = 5;

    /// Post-hit immunity window
    pub const IMMUNITY_FRAMES: u32 = 90;
    /// Kills further apart than this reset the combo (1500 ms)
    pub const COMBO_TIMEOUT_FRAMES: u64 = 90;
    pub const MAX_COMBO_CUE: u32 = 12;

    /// Player fire cadence (frames between shots)
    pub const FIRE_COOLDOWN_BASE: u32 = 7;
    pub const FIRE_COOLDOWN_RAPID: u32 = 3;
    pub const FIRE_COOLDOWN_OVERDRIVE: u32 = 2;
    pub const FIRE_COOLDOWN_LASER: u32 = 6;
    pub const FIRE_COOLDOWN_MIN: u32 = 3;

    pub const PLAYER_BULLET_SPEED: f32 = 7.0;
    pub const ENEMY_BULLET_SPEED: f32 = 4.0;
    pub const HOMING_BULLET_SPEED: f32 = 2.5;

    /// Screen shake impulses and per-frame decay
    pub const SHAKE_DAMAGE: f32 = 15.0;
    pub const SHAKE_BOMB: f32 = 20.0;
    pub const SHAKE_GAME_OVER: f32 = 20.0;
    pub const SHAKE_PHASE_BREAK: f32 = 12.0;
    pub const SHAKE_DECAY: f32 = 0.9;
    pub const SHAKE_EPSILON: f32 = 0.05;

    /// Power-up drift and magnet pull (pixels per frame)
    pub const POWER_UP_FALL_SPEED: f32 = 1.2;
    pub const MAGNET_PULL: f32 = 2.5;

    /// Points per enemy caught in a bomb blast
    pub const BOMB_POINTS: u64 = 5;
    /// Damage a bomb deals to boss-class enemies
    pub const BOMB_BOSS_DAMAGE: u32 = 10;

    /// Particle life lost per frame
    pub const PARTICLE_FADE: f32 = 0.02;
    pub const MAX_PARTICLES: usize = 512;

    /// Real-time delays for deferred tasks (ms)
    pub const BANNER_MS: f64 = 2000.0;
    pub const LEVEL_COMPLETE_DELAY_MS: f64 = 1500.0;

    /// Palette (0xRRGGBB)
    pub mod palette {
        pub const WHITE: u32 = 0xFFFFFF;
        pub const RED: u32 = 0xFF4136;
        pub const BLUE: u32 = 0x0074D9;
        pub const YELLOW: u32 = 0xFFDC00;
        pub const GRAY: u32 = 0xAAAAAA;
        pub const GREEN: u32 = 0x2ECC40;
        pub const ORANGE: u32 = 0xFF851B;
        pub const PURPLE: u32 = 0xB10DC9;
        pub const CYAN: u32 = 0x7FDBFF;
        pub const MAGENTA: u32 = 0xF012BE;
    }
}

