//! Run state and core simulation types
//!
//! One `RunState` per active run. It exclusively owns every entity
//! collection; starting a new run builds a fresh one.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::buffs::{BuffKind, Buffs};
use super::entity::{Bullet, Enemy, EnemyKind, Particle, Platform, Player, PowerUp, PowerUpKind};
use super::levels::{LevelDef, WaveDef};
use crate::consts::*;
use crate::tuning::Tuning;

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunEnd {
    LivesExhausted,
    Meltdown,
}

/// Whether the run still accepts simulation ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    Active,
    Ended(RunEnd),
}

/// Named, fire-and-forget audio triggers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioCue {
    Shoot,
    EnemyShoot,
    Hit,
    Damage,
    Explosion,
    PowerUp,
    Bomb,
    /// Kill chain length (capped)
    Combo(u32),
}

/// Things that happened during a tick, drained by the owner of the run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Sound(AudioCue),
    /// Banner text for the renderer (cleared later by a deferred task)
    Announcement(String),
    WaveStarted { wave: usize },
    EnemyKilled { kind: EnemyKind, points: u64 },
    PhaseBreak { kind: EnemyKind, phase: usize },
    PlayerDamaged { lives: u32 },
    PowerUpCollected(PowerUpKind),
    BuffExpired(BuffKind),
    BombDetonated { cleared: u32 },
    /// Every wave of the level is cleared
    LevelFinished { level: usize },
    GameOver { score: u64, cause: RunEnd },
}

/// Player trigger bookkeeping (frame-stamped)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShootState {
    pub is_shooting: bool,
    /// Frame the current hold began
    pub shoot_start: u64,
    pub last_shot: Option<u64>,
}

/// Spawn progress through the current wave
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveProgress {
    /// Enemies spawned so far in this wave (never exceeds its count)
    pub spawned: u32,
    /// Frames since the last spawn tick
    pub phase_frames: u32,
}

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct RunState {
    /// Identity used to reject stale deferred tasks
    pub run_id: u64,
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub tuning: Tuning,
    levels: &'static [LevelDef],
    /// Current level (0-based)
    pub level_index: usize,
    /// Current wave within the level (0-based)
    pub wave_index: usize,
    pub wave: WaveProgress,
    /// All waves cleared; waiting for the level-complete signal
    pub level_finished: bool,
    /// Simulation frame counter
    pub frame: u64,
    pub status: RunStatus,
    pub score: u64,
    pub lives: u32,
    pub combo: u32,
    pub last_kill_frame: u64,
    pub player: Player,
    pub bullets: Vec<Bullet>,
    pub enemies: Vec<Enemy>,
    pub power_ups: Vec<PowerUp>,
    pub platforms: Vec<Platform>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    pub shooting: ShootState,
    /// 0..=1, recomputed while the trigger is held
    pub heat: f32,
    pub buffs: Buffs,
    /// Post-hit invulnerability countdown
    pub immunity: u32,
    pub screen_shake: f32,
    pub announcement: Option<String>,
    pub max_particles: usize,
    events: Vec<GameEvent>,
    next_id: u32,
}

impl RunState {
    /// Start a run at the given level. The caller checks the index against
    /// the table first; any out-of-range index yields a run with no waves.
    pub fn new(
        seed: u64,
        run_id: u64,
        level_index: usize,
        levels: &'static [LevelDef],
        tuning: Tuning,
    ) -> Self {
        let mut state = Self {
            run_id,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            levels,
            level_index,
            wave_index: 0,
            wave: WaveProgress::default(),
            level_finished: false,
            frame: 0,
            status: RunStatus::Active,
            score: 0,
            lives: START_LIVES,
            combo: 0,
            last_kill_frame: 0,
            player: Player::default(),
            bullets: Vec::new(),
            enemies: Vec::new(),
            power_ups: Vec::new(),
            platforms: Vec::new(),
            particles: Vec::new(),
            shooting: ShootState::default(),
            heat: 0.0,
            buffs: Buffs::default(),
            immunity: 0,
            screen_shake: 0.0,
            announcement: None,
            max_particles: MAX_PARTICLES,
            events: Vec::new(),
            next_id: 1,
        };

        log::info!(
            "Run {} started at level {} (seed {})",
            run_id,
            state.level_number(),
            seed
        );
        let banner = format!("LEVEL {}", state.level_number());
        state.announce(banner);
        state
    }

    /// 1-based level number used by every difficulty formula (saturates)
    #[inline]
    pub fn level_number(&self) -> u32 {
        u32::try_from(self.level_index.saturating_add(1)).unwrap_or(u32::MAX)
    }

    pub fn current_level(&self) -> Option<&'static LevelDef> {
        self.levels.get(self.level_index)
    }

    pub fn current_wave(&self) -> Option<&'static WaveDef> {
        self.current_level()
            .and_then(|level| level.waves.get(self.wave_index))
    }

    pub fn is_active(&self) -> bool {
        self.status == RunStatus::Active
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn cue(&mut self, cue: AudioCue) {
        self.events.push(GameEvent::Sound(cue));
    }

    /// Take all events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn announce(&mut self, text: String) {
        self.announcement = Some(text.clone());
        self.events.push(GameEvent::Announcement(text));
    }

    /// Clear the banner only if it still shows `text`
    pub fn clear_announcement(&mut self, text: &str) {
        if self.announcement.as_deref() == Some(text) {
            self.announcement = None;
        }
    }

    /// Score multiplier (overdrive doubles)
    pub fn multiplier(&self) -> u64 {
        if self.buffs.is_active(BuffKind::Overdrive) {
            2
        } else {
            1
        }
    }

    /// Add points scaled by the active multiplier
    pub fn award(&mut self, points: u64) -> u64 {
        let scaled = points * self.multiplier();
        self.score += scaled;
        scaled
    }

    /// Immunity window or shield
    pub fn is_immune(&self) -> bool {
        self.immunity > 0 || self.buffs.is_active(BuffKind::Shield)
    }

    /// Effective speed factor for enemies and their bullets
    pub fn enemy_speed_factor(&self) -> f32 {
        if self.buffs.is_active(BuffKind::Slow) {
            self.tuning.slow_factor
        } else {
            1.0
        }
    }

    /// Frames of continuous fire allowed before meltdown
    pub fn heat_threshold_frames(&self) -> f32 {
        let mut threshold = self.tuning.overheat_threshold_frames as f32;
        if self.buffs.is_active(BuffKind::Coolant) {
            threshold *= self.tuning.coolant_factor;
        }
        if self.buffs.is_active(BuffKind::Overdrive) {
            threshold *= self.tuning.overdrive_heat_factor;
        }
        threshold.max(1.0)
    }

    /// Add screen shake, keeping the larger of current and new magnitude
    pub fn shake(&mut self, magnitude: f32) {
        self.screen_shake = self.screen_shake.max(magnitude);
    }

    /// Burst of particles around a point
    pub fn spawn_explosion(&mut self, center: Vec2, color: u32, count: usize, size: f32) {
        for _ in 0..count {
            if self.particles.len() >= self.max_particles {
                break;
            }
            let vel = Vec2::new(
                self.rng.random_range(-3.0..3.0),
                self.rng.random_range(-3.0..3.0),
            );
            self.particles.push(Particle {
                pos: center,
                vel,
                color,
                size,
                life: 1.0,
            });
        }
    }

    /// Terminate the run. Only the first call has any effect.
    pub fn end_run(&mut self, cause: RunEnd) {
        if !self.is_active() {
            return;
        }
        self.status = RunStatus::Ended(cause);
        self.shooting.is_shooting = false;
        log::info!(
            "Run {} over ({:?}) at level {} with score {}",
            self.run_id,
            cause,
            self.level_number(),
            self.score
        );
        self.cue(AudioCue::Explosion);
        let center = self.player.center();
        self.spawn_explosion(center, palette::BLUE, 40, 4.0);
        self.shake(SHAKE_GAME_OVER);
        self.push_event(GameEvent::GameOver {
            score: self.score,
            cause,
        });
    }
}
