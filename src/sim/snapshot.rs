//! Read-only view of a run for the renderer

use serde::Serialize;

use super::buffs::{BuffKind, FirePattern};
use super::entity::{Bullet, Enemy, Particle, Platform, Player, PowerUp};
use super::state::{RunState, RunStatus};

/// Everything a frame needs to draw
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub frame: u64,
    pub status: RunStatus,
    pub score: u64,
    pub lives: u32,
    /// 1-based
    pub level: u32,
    /// 1-based
    pub wave: usize,
    pub heat: f32,
    pub multiplier: u64,
    pub combo: u32,
    pub fire_pattern: FirePattern,
    pub active_buffs: Vec<BuffKind>,
    /// Blink the ship while true
    pub immune: bool,
    pub screen_shake: f32,
    pub announcement: Option<String>,
    pub player: Player,
    pub bullets: Vec<Bullet>,
    pub enemies: Vec<Enemy>,
    pub power_ups: Vec<PowerUp>,
    pub platforms: Vec<Platform>,
    pub particles: Vec<Particle>,
}

impl RunState {
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            frame: self.frame,
            status: self.status,
            score: self.score,
            lives: self.lives,
            level: self.level_number(),
            wave: self.wave_index + 1,
            heat: self.heat,
            multiplier: self.multiplier(),
            combo: self.combo,
            fire_pattern: FirePattern::select(&self.buffs),
            active_buffs: self.buffs.active(),
            immune: self.is_immune(),
            screen_shake: self.screen_shake,
            announcement: self.announcement.clone(),
            player: self.player.clone(),
            bullets: self.bullets.clone(),
            enemies: self.enemies.clone(),
            power_ups: self.power_ups.clone(),
            platforms: self.platforms.clone(),
            particles: self.particles.clone(),
        }
    }
}
