//! Spawner
//!
//! Walks the current level's wave list and introduces enemies on the wave's
//! cadence. Platforms and periodic power-ups run on their own intervals,
//! independent of wave progress.

use glam::Vec2;
use rand::Rng;

use super::entity::{Enemy, EnemyKind, Platform, PowerUp, PowerUpKind};
use super::state::RunState;
use crate::consts::*;
use crate::tuning::DropMode;

/// Run every spawner for this frame
pub fn run(state: &mut RunState) {
    spawn_wave_enemies(state);
    spawn_platform(state);
    spawn_periodic_power_up(state);
}

/// Build an enemy of `kind` at `pos` with level-scaled stats
pub fn build_enemy(state: &mut RunState, kind: EnemyKind, pos: Vec2, wave_tag: Option<usize>) -> Enemy {
    let level = state.level_number();
    let arch = kind.archetype();
    let hp = arch.phase_hp(0, level).unwrap_or(1);
    let id = state.next_entity_id();
    let sine_offset = state.rng.random_range(0.0..std::f32::consts::TAU);

    Enemy {
        id,
        kind,
        pos,
        size: Vec2::new(arch.width, arch.height),
        vel: Vec2::new(0.0, arch.speed_at(level)),
        hp,
        max_hp: hp,
        // First shot comes sooner than the steady cadence
        shoot_timer: arch.shot_interval_at(level).map(|i| i.min(60)),
        is_diving: false,
        phase: if arch.is_multi_phase() { Some(0) } else { None },
        sine_offset,
        wave_tag,
    }
}

/// Spawn one enemy just above the top edge
pub fn spawn_enemy(state: &mut RunState, kind: EnemyKind, wave_tag: Option<usize>) {
    let arch = kind.archetype();
    let x = if kind.is_boss_class() {
        (SCREEN_WIDTH - arch.width) / 2.0
    } else {
        state.rng.random_range(0.0..(SCREEN_WIDTH - arch.width))
    };
    let enemy = build_enemy(state, kind, Vec2::new(x, -arch.height), wave_tag);
    log::debug!(
        "Spawned {:?} #{} (hp {}) for wave {:?}",
        kind,
        enemy.id,
        enemy.hp,
        wave_tag
    );
    state.enemies.push(enemy);
}

fn spawn_wave_enemies(state: &mut RunState) {
    if state.level_finished {
        return;
    }
    let Some(wave) = state.current_wave() else {
        return;
    };
    if state.wave.spawned >= wave.count {
        return;
    }

    let level = state.level_number();
    state.wave.phase_frames += 1;
    if state.wave.phase_frames < wave.interval_for(level) {
        return;
    }
    state.wave.phase_frames = 0;

    let remaining = wave.count - state.wave.spawned;
    let burst = wave.burst_for(level).min(remaining);
    let tag = Some(state.wave_index);
    for _ in 0..burst {
        spawn_enemy(state, wave.kind, tag);
        state.wave.spawned += 1;
    }
}

/// Hazards pause during boss waves
fn spawn_platform(state: &mut RunState) {
    if !state.tuning.platforms_enabled {
        return;
    }
    if state.current_wave().is_some_and(|w| w.is_boss_wave()) {
        return;
    }
    let level = state.level_number();
    let interval = 300u64.saturating_sub(level as u64 * 20).max(40);
    if state.frame % interval != 0 {
        return;
    }
    let x = state.rng.random_range(0.0..(SCREEN_WIDTH - PLATFORM_WIDTH));
    state.platforms.push(Platform {
        pos: Vec2::new(x, -PLATFORM_HEIGHT),
        size: Vec2::new(PLATFORM_WIDTH, PLATFORM_HEIGHT),
        vel: Vec2::new(0.0, 1.5 + level as f32 * 0.1),
    });
}

/// Only used when kills do not roll their own drops
fn spawn_periodic_power_up(state: &mut RunState) {
    if state.tuning.drop_mode != DropMode::Periodic {
        return;
    }
    let interval = state.tuning.periodic_drop_interval.max(1) as u64;
    if state.frame % interval != 0 {
        return;
    }
    let pick = state.rng.random_range(0..PowerUpKind::BASIC.len());
    let kind = PowerUpKind::BASIC[pick];
    let x = state.rng.random_range(0.0..(SCREEN_WIDTH - POWER_UP_SIZE));
    let mut power_up = PowerUp::dropped_at(kind, Vec2::ZERO);
    power_up.pos = Vec2::new(x, -POWER_UP_SIZE);
    state.power_ups.push(power_up);
}
