//! In-run progression
//!
//! A wave is cleared once its full count has spawned and none of the
//! enemies tagged with it are still alive. Clearing the last wave marks the
//! level finished; the app layer signals completion after a delay.

use super::combat::BOSS_DEFEATED_BANNER;
use super::entity::EnemyKind;
use super::state::{GameEvent, RunState, WaveProgress};

/// Spawned its whole count
pub fn wave_exhausted(state: &RunState) -> bool {
    match state.current_wave() {
        Some(wave) => state.wave.spawned >= wave.count,
        None => true,
    }
}

/// Exhausted and nothing from it left on screen
pub fn wave_cleared(state: &RunState) -> bool {
    let tag = Some(state.wave_index);
    wave_exhausted(state) && !state.enemies.iter().any(|e| e.wave_tag == tag)
}

/// Advance waves / finish the level when the current wave is cleared
pub fn check(state: &mut RunState) {
    if !state.is_active() || state.level_finished {
        return;
    }
    if !wave_cleared(state) {
        return;
    }

    let has_next = state
        .current_level()
        .is_some_and(|level| state.wave_index + 1 < level.waves.len());

    if has_next {
        state.wave_index += 1;
        state.wave = WaveProgress::default();
        state.push_event(GameEvent::WaveStarted {
            wave: state.wave_index,
        });
        let banner = match state.current_wave().map(|w| w.kind) {
            Some(EnemyKind::Boss) => "BOSS INCOMING".to_string(),
            Some(EnemyKind::Midboss) => "WARNING".to_string(),
            _ => format!("WAVE {}", state.wave_index + 1),
        };
        log::info!(
            "Level {} wave {} started",
            state.level_number(),
            state.wave_index + 1
        );
        state.announce(banner);
    } else {
        state.level_finished = true;
        log::info!(
            "Level {} cleared (score {})",
            state.level_number(),
            state.score
        );
        state.push_event(GameEvent::LevelFinished {
            level: state.level_index,
        });
        // The boss banner owns the screen until its own clear task runs
        if state.announcement.as_deref() != Some(BOSS_DEFEATED_BANNER) {
            state.announce("LEVEL CLEAR".to_string());
        }
    }
}
