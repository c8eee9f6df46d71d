//! Resource and timer manager
//!
//! Runs after combat each frame, so a buff that is alive at the moment of a
//! hit still counts for that hit.

use super::state::{GameEvent, RunEnd, RunState};
use crate::consts::*;

/// Advance every countdown by one frame
pub fn advance(state: &mut RunState) {
    if !state.is_active() {
        return;
    }
    update_heat(state);
    if !state.is_active() {
        return;
    }

    for kind in state.buffs.tick() {
        log::debug!("{:?} expired", kind);
        state.push_event(GameEvent::BuffExpired(kind));
    }

    state.immunity = state.immunity.saturating_sub(1);

    state.screen_shake *= SHAKE_DECAY;
    if state.screen_shake < SHAKE_EPSILON {
        state.screen_shake = 0.0;
    }

    if state.combo > 0 && state.frame.saturating_sub(state.last_kill_frame) > COMBO_TIMEOUT_FRAMES {
        state.combo = 0;
    }
}

/// Heat is a pure function of how long the trigger has been held. Release
/// leaves it where it was; the next hold starts from zero.
fn update_heat(state: &mut RunState) {
    if !state.shooting.is_shooting {
        return;
    }
    let held = state.frame.saturating_sub(state.shooting.shoot_start) as f32;
    state.heat = (held / state.heat_threshold_frames()).clamp(0.0, 1.0);
    if state.heat >= 1.0 {
        log::info!("Meltdown after {} frames of fire", held);
        state.end_run(RunEnd::Meltdown);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::buffs::BuffKind;
    use crate::sim::state::RunStatus;
    use crate::sim::state::test_support::*;

    fn hold_from(state: &mut RunState, frame: u64) {
        state.shooting.is_shooting = true;
        state.shooting.shoot_start = frame;
    }

    #[test]
    fn test_heat_tracks_hold_duration() {
        let mut state = quiet_run(QUIET);
        hold_from(&mut state, 0);
        state.frame = 60;
        advance(&mut state);
        assert!((state.heat - 0.5).abs() < 1e-6);
        assert!(state.is_active());
    }

    #[test]
    fn test_meltdown_on_threshold_frame() {
        let mut state = quiet_run(QUIET);
        hold_from(&mut state, 10);
        state.frame = 129;
        advance(&mut state);
        assert!(state.is_active());
        state.frame = 130;
        advance(&mut state);
        assert_eq!(state.heat, 1.0);
        assert_eq!(state.status, RunStatus::Ended(RunEnd::Meltdown));
    }

    #[test]
    fn test_release_keeps_heat() {
        let mut state = quiet_run(QUIET);
        hold_from(&mut state, 0);
        state.frame = 30;
        advance(&mut state);
        let heat = state.heat;
        state.shooting.is_shooting = false;
        state.frame = 200;
        advance(&mut state);
        assert_eq!(state.heat, heat);
        assert!(state.is_active());
    }

    #[test]
    fn test_coolant_extends_threshold() {
        let mut state = quiet_run(QUIET);
        state.buffs.activate(BuffKind::Coolant, 1000);
        hold_from(&mut state, 0);
        state.frame = 120;
        advance(&mut state);
        assert!(state.is_active());
        assert!((state.heat - 120.0 / 180.0).abs() < 1e-6);
    }

    #[test]
    fn test_buff_expiry_reported_once() {
        let mut state = quiet_run(QUIET);
        state.buffs.activate(BuffKind::Rapid, 2);
        advance(&mut state);
        advance(&mut state);
        advance(&mut state);
        let expired: Vec<_> = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::BuffExpired(_)))
            .collect();
        assert_eq!(expired, vec![GameEvent::BuffExpired(BuffKind::Rapid)]);
        assert!(!state.buffs.is_active(BuffKind::Rapid));
    }

    #[test]
    fn test_shake_decays_to_zero() {
        let mut state = quiet_run(QUIET);
        state.shake(SHAKE_DAMAGE);
        advance(&mut state);
        assert!((state.screen_shake - SHAKE_DAMAGE * SHAKE_DECAY).abs() < 1e-4);
        for _ in 0..200 {
            advance(&mut state);
        }
        assert_eq!(state.screen_shake, 0.0);
    }

    #[test]
    fn test_immunity_counts_down() {
        let mut state = quiet_run(QUIET);
        state.immunity = 2;
        advance(&mut state);
        advance(&mut state);
        advance(&mut state);
        assert_eq!(state.immunity, 0);
    }

    #[test]
    fn test_combo_times_out() {
        let mut state = quiet_run(QUIET);
        state.combo = 3;
        state.last_kill_frame = 10;
        state.frame = 10 + COMBO_TIMEOUT_FRAMES;
        advance(&mut state);
        assert_eq!(state.combo, 3);
        state.frame += 1;
        advance(&mut state);
        assert_eq!(state.combo, 0);
    }
}
