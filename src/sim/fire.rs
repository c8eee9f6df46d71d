//! Player weapon
//!
//! Turns the held trigger into volleys at the current cadence. The volley
//! shape comes from `FirePattern::select`.

use glam::Vec2;

use super::buffs::{BuffKind, Buffs, FirePattern};
use super::entity::Bullet;
use super::state::{AudioCue, RunState};
use crate::consts::*;

/// Frames between consecutive volleys for the active buffs
pub fn fire_cooldown(buffs: &Buffs) -> u32 {
    let mut cooldown = FIRE_COOLDOWN_BASE;
    if buffs.is_active(BuffKind::Rapid) {
        cooldown = cooldown.saturating_sub(FIRE_COOLDOWN_RAPID);
    }
    if buffs.is_active(BuffKind::Overdrive) {
        cooldown = cooldown.saturating_sub(FIRE_COOLDOWN_OVERDRIVE);
    }
    if buffs.is_active(BuffKind::Laser) {
        cooldown += FIRE_COOLDOWN_LASER;
    }
    cooldown.max(FIRE_COOLDOWN_MIN)
}

/// Damage carried by each player bullet
pub fn bullet_damage(buffs: &Buffs) -> u32 {
    let mut damage = if buffs.is_active(BuffKind::Overdrive) { 2 } else { 1 };
    if buffs.is_active(BuffKind::Laser) {
        damage += 1;
    }
    damage
}

/// Fire a volley if the trigger is held and the cooldown has elapsed.
/// Returns whether a volley went out.
pub fn fire_if_ready(state: &mut RunState) -> bool {
    if !state.is_active() || !state.shooting.is_shooting {
        return false;
    }
    let cooldown = fire_cooldown(&state.buffs) as u64;
    if let Some(last) = state.shooting.last_shot {
        if state.frame.saturating_sub(last) < cooldown {
            return false;
        }
    }

    let muzzle = Vec2::new(
        state.player.pos.x + PLAYER_SIZE / 2.0 - BULLET_SIZE / 2.0,
        state.player.pos.y,
    );
    let damage = bullet_damage(&state.buffs);
    let piercing = state.buffs.is_active(BuffKind::Pierce);
    let shot = |offset: f32, vel: Vec2| {
        Bullet::player(muzzle + Vec2::new(offset, 0.0), vel, damage, piercing)
    };

    match FirePattern::select(&state.buffs) {
        FirePattern::Single => {
            state.bullets.push(shot(0.0, Vec2::new(0.0, -PLAYER_BULLET_SPEED)));
        }
        FirePattern::Multishot => {
            state.bullets.push(shot(0.0, Vec2::new(0.0, -PLAYER_BULLET_SPEED)));
            state.bullets.push(shot(-10.0, Vec2::new(-1.0, -6.0)));
            state.bullets.push(shot(10.0, Vec2::new(1.0, -6.0)));
        }
        FirePattern::Spread => {
            for vx in [-2.0, -1.0, 0.0, 1.0, 2.0] {
                state.bullets.push(shot(0.0, Vec2::new(vx, -6.5)));
            }
        }
        FirePattern::Laser => {
            let mut beam = Bullet::player(
                Vec2::new(muzzle.x - 1.0, muzzle.y - 24.0),
                Vec2::new(0.0, -12.0),
                damage,
                true,
            );
            beam.size = Vec2::new(6.0, 24.0);
            state.bullets.push(beam);
        }
    }

    state.cue(AudioCue::Shoot);
    state.shooting.last_shot = Some(state.frame);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::test_support::*;

    fn trigger_held(state: &mut RunState) {
        state.shooting.is_shooting = true;
        state.shooting.shoot_start = state.frame;
    }

    #[test]
    fn test_cooldown_adjustments() {
        let mut buffs = Buffs::default();
        assert_eq!(fire_cooldown(&buffs), 7);
        buffs.activate(BuffKind::Rapid, 10);
        assert_eq!(fire_cooldown(&buffs), 4);
        buffs.activate(BuffKind::Overdrive, 10);
        assert_eq!(fire_cooldown(&buffs), FIRE_COOLDOWN_MIN);
        buffs.activate(BuffKind::Laser, 10);
        assert_eq!(fire_cooldown(&buffs), 8);
    }

    #[test]
    fn test_single_shot_cadence() {
        let mut state = quiet_run(QUIET);
        trigger_held(&mut state);
        assert!(fire_if_ready(&mut state));
        assert_eq!(state.bullets.len(), 1);
        assert_eq!(state.bullets[0].vel, Vec2::new(0.0, -PLAYER_BULLET_SPEED));

        for _ in 0..6 {
            state.frame += 1;
            assert!(!fire_if_ready(&mut state));
        }
        state.frame += 1;
        assert!(fire_if_ready(&mut state));
        assert_eq!(state.bullets.len(), 2);
    }

    #[test]
    fn test_no_fire_without_trigger() {
        let mut state = quiet_run(QUIET);
        assert!(!fire_if_ready(&mut state));
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_laser_overrides_spread_and_multishot() {
        let mut state = quiet_run(QUIET);
        state.buffs.activate(BuffKind::Multishot, 10);
        state.buffs.activate(BuffKind::Spread, 10);
        trigger_held(&mut state);
        fire_if_ready(&mut state);
        assert_eq!(state.bullets.len(), 5);

        state.bullets.clear();
        state.shooting.last_shot = None;
        state.buffs.activate(BuffKind::Laser, 10);
        fire_if_ready(&mut state);
        assert_eq!(state.bullets.len(), 1);
        let beam = &state.bullets[0];
        assert!(beam.piercing);
        assert_eq!(beam.damage, 2);
        assert_eq!(beam.size, Vec2::new(6.0, 24.0));
    }

    #[test]
    fn test_multishot_fans_three() {
        let mut state = quiet_run(QUIET);
        state.buffs.activate(BuffKind::Multishot, 10);
        state.buffs.activate(BuffKind::Pierce, 10);
        trigger_held(&mut state);
        fire_if_ready(&mut state);
        assert_eq!(state.bullets.len(), 3);
        assert!(state.bullets.iter().all(|b| b.piercing));
    }

    #[test]
    fn test_overdrive_damage() {
        let mut buffs = Buffs::default();
        assert_eq!(bullet_damage(&buffs), 1);
        buffs.activate(BuffKind::Overdrive, 10);
        assert_eq!(bullet_damage(&buffs), 2);
        buffs.activate(BuffKind::Laser, 10);
        assert_eq!(bullet_damage(&buffs), 3);
    }
}
