//! Per-frame integration
//!
//! Moves every entity one frame, runs enemy fire timers and culls whatever
//! left the playfield. Collisions are resolved afterwards in `combat`.

use glam::Vec2;

use super::archetype::{Movement, ShotPattern};
use super::buffs::BuffKind;
use super::entity::{Bullet, BulletOwner, Enemy};
use super::state::{AudioCue, RunState};
use crate::consts::*;

/// Advance all entities by one frame
pub fn integrate(state: &mut RunState) {
    move_bullets(state);
    move_enemies(state);
    move_platforms(state);
    move_power_ups(state);
    move_particles(state);
}

fn move_bullets(state: &mut RunState) {
    let slow = state.enemy_speed_factor();
    let target = state.player.center();
    let player_top = state.player.pos.y;

    for bullet in &mut state.bullets {
        match bullet.owner {
            BulletOwner::Player => bullet.pos += bullet.vel,
            BulletOwner::Enemy => {
                // Homing only steers while still above the player
                if bullet.homing && bullet.pos.y < player_top {
                    let speed = bullet.vel.length();
                    let center = bullet.pos + bullet.size * 0.5;
                    let dir = (target - center).normalize_or_zero();
                    if dir != Vec2::ZERO {
                        bullet.vel = dir * speed;
                    }
                }
                bullet.pos += bullet.vel * slow;
            }
        }
    }
    state.bullets.retain(|b| !b.is_offscreen());
}

fn move_enemies(state: &mut RunState) {
    let slow = state.enemy_speed_factor();
    let frame = state.frame as f32;
    let player_center = state.player.center();
    let level = state.level_number();
    let mut shots: Vec<Bullet> = Vec::new();
    let mut shooters = 0usize;

    for enemy in &mut state.enemies {
        let arch = enemy.kind.archetype();
        match arch.movement {
            Movement::Straight | Movement::Scatter => {
                enemy.pos += enemy.vel * slow;
            }
            Movement::Dive => {
                if !enemy.is_diving && enemy.pos.y > SCREEN_HEIGHT * 0.3 {
                    enemy.vel.y *= 3.0;
                    enemy.is_diving = true;
                }
                enemy.pos += enemy.vel * slow;
            }
            Movement::Sweep => {
                enemy.vel.x = (frame * 0.05 + enemy.sine_offset).sin() * 2.0;
                enemy.pos += enemy.vel * slow;
                enemy.pos.x = enemy.pos.x.clamp(0.0, SCREEN_WIDTH - enemy.size.x);
            }
            Movement::Hover { line } => {
                if enemy.pos.y < line as f32 {
                    enemy.pos.y = (enemy.pos.y + enemy.vel.y * slow).min(line as f32);
                } else {
                    enemy.vel.x = (frame * 0.02 + enemy.sine_offset).sin() * 1.5;
                    enemy.pos.x += enemy.vel.x * slow;
                    enemy.pos.x = enemy.pos.x.clamp(0.0, SCREEN_WIDTH - enemy.size.x);
                }
            }
            Movement::Rush => {
                let dx = player_center.x - enemy.center().x;
                enemy.vel.x = dx.clamp(-1.0, 1.0) * 0.8;
                enemy.pos += enemy.vel * slow;
            }
        }

        if let Some(timer) = enemy.shoot_timer.as_mut() {
            *timer = timer.saturating_sub(1);
            if *timer == 0 {
                let interval = arch.shot_interval_at(level).unwrap_or(60);
                *timer = match enemy.phase {
                    Some(phase) => interval.saturating_sub(phase as u32 * 10).max(20),
                    None => interval,
                };
                // Hold fire until the enemy is actually on screen
                if enemy.pos.y + enemy.size.y > 0.0 {
                    fire_pattern(enemy, arch.shot, player_center, &mut shots);
                    shooters += 1;
                }
            }
        }
    }

    for _ in 0..shooters {
        state.cue(AudioCue::EnemyShoot);
    }
    state.bullets.extend(shots);

    // Bosses wrap to the top; everything else is gone once off the bottom
    state.enemies.retain_mut(|enemy| {
        if enemy.pos.y <= SCREEN_HEIGHT {
            return true;
        }
        if enemy.kind.is_boss_class() {
            enemy.pos.y = -enemy.size.y;
            true
        } else {
            false
        }
    });
}

/// Emit the bullets for one enemy volley
fn fire_pattern(enemy: &Enemy, pattern: ShotPattern, target: Vec2, out: &mut Vec<Bullet>) {
    let muzzle = Vec2::new(
        enemy.pos.x + enemy.size.x / 2.0 - BULLET_SIZE / 2.0,
        enemy.pos.y + enemy.size.y,
    );
    let aimed = || {
        let dir = (target - muzzle).normalize_or_zero();
        let dir = if dir == Vec2::ZERO { Vec2::Y } else { dir };
        Bullet::homing(muzzle, dir * HOMING_BULLET_SPEED)
    };
    let fan = |out: &mut Vec<Bullet>| {
        out.push(Bullet::enemy(muzzle, Vec2::new(0.0, ENEMY_BULLET_SPEED)));
        out.push(Bullet::enemy(muzzle, Vec2::new(-2.0, 3.0)));
        out.push(Bullet::enemy(muzzle, Vec2::new(2.0, 3.0)));
    };

    match pattern {
        ShotPattern::None => {}
        ShotPattern::Aimed => out.push(Bullet::enemy(muzzle, Vec2::new(0.0, ENEMY_BULLET_SPEED))),
        ShotPattern::Homing => out.push(aimed()),
        ShotPattern::Spread => fan(out),
        ShotPattern::Barrage => {
            fan(out);
            let phase = enemy.phase.unwrap_or(0);
            if phase >= 1 {
                out.push(aimed());
            }
            if phase >= 2 {
                out.push(Bullet::enemy(muzzle, Vec2::new(-3.5, 2.5)));
                out.push(Bullet::enemy(muzzle, Vec2::new(3.5, 2.5)));
            }
        }
    }
}

fn move_platforms(state: &mut RunState) {
    for platform in &mut state.platforms {
        platform.pos += platform.vel;
    }
    state.platforms.retain(|p| p.pos.y <= SCREEN_HEIGHT);
}

fn move_power_ups(state: &mut RunState) {
    let magnet = state.buffs.is_active(BuffKind::Magnet);
    let target = state.player.center();
    for power_up in &mut state.power_ups {
        power_up.pos += power_up.vel;
        if magnet {
            let center = power_up.pos + power_up.size * 0.5;
            power_up.pos += (target - center).normalize_or_zero() * MAGNET_PULL;
        }
    }
    state.power_ups.retain(|p| p.pos.y <= SCREEN_HEIGHT);
}

fn move_particles(state: &mut RunState) {
    for particle in &mut state.particles {
        particle.pos += particle.vel;
        particle.life -= PARTICLE_FADE;
    }
    state.particles.retain(|p| p.life > 0.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{EnemyKind, PowerUp, PowerUpKind};
    use crate::sim::state::test_support::*;

    #[test]
    fn test_diver_commits_once() {
        let mut state = quiet_run(QUIET);
        place_enemy(&mut state, EnemyKind::Diver, Vec2::new(50.0, SCREEN_HEIGHT * 0.3 + 1.0), 1);
        state.enemies[0].vel = Vec2::new(0.0, 1.0);
        integrate(&mut state);
        assert!(state.enemies[0].is_diving);
        assert_eq!(state.enemies[0].vel.y, 3.0);
        integrate(&mut state);
        assert_eq!(state.enemies[0].vel.y, 3.0);
    }

    #[test]
    fn test_enemy_leaving_bottom_is_removed_but_boss_wraps() {
        let mut state = quiet_run(QUIET);
        place_enemy(&mut state, EnemyKind::Orb, Vec2::new(10.0, SCREEN_HEIGHT), 1);
        place_enemy(&mut state, EnemyKind::Boss, Vec2::new(100.0, SCREEN_HEIGHT + 5.0), 10);
        state.enemies[0].vel = Vec2::new(0.0, 2.0);
        integrate(&mut state);
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.enemies[0].kind, EnemyKind::Boss);
        assert_eq!(state.enemies[0].pos.y, -BOSS_SIZE);
    }

    #[test]
    fn test_slow_halves_enemy_speed() {
        let mut state = quiet_run(QUIET);
        place_enemy(&mut state, EnemyKind::Orb, Vec2::new(10.0, 10.0), 1);
        state.enemies[0].vel = Vec2::new(0.0, 2.0);
        state.bullets.push(Bullet::enemy(Vec2::new(100.0, 100.0), Vec2::new(0.0, 4.0)));
        state.buffs.activate(BuffKind::Slow, 10);
        integrate(&mut state);
        assert_eq!(state.enemies[0].pos.y, 11.0);
        assert_eq!(state.bullets[0].pos.y, 102.0);
    }

    #[test]
    fn test_shooter_fires_when_timer_elapses() {
        let mut state = quiet_run(QUIET);
        place_enemy(&mut state, EnemyKind::Shooter, Vec2::new(100.0, 50.0), 2);
        state.enemies[0].shoot_timer = Some(1);
        integrate(&mut state);
        assert_eq!(state.bullets.len(), 1);
        assert_eq!(state.bullets[0].owner, BulletOwner::Enemy);
        assert_eq!(state.enemies[0].shoot_timer, Some(96));
        assert!(
            state
                .drain_events()
                .contains(&crate::sim::GameEvent::Sound(AudioCue::EnemyShoot))
        );
    }

    #[test]
    fn test_boss_barrage_grows_with_phase() {
        let mut state = quiet_run(QUIET);
        place_enemy(&mut state, EnemyKind::Boss, Vec2::new(100.0, 40.0), 30);
        state.enemies[0].shoot_timer = Some(1);
        integrate(&mut state);
        assert_eq!(state.bullets.len(), 3);

        state.bullets.clear();
        state.enemies[0].phase = Some(2);
        state.enemies[0].shoot_timer = Some(1);
        integrate(&mut state);
        assert_eq!(state.bullets.len(), 6);
        assert_eq!(state.bullets.iter().filter(|b| b.homing).count(), 1);
    }

    #[test]
    fn test_homing_reaims_toward_player() {
        let mut state = quiet_run(QUIET);
        let target = state.player.center();
        state
            .bullets
            .push(Bullet::homing(Vec2::new(target.x - 100.0, 100.0), Vec2::new(0.0, 2.5)));
        integrate(&mut state);
        let b = &state.bullets[0];
        assert!(b.vel.x > 0.0, "should steer right toward the player");
        assert!((b.vel.length() - 2.5).abs() < 1e-4);
    }

    #[test]
    fn test_magnet_pulls_power_ups() {
        let mut state = quiet_run(QUIET);
        let start = Vec2::new(10.0, 100.0);
        let mut pu = PowerUp::dropped_at(PowerUpKind::Life, start);
        pu.vel = Vec2::ZERO;
        state.power_ups.push(pu.clone());
        state.buffs.activate(BuffKind::Magnet, 10);
        integrate(&mut state);
        let before = (state.player.center() - (pu.pos + pu.size * 0.5)).length();
        let moved = &state.power_ups[0];
        let after = (state.player.center() - (moved.pos + moved.size * 0.5)).length();
        assert!(after < before);
    }

    #[test]
    fn test_particles_fade_out() {
        let mut state = quiet_run(QUIET);
        state.spawn_explosion(Vec2::new(50.0, 50.0), 0, 3, 2.0);
        for _ in 0..49 {
            integrate(&mut state);
        }
        assert_eq!(state.particles.len(), 3);
        for _ in 0..2 {
            integrate(&mut state);
        }
        assert!(state.particles.is_empty());
    }
}
