//! Combat resolver
//!
//! Every overlap is resolved once per frame in bullet order, then enemy
//! order. Removals are marked during the pass and compacted afterwards so
//! no live entity is skipped or hit twice.
//!
//! Pickups resolve before any damage to the player, so a shield collected
//! this frame already blocks this frame's hits.

use glam::Vec2;
use rand::Rng;

use super::buffs::BuffKind;
use super::entity::{BulletOwner, Enemy, EnemyKind, PowerUp, PowerUpKind};
use super::spawner::build_enemy;
use super::state::{AudioCue, GameEvent, RunEnd, RunState};
use crate::consts::*;
use crate::tuning::DropMode;

/// Banner shown when the final boss goes down
pub const BOSS_DEFEATED_BANNER: &str = "BOSS DEFEATED";

/// Result of applying damage to one enemy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    Damaged,
    /// Hp ran out and the enemy moved to its next phase
    PhaseBreak(usize),
    Killed,
}

/// Resolve all collisions for this frame
pub fn resolve(state: &mut RunState) {
    if !state.is_active() {
        return;
    }
    player_bullets_vs_enemies(state);
    collect_power_ups(state);
    if !state.is_active() {
        return;
    }
    enemy_bullets_vs_player(state);
    enemies_vs_player(state);
    platforms_vs_player(state);
}

fn player_bullets_vs_enemies(state: &mut RunState) {
    let mut spent = vec![false; state.bullets.len()];
    let mut dead = vec![false; state.enemies.len()];
    let mut pending: Vec<Enemy> = Vec::new();

    for bi in 0..state.bullets.len() {
        if state.bullets[bi].owner != BulletOwner::Player {
            continue;
        }
        for ei in 0..state.enemies.len() {
            if dead[ei] || spent[bi] {
                continue;
            }
            let bullet = &state.bullets[bi];
            let enemy = &state.enemies[ei];
            if bullet.pierced == Some(enemy.id) || !bullet.aabb().overlaps(&enemy.aabb()) {
                continue;
            }

            let damage = bullet.damage;
            let enemy_id = enemy.id;
            let spark = bullet.pos;
            let bullet = &mut state.bullets[bi];
            if bullet.piercing {
                bullet.piercing = false;
                bullet.pierced = Some(enemy_id);
            } else {
                spent[bi] = true;
            }

            state.cue(AudioCue::Hit);
            state.spawn_explosion(spark, palette::WHITE, 2, 2.0);

            match apply_damage(state, ei, damage) {
                HitOutcome::Damaged => {}
                HitOutcome::PhaseBreak(phase) => on_phase_break(state, ei, phase, &mut pending),
                HitOutcome::Killed => {
                    dead[ei] = true;
                    on_kill(state, ei, &mut pending);
                }
            }
        }
    }

    let mut i = 0;
    state.bullets.retain(|_| {
        let keep = !spent[i];
        i += 1;
        keep
    });
    let mut i = 0;
    state.enemies.retain(|_| {
        let keep = !dead[i];
        i += 1;
        keep
    });
    state.enemies.extend(pending);
}

/// Subtract hp; on zero either advance the phase or report a kill
pub fn apply_damage(state: &mut RunState, index: usize, damage: u32) -> HitOutcome {
    let level = state.level_number();
    let enemy = &mut state.enemies[index];
    enemy.hp = enemy.hp.saturating_sub(damage);
    if enemy.hp > 0 {
        return HitOutcome::Damaged;
    }

    let next = enemy.phase.map(|p| p + 1);
    let next_hp = next.and_then(|p| enemy.kind.archetype().phase_hp(p, level));
    match (next, next_hp) {
        (Some(phase), Some(hp)) => {
            // Overflow damage does not carry into the next phase
            enemy.phase = Some(phase);
            enemy.hp = hp;
            enemy.max_hp = hp;
            HitOutcome::PhaseBreak(phase)
        }
        _ => HitOutcome::Killed,
    }
}

fn on_phase_break(state: &mut RunState, index: usize, phase: usize, pending: &mut Vec<Enemy>) {
    let kind = state.enemies[index].kind;
    let center = state.enemies[index].center();
    log::debug!("{:?} #{} entered phase {}", kind, state.enemies[index].id, phase);

    state.push_event(GameEvent::PhaseBreak { kind, phase });
    state.cue(AudioCue::Explosion);
    state.shake(SHAKE_PHASE_BREAK);
    state.spawn_explosion(center, kind.archetype().color, 20, 3.0);

    // Reinforcements flank the boss; they never count toward the wave
    if kind == EnemyKind::Boss {
        for side in [-1.0f32, 1.0] {
            let x = (center.x + side * 48.0 - ENEMY_SIZE / 2.0).clamp(0.0, SCREEN_WIDTH - ENEMY_SIZE);
            let add = build_enemy(state, EnemyKind::Orb, Vec2::new(x, center.y), None);
            pending.push(add);
        }
    }
}

fn on_kill(state: &mut RunState, index: usize, pending: &mut Vec<Enemy>) {
    let (kind, center) = {
        let enemy = &state.enemies[index];
        (enemy.kind, enemy.center())
    };
    let arch = kind.archetype();

    let points = state.award(arch.score);
    state.combo += 1;
    state.last_kill_frame = state.frame;
    state.cue(AudioCue::Combo(state.combo.min(MAX_COMBO_CUE)));
    if kind.is_boss_class() {
        state.cue(AudioCue::Explosion);
    }
    state.spawn_explosion(center, arch.color, 15, 3.0);
    state.push_event(GameEvent::EnemyKilled { kind, points });

    roll_drop(state, arch.drop_chance, center);

    if let Some((fragment, count)) = kind.split_into() {
        for i in 0..count {
            let size = fragment.archetype().width;
            let mut mini = build_enemy(state, fragment, center - Vec2::splat(size / 2.0), None);
            let side = if i % 2 == 0 { -1.0 } else { 1.0 };
            mini.vel = Vec2::new(side * 1.5, mini.vel.y);
            pending.push(mini);
        }
    }

    if kind == EnemyKind::Boss {
        log::info!("Boss defeated at level {}", state.level_number());
        state.announce(BOSS_DEFEATED_BANNER.to_string());
    }
}

fn roll_drop(state: &mut RunState, chance: f32, center: Vec2) {
    if state.tuning.drop_mode != DropMode::PerEnemy {
        return;
    }
    let chance = (chance * state.tuning.drop_chance_scale).clamp(0.0, 1.0);
    if chance <= 0.0 || state.rng.random::<f32>() >= chance {
        return;
    }
    if let Some(kind) = state.tuning.pick_power_up(&mut state.rng) {
        state.power_ups.push(PowerUp::dropped_at(kind, center));
    }
}

fn collect_power_ups(state: &mut RunState) {
    let player = state.player.aabb();
    let mut collected = Vec::new();
    state.power_ups.retain(|p| {
        if p.aabb().overlaps(&player) {
            collected.push(p.kind);
            false
        } else {
            true
        }
    });

    for kind in collected {
        state.cue(AudioCue::PowerUp);
        state.push_event(GameEvent::PowerUpCollected(kind));
        match kind {
            PowerUpKind::Life => state.lives = (state.lives + 1).min(MAX_LIVES),
            PowerUpKind::Bomb => detonate_bomb(state),
            other => {
                if let Some(buff) = BuffKind::from_power_up(other) {
                    let frames = state.tuning.buff_frames.frames(buff);
                    state.buffs.activate(buff, frames);
                }
            }
        }
    }
}

/// Clear the field: regular enemies are erased for a flat bounty, bosses
/// take a chunk of damage but never die to a bomb.
pub fn detonate_bomb(state: &mut RunState) {
    state.cue(AudioCue::Bomb);
    state.shake(SHAKE_BOMB);

    let mut cleared = 0u32;
    let mut blasts = Vec::new();
    state.enemies.retain_mut(|enemy| {
        blasts.push(enemy.center());
        if enemy.kind.is_boss_class() {
            enemy.hp = enemy.hp.saturating_sub(BOMB_BOSS_DAMAGE).max(1);
            true
        } else {
            cleared += 1;
            false
        }
    });
    for center in blasts {
        state.award(BOMB_POINTS);
        state.spawn_explosion(center, palette::RED, 5, 3.0);
    }
    state.platforms.clear();
    state.push_event(GameEvent::BombDetonated { cleared });
}

fn enemy_bullets_vs_player(state: &mut RunState) {
    let player = state.player.aabb();
    let shielded = state.buffs.is_active(BuffKind::Shield);
    let blinking = state.immunity > 0;
    let mut hit = false;
    state.bullets.retain(|b| {
        if b.owner != BulletOwner::Enemy || !b.aabb().overlaps(&player) {
            return true;
        }
        // The shield absorbs bullets; the post-hit window lets them pass
        if shielded {
            return false;
        }
        if blinking || hit {
            return true;
        }
        hit = true;
        false
    });
    if hit {
        damage_player(state);
    }
}

fn enemies_vs_player(state: &mut RunState) {
    if state.is_immune() {
        return;
    }
    let player = state.player.aabb();
    if state.enemies.iter().any(|e| e.aabb().overlaps(&player)) {
        damage_player(state);
    }
}

fn platforms_vs_player(state: &mut RunState) {
    if state.is_immune() {
        return;
    }
    let player = state.player.aabb();
    let Some(index) = state.platforms.iter().position(|p| p.aabb().overlaps(&player)) else {
        return;
    };
    state.platforms.remove(index);
    damage_player(state);
}

/// Lose a life unless immune; ends the run on the last one
pub fn damage_player(state: &mut RunState) {
    if state.is_immune() || !state.is_active() {
        return;
    }
    state.lives = state.lives.saturating_sub(1);
    state.immunity = IMMUNITY_FRAMES;
    state.shake(SHAKE_DAMAGE);
    state.combo = 0;
    state.cue(AudioCue::Damage);
    state.push_event(GameEvent::PlayerDamaged { lives: state.lives });
    log::debug!("Player hit, {} lives left", state.lives);

    if state.lives == 0 {
        state.end_run(RunEnd::LivesExhausted);
    }
}
