//! Entity records
//!
//! Plain data for everything that lives on the playfield. Behaviour lives in
//! the subsystem modules (`movement`, `combat`, `spawner`) and the
//! per-archetype table in `archetype`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::consts::*;

/// The player's ship. Lives are tracked on the run, not here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::new(SCREEN_WIDTH / 2.0 - PLAYER_SIZE / 2.0, PLAYER_Y),
        }
    }
}

impl Player {
    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, Vec2::splat(PLAYER_SIZE))
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(PLAYER_SIZE / 2.0)
    }

    /// Ease toward a desired x (left edge) and clamp to the playfield
    pub fn follow(&mut self, target_x: f32) {
        self.pos.x += (target_x - self.pos.x) * PLAYER_FOLLOW;
        self.pos.x = self.pos.x.clamp(0.0, SCREEN_WIDTH - PLAYER_SIZE);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BulletOwner {
    Player,
    Enemy,
}

/// A projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
    pub owner: BulletOwner,
    /// Re-aims at the player each frame (enemy bullets only)
    #[serde(default)]
    pub homing: bool,
    /// Survives one enemy hit instead of despawning
    #[serde(default)]
    pub piercing: bool,
    pub damage: u32,
    /// Enemy already pierced, so the same body is not hit twice
    #[serde(skip)]
    pub pierced: Option<u32>,
}

impl Bullet {
    pub fn player(pos: Vec2, vel: Vec2, damage: u32, piercing: bool) -> Self {
        Self {
            pos,
            size: Vec2::splat(BULLET_SIZE),
            vel,
            owner: BulletOwner::Player,
            homing: false,
            piercing,
            damage,
            pierced: None,
        }
    }

    pub fn enemy(pos: Vec2, vel: Vec2) -> Self {
        Self {
            pos,
            size: Vec2::splat(BULLET_SIZE),
            vel,
            owner: BulletOwner::Enemy,
            homing: false,
            piercing: false,
            damage: 1,
            pierced: None,
        }
    }

    pub fn homing(pos: Vec2, vel: Vec2) -> Self {
        Self {
            homing: true,
            ..Self::enemy(pos, vel)
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    /// Outside the vertical playfield bounds (with margin)
    pub fn is_offscreen(&self) -> bool {
        self.pos.y < -BULLET_MARGIN || self.pos.y > SCREEN_HEIGHT + BULLET_MARGIN
    }
}

/// Enemy archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnemyKind {
    Orb,
    Tank,
    Diver,
    Shooter,
    Sentry,
    Sweeper,
    Cluster,
    Mini,
    Warden,
    Rusher,
    Midboss,
    Boss,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 12] = [
        EnemyKind::Orb,
        EnemyKind::Tank,
        EnemyKind::Diver,
        EnemyKind::Shooter,
        EnemyKind::Sentry,
        EnemyKind::Sweeper,
        EnemyKind::Cluster,
        EnemyKind::Mini,
        EnemyKind::Warden,
        EnemyKind::Rusher,
        EnemyKind::Midboss,
        EnemyKind::Boss,
    ];

    /// Boss-class enemies wrap at the bottom edge and shrug off bombs
    pub fn is_boss_class(self) -> bool {
        matches!(self, EnemyKind::Boss | EnemyKind::Midboss)
    }
}

/// An enemy entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
    pub hp: u32,
    pub max_hp: u32,
    /// Frames until next shot (shooting archetypes only)
    pub shoot_timer: Option<u32>,
    /// Set once when a diver commits to its dive
    #[serde(default)]
    pub is_diving: bool,
    /// Current phase index for multi-phase enemies
    pub phase: Option<usize>,
    /// Per-instance phase offset for oscillating movement
    pub sine_offset: f32,
    /// Wave this enemy counts toward (None for splits and reinforcements)
    pub wave_tag: Option<usize>,
}

impl Enemy {
    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerUpKind {
    Shield,
    Life,
    Multishot,
    Bomb,
    Coolant,
    Pierce,
    Slow,
    Rapid,
    Spread,
    Laser,
    Magnet,
    Overdrive,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 12] = [
        PowerUpKind::Shield,
        PowerUpKind::Life,
        PowerUpKind::Multishot,
        PowerUpKind::Bomb,
        PowerUpKind::Coolant,
        PowerUpKind::Pierce,
        PowerUpKind::Slow,
        PowerUpKind::Rapid,
        PowerUpKind::Spread,
        PowerUpKind::Laser,
        PowerUpKind::Magnet,
        PowerUpKind::Overdrive,
    ];

    /// Pool used by the periodic drop spawner
    pub const BASIC: [PowerUpKind; 4] = [
        PowerUpKind::Shield,
        PowerUpKind::Life,
        PowerUpKind::Multishot,
        PowerUpKind::Bomb,
    ];
}

/// A falling pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub kind: PowerUpKind,
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
}

impl PowerUp {
    /// Spawn centered on a point, drifting downward
    pub fn dropped_at(kind: PowerUpKind, center: Vec2) -> Self {
        Self {
            kind,
            pos: center - Vec2::splat(POWER_UP_SIZE / 2.0),
            size: Vec2::splat(POWER_UP_SIZE),
            vel: Vec2::new(0.0, POWER_UP_FALL_SPEED),
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// A falling hazard bar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
}

impl Platform {
    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// A particle for visual effects (never collides)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: u32,
    pub size: f32,
    /// 1.0 at spawn, removed at 0.0
    pub life: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_follow_clamps() {
        let mut player = Player::default();
        for _ in 0..100 {
            player.follow(-500.0);
        }
        assert_eq!(player.pos.x, 0.0);
        for _ in 0..100 {
            player.follow(5000.0);
        }
        assert_eq!(player.pos.x, SCREEN_WIDTH - PLAYER_SIZE);
    }

    #[test]
    fn test_player_follow_eases() {
        let mut player = Player::default();
        let start = player.pos.x;
        player.follow(start + 100.0);
        assert!((player.pos.x - (start + 40.0)).abs() < 0.001);
    }

    #[test]
    fn test_bullet_offscreen_margin() {
        let mut b = Bullet::enemy(Vec2::new(10.0, SCREEN_HEIGHT + BULLET_MARGIN), Vec2::ZERO);
        assert!(!b.is_offscreen());
        b.pos.y += 0.5;
        assert!(b.is_offscreen());
        b.pos.y = -BULLET_MARGIN - 0.5;
        assert!(b.is_offscreen());
    }

    #[test]
    fn test_boss_class() {
        assert!(EnemyKind::Boss.is_boss_class());
        assert!(EnemyKind::Midboss.is_boss_class());
        assert!(!EnemyKind::Warden.is_boss_class());
    }
}
