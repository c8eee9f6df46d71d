//! Per-archetype behaviour table
//!
//! Each `EnemyKind` maps to one static `Archetype` row: size, movement rule,
//! shot pattern, score value, drop weight and the hp formula for each of its
//! phases. Spawner and combat look values up here instead of branching on
//! the kind at every call site.

use super::entity::EnemyKind;
use crate::consts::{BOSS_SIZE, ENEMY_SIZE, palette};

/// How an enemy moves each frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    /// Constant downward velocity
    Straight,
    /// Straight until 30% down the screen, then triples its fall speed once
    Dive,
    /// Falls while sweeping side to side on a sine
    Sweep,
    /// Descends to a hover line, then drifts horizontally
    Hover { line: u32 },
    /// Fast fall that steers toward the player's column
    Rush,
    /// Keeps its spawn velocity (split fragments)
    Scatter,
}

/// What an enemy fires when its shoot timer elapses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotPattern {
    None,
    /// One bullet straight down
    Aimed,
    /// One bullet that re-aims at the player
    Homing,
    /// Three-way fan
    Spread,
    /// Fan that widens and adds homing shots with each phase
    Barrage,
}

/// `hp = base + level * num / den`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HpFormula {
    pub base: u32,
    pub num: u32,
    pub den: u32,
}

impl HpFormula {
    pub const fn flat(base: u32) -> Self {
        Self { base, num: 0, den: 1 }
    }

    pub const fn scaled(base: u32, num: u32, den: u32) -> Self {
        Self { base, num, den }
    }

    pub fn at_level(&self, level: u32) -> u32 {
        self.base
            .saturating_add(level.saturating_mul(self.num) / self.den.max(1))
    }
}

/// Static behaviour row for one enemy kind
#[derive(Debug, Clone, Copy)]
pub struct Archetype {
    pub width: f32,
    pub height: f32,
    /// Fall speed at level 0 (pixels per frame)
    pub base_speed: f32,
    pub movement: Movement,
    pub shot: ShotPattern,
    /// Frames between shots at level 0
    pub shot_interval: u32,
    /// Frames removed from the interval per level
    pub shot_interval_step: u32,
    pub shot_interval_min: u32,
    pub score: u64,
    /// Chance (0..1) to drop a power-up on death
    pub drop_chance: f32,
    pub color: u32,
    /// One entry per phase; phase maxima must strictly decrease
    pub phases: &'static [HpFormula],
}

impl Archetype {
    /// Fall speed scaled by level
    pub fn speed_at(&self, level: u32) -> f32 {
        self.base_speed * (1.0 + level as f32 * 0.15)
    }

    /// Shot cadence at level (None for non-shooters)
    pub fn shot_interval_at(&self, level: u32) -> Option<u32> {
        if self.shot == ShotPattern::None {
            return None;
        }
        Some(
            self.shot_interval
                .saturating_sub(level.saturating_mul(self.shot_interval_step))
                .max(self.shot_interval_min),
        )
    }

    /// Max hp of the given phase at level (None past the last phase)
    pub fn phase_hp(&self, phase: usize, level: u32) -> Option<u32> {
        self.phases.get(phase).map(|f| f.at_level(level).max(1))
    }

    pub fn is_multi_phase(&self) -> bool {
        self.phases.len() > 1
    }
}

const ORB: Archetype = Archetype {
    width: ENEMY_SIZE,
    height: ENEMY_SIZE,
    base_speed: 1.0,
    movement: Movement::Straight,
    shot: ShotPattern::None,
    shot_interval: 0,
    shot_interval_step: 0,
    shot_interval_min: 0,
    score: 10,
    drop_chance: 0.05,
    color: palette::RED,
    phases: &[HpFormula::flat(1)],
};

const TANK: Archetype = Archetype {
    base_speed: 0.6,
    score: 50,
    drop_chance: 0.2,
    color: palette::ORANGE,
    phases: &[HpFormula::scaled(3, 1, 2)],
    ..ORB
};

const DIVER: Archetype = Archetype {
    base_speed: 1.2,
    movement: Movement::Dive,
    score: 20,
    drop_chance: 0.08,
    color: palette::CYAN,
    ..ORB
};

const SHOOTER: Archetype = Archetype {
    base_speed: 0.8,
    shot: ShotPattern::Aimed,
    shot_interval: 100,
    shot_interval_step: 4,
    shot_interval_min: 50,
    score: 30,
    drop_chance: 0.12,
    color: palette::MAGENTA,
    phases: &[HpFormula::scaled(2, 1, 4)],
    ..ORB
};

const SENTRY: Archetype = Archetype {
    base_speed: 0.8,
    movement: Movement::Hover { line: 80 },
    shot: ShotPattern::Homing,
    shot_interval: 140,
    shot_interval_step: 5,
    shot_interval_min: 70,
    score: 40,
    drop_chance: 0.15,
    color: palette::YELLOW,
    phases: &[HpFormula::scaled(4, 1, 3)],
    ..ORB
};

const SWEEPER: Archetype = Archetype {
    base_speed: 0.9,
    movement: Movement::Sweep,
    score: 25,
    drop_chance: 0.1,
    color: palette::GREEN,
    phases: &[HpFormula::scaled(2, 1, 4)],
    ..ORB
};

const CLUSTER: Archetype = Archetype {
    base_speed: 0.7,
    score: 30,
    drop_chance: 0.1,
    color: palette::PURPLE,
    phases: &[HpFormula::scaled(2, 1, 5)],
    ..ORB
};

const MINI: Archetype = Archetype {
    width: 10.0,
    height: 10.0,
    base_speed: 1.4,
    movement: Movement::Scatter,
    score: 5,
    drop_chance: 0.0,
    color: palette::PURPLE,
    ..ORB
};

const WARDEN: Archetype = Archetype {
    width: 24.0,
    height: 24.0,
    base_speed: 0.5,
    movement: Movement::Hover { line: 50 },
    shot: ShotPattern::Spread,
    shot_interval: 120,
    shot_interval_step: 4,
    shot_interval_min: 60,
    score: 80,
    drop_chance: 0.3,
    color: palette::GRAY,
    phases: &[HpFormula::scaled(6, 1, 2)],
    ..ORB
};

const RUSHER: Archetype = Archetype {
    base_speed: 2.2,
    movement: Movement::Rush,
    score: 15,
    drop_chance: 0.05,
    color: palette::RED,
    phases: &[HpFormula::scaled(1, 1, 6)],
    ..ORB
};

const MIDBOSS: Archetype = Archetype {
    width: 40.0,
    height: 40.0,
    base_speed: 0.5,
    movement: Movement::Hover { line: 60 },
    shot: ShotPattern::Spread,
    shot_interval: 70,
    shot_interval_step: 2,
    shot_interval_min: 40,
    score: 500,
    drop_chance: 1.0,
    color: palette::ORANGE,
    phases: &[HpFormula::scaled(12, 3, 1), HpFormula::scaled(8, 2, 1)],
    ..ORB
};

const BOSS: Archetype = Archetype {
    width: BOSS_SIZE,
    height: BOSS_SIZE,
    base_speed: 0.5,
    movement: Movement::Hover { line: 40 },
    shot: ShotPattern::Barrage,
    shot_interval: 60,
    shot_interval_step: 2,
    shot_interval_min: 40,
    score: 1000,
    drop_chance: 1.0,
    color: palette::PURPLE,
    phases: &[
        HpFormula::scaled(20, 5, 1),
        HpFormula::scaled(15, 4, 1),
        HpFormula::scaled(10, 3, 1),
    ],
    ..ORB
};

impl EnemyKind {
    /// Behaviour row for this kind
    pub fn archetype(self) -> &'static Archetype {
        match self {
            EnemyKind::Orb => &ORB,
            EnemyKind::Tank => &TANK,
            EnemyKind::Diver => &DIVER,
            EnemyKind::Shooter => &SHOOTER,
            EnemyKind::Sentry => &SENTRY,
            EnemyKind::Sweeper => &SWEEPER,
            EnemyKind::Cluster => &CLUSTER,
            EnemyKind::Mini => &MINI,
            EnemyKind::Warden => &WARDEN,
            EnemyKind::Rusher => &RUSHER,
            EnemyKind::Midboss => &MIDBOSS,
            EnemyKind::Boss => &BOSS,
        }
    }

    /// Fragments spawned on death, if any
    pub fn split_into(self) -> Option<(EnemyKind, usize)> {
        match self {
            EnemyKind::Cluster => Some((EnemyKind::Mini, 2)),
            _ => None,
        }
    }
}
