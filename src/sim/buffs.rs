//! Timed buffs
//!
//! Each buff is a single countdown; "active" is always derived as
//! `remaining > 0`, never stored separately.

use serde::{Deserialize, Serialize};

use super::entity::PowerUpKind;

/// Buff types backed by a countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuffKind {
    Shield,
    Multishot,
    Pierce,
    Slow,
    Rapid,
    Spread,
    Laser,
    Magnet,
    Overdrive,
    Coolant,
}

impl BuffKind {
    pub const COUNT: usize = 10;

    pub const ALL: [BuffKind; Self::COUNT] = [
        BuffKind::Shield,
        BuffKind::Multishot,
        BuffKind::Pierce,
        BuffKind::Slow,
        BuffKind::Rapid,
        BuffKind::Spread,
        BuffKind::Laser,
        BuffKind::Magnet,
        BuffKind::Overdrive,
        BuffKind::Coolant,
    ];

    #[inline]
    fn index(self) -> usize {
        self as usize
    }

    /// Buff granted by a pickup (life and bomb are instant, not timed)
    pub fn from_power_up(kind: PowerUpKind) -> Option<Self> {
        match kind {
            PowerUpKind::Shield => Some(BuffKind::Shield),
            PowerUpKind::Multishot => Some(BuffKind::Multishot),
            PowerUpKind::Pierce => Some(BuffKind::Pierce),
            PowerUpKind::Slow => Some(BuffKind::Slow),
            PowerUpKind::Rapid => Some(BuffKind::Rapid),
            PowerUpKind::Spread => Some(BuffKind::Spread),
            PowerUpKind::Laser => Some(BuffKind::Laser),
            PowerUpKind::Magnet => Some(BuffKind::Magnet),
            PowerUpKind::Overdrive => Some(BuffKind::Overdrive),
            PowerUpKind::Coolant => Some(BuffKind::Coolant),
            PowerUpKind::Life | PowerUpKind::Bomb => None,
        }
    }
}

/// Countdown per buff, in frames
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Buffs {
    timers: [u32; BuffKind::COUNT],
}

impl Buffs {
    /// Start or refresh a buff. A shorter refresh never cuts a running timer.
    pub fn activate(&mut self, kind: BuffKind, frames: u32) {
        let slot = &mut self.timers[kind.index()];
        *slot = (*slot).max(frames);
    }

    #[inline]
    pub fn is_active(&self, kind: BuffKind) -> bool {
        self.timers[kind.index()] > 0
    }

    #[inline]
    pub fn remaining(&self, kind: BuffKind) -> u32 {
        self.timers[kind.index()]
    }

    /// Currently active buffs in declaration order
    pub fn active(&self) -> Vec<BuffKind> {
        BuffKind::ALL
            .into_iter()
            .filter(|&k| self.is_active(k))
            .collect()
    }

    /// Decrement every running timer once. Returns the buffs that reached
    /// zero on this call (each expiry is reported exactly once).
    pub fn tick(&mut self) -> Vec<BuffKind> {
        let mut expired = Vec::new();
        for kind in BuffKind::ALL {
            let slot = &mut self.timers[kind.index()];
            if *slot > 0 {
                *slot -= 1;
                if *slot == 0 {
                    expired.push(kind);
                }
            }
        }
        expired
    }
}

/// Shape of a player volley
///
/// Precedence is explicit: laser beats spread beats multishot beats single.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FirePattern {
    Single,
    Multishot,
    Spread,
    Laser,
}

impl FirePattern {
    /// Buff-to-pattern precedence, highest first
    pub const PRECEDENCE: [(BuffKind, FirePattern); 3] = [
        (BuffKind::Laser, FirePattern::Laser),
        (BuffKind::Spread, FirePattern::Spread),
        (BuffKind::Multishot, FirePattern::Multishot),
    ];

    pub fn select(buffs: &Buffs) -> FirePattern {
        Self::PRECEDENCE
            .iter()
            .find(|(buff, _)| buffs.is_active(*buff))
            .map(|&(_, pattern)| pattern)
            .unwrap_or(FirePattern::Single)
    }
}
