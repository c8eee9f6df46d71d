//! Data-driven game balance
//!
//! Knobs that designers tweak without touching simulation code. Loaded from
//! JSON; any field left out keeps its default.

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::buffs::BuffKind;
use crate::sim::entity::PowerUpKind;

/// How power-ups enter the playfield
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropMode {
    /// Each kill rolls against its archetype's drop chance
    #[default]
    PerEnemy,
    /// A random basic pickup falls on a fixed interval instead
    Periodic,
}

/// Buff durations in frames
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuffDurations {
    pub shield: u32,
    pub multishot: u32,
    pub pierce: u32,
    pub slow: u32,
    pub rapid: u32,
    pub spread: u32,
    pub laser: u32,
    pub magnet: u32,
    pub overdrive: u32,
    pub coolant: u32,
}

impl Default for BuffDurations {
    fn default() -> Self {
        Self {
            shield: 300,
            multishot: 400,
            pierce: 360,
            slow: 300,
            rapid: 360,
            spread: 400,
            laser: 300,
            magnet: 480,
            overdrive: 360,
            coolant: 480,
        }
    }
}

impl BuffDurations {
    pub fn frames(&self, kind: BuffKind) -> u32 {
        match kind {
            BuffKind::Shield => self.shield,
            BuffKind::Multishot => self.multishot,
            BuffKind::Pierce => self.pierce,
            BuffKind::Slow => self.slow,
            BuffKind::Rapid => self.rapid,
            BuffKind::Spread => self.spread,
            BuffKind::Laser => self.laser,
            BuffKind::Magnet => self.magnet,
            BuffKind::Overdrive => self.overdrive,
            BuffKind::Coolant => self.coolant,
        }
    }
}

/// Errors raised while loading tuning data
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("invalid tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("overheat threshold must be at least one frame")]
    ZeroHeatThreshold,
    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f32 },
    #[error("power-up weight table has no positive weight")]
    EmptyWeights,
    #[error("power-up weights sum past {}", u32::MAX)]
    WeightOverflow,
}

/// Game balance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub drop_mode: DropMode,
    /// Multiplies every archetype's drop chance
    pub drop_chance_scale: f32,
    /// Weighted pool for per-enemy drops
    pub power_up_weights: Vec<(PowerUpKind, u32)>,
    /// Frames between periodic drops
    pub periodic_drop_interval: u32,
    pub platforms_enabled: bool,
    /// Continuous fire allowed before meltdown (2.0 s)
    pub overheat_threshold_frames: u32,
    /// Coolant multiplies the threshold by this (>1 is more tolerant)
    pub coolant_factor: f32,
    /// Overdrive multiplies the threshold by this (<1 is less tolerant)
    pub overdrive_heat_factor: f32,
    /// Enemy and enemy-bullet speed while slow is active
    pub slow_factor: f32,
    pub buff_frames: BuffDurations,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            drop_mode: DropMode::PerEnemy,
            drop_chance_scale: 1.0,
            power_up_weights: vec![
                (PowerUpKind::Shield, 10),
                (PowerUpKind::Life, 4),
                (PowerUpKind::Multishot, 10),
                (PowerUpKind::Bomb, 5),
                (PowerUpKind::Coolant, 10),
                (PowerUpKind::Pierce, 8),
                (PowerUpKind::Slow, 6),
                (PowerUpKind::Rapid, 8),
                (PowerUpKind::Spread, 7),
                (PowerUpKind::Laser, 4),
                (PowerUpKind::Magnet, 6),
                (PowerUpKind::Overdrive, 4),
            ],
            periodic_drop_interval: 800,
            platforms_enabled: true,
            overheat_threshold_frames: 120,
            coolant_factor: 1.5,
            overdrive_heat_factor: 0.75,
            slow_factor: 0.5,
            buff_frames: BuffDurations::default(),
        }
    }
}

impl Tuning {
    /// Parse and validate tuning JSON
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        if let Err(e) = tuning.validate() {
            log::warn!("Rejected tuning: {}", e);
            return Err(e);
        }
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        if self.overheat_threshold_frames == 0 {
            return Err(TuningError::ZeroHeatThreshold);
        }
        for (name, value) in [
            ("coolant_factor", self.coolant_factor),
            ("overdrive_heat_factor", self.overdrive_heat_factor),
            ("slow_factor", self.slow_factor),
        ] {
            if !(value > 0.0) {
                return Err(TuningError::NonPositive { name, value });
            }
        }
        if self.drop_chance_scale < 0.0 {
            return Err(TuningError::NonPositive {
                name: "drop_chance_scale",
                value: self.drop_chance_scale,
            });
        }
        let total = self
            .power_up_weights
            .iter()
            .try_fold(0u32, |sum, &(_, w)| sum.checked_add(w))
            .ok_or(TuningError::WeightOverflow)?;
        if self.drop_mode == DropMode::PerEnemy && total == 0 {
            return Err(TuningError::EmptyWeights);
        }
        Ok(())
    }

    /// Pick a power-up from the weighted pool
    pub fn pick_power_up<R: Rng>(&self, rng: &mut R) -> Option<PowerUpKind> {
        let total: u64 = self.power_up_weights.iter().map(|&(_, w)| u64::from(w)).sum();
        if total == 0 {
            return None;
        }
        let mut roll = rng.random_range(0..total);
        for &(kind, weight) in &self.power_up_weights {
            let weight = u64::from(weight);
            if roll < weight {
                return Some(kind);
            }
            roll -= weight;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_defaults_validate() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "drop_mode": "periodic", "slow_factor": 0.25 }"#)
            .unwrap();
        assert_eq!(tuning.drop_mode, DropMode::Periodic);
        assert_eq!(tuning.slow_factor, 0.25);
        assert_eq!(tuning.overheat_threshold_frames, 120);
        assert_eq!(tuning.buff_frames.frames(BuffKind::Shield), 300);
    }

    #[test]
    fn test_rejects_zero_threshold() {
        let err = Tuning::from_json(r#"{ "overheat_threshold_frames": 0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::ZeroHeatThreshold));
    }

    #[test]
    fn test_rejects_bad_factor() {
        let err = Tuning::from_json(r#"{ "coolant_factor": -1.0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::NonPositive { name: "coolant_factor", .. }));
    }

    #[test]
    fn test_rejects_overflowing_weights() {
        let err = Tuning::from_json(r#"{ "power_up_weights": [["shield", 4294967295], ["life", 1]] }"#)
            .unwrap_err();
        assert!(matches!(err, TuningError::WeightOverflow));
    }

    #[test]
    fn test_pick_with_huge_weights() {
        let tuning = Tuning {
            power_up_weights: vec![(PowerUpKind::Shield, u32::MAX), (PowerUpKind::Life, u32::MAX)],
            ..Tuning::default()
        };
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..20 {
            assert!(tuning.pick_power_up(&mut rng).is_some());
        }
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = Tuning::from_json("{ not json").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
    }

    #[test]
    fn test_pick_respects_weights() {
        let tuning = Tuning {
            power_up_weights: vec![(PowerUpKind::Laser, 0), (PowerUpKind::Magnet, 5)],
            ..Tuning::default()
        };
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..50 {
            assert_eq!(tuning.pick_power_up(&mut rng), Some(PowerUpKind::Magnet));
        }
    }

    #[test]
    fn test_pick_empty_pool() {
        let tuning = Tuning {
            power_up_weights: Vec::new(),
            ..Tuning::default()
        };
        let mut rng = Pcg32::seed_from_u64(7);
        assert_eq!(tuning.pick_power_up(&mut rng), None);
    }
}
