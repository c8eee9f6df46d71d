//! Static level/wave table
//!
//! A level is an ordered list of waves; a wave names one archetype and how
//! many to spawn. Interval and burst fall back to level-scaled defaults.

use super::entity::EnemyKind;

/// Frames the boss intro banner holds before the boss appears
pub const BOSS_INTRO_FRAMES: u32 = 120;

/// One wave of a level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaveDef {
    pub kind: EnemyKind,
    pub count: u32,
    /// Frames between spawn ticks (default scales with level)
    pub spawn_interval: Option<u32>,
    /// Enemies per spawn tick (default scales with level)
    pub burst: Option<u32>,
}

impl WaveDef {
    pub const fn new(kind: EnemyKind, count: u32) -> Self {
        Self {
            kind,
            count,
            spawn_interval: None,
            burst: None,
        }
    }

    pub const fn every(mut self, frames: u32) -> Self {
        self.spawn_interval = Some(frames);
        self
    }

    pub const fn burst(mut self, burst: u32) -> Self {
        self.burst = Some(burst);
        self
    }

    /// Single-boss wave with an intro hold before the spawn
    pub const fn boss(kind: EnemyKind) -> Self {
        Self::new(kind, 1).every(BOSS_INTRO_FRAMES)
    }

    pub fn is_boss_wave(&self) -> bool {
        self.kind.is_boss_class()
    }

    /// Effective spawn interval at a 1-based level number
    pub fn interval_for(&self, level: u32) -> u32 {
        self.spawn_interval
            .unwrap_or_else(|| 80u32.saturating_sub(level.saturating_mul(5)).max(15))
            .max(1)
    }

    /// Effective burst size at a 1-based level number
    pub fn burst_for(&self, level: u32) -> u32 {
        self.burst.unwrap_or(1 + level / 4).max(1)
    }
}

/// One level of the campaign
#[derive(Debug, Clone, Copy)]
pub struct LevelDef {
    pub name: &'static str,
    /// Briefing text shown on the narrative screen
    pub briefing: &'static str,
    pub waves: &'static [WaveDef],
}

/// Look up a level; `None` past the end of the table
pub fn level(levels: &[LevelDef], index: usize) -> Option<&LevelDef> {
    levels.get(index)
}

use EnemyKind::*;

/// The shipped campaign
pub static CAMPAIGN: &[LevelDef] = &[
    LevelDef {
        name: "Ignition",
        briefing: "Core online. Keep the trigger cycling or the core will cook itself.",
        waves: &[
            WaveDef::new(Orb, 6),
            WaveDef::new(Diver, 4),
            WaveDef::new(Tank, 3),
        ],
    },
    LevelDef {
        name: "Crossfire",
        briefing: "Armed contacts inbound. Clusters fracture when breached.",
        waves: &[
            WaveDef::new(Orb, 8).burst(2),
            WaveDef::new(Shooter, 4),
            WaveDef::new(Sweeper, 5),
            WaveDef::new(Cluster, 3),
        ],
    },
    LevelDef {
        name: "Pressure",
        briefing: "Sentries lock on. A heavy signature trails the formation.",
        waves: &[
            WaveDef::new(Diver, 8),
            WaveDef::new(Sentry, 3),
            WaveDef::new(Rusher, 6),
            WaveDef::boss(Midboss),
        ],
    },
    LevelDef {
        name: "Bulwark",
        briefing: "Wardens hold the line. Break them before they box you in.",
        waves: &[
            WaveDef::new(Sweeper, 8),
            WaveDef::new(Cluster, 5),
            WaveDef::new(Warden, 2).every(90),
            WaveDef::new(Shooter, 6).burst(2),
        ],
    },
    LevelDef {
        name: "Redline",
        briefing: "Everything at once. Watch the temperature.",
        waves: &[
            WaveDef::new(Rusher, 10).burst(2),
            WaveDef::new(Sentry, 4),
            WaveDef::new(Tank, 6),
            WaveDef::boss(Midboss),
        ],
    },
    LevelDef {
        name: "Meltdown",
        briefing: "The mothership. Three layers of plating. Do not overheat.",
        waves: &[
            WaveDef::new(Orb, 12).burst(3),
            WaveDef::new(Warden, 3).every(100),
            WaveDef::new(Cluster, 6),
            WaveDef::boss(Boss),
        ],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_interval_scales_and_floors() {
        let wave = WaveDef::new(Orb, 5);
        assert_eq!(wave.interval_for(1), 75);
        assert_eq!(wave.interval_for(6), 50);
        assert_eq!(wave.interval_for(40), 15);
        assert!(wave.interval_for(2) <= wave.interval_for(1));
    }

    #[test]
    fn test_explicit_interval_and_burst_win() {
        let wave = WaveDef::new(Orb, 5).every(30).burst(3);
        assert_eq!(wave.interval_for(10), 30);
        assert_eq!(wave.burst_for(10), 3);
    }

    #[test]
    fn test_default_burst_grows() {
        let wave = WaveDef::new(Orb, 5);
        assert_eq!(wave.burst_for(1), 1);
        assert_eq!(wave.burst_for(4), 2);
        assert_eq!(wave.burst_for(8), 3);
    }

    #[test]
    fn test_level_lookup_past_end() {
        assert!(level(CAMPAIGN, 0).is_some());
        assert!(level(CAMPAIGN, CAMPAIGN.len()).is_none());
    }

    #[test]
    fn test_campaign_well_formed() {
        for level in CAMPAIGN {
            assert!(!level.waves.is_empty(), "{} has no waves", level.name);
            for wave in level.waves {
                assert!(wave.count > 0);
                assert!(wave.kind != Mini, "minis are split fragments, not wave enemies");
                if wave.is_boss_wave() {
                    assert_eq!(wave.count, 1);
                }
            }
        }
        let last = CAMPAIGN.last().unwrap();
        assert_eq!(last.waves.last().unwrap().kind, Boss);
    }
}
