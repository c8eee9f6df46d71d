//! Frame-stepped simulation
//!
//! All gameplay logic lives here and stays free of rendering and platform
//! code:
//! - Fixed timestep only (one tick per 60 Hz frame)
//! - Seeded RNG only
//! - One `RunState` passed by reference into each subsystem

pub mod archetype;
pub mod buffs;
pub mod collision;
pub mod combat;
pub mod entity;
pub mod fire;
pub mod levels;
pub mod movement;
pub mod progression;
pub mod snapshot;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod timers;

pub use buffs::{BuffKind, Buffs, FirePattern};
pub use collision::Aabb;
pub use entity::{Bullet, BulletOwner, Enemy, EnemyKind, Particle, Platform, Player, PowerUp, PowerUpKind};
pub use levels::{CAMPAIGN, LevelDef, WaveDef};
pub use snapshot::Snapshot;
pub use state::{AudioCue, GameEvent, RunEnd, RunState, RunStatus};
pub use tick::{TickInput, tick};
