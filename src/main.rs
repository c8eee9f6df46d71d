//! Overheat headless runner
//!
//! Plays the campaign with a simple autopilot and prints a JSON summary.
//!
//! Usage: `overheat [seed] [tuning.json]`

use serde::Serialize;

use overheat::audio::AudioManager;
use overheat::consts::*;
use overheat::game::{AdBreak, AppState, Collaborators, Game};
use overheat::persistence::MemoryStore;
use overheat::sim::{AudioCue, CAMPAIGN, RunEnd, Snapshot};
use overheat::{Settings, Tuning};

/// Give up after ten simulated minutes
const MAX_FRAMES: u64 = 60 * 60 * 10;
/// Let go of the trigger before the core gets this hot
const HEAT_LIMIT: f32 = 0.7;

/// Logs everything the game reports and counts the tones it would play
struct DemoHooks {
    audio: AudioManager,
    tones: usize,
    levels_cleared: Vec<usize>,
    interstitials: usize,
    ended: Option<(u64, RunEnd)>,
}

impl Collaborators for DemoHooks {
    fn game_over(&mut self, score: u64, cause: RunEnd) {
        log::info!("Game over: {} points ({:?})", score, cause);
        self.ended = Some((score, cause));
    }

    fn level_complete(&mut self, level_index: usize) {
        log::info!("Level {} complete", level_index + 1);
        self.levels_cleared.push(level_index);
    }

    fn audio_cue(&mut self, cue: AudioCue) {
        self.tones += self.audio.play(cue).len();
    }

    fn interstitial(&mut self, at: AdBreak) {
        log::debug!("Interstitial at {:?}", at);
        self.interstitials += 1;
    }
}

/// Steers under the lowest enemy and fires in bursts that stay below the
/// meltdown threshold
#[derive(Default)]
struct Autopilot {
    holding: bool,
}

impl Autopilot {
    fn drive(&mut self, game: &mut Game, snapshot: &Snapshot) {
        let target = snapshot
            .enemies
            .iter()
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
            .map(|e| e.center().x);
        if let Some(x) = target {
            game.pointer_moved(x / SCREEN_WIDTH);
        }

        if self.holding && snapshot.heat >= HEAT_LIMIT {
            game.fire_released();
            self.holding = false;
        } else if !self.holding && target.is_some() {
            game.fire_pressed();
            self.holding = true;
        }
    }
}

#[derive(Serialize)]
struct Summary {
    seed: u64,
    final_state: AppState,
    frames: u64,
    score: u64,
    high_score: u64,
    levels_cleared: Vec<usize>,
    cause: Option<RunEnd>,
    tones: usize,
    interstitials: usize,
}

fn load_tuning(path: &str) -> Result<Tuning, Box<dyn std::error::Error>> {
    let json = std::fs::read_to_string(path)?;
    Ok(Tuning::from_json(&json)?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = match args.next() {
        Some(arg) => arg.parse()?,
        None => 0x0BEE_F00D,
    };
    let tuning = match args.next() {
        Some(path) => load_tuning(&path)?,
        None => Tuning::default(),
    };
    log::info!("Overheat (native) starting with seed {}", seed);

    let mut game = Game::new(CAMPAIGN, tuning, Box::new(MemoryStore::new()), seed);
    let mut hooks = DemoHooks {
        audio: AudioManager::from_settings(&Settings::default()),
        tones: 0,
        levels_cleared: Vec::new(),
        interstitials: 0,
        ended: None,
    };
    let mut pilot = Autopilot::default();

    game.boot();
    game.open_level_select();
    game.select_level(0);
    if let Some(level) = game.briefing() {
        log::info!("{}: {}", level.name, level.briefing);
    }
    game.start_run();

    let mut frames = 0;
    let mut last_score = 0;
    while frames < MAX_FRAMES {
        match game.state() {
            AppState::Playing => {}
            AppState::Narrative => {
                if let Some(level) = game.briefing() {
                    log::info!("{}: {}", level.name, level.briefing);
                }
                pilot = Autopilot::default();
                game.start_run();
                continue;
            }
            _ => break,
        }

        if let Some(snapshot) = game.snapshot() {
            last_score = snapshot.score;
            pilot.drive(&mut game, &snapshot);
        }
        frames += 1;
        let now_ms = frames as f64 * FRAME_DT as f64 * 1000.0;
        game.update(FRAME_DT, now_ms, &mut hooks);
    }

    let summary = Summary {
        seed,
        final_state: game.state(),
        frames,
        score: hooks.ended.map_or(last_score, |(score, _)| score),
        high_score: game.progress().high_score,
        levels_cleared: hooks.levels_cleared,
        cause: hooks.ended.map(|(_, cause)| cause),
        tones: hooks.tones,
        interstitials: hooks.interstitials,
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
