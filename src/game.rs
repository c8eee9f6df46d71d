//! App state machine
//!
//! `Game` owns the current run and drives it with a fixed-timestep
//! accumulator. It only ticks while `Playing`; everything else (menus,
//! pause, end screens) leaves the run untouched.
//!
//! ```text
//! Boot -> Start -> LevelSelect -> Narrative -> Playing <-> Paused
//!           ^  \-> About                        |
//!           |                                   v
//!           +---------------------- GameOver | Victory
//! ```

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::persistence::{KeyValueStore, MemoryStore, Progress};
use crate::platform::InputBuffer;
use crate::scheduler::{Deferred, ScheduledTask, Scheduler};
use crate::settings::Settings;
use crate::sim::{AudioCue, GameEvent, LevelDef, RunEnd, RunState, Snapshot, CAMPAIGN, tick};
use crate::tuning::Tuning;

/// Top-level app screens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppState {
    Boot,
    Start,
    LevelSelect,
    About,
    /// Briefing shown before a level starts
    Narrative,
    Playing,
    Paused,
    GameOver,
    Victory,
}

/// Points where the shell may show an interstitial
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdBreak {
    GameOver,
    LevelTransition,
}

/// Outbound notifications. Every method defaults to doing nothing.
pub trait Collaborators {
    fn game_over(&mut self, _score: u64, _cause: RunEnd) {}
    fn level_complete(&mut self, _level_index: usize) {}
    fn audio_cue(&mut self, _cue: AudioCue) {}
    fn interstitial(&mut self, _at: AdBreak) {}
}

/// Collaborator that ignores everything
pub struct NoHooks;

impl Collaborators for NoHooks {}

/// Game instance holding all app-level state
pub struct Game {
    state: AppState,
    levels: &'static [LevelDef],
    tuning: Tuning,
    settings: Settings,
    store: Box<dyn KeyValueStore>,
    progress: Progress,
    run: Option<RunState>,
    scheduler: Scheduler,
    input: InputBuffer,
    accumulator: f32,
    seed: u64,
    next_run_id: u64,
    /// Level the next run starts on
    level_index: usize,
    /// Host clock seen by the latest `update`
    last_now_ms: f64,
    paused_at_ms: Option<f64>,
}

impl Game {
    pub fn new(
        levels: &'static [LevelDef],
        tuning: Tuning,
        store: Box<dyn KeyValueStore>,
        seed: u64,
    ) -> Self {
        let progress = Progress::load(store.as_ref());
        let settings = Settings::load(store.as_ref());
        Self {
            state: AppState::Boot,
            levels,
            tuning,
            settings,
            store,
            progress,
            run: None,
            scheduler: Scheduler::new(),
            input: InputBuffer::new(),
            accumulator: 0.0,
            seed,
            next_run_id: 1,
            level_index: 0,
            last_now_ms: 0.0,
            paused_at_ms: None,
        }
    }

    /// Shipped campaign, default tuning, in-memory storage
    pub fn with_defaults(seed: u64) -> Self {
        Self::new(CAMPAIGN, Tuning::default(), Box::new(MemoryStore::new()), seed)
    }

    pub fn state(&self) -> AppState {
        self.state
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn level_index(&self) -> usize {
        self.level_index
    }

    pub fn run(&self) -> Option<&RunState> {
        self.run.as_ref()
    }

    /// Level the narrative screen is briefing (None past the last level)
    pub fn briefing(&self) -> Option<&'static LevelDef> {
        self.levels.get(self.level_index)
    }

    pub fn set_settings(&mut self, settings: Settings) {
        if let Err(e) = settings.save(self.store.as_mut()) {
            log::warn!("Failed to save settings: {}", e);
        }
        if let Some(run) = self.run.as_mut() {
            run.max_particles = settings.max_particles();
        }
        self.settings = settings;
    }

    fn transition(&mut self, to: AppState) {
        log::info!("App state {:?} -> {:?}", self.state, to);
        self.state = to;
    }

    fn require(&self, op: &str, allowed: &[AppState]) -> bool {
        if allowed.contains(&self.state) {
            true
        } else {
            log::warn!("Ignoring {} in {:?}", op, self.state);
            false
        }
    }

    pub fn boot(&mut self) -> bool {
        if !self.require("boot", &[AppState::Boot]) {
            return false;
        }
        self.transition(AppState::Start);
        true
    }

    pub fn open_level_select(&mut self) -> bool {
        if !self.require("level select", &[AppState::Start]) {
            return false;
        }
        self.transition(AppState::LevelSelect);
        true
    }

    pub fn open_about(&mut self) -> bool {
        if !self.require("about", &[AppState::Start]) {
            return false;
        }
        self.transition(AppState::About);
        true
    }

    pub fn close_about(&mut self) -> bool {
        if !self.require("close about", &[AppState::About]) {
            return false;
        }
        self.transition(AppState::Start);
        true
    }

    /// Pick a level. Past the end of the table is a win, not an error;
    /// locked levels are refused.
    pub fn select_level(&mut self, index: usize) -> bool {
        if !self.require("select level", &[AppState::LevelSelect]) {
            return false;
        }
        if index >= self.levels.len() {
            self.level_index = index;
            self.transition(AppState::Victory);
            return true;
        }
        if index > self.progress.unlocked_level {
            log::warn!("Level {} is still locked", index + 1);
            return false;
        }
        self.level_index = index;
        self.transition(AppState::Narrative);
        true
    }

    /// Enter `Playing` with a fresh run of the selected level
    pub fn start_run(&mut self) -> bool {
        if !self.require("start run", &[AppState::Narrative, AppState::GameOver]) {
            return false;
        }
        if self.level_index >= self.levels.len() {
            self.transition(AppState::Victory);
            return true;
        }
        if let Some(old) = self.run.take() {
            self.scheduler.cancel_run(old.run_id);
        }

        let run_id = self.next_run_id;
        self.next_run_id += 1;
        let seed = self.seed ^ run_id.wrapping_mul(0x9E37_79B9_7F4A_7C15);
        let mut run = RunState::new(seed, run_id, self.level_index, self.levels, self.tuning.clone());
        run.max_particles = self.settings.max_particles();

        self.run = Some(run);
        self.input.reset();
        self.accumulator = 0.0;
        self.paused_at_ms = None;
        self.transition(AppState::Playing);
        true
    }

    /// Suspend the run. A second call is a no-op.
    pub fn pause(&mut self) -> bool {
        if self.state != AppState::Playing {
            return false;
        }
        self.input.reset();
        self.paused_at_ms = Some(self.last_now_ms);
        self.transition(AppState::Paused);
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.state != AppState::Paused {
            return false;
        }
        self.accumulator = 0.0;
        self.transition(AppState::Playing);
        true
    }

    /// Abandon whatever is on screen and go back to the title
    pub fn quit_to_title(&mut self) -> bool {
        if matches!(self.state, AppState::Boot | AppState::Start | AppState::Playing) {
            log::warn!("Ignoring quit in {:?}", self.state);
            return false;
        }
        if let Some(run) = self.run.take() {
            let dropped = self.scheduler.cancel_run(run.run_id);
            log::debug!("Dropped {} pending task(s) of run {}", dropped, run.run_id);
        }
        self.input.reset();
        self.transition(AppState::Start);
        true
    }

    pub fn pointer_moved(&mut self, norm_x: f32) {
        self.input.pointer_moved(norm_x);
    }

    pub fn fire_pressed(&mut self) {
        self.input.fire_pressed();
    }

    pub fn fire_released(&mut self) {
        self.input.fire_released();
    }

    /// Renderer view of the run, with presentation settings applied
    pub fn snapshot(&self) -> Option<Snapshot> {
        let mut snapshot = self.run.as_ref()?.snapshot();
        if !self.settings.effective_screen_shake() {
            snapshot.screen_shake = 0.0;
        }
        Some(snapshot)
    }

    /// Per-frame host callback: run whole ticks for the elapsed time, then
    /// any deferred task that came due.
    pub fn update(&mut self, dt: f32, now_ms: f64, hooks: &mut dyn Collaborators) {
        self.last_now_ms = now_ms;
        if self.state != AppState::Playing {
            return;
        }

        if let Some(paused_at) = self.paused_at_ms.take() {
            if let Some(run) = self.run.as_ref() {
                self.scheduler.postpone(run.run_id, now_ms - paused_at);
            }
        }

        let dt = dt.clamp(0.0, 0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= FRAME_DT && substeps < MAX_SUBSTEPS {
            let input = self.input.sample();
            let Some(run) = self.run.as_mut() else {
                break;
            };
            tick(run, &input);
            self.accumulator -= FRAME_DT;
            substeps += 1;

            self.dispatch_events(now_ms, hooks);
            if self.state != AppState::Playing {
                break;
            }
        }
        // A slow host loses time instead of replaying it at 4x speed later
        if substeps == MAX_SUBSTEPS && self.accumulator >= FRAME_DT {
            log::debug!("Dropping {:.3}s of simulation backlog", self.accumulator);
            self.accumulator = 0.0;
        }

        for task in self.scheduler.take_due(now_ms) {
            self.run_task(task, hooks);
        }
    }

    fn dispatch_events(&mut self, now_ms: f64, hooks: &mut dyn Collaborators) {
        let Some(run) = self.run.as_mut() else {
            return;
        };
        let run_id = run.run_id;
        for event in run.drain_events() {
            match event {
                GameEvent::Sound(cue) => hooks.audio_cue(cue),
                GameEvent::Announcement(text) => {
                    self.scheduler
                        .schedule(run_id, now_ms, BANNER_MS, Deferred::ClearAnnouncement(text));
                }
                GameEvent::LevelFinished { .. } => {
                    self.scheduler.schedule(
                        run_id,
                        now_ms,
                        LEVEL_COMPLETE_DELAY_MS,
                        Deferred::SignalLevelComplete,
                    );
                }
                GameEvent::GameOver { score, cause } => {
                    self.finish_run(score, cause, hooks);
                    return;
                }
                other => log::debug!("Run {}: {:?}", run_id, other),
            }
        }
    }

    fn finish_run(&mut self, score: u64, cause: RunEnd, hooks: &mut dyn Collaborators) {
        if let Some(run) = self.run.as_ref() {
            self.scheduler.cancel_run(run.run_id);
        }
        if self.progress.record_score(score) {
            log::info!("New high score: {}", score);
        }
        self.save_progress();
        self.transition(AppState::GameOver);
        hooks.game_over(score, cause);
        hooks.interstitial(AdBreak::GameOver);
    }

    /// Act on a due task only if its run is still the live, playing one
    fn run_task(&mut self, task: ScheduledTask, hooks: &mut dyn Collaborators) {
        let live = self.run.as_ref().is_some_and(|r| r.run_id == task.run_id && r.is_active());
        if !live || self.state != AppState::Playing {
            log::debug!("Discarding stale {:?} from run {}", task.task, task.run_id);
            return;
        }
        match task.task {
            Deferred::ClearAnnouncement(text) => {
                if let Some(run) = self.run.as_mut() {
                    run.clear_announcement(&text);
                }
            }
            Deferred::SignalLevelComplete => {
                if self.run.as_ref().is_some_and(|r| r.level_finished) {
                    self.complete_level(hooks);
                }
            }
        }
    }

    fn complete_level(&mut self, hooks: &mut dyn Collaborators) {
        let finished = self.level_index;
        if let Some(run) = self.run.take() {
            self.scheduler.cancel_run(run.run_id);
            self.progress.record_score(run.score);
        }
        let last = self.levels.len().saturating_sub(1);
        self.progress.unlock((finished + 1).min(last));
        self.save_progress();

        hooks.level_complete(finished);
        hooks.interstitial(AdBreak::LevelTransition);

        self.level_index = finished + 1;
        if self.level_index >= self.levels.len() {
            self.transition(AppState::Victory);
        } else {
            self.transition(AppState::Narrative);
        }
    }

    fn save_progress(&mut self) {
        if let Err(e) = self.progress.save(self.store.as_mut()) {
            log::warn!("Failed to save progress: {}", e);
        }
    }
}
