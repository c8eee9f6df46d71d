//! Buffered player intent

use crate::consts::SCREEN_WIDTH;
use crate::sim::TickInput;

/// Latest pointer target and fire state, written by event handlers
#[derive(Debug, Clone, Default)]
pub struct InputBuffer {
    /// Desired ship center in playfield pixels
    target_x: Option<f32>,
    fire_held: bool,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer position normalized to the playfield width (0 = left edge,
    /// 1 = right edge). Out-of-range values are clamped.
    pub fn pointer_moved(&mut self, norm_x: f32) {
        if !norm_x.is_finite() {
            return;
        }
        self.target_x = Some(norm_x.clamp(0.0, 1.0) * SCREEN_WIDTH);
    }

    pub fn fire_pressed(&mut self) {
        self.fire_held = true;
    }

    pub fn fire_released(&mut self) {
        self.fire_held = false;
    }

    pub fn is_fire_held(&self) -> bool {
        self.fire_held
    }

    /// Drop held state (focus loss, pause, new run)
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Intent for the next tick
    pub fn sample(&self) -> TickInput {
        TickInput {
            target_x: self.target_x,
            fire_held: self.fire_held,
        }
    }
}
