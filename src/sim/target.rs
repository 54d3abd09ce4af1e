//! The cat: a rectangular hit region that jumps elsewhere when hit

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::level::Level;
use super::motion::Oscillator;
use crate::tuning::{TargetTuning, Viewport};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    /// Center of the footprint, in world units
    pub position: Vec2,
    pub half_extents: Vec2,
    /// Head tilt (idle animation)
    pub tilt: Oscillator,
}

impl Target {
    pub fn new(position: Vec2, tuning: &TargetTuning) -> Self {
        Self {
            position,
            half_extents: Vec2::new(tuning.half_width, tuning.half_height),
            tilt: Oscillator::symmetric(tuning.tilt_step, tuning.tilt_limit),
        }
    }

    /// Axis-aligned containment, edges included
    pub fn contains(&self, point: Vec2) -> bool {
        let d = (point - self.position).abs();
        d.x <= self.half_extents.x && d.y <= self.half_extents.y
    }

    /// Jump to a random spawn candidate of `level`, resolved against the
    /// viewport at the time of the hit. Returns the new position.
    pub fn relocate<R: Rng + ?Sized>(&mut self, level: &Level, viewport: &Viewport, rng: &mut R) -> Vec2 {
        if let Some(fraction) = level.next_target_position(rng) {
            self.position = viewport.resolve(fraction);
        }
        self.position
    }

    pub fn update(&mut self) -> f32 {
        self.tilt.advance()
    }
}
