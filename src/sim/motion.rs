//! Idle animation state: bounded tilt and continuous spin

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::normalize_degrees;

/// Swings between `min` and `max` degrees, reversing at the bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Oscillator {
    angle: f32,
    step: f32,
    min: f32,
    max: f32,
    /// +1.0 or -1.0
    direction: f32,
}

impl Oscillator {
    /// Oscillator starting at 0 and moving towards `max` first
    pub fn new(step: f32, min: f32, max: f32) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self {
            angle: 0.0_f32.clamp(min, max),
            step: step.abs(),
            min,
            max,
            direction: 1.0,
        }
    }

    /// Symmetric oscillator in `[-limit, limit]`
    pub fn symmetric(step: f32, limit: f32) -> Self {
        Self::new(step, -limit.abs(), limit.abs())
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Move one step and return the new angle
    pub fn advance(&mut self) -> f32 {
        let mut next = self.angle + self.direction * self.step;
        if next > self.max || next < self.min {
            self.direction = -self.direction;
            next = self.angle + self.direction * self.step;
        }
        self.angle = next.clamp(self.min, self.max);
        self.angle
    }

    pub fn reset(&mut self) {
        self.angle = 0.0_f32.clamp(self.min, self.max);
        self.direction = 1.0;
    }
}

/// Continuous rotation at a fixed signed rate, wrapping at 360
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spinner {
    angle: f32,
    /// Signed degrees per tick
    step: f32,
}

impl Spinner {
    pub fn new(step: f32) -> Self {
        Self { angle: 0.0, step }
    }

    /// Spinner whose direction is picked once from `rng`
    pub fn random<R: Rng + ?Sized>(step: f32, rng: &mut R) -> Self {
        let sign = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        Self::new(step.abs() * sign)
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    pub fn advance(&mut self) -> f32 {
        self.angle = normalize_degrees(self.angle + self.step);
        self.angle
    }

    pub fn reset(&mut self) {
        self.angle = 0.0;
    }
}
