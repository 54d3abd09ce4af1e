//! The player's turret
//!
//! Angles are in degrees, measured clockwise from straight up (+y). The
//! barrel can only face the forward half-plane.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::tuning::TurretTuning;
use crate::{clip, distance, heading, normalize_degrees};

/// Position and velocity of a projectile leaving the barrel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Launch {
    pub position: Vec2,
    pub velocity: Vec2,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turret {
    pub origin: Vec2,
    /// Barrel angle in degrees, never inside (90, 270)
    pub angle: f32,
    /// Charge in `[min_power, max_power]`
    pub power: f32,
    tuning: TurretTuning,
}

impl Turret {
    pub fn new(origin: Vec2, tuning: TurretTuning) -> Self {
        Self {
            origin,
            angle: 0.0,
            power: tuning.min_power,
            tuning,
        }
    }

    /// Point the barrel at `pointer` and charge by its distance from the tip
    pub fn aim(&mut self, pointer: Vec2) {
        let d = pointer - self.origin;
        self.angle = clamp_forward(normalize_degrees(d.x.atan2(d.y).to_degrees()));

        let reach = distance(pointer, self.barrel_tip()) / self.tuning.reference_distance;
        self.power = clip(reach, self.tuning.min_power, self.tuning.max_power);
    }

    pub fn barrel_tip(&self) -> Vec2 {
        self.origin + heading(self.angle) * self.tuning.barrel_length
    }

    /// Launch parameters for a new projectile at the current aim and charge
    pub fn fire(&self) -> Launch {
        let speed = self.power * self.tuning.max_launch_velocity;
        Launch {
            position: self.barrel_tip(),
            velocity: heading(self.angle) * speed,
        }
    }
}

/// Snap angles in the rear arc (90, 270) to the nearer side boundary
fn clamp_forward(angle: f32) -> f32 {
    if angle > 90.0 && angle < 270.0 {
        if angle < 180.0 { 90.0 } else { 270.0 }
    } else {
        angle
    }
}
