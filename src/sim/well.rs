//! Gravity wells (vortexes)
//!
//! A well is a static body that pulls every projectile towards it. Each hit
//! makes it stronger and bigger.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{ActorId, Body, BodyKind};
use super::motion::Spinner;
use crate::consts::MIN_FORCE_DISTANCE;
use crate::error::SimError;
use crate::tuning::{GravityTuning, WellTuning};
use crate::{angle_between, distance};

/// Newtonian pull of `source` on `other`, scaled by `strength`.
///
/// `F = strength * G * FUDGE * m1 * m2 / d^2`, pointing from `other` towards
/// `source`. Coincident bodies exert no force on each other.
pub fn attraction(source: &Body, strength: f32, other: &Body, gravity: &GravityTuning) -> Vec2 {
    let d = distance(other.position, source.position);
    if d <= MIN_FORCE_DISTANCE {
        return Vec2::ZERO;
    }
    let magnitude = strength * gravity.constant() * source.mass() * other.mass() / (d * d);
    let angle = angle_between(other.position, source.position);
    Vec2::new(angle.cos(), angle.sin()) * magnitude
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GravityWell {
    pub id: ActorId,
    pub strength: f32,
    /// Number of projectiles swallowed
    pub hits: u32,
    /// Radius at creation, for the render scale
    base_radius: f32,
    pub spin: Spinner,
}

impl GravityWell {
    pub fn new(id: ActorId, strength: f32, base_radius: f32, spin: Spinner) -> Self {
        Self {
            id,
            strength,
            hits: 0,
            base_radius,
            spin,
        }
    }

    /// Static body for a new well at `position`
    pub fn spawn_body(position: Vec2, tuning: &WellTuning) -> Result<Body, SimError> {
        Body::new(BodyKind::Static, tuning.mass, tuning.radius, position)
    }

    /// Force this well (occupying `body`) exerts on `other`
    pub fn force_on(&self, body: &Body, other: &Body, gravity: &GravityTuning) -> Vec2 {
        attraction(body, self.strength, other, gravity)
    }

    /// Record a swallowed projectile.
    ///
    /// Strength rises by a fixed step and the returned replacement body has
    /// its radius scaled by `sqrt(growth)`, so the area grows by `growth`.
    /// The caller swaps it into the physics backend.
    pub fn register_hit(&mut self, current: &Body, tuning: &WellTuning) -> Result<Body, SimError> {
        let grown = current.with_radius(current.radius() * tuning.growth.sqrt())?;
        self.strength += tuning.strength_step;
        self.hits += 1;
        Ok(grown)
    }

    /// Advance the idle spin, returning the new orientation in degrees
    pub fn update(&mut self) -> f32 {
        self.spin.advance()
    }

    pub fn visual_scale(&self, body: &Body) -> f32 {
        body.radius() / self.base_radius
    }
}
