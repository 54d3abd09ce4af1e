//! Point-mass bodies
//!
//! A body is what the physics backend integrates: mass, circular footprint,
//! position, velocity and the force accumulated for the current tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// Actor identifier (allocated in ascending order by the game state)
pub type ActorId = u32;

/// Whether the integrator moves a body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyKind {
    /// Never integrated (wells)
    Static,
    /// Integrated every step (projectiles)
    Dynamic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub kind: BodyKind,
    mass: f32,
    radius: f32,
    pub position: Vec2,
    pub velocity: Vec2,
    /// Net force for the current tick; rebuilt from zero every tick
    pub force: Vec2,
}

impl Body {
    pub fn new(kind: BodyKind, mass: f32, radius: f32, position: Vec2) -> Result<Self, SimError> {
        if !(mass.is_finite() && mass > 0.0 && radius.is_finite() && radius > 0.0) {
            return Err(SimError::InvalidBody { mass, radius });
        }
        Ok(Self {
            kind,
            mass,
            radius,
            position,
            velocity: Vec2::ZERO,
            force: Vec2::ZERO,
        })
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// A copy of this body with a new collision shape.
    ///
    /// Shapes are immutable once registered; growing a body means building a
    /// replacement and handing it back to the backend.
    pub fn with_radius(&self, radius: f32) -> Result<Self, SimError> {
        let mut body = Self::new(self.kind, self.mass, radius, self.position)?;
        body.velocity = self.velocity;
        body.force = self.force;
        Ok(body)
    }

    /// Whether `point` lies within the circular footprint (boundary included)
    pub fn contains(&self, point: Vec2) -> bool {
        self.position.distance_squared(point) <= self.radius * self.radius
    }

    pub fn reset_force(&mut self) {
        self.force = Vec2::ZERO;
    }

    pub fn apply_force(&mut self, force: Vec2) {
        self.force += force;
    }
}
