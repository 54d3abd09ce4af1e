//! Physics backend seam
//!
//! The simulation never integrates motion itself. It accumulates forces on
//! bodies registered with a [`PhysicsBackend`] and asks the backend to step.
//! [`Space`] is the default backend: semi-implicit Euler over a map ordered by
//! actor id.

use std::collections::BTreeMap;

use glam::Vec2;

use super::body::{ActorId, Body, BodyKind};

pub trait PhysicsBackend {
    /// Register a body. Re-adding an existing id replaces it.
    fn add_body(&mut self, id: ActorId, body: Body);

    /// Unregister a body, returning it if it was present
    fn remove_body(&mut self, id: ActorId) -> Option<Body>;

    /// Swap in a replacement shape for an existing body.
    /// Returns false (and registers nothing) when `id` is unknown.
    fn replace_body(&mut self, id: ActorId, body: Body) -> bool;

    fn body(&self, id: ActorId) -> Option<&Body>;

    fn body_mut(&mut self, id: ActorId) -> Option<&mut Body>;

    /// Advance every dynamic body by `dt` under its accumulated force
    fn step(&mut self, dt: f32);

    /// Ids of all bodies whose footprint contains `point`, ascending
    fn query_point(&self, point: Vec2) -> Vec<ActorId>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Default integrator
#[derive(Debug, Clone, Default)]
pub struct Space {
    bodies: BTreeMap<ActorId, Body>,
    /// Simulated seconds integrated so far
    elapsed: f64,
}

impl Space {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }
}

impl PhysicsBackend for Space {
    fn add_body(&mut self, id: ActorId, body: Body) {
        self.bodies.insert(id, body);
    }

    fn remove_body(&mut self, id: ActorId) -> Option<Body> {
        self.bodies.remove(&id)
    }

    fn replace_body(&mut self, id: ActorId, body: Body) -> bool {
        match self.bodies.get_mut(&id) {
            Some(slot) => {
                *slot = body;
                true
            }
            None => false,
        }
    }

    fn body(&self, id: ActorId) -> Option<&Body> {
        self.bodies.get(&id)
    }

    fn body_mut(&mut self, id: ActorId) -> Option<&mut Body> {
        self.bodies.get_mut(&id)
    }

    fn step(&mut self, dt: f32) {
        for body in self.bodies.values_mut() {
            if body.kind == BodyKind::Static {
                continue;
            }
            let accel = body.force / body.mass();
            body.velocity += accel * dt;
            body.position += body.velocity * dt;
        }
        self.elapsed += dt as f64;
    }

    fn query_point(&self, point: Vec2) -> Vec<ActorId> {
        self.bodies
            .iter()
            .filter(|(_, b)| b.contains(point))
            .map(|(id, _)| *id)
            .collect()
    }

    fn len(&self) -> usize {
        self.bodies.len()
    }
}
