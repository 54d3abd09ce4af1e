//! Projectiles (balls fired from the turret)

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{ActorId, Body, BodyKind};
use super::signals::Signal;
use super::target::Target;
use super::well::GravityWell;
use crate::error::SimError;
use crate::tuning::{ProjectileTuning, Tuning};

/// Read-only view of a well for one tick of projectile updates
#[derive(Debug, Clone, Copy)]
pub struct WellView<'a> {
    pub well: &'a GravityWell,
    pub body: &'a Body,
}

/// What a projectile found during its update
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectileUpdate {
    /// Net force from every well this tick
    pub force: Vec2,
    /// Signals to dispatch once all actors have updated
    pub signals: Vec<Signal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: ActorId,
    /// Ticks since launch
    pub age_ticks: u32,
    /// Recent positions, newest first (render only)
    #[serde(skip)]
    pub trail: Vec<Vec2>,
}

impl Projectile {
    pub fn new(id: ActorId) -> Self {
        Self {
            id,
            age_ticks: 0,
            trail: Vec::new(),
        }
    }

    /// Dynamic body leaving the barrel at `position` with `velocity`
    pub fn spawn_body(position: Vec2, velocity: Vec2, tuning: &ProjectileTuning) -> Result<Body, SimError> {
        let mut body = Body::new(BodyKind::Dynamic, tuning.mass, tuning.radius, position)?;
        body.velocity = velocity;
        Ok(body)
    }

    /// Accumulate the pull of every well and test for hits.
    ///
    /// Force is summed over all wells even after a hit. At most one well hit
    /// (the first in iteration order) and one target hit are reported, each
    /// followed by a kill request for this projectile. A projectile that has
    /// wandered off the playfield also asks to be killed.
    pub fn update(
        &mut self,
        body: &Body,
        wells: &[WellView<'_>],
        target: &Target,
        tuning: &Tuning,
    ) -> ProjectileUpdate {
        self.age_ticks += 1;
        self.record_trail(body.position, tuning.projectile.trail_length);

        let mut force = Vec2::ZERO;
        let mut signals = Vec::new();
        let mut hit_well = false;

        for view in wells {
            force += view.well.force_on(view.body, body, &tuning.gravity);
            if !hit_well && view.body.contains(body.position) {
                hit_well = true;
                signals.push(Signal::VortexHit {
                    well: view.well.id,
                    projectile: self.id,
                });
                signals.push(Signal::Kill { actor: self.id });
            }
        }

        if target.contains(body.position) {
            signals.push(Signal::TargetHit {
                projectile: self.id,
                position: target.position,
            });
            signals.push(Signal::Kill { actor: self.id });
        }

        if signals.is_empty()
            && !tuning
                .viewport
                .contains(body.position, tuning.projectile.offscreen_margin)
        {
            signals.push(Signal::Kill { actor: self.id });
        }

        ProjectileUpdate { force, signals }
    }

    fn record_trail(&mut self, pos: Vec2, max_len: usize) {
        self.trail.insert(0, pos);
        self.trail.truncate(max_len);
    }
}
