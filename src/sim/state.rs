//! Game state and actor ownership
//!
//! `GameState` exclusively owns every actor and the physics backend. Actors
//! never touch each other's physics registration; structural changes (spawn,
//! grow, remove) all go through the methods here. Signals raised while actors
//! update are queued and dispatched afterwards, and removals are deferred
//! until the dispatch is finished.

use std::collections::VecDeque;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::{ActorId, Body};
use super::level::Level;
use super::motion::Spinner;
use super::projectile::{Projectile, WellView};
use super::signals::Signal;
use super::space::{PhysicsBackend, Space};
use super::target::Target;
use super::turret::Turret;
use super::well::GravityWell;
use crate::consts::SIM_HZ;
use crate::error::SimError;
use crate::tuning::Tuning;

/// Starting difficulty tier (wells with `unlock_level` 0 are deployed)
pub const FIRST_TIER: u32 = 1;

/// Integer resource meter (ammunition)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meter {
    pub value: u32,
    pub max: u32,
}

impl Meter {
    pub fn full(max: u32) -> Self {
        Self { value: max, max }
    }

    pub fn can_afford(&self, cost: u32) -> bool {
        self.value >= cost
    }

    /// Deduct `cost`, bottoming out at zero
    pub fn spend(&mut self, cost: u32) {
        self.value = self.value.saturating_sub(cost);
    }

    pub fn refill(&mut self, amount: u32) {
        self.value = self.value.saturating_add(amount).min(self.max);
    }

    pub fn is_empty(&self) -> bool {
        self.value == 0
    }
}

/// Actor tag for renderers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActorKind {
    Turret,
    Target,
    Well,
    Projectile,
}

/// Per-actor draw state handed to the renderer each frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderItem {
    pub id: ActorId,
    pub kind: ActorKind,
    pub position: Vec2,
    /// Degrees, clockwise
    pub rotation: f32,
    pub visual_scale: f32,
    pub visible: bool,
}

pub struct GameState {
    pub seed: u64,
    rng: Pcg32,
    pub level: Level,
    pub tuning: Tuning,
    /// Difficulty tier; wells with `unlock_tier < tier` are deployed
    pub tier: u32,
    pub score: u64,
    pub ammo: Meter,
    /// Meter points promised to queued `shoot`/`well_placed` signals
    reserved: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub turret_id: ActorId,
    pub turret: Turret,
    pub target_id: ActorId,
    pub target: Target,
    /// Live wells, ascending id
    pub wells: Vec<GravityWell>,
    /// Live projectiles, ascending id
    pub projectiles: Vec<Projectile>,
    space: Box<dyn PhysicsBackend>,
    pending: VecDeque<Signal>,
    removals: Vec<ActorId>,
    next_id: ActorId,
}

impl GameState {
    /// New game on `level` using the default integrator
    pub fn new(level: Level, tuning: Tuning, seed: u64) -> Result<Self, SimError> {
        Self::with_backend(level, tuning, seed, Box::new(Space::new()))
    }

    /// New game integrating through `backend`
    pub fn with_backend(
        level: Level,
        tuning: Tuning,
        seed: u64,
        backend: Box<dyn PhysicsBackend>,
    ) -> Result<Self, SimError> {
        tuning.validate()?;
        level.validate()?;

        let viewport = tuning.viewport;
        let turret = Turret::new(viewport.resolve(level.turret_origin), tuning.turret);
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut target = Target::new(Vec2::ZERO, &tuning.target);
        target.relocate(&level, &viewport, &mut rng);

        let mut state = Self {
            seed,
            rng,
            level,
            tuning,
            tier: FIRST_TIER,
            score: 0,
            ammo: Meter::full(tuning.meter.ammo),
            reserved: 0,
            time_ticks: 0,
            turret_id: 1,
            turret,
            target_id: 2,
            target,
            wells: Vec::new(),
            projectiles: Vec::new(),
            space: backend,
            pending: VecDeque::new(),
            removals: Vec::new(),
            next_id: 3,
        };

        let initial: Vec<(Vec2, f32)> = state
            .level
            .wells_for_tier(state.tier)
            .map(|w| (w.position, w.strength))
            .collect();
        for (fraction, strength) in initial {
            let position = state.tuning.viewport.resolve(fraction);
            state.spawn_well(position, strength)?;
        }

        log::info!(
            "New game on '{}' (seed {}, {} wells)",
            state.level.name,
            seed,
            state.wells.len()
        );
        Ok(state)
    }

    /// Allocate a new actor id
    pub fn next_entity_id(&mut self) -> ActorId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Simulated seconds; depends only on the tick count
    pub fn elapsed_secs(&self) -> f64 {
        self.time_ticks as f64 / SIM_HZ as f64
    }

    pub fn body(&self, id: ActorId) -> Option<&Body> {
        self.space.body(id)
    }

    pub fn space(&self) -> &dyn PhysicsBackend {
        self.space.as_ref()
    }

    pub fn well(&self, id: ActorId) -> Option<&GravityWell> {
        self.wells.iter().find(|w| w.id == id)
    }

    /// Ids of wells and projectiles whose footprint covers `point`
    pub fn actors_at(&self, point: Vec2) -> Vec<ActorId> {
        self.space.query_point(point)
    }

    /// Create a well at a world position
    pub fn spawn_well(&mut self, position: Vec2, strength: f32) -> Result<ActorId, SimError> {
        let body = GravityWell::spawn_body(position, &self.tuning.well)?;
        let id = self.next_entity_id();
        let spin = Spinner::random(self.tuning.well.spin_step, &mut self.rng);
        self.space.add_body(id, body);
        self.wells
            .push(GravityWell::new(id, strength, self.tuning.well.radius, spin));
        Ok(id)
    }

    /// Meter points not yet promised to an undispatched signal
    pub fn available_ammo(&self) -> u32 {
        self.ammo.value.saturating_sub(self.reserved)
    }

    /// Settle a charge reserved by `fire` or `place_well`
    pub fn charge(&mut self, cost: u32) {
        self.reserved = self.reserved.saturating_sub(cost);
        self.ammo.spend(cost);
    }

    /// Fire the turret if there is ammunition left.
    /// The meter itself is charged by whoever handles the `shoot` signal;
    /// until then the shot cost is held in reserve.
    pub fn fire(&mut self) -> Result<Option<ActorId>, SimError> {
        if self.available_ammo() == 0 {
            log::debug!("Click ignored: out of ammo");
            return Ok(None);
        }
        let launch = self.turret.fire();
        let body = Projectile::spawn_body(launch.position, launch.velocity, &self.tuning.projectile)?;
        let id = self.next_entity_id();
        self.space.add_body(id, body);
        self.projectiles.push(Projectile::new(id));
        self.reserved = self.reserved.saturating_add(self.tuning.meter.shot_cost);
        log::debug!(
            "Fired projectile {} at {:.1} deg, power {:.2}",
            id,
            self.turret.angle,
            self.turret.power
        );
        self.emit(Signal::Shoot {
            projectile: id,
            velocity: launch.velocity,
        });
        Ok(Some(id))
    }

    /// Drop a player well at `position` if the meter can pay for it
    pub fn place_well(&mut self, position: Vec2) -> Result<Option<ActorId>, SimError> {
        let cost = self.tuning.meter.well_cost;
        if self.available_ammo() < cost {
            log::debug!("Well placement ignored: meter at {}", self.available_ammo());
            return Ok(None);
        }
        let id = self.spawn_well(position, self.tuning.well.default_strength)?;
        self.reserved = self.reserved.saturating_add(cost);
        log::debug!("Placed well {} at ({:.0}, {:.0})", id, position.x, position.y);
        self.emit(Signal::WellPlaced { well: id, position });
        Ok(Some(id))
    }

    /// Queue a signal for dispatch after the current update pass
    pub fn emit(&mut self, signal: Signal) {
        self.pending.push_back(signal);
    }

    pub fn pop_signal(&mut self) -> Option<Signal> {
        self.pending.pop_front()
    }

    pub fn pending_signals(&self) -> usize {
        self.pending.len()
    }

    /// Ask for `id` to be removed once the actor list is stable
    pub fn queue_removal(&mut self, id: ActorId) {
        if !self.removals.contains(&id) {
            self.removals.push(id);
        }
    }

    /// Remove every queued actor. Unknown ids are ignored.
    pub fn apply_removals(&mut self) {
        for id in std::mem::take(&mut self.removals) {
            let before = self.projectiles.len() + self.wells.len();
            self.projectiles.retain(|p| p.id != id);
            self.wells.retain(|w| w.id != id);
            let removed_body = self.space.remove_body(id).is_some();
            if !removed_body && before == self.projectiles.len() + self.wells.len() {
                log::trace!("Removal of unknown actor {} ignored", id);
            }
        }
    }

    /// A projectile fell into well `id`: strengthen it and swap in the
    /// larger shape. No-op if the well is gone.
    pub fn grow_well(&mut self, id: ActorId) -> Result<(), SimError> {
        let Some(current) = self.space.body(id).cloned() else {
            return Ok(());
        };
        let Some(well) = self.wells.iter_mut().find(|w| w.id == id) else {
            return Ok(());
        };
        let grown = well.register_hit(&current, &self.tuning.well)?;
        log::debug!(
            "Well {} hit: strength {:.1}, radius {:.1}",
            id,
            well.strength,
            grown.radius()
        );
        self.space.replace_body(id, grown);
        Ok(())
    }

    /// The cat was hit: score, refund ammo, move the cat, raise the tier
    pub fn on_target_hit(&mut self) -> Result<(), SimError> {
        self.score += 1;
        self.ammo.refill(self.tuning.meter.hit_reward);
        let to = self
            .target
            .relocate(&self.level, &self.tuning.viewport, &mut self.rng);
        log::debug!("Cat hit! score {}, cat moved to ({:.0}, {:.0})", self.score, to.x, to.y);
        self.advance_tier()
    }

    /// Raise the difficulty tier and deploy the wells it unlocks
    pub fn advance_tier(&mut self) -> Result<(), SimError> {
        self.tier += 1;
        let unlocked: Vec<(Vec2, f32)> = self
            .level
            .wells_unlocked_at(self.tier)
            .map(|w| (w.position, w.strength))
            .collect();
        for (fraction, strength) in unlocked {
            let position = self.tuning.viewport.resolve(fraction);
            self.spawn_well(position, strength)?;
        }
        log::info!("Tier {} ({} wells)", self.tier, self.wells.len());
        self.emit(Signal::TierUp { tier: self.tier });
        Ok(())
    }

    /// Idle animations, then force accumulation and hit tests for every
    /// projectile. Hits are queued as signals, not acted on.
    pub fn update_actors(&mut self) {
        for well in &mut self.wells {
            well.update();
        }
        self.target.update();

        let well_bodies: Vec<(&GravityWell, Body)> = self
            .wells
            .iter()
            .filter_map(|w| self.space.body(w.id).map(|b| (w, b.clone())))
            .collect();
        let views: Vec<WellView<'_>> = well_bodies
            .iter()
            .map(|(well, body)| WellView { well, body })
            .collect();

        for projectile in &mut self.projectiles {
            let Some(body) = self.space.body(projectile.id) else {
                continue;
            };
            let update = projectile.update(body, &views, &self.target, &self.tuning);
            if let Some(body) = self.space.body_mut(projectile.id) {
                body.reset_force();
                body.apply_force(update.force);
            }
            self.pending.extend(update.signals);
        }
    }

    /// Advance the physics backend by one fixed step
    pub fn step_physics(&mut self, dt: f32) {
        self.space.step(dt);
        self.time_ticks += 1;
    }

    /// What the renderer needs for every live actor
    pub fn render_snapshot(&self) -> Vec<RenderItem> {
        let mut items = Vec::with_capacity(2 + self.wells.len() + self.projectiles.len());
        items.push(RenderItem {
            id: self.turret_id,
            kind: ActorKind::Turret,
            position: self.turret.origin,
            rotation: self.turret.angle,
            visual_scale: 1.0,
            visible: true,
        });
        items.push(RenderItem {
            id: self.target_id,
            kind: ActorKind::Target,
            position: self.target.position,
            rotation: self.target.tilt.angle(),
            visual_scale: 1.0,
            visible: true,
        });
        for well in &self.wells {
            if let Some(body) = self.space.body(well.id) {
                items.push(RenderItem {
                    id: well.id,
                    kind: ActorKind::Well,
                    position: body.position,
                    rotation: well.spin.angle(),
                    visual_scale: well.visual_scale(body),
                    visible: true,
                });
            }
        }
        for projectile in &self.projectiles {
            if let Some(body) = self.space.body(projectile.id) {
                items.push(RenderItem {
                    id: projectile.id,
                    kind: ActorKind::Projectile,
                    position: body.position,
                    rotation: 0.0,
                    visual_scale: 1.0,
                    visible: self.tuning.viewport.contains(body.position, 0.0),
                });
            }
        }
        items
    }
}
