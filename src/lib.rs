//! Schrocat - a gravity-well turret arcade game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bodies, wells, projectiles, signals)
//! - `game`: Fixed-step frame driver owning the state and the signal bus
//! - `tuning`: Data-driven game balance
//! - `error`: Configuration and runtime error types

pub mod error;
pub mod game;
pub mod sim;
pub mod tuning;

pub use error::{LevelError, SimError, TuningError};
pub use game::{FrameStats, Game};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Simulation rate (30 Hz, one step per frame)
    pub const SIM_HZ: u32 = 30;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / SIM_HZ as f32;

    /// Universal gravitational constant
    pub const GRAVITY_G: f32 = 6.67e-11;
    /// Fudge factor to make gravity fun
    pub const GRAVITY_FUDGE: f32 = 1.5e10;
    /// Below this separation a well exerts no force
    pub const MIN_FORCE_DISTANCE: f32 = f32::EPSILON;

    /// Wells
    pub const WELL_DEFAULT_STRENGTH: f32 = 0.1;
    pub const WELL_STRENGTH_STEP: f32 = 0.2;
    /// Area growth per hit; radius grows by its square root
    pub const WELL_GROWTH: f32 = 1.2;
    pub const WELL_RADIUS: f32 = 20.0;
    pub const WELL_MASS: f32 = 1.0e6;
    /// Spin speed in degrees per tick
    pub const WELL_SPIN_STEP: f32 = 3.0;

    /// Turret
    pub const TURRET_BARREL_LENGTH: f32 = 40.0;
    /// Pointer distance from the barrel tip that yields full power
    pub const TURRET_REFERENCE_DISTANCE: f32 = 250.0;
    pub const TURRET_MIN_POWER: f32 = 0.05;
    pub const TURRET_MAX_POWER: f32 = 1.0;
    pub const MAX_LAUNCH_VELOCITY: f32 = 600.0;

    /// Projectiles
    pub const PROJECTILE_MASS: f32 = 1.0;
    pub const PROJECTILE_RADIUS: f32 = 4.0;
    pub const TRAIL_LENGTH: usize = 20;
    pub const OFFSCREEN_MARGIN: f32 = 100.0;

    /// Cat
    pub const CAT_HALF_WIDTH: f32 = 24.0;
    pub const CAT_HALF_HEIGHT: f32 = 20.0;
    pub const CAT_TILT_LIMIT: f32 = 10.0;
    pub const CAT_TILT_STEP: f32 = 1.0;

    /// Default viewport (640x480 window)
    pub const VIEWPORT_WIDTH: f32 = 640.0;
    pub const VIEWPORT_HEIGHT: f32 = 480.0;
}

/// Distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (b - a).length()
}

/// Angle (radians) from `center` towards `other`
#[inline]
pub fn angle_between(center: Vec2, other: Vec2) -> f32 {
    let d = other - center;
    d.y.atan2(d.x)
}

/// Normalize degrees to [0, 360)
#[inline]
pub fn normalize_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Clamp `value` to `[lower, upper]`
#[inline]
pub fn clip(value: f32, lower: f32, upper: f32) -> f32 {
    value.max(lower).min(upper)
}

/// Unit vector for an angle measured in degrees clockwise from +y
#[inline]
pub fn heading(angle_deg: f32) -> Vec2 {
    let rad = angle_deg.to_radians();
    Vec2::new(rad.sin(), rad.cos())
}
