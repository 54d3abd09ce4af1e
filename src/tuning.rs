//! Data-driven game balance
//!
//! Every section falls back to the compiled-in defaults from [`crate::consts`],
//! so a tuning file only needs the values it changes.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::TuningError;

/// Playfield size in world units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: VIEWPORT_WIDTH,
            height: VIEWPORT_HEIGHT,
        }
    }
}

impl Viewport {
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Resolve a viewport fraction to world units
    pub fn resolve(&self, fraction: Vec2) -> Vec2 {
        fraction * self.size()
    }

    /// Whether `point` lies inside the viewport grown by `margin` on every side
    pub fn contains(&self, point: Vec2, margin: f32) -> bool {
        point.x >= -margin
            && point.y >= -margin
            && point.x <= self.width + margin
            && point.y <= self.height + margin
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GravityTuning {
    pub g: f32,
    pub fudge: f32,
}

impl Default for GravityTuning {
    fn default() -> Self {
        Self {
            g: GRAVITY_G,
            fudge: GRAVITY_FUDGE,
        }
    }
}

impl GravityTuning {
    /// Effective gravitational constant
    pub fn constant(&self) -> f32 {
        self.g * self.fudge
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TurretTuning {
    pub barrel_length: f32,
    pub reference_distance: f32,
    pub min_power: f32,
    pub max_power: f32,
    pub max_launch_velocity: f32,
}

impl Default for TurretTuning {
    fn default() -> Self {
        Self {
            barrel_length: TURRET_BARREL_LENGTH,
            reference_distance: TURRET_REFERENCE_DISTANCE,
            min_power: TURRET_MIN_POWER,
            max_power: TURRET_MAX_POWER,
            max_launch_velocity: MAX_LAUNCH_VELOCITY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WellTuning {
    /// Strength of wells placed by the player
    pub default_strength: f32,
    pub strength_step: f32,
    pub growth: f32,
    pub radius: f32,
    pub mass: f32,
    pub spin_step: f32,
}

impl Default for WellTuning {
    fn default() -> Self {
        Self {
            default_strength: WELL_DEFAULT_STRENGTH,
            strength_step: WELL_STRENGTH_STEP,
            growth: WELL_GROWTH,
            radius: WELL_RADIUS,
            mass: WELL_MASS,
            spin_step: WELL_SPIN_STEP,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileTuning {
    pub mass: f32,
    pub radius: f32,
    pub trail_length: usize,
    /// How far past the viewport edge a projectile may travel before it is killed
    pub offscreen_margin: f32,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            mass: PROJECTILE_MASS,
            radius: PROJECTILE_RADIUS,
            trail_length: TRAIL_LENGTH,
            offscreen_margin: OFFSCREEN_MARGIN,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetTuning {
    pub half_width: f32,
    pub half_height: f32,
    pub tilt_limit: f32,
    pub tilt_step: f32,
}

impl Default for TargetTuning {
    fn default() -> Self {
        Self {
            half_width: CAT_HALF_WIDTH,
            half_height: CAT_HALF_HEIGHT,
            tilt_limit: CAT_TILT_LIMIT,
            tilt_step: CAT_TILT_STEP,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeterTuning {
    /// Starting (and maximum) ammunition
    pub ammo: u32,
    pub shot_cost: u32,
    pub well_cost: u32,
    /// Ammunition refunded when the cat is hit
    pub hit_reward: u32,
}

impl Default for MeterTuning {
    fn default() -> Self {
        Self {
            ammo: 20,
            shot_cost: 1,
            well_cost: 5,
            hit_reward: 3,
        }
    }
}

/// Complete balance sheet
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub viewport: Viewport,
    pub gravity: GravityTuning,
    pub turret: TurretTuning,
    pub well: WellTuning,
    pub projectile: ProjectileTuning,
    pub target: TargetTuning,
    pub meter: MeterTuning,
}

impl Tuning {
    /// Parse and validate tuning JSON
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values that would break the simulation
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("viewport.width", self.viewport.width),
            ("viewport.height", self.viewport.height),
            ("turret.reference_distance", self.turret.reference_distance),
            ("turret.min_power", self.turret.min_power),
            ("turret.max_launch_velocity", self.turret.max_launch_velocity),
            ("well.radius", self.well.radius),
            ("well.mass", self.well.mass),
            ("well.strength_step", self.well.strength_step),
            ("projectile.mass", self.projectile.mass),
            ("projectile.radius", self.projectile.radius),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(TuningError::NonPositive { name, value });
            }
        }

        // Every hit must make a well strictly larger
        let growth = self.well.growth;
        if !(growth.is_finite() && growth > 1.0) {
            return Err(TuningError::NotAbove {
                name: "well.growth",
                value: growth,
                bound: 1.0,
            });
        }

        let barrel = self.turret.barrel_length;
        if !(barrel.is_finite() && barrel >= 0.0) {
            return Err(TuningError::Negative {
                name: "turret.barrel_length",
                value: barrel,
            });
        }

        let (min, max) = (self.turret.min_power, self.turret.max_power);
        if !(min.is_finite() && max.is_finite()) || min > max {
            return Err(TuningError::InvertedRange {
                name: "turret.power",
                min,
                max,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "gravity": { "fudge": 5e10 } }"#).unwrap();
        assert_eq!(tuning.gravity.fudge, 5e10);
        assert_eq!(tuning.gravity.g, GRAVITY_G);
        assert_eq!(tuning.turret, TurretTuning::default());
    }

    #[test]
    fn test_rejects_zero_viewport() {
        let err = Tuning::from_json(r#"{ "viewport": { "width": 0.0 } }"#).unwrap_err();
        assert!(matches!(err, TuningError::NonPositive { name: "viewport.width", .. }));
    }

    #[test]
    fn test_rejects_inverted_power_range() {
        let err =
            Tuning::from_json(r#"{ "turret": { "min_power": 0.9, "max_power": 0.1 } }"#).unwrap_err();
        assert!(matches!(err, TuningError::InvertedRange { .. }));
    }

    #[test]
    fn test_rejects_shrinking_wells() {
        let err = Tuning::from_json(r#"{ "well": { "growth": 0.5 } }"#).unwrap_err();
        assert!(matches!(err, TuningError::NotAbove { name: "well.growth", .. }));
        let err = Tuning::from_json(r#"{ "well": { "growth": 1.0 } }"#).unwrap_err();
        assert!(matches!(err, TuningError::NotAbove { name: "well.growth", .. }));
        let err = Tuning::from_json(r#"{ "well": { "strength_step": -0.2 } }"#).unwrap_err();
        assert!(matches!(err, TuningError::NonPositive { name: "well.strength_step", .. }));
        let err = Tuning::from_json(r#"{ "well": { "strength_step": 0.0 } }"#).unwrap_err();
        assert!(matches!(err, TuningError::NonPositive { name: "well.strength_step", .. }));
    }

    #[test]
    fn test_rejects_backwards_launch() {
        let err = Tuning::from_json(r#"{ "turret": { "min_power": -3.0, "max_power": 7.0 } }"#)
            .unwrap_err();
        assert!(matches!(err, TuningError::NonPositive { name: "turret.min_power", .. }));
        let err = Tuning::from_json(r#"{ "turret": { "max_launch_velocity": -600.0 } }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::NonPositive { name: "turret.max_launch_velocity", .. }
        ));
        let err = Tuning::from_json(r#"{ "turret": { "barrel_length": -1.0 } }"#).unwrap_err();
        assert!(matches!(err, TuningError::Negative { name: "turret.barrel_length", .. }));
        // A turret without a barrel still launches from its origin
        assert!(Tuning::from_json(r#"{ "turret": { "barrel_length": 0.0 } }"#).is_ok());
    }

    #[test]
    fn test_viewport_contains_with_margin() {
        let v = Viewport::default();
        assert!(v.contains(Vec2::new(-50.0, 10.0), 100.0));
        assert!(!v.contains(Vec2::new(-150.0, 10.0), 100.0));
        assert_eq!(v.resolve(Vec2::new(0.5, 0.25)), Vec2::new(320.0, 120.0));
    }
}
