//! Level layouts
//!
//! A level is static data: where the wells sit, how strong they are, from
//! which difficulty tier each one appears, where the cat may spawn and where
//! the turret stands. All positions are fractions of the viewport.
//!
//! ```text
//! ----------------------
//! |                    |
//! |                  & |      ^ = turret
//! |         @  &   &   |      @ = well
//! |^                 & |      & = cat spawn
//! ----------------------
//! ```

use std::path::Path;

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::error::LevelError;

const BUILTIN_LEVELS: [&str; 3] = [
    include_str!("../../levels/level1.json"),
    include_str!("../../levels/level2.json"),
    include_str!("../../levels/level3.json"),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WellSpec {
    pub position: Vec2,
    pub strength: f32,
    /// The well appears once the difficulty tier exceeds this value
    #[serde(rename = "unlock_level")]
    pub unlock_tier: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    #[serde(default)]
    pub name: String,
    pub wells: Vec<WellSpec>,
    pub target_spawns: Vec<Vec2>,
    pub turret_origin: Vec2,
}

impl Level {
    /// Parse and validate level JSON
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let level: Level = serde_json::from_str(json)?;
        level.validate()?;
        Ok(level)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| LevelError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let level = Self::from_json(&json)?;
        log::info!("Loaded level '{}' from {}", level.name, path.display());
        Ok(level)
    }

    /// Built-in level `n` (1-based)
    pub fn builtin(n: u32) -> Result<Self, LevelError> {
        let json = n
            .checked_sub(1)
            .and_then(|i| BUILTIN_LEVELS.get(i as usize))
            .ok_or(LevelError::UnknownLevel(n))?;
        Self::from_json(json)
    }

    pub fn builtin_count() -> u32 {
        BUILTIN_LEVELS.len() as u32
    }

    pub fn validate(&self) -> Result<(), LevelError> {
        check_fraction("turret_origin", None, self.turret_origin)?;

        if self.wells.is_empty() {
            return Err(LevelError::NoWells);
        }
        for (i, well) in self.wells.iter().enumerate() {
            check_fraction("wells", Some(i), well.position)?;
            if !(well.strength.is_finite() && well.strength >= 0.0) {
                return Err(LevelError::InvalidStrength {
                    index: i,
                    value: well.strength,
                });
            }
        }

        if self.target_spawns.is_empty() {
            return Err(LevelError::NoTargetSpawns);
        }
        for (i, spawn) in self.target_spawns.iter().enumerate() {
            check_fraction("target_spawns", Some(i), *spawn)?;
        }

        Ok(())
    }

    /// Wells deployed at difficulty `tier` (those with `unlock_tier < tier`)
    pub fn wells_for_tier(&self, tier: u32) -> impl Iterator<Item = &WellSpec> {
        self.wells.iter().filter(move |w| w.unlock_tier < tier)
    }

    /// Wells that appear when moving from `tier - 1` to `tier`
    pub fn wells_unlocked_at(&self, tier: u32) -> impl Iterator<Item = &WellSpec> {
        self.wells
            .iter()
            .filter(move |w| tier.checked_sub(1) == Some(w.unlock_tier))
    }

    /// Uniformly chosen cat spawn (viewport fraction)
    pub fn next_target_position<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Vec2> {
        self.target_spawns.choose(rng).copied()
    }
}

fn check_fraction(field: &'static str, index: Option<usize>, v: Vec2) -> Result<(), LevelError> {
    let ok = |c: f32| c.is_finite() && (0.0..=1.0).contains(&c);
    if ok(v.x) && ok(v.y) {
        Ok(())
    } else {
        Err(LevelError::FractionOutOfRange {
            field,
            index,
            value: (v.x, v.y),
        })
    }
}
