//! Deterministic simulation module
//!
//! All gameplay logic lives here:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by actor id)
//! - No rendering, audio or platform dependencies

pub mod body;
pub mod level;
pub mod motion;
pub mod projectile;
pub mod signals;
pub mod space;
pub mod state;
pub mod target;
pub mod tick;
pub mod turret;
pub mod well;

pub use body::{ActorId, Body, BodyKind};
pub use level::{Level, WellSpec};
pub use motion::{Oscillator, Spinner};
pub use projectile::{Projectile, ProjectileUpdate, WellView};
pub use signals::{Handler, Signal, SignalBus};
pub use space::{PhysicsBackend, Space};
pub use state::{ActorKind, FIRST_TIER, GameState, Meter, RenderItem};
pub use target::Target;
pub use tick::{TickInput, tick};
pub use turret::{Launch, Turret};
pub use well::{GravityWell, attraction};
