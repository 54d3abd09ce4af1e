//! Signal registry
//!
//! Decouples the actors that notice something (a projectile entering a well)
//! from the systems that react to it (meters, sounds, actor removal).
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use schrocat::sim::signals::{self, Signal, SignalBus};
//!
//! let shots = Rc::new(Cell::new(0));
//! let bus: SignalBus<()> = SignalBus::new();
//! let counter = Rc::clone(&shots);
//! bus.register(signals::SHOOT, &signals::sound_handler(move || counter.set(counter.get() + 1)));
//!
//! let shoot = Signal::Shoot { projectile: 1, velocity: glam::Vec2::ZERO };
//! bus.emit(&shoot, &mut ()).unwrap();
//! assert_eq!(shots.get(), 1);
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use glam::Vec2;

use super::body::ActorId;
use crate::error::SimError;

pub const SHOOT: &str = "shoot";
pub const WELL_PLACED: &str = "well_placed";
pub const VORTEX_HIT: &str = "vortex_hit";
pub const TARGET_HIT: &str = "target_hit";
pub const KILL: &str = "kill";
pub const TIER_UP: &str = "tier_up";

/// A named event and its payload
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    /// A projectile left the barrel
    Shoot { projectile: ActorId, velocity: Vec2 },
    /// The player dropped a new well
    WellPlaced { well: ActorId, position: Vec2 },
    /// A projectile entered a well
    VortexHit { well: ActorId, projectile: ActorId },
    /// A projectile hit the cat
    TargetHit { projectile: ActorId, position: Vec2 },
    /// An actor must be removed
    Kill { actor: ActorId },
    /// Difficulty tier advanced
    TierUp { tier: u32 },
}

impl Signal {
    pub fn name(&self) -> &'static str {
        match self {
            Signal::Shoot { .. } => SHOOT,
            Signal::WellPlaced { .. } => WELL_PLACED,
            Signal::VortexHit { .. } => VORTEX_HIT,
            Signal::TargetHit { .. } => TARGET_HIT,
            Signal::Kill { .. } => KILL,
            Signal::TierUp { .. } => TIER_UP,
        }
    }
}

/// Callback invoked with the emitter's context and the signal
pub type Handler<C> = Rc<dyn Fn(&mut C, &Signal) -> Result<(), SimError>>;

/// Box a closure as a handler
pub fn handler<C, F>(f: F) -> Handler<C>
where
    F: Fn(&mut C, &Signal) -> Result<(), SimError> + 'static,
{
    Rc::new(f)
}

/// Wrap a no-argument callback (e.g. play a sound) so it ignores the payload
pub fn sound_handler<C, F>(play: F) -> Handler<C>
where
    C: 'static,
    F: Fn() + 'static,
{
    Rc::new(move |_: &mut C, _: &Signal| {
        play();
        Ok(())
    })
}

/// Name → ordered handler list
///
/// Registration goes through `&self` so a handler holding a reference to the
/// bus can subscribe more handlers while a signal is being dispatched.
pub struct SignalBus<C> {
    handlers: RefCell<HashMap<String, Vec<Handler<C>>>>,
}

impl<C> Default for SignalBus<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> SignalBus<C> {
    pub fn new() -> Self {
        Self {
            handlers: RefCell::new(HashMap::new()),
        }
    }

    /// Subscribe `handler` to `name`. Registering the same handler twice is a
    /// no-op; returns whether it was added.
    pub fn register(&self, name: &str, handler: &Handler<C>) -> bool {
        let mut handlers = self.handlers.borrow_mut();
        let list = handlers.entry(name.to_string()).or_default();
        if list.iter().any(|h| Rc::ptr_eq(h, handler)) {
            return false;
        }
        list.push(Rc::clone(handler));
        true
    }

    /// Call every handler subscribed to `signal.name()` in registration order.
    ///
    /// Handlers run against a snapshot of the list. The first error stops the
    /// emission and is returned to the caller.
    pub fn emit(&self, signal: &Signal, ctx: &mut C) -> Result<(), SimError> {
        let snapshot = match self.handlers.borrow().get(signal.name()) {
            Some(list) => list.clone(),
            None => return Ok(()),
        };
        for handler in snapshot {
            handler(ctx, signal)?;
        }
        Ok(())
    }

    pub fn handler_count(&self, name: &str) -> usize {
        self.handlers.borrow().get(name).map_or(0, Vec::len)
    }

    /// Drop every subscriber of `name`
    pub fn clear(&self, name: &str) {
        self.handlers.borrow_mut().remove(name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kill(actor: ActorId) -> Signal {
        Signal::Kill { actor }
    }

    fn recorder(tag: &'static str) -> Handler<Vec<String>> {
        handler(move |log: &mut Vec<String>, signal: &Signal| {
            log.push(format!("{}:{}", tag, signal.name()));
            Ok(())
        })
    }

    #[test]
    fn test_duplicate_registration_invokes_once() {
        let bus = SignalBus::new();
        let h = recorder("a");
        assert!(bus.register(KILL, &h));
        assert!(!bus.register(KILL, &h));
        assert_eq!(bus.handler_count(KILL), 1);

        let mut log = Vec::new();
        bus.emit(&kill(1), &mut log).unwrap();
        assert_eq!(log, vec!["a:kill"]);
    }

    #[test]
    fn test_same_handler_under_two_names() {
        let bus = SignalBus::new();
        let h = recorder("a");
        assert!(bus.register(KILL, &h));
        assert!(bus.register(SHOOT, &h));
        assert_eq!(bus.handler_count(SHOOT), 1);
    }

    #[test]
    fn test_invocation_follows_registration_order() {
        let bus = SignalBus::new();
        bus.register(KILL, &recorder("first"));
        bus.register(KILL, &recorder("second"));
        bus.register(KILL, &recorder("third"));

        let mut log = Vec::new();
        bus.emit(&kill(1), &mut log).unwrap();
        assert_eq!(log, vec!["first:kill", "second:kill", "third:kill"]);
    }

    #[test]
    fn test_emit_without_subscribers_is_silent() {
        let bus: SignalBus<Vec<String>> = SignalBus::new();
        let mut log = Vec::new();
        assert!(bus.emit(&Signal::TierUp { tier: 2 }, &mut log).is_ok());
        assert!(log.is_empty());
    }

    #[test]
    fn test_payload_passes_through() {
        let bus = SignalBus::new();
        bus.register(
            VORTEX_HIT,
            &handler(|seen: &mut Vec<Signal>, s: &Signal| {
                seen.push(s.clone());
                Ok(())
            }),
        );
        let hit = Signal::VortexHit { well: 3, projectile: 8 };
        let mut seen = Vec::new();
        bus.emit(&hit, &mut seen).unwrap();
        assert_eq!(seen, vec![hit]);
    }

    #[test]
    fn test_failure_stops_remaining_handlers() {
        let bus = SignalBus::new();
        bus.register(KILL, &recorder("before"));
        bus.register(
            KILL,
            &handler(|_: &mut Vec<String>, _: &Signal| Err(SimError::handler(KILL, "boom"))),
        );
        bus.register(KILL, &recorder("after"));

        let mut log = Vec::new();
        let err = bus.emit(&kill(1), &mut log).unwrap_err();
        assert!(matches!(err, SimError::Handler { signal: "kill", .. }));
        assert_eq!(log, vec!["before:kill"]);
    }

    #[test]
    fn test_registering_during_emit_uses_snapshot() {
        let bus: Rc<SignalBus<Vec<String>>> = Rc::new(SignalBus::new());
        let weak = Rc::downgrade(&bus);
        let late = recorder("late");
        bus.register(
            KILL,
            &handler(move |log: &mut Vec<String>, _: &Signal| {
                if let Some(bus) = weak.upgrade() {
                    bus.register(KILL, &late);
                }
                log.push("registrar".to_string());
                Ok(())
            }),
        );

        let mut log = Vec::new();
        bus.emit(&kill(1), &mut log).unwrap();
        // The late handler was not part of the snapshot for this emission
        assert_eq!(log, vec!["registrar"]);

        log.clear();
        bus.emit(&kill(1), &mut log).unwrap();
        assert_eq!(log, vec!["registrar", "late:kill"]);
    }

    #[test]
    fn test_sound_handler_ignores_payload() {
        use std::cell::Cell;

        let plays = Rc::new(Cell::new(0));
        let counter = Rc::clone(&plays);
        let bus: SignalBus<()> = SignalBus::new();
        bus.register(TARGET_HIT, &sound_handler(move || counter.set(counter.get() + 1)));

        let hit = Signal::TargetHit {
            projectile: 1,
            position: Vec2::ZERO,
        };
        bus.emit(&hit, &mut ()).unwrap();
        bus.emit(&hit, &mut ()).unwrap();
        assert_eq!(plays.get(), 2);
    }

    #[test]
    fn test_clear_drops_subscribers() {
        let bus = SignalBus::new();
        bus.register(KILL, &recorder("a"));
        bus.clear(KILL);
        assert_eq!(bus.handler_count(KILL), 0);
    }
}
