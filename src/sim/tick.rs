//! Fixed timestep simulation tick
//!
//! One call advances the game by exactly one step, whatever the wall clock
//! says. A slow frame slows the game down; it never skips or stretches a step.

use glam::Vec2;

use super::signals::{self, Handler, Signal, SignalBus, handler};
use super::state::GameState;
use crate::error::SimError;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer position (world units); re-aims the turret
    pub aim: Option<Vec2>,
    /// Primary click: fire
    pub fire: bool,
    /// Secondary click: drop a well here
    pub place_well: Option<Vec2>,
}

/// Advance the game state by one fixed timestep
pub fn tick(
    state: &mut GameState,
    bus: &SignalBus<GameState>,
    input: &TickInput,
    dt: f32,
) -> Result<(), SimError> {
    if let Some(pointer) = input.aim {
        state.turret.aim(pointer);
    }
    if input.fire {
        state.fire()?;
    }
    if let Some(pos) = input.place_well {
        state.place_well(pos)?;
    }

    state.update_actors();
    flush_signals(state, bus)?;
    state.apply_removals();

    state.step_physics(dt);
    Ok(())
}

/// Dispatch queued signals in FIFO order, including any that handlers queue
/// while running. Returns how many were dispatched.
pub fn flush_signals(state: &mut GameState, bus: &SignalBus<GameState>) -> Result<usize, SimError> {
    let mut dispatched = 0;
    while let Some(signal) = state.pop_signal() {
        bus.emit(&signal, state)?;
        dispatched += 1;
    }
    Ok(dispatched)
}

/// Handlers that keep the game rules running: meter charges, well growth,
/// cat relocation and actor removal.
pub fn core_handlers() -> Vec<(&'static str, Handler<GameState>)> {
    vec![
        (
            signals::SHOOT,
            handler(|state: &mut GameState, signal: &Signal| {
                if let Signal::Shoot { .. } = signal {
                    state.charge(state.tuning.meter.shot_cost);
                }
                Ok(())
            }),
        ),
        (
            signals::WELL_PLACED,
            handler(|state: &mut GameState, signal: &Signal| {
                if let Signal::WellPlaced { .. } = signal {
                    state.charge(state.tuning.meter.well_cost);
                }
                Ok(())
            }),
        ),
        (
            signals::VORTEX_HIT,
            handler(|state: &mut GameState, signal: &Signal| match signal {
                Signal::VortexHit { well, .. } => state.grow_well(*well),
                _ => Ok(()),
            }),
        ),
        (
            signals::TARGET_HIT,
            handler(|state: &mut GameState, signal: &Signal| match signal {
                Signal::TargetHit { .. } => state.on_target_hit(),
                _ => Ok(()),
            }),
        ),
        (
            signals::KILL,
            handler(|state: &mut GameState, signal: &Signal| {
                if let Signal::Kill { actor } = signal {
                    state.queue_removal(*actor);
                }
                Ok(())
            }),
        ),
    ]
}

pub fn install_core_handlers(bus: &SignalBus<GameState>) {
    for (name, h) in core_handlers() {
        bus.register(name, &h);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::level::Level;
    use crate::tuning::Tuning;

    fn setup(level: u32) -> (GameState, SignalBus<GameState>) {
        let state = GameState::new(Level::builtin(level).unwrap(), Tuning::default(), 12345).unwrap();
        let bus = SignalBus::new();
        install_core_handlers(&bus);
        (state, bus)
    }

    #[test]
    fn test_fixed_step_time() {
        let (mut state, bus) = setup(1);
        let input = TickInput::default();
        for _ in 0..300 {
            tick(&mut state, &bus, &input, SIM_DT).unwrap();
        }
        assert_eq!(state.time_ticks, 300);
        assert_eq!(state.elapsed_secs(), 10.0);
    }

    #[test]
    fn test_fire_charges_meter_once() {
        let (mut state, bus) = setup(1);
        let ammo = state.ammo.value;
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &bus, &fire, SIM_DT).unwrap();
        assert_eq!(state.ammo.value, ammo - 1);
        assert_eq!(state.projectiles.len(), 1);
        assert_eq!(state.pending_signals(), 0);
    }

    #[test]
    fn test_empty_meter_blocks_fire() {
        let (mut state, bus) = setup(1);
        state.ammo.value = 0;
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &bus, &fire, SIM_DT).unwrap();
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_place_well_costs_meter() {
        let (mut state, bus) = setup(1);
        let input = TickInput {
            place_well: Some(Vec2::new(200.0, 300.0)),
            ..Default::default()
        };
        tick(&mut state, &bus, &input, SIM_DT).unwrap();
        assert_eq!(state.wells.len(), 2);
        assert_eq!(state.ammo.value, state.tuning.meter.ammo - state.tuning.meter.well_cost);
    }

    #[test]
    fn test_fire_and_place_same_tick_cannot_overspend() {
        let (mut state, bus) = setup(1);
        let cost = state.tuning.meter.well_cost;
        state.ammo.value = cost;
        let both = TickInput {
            fire: true,
            place_well: Some(Vec2::new(200.0, 300.0)),
            ..Default::default()
        };
        tick(&mut state, &bus, &both, SIM_DT).unwrap();
        assert_eq!(state.projectiles.len(), 1);
        assert_eq!(state.wells.len(), 1);
        assert_eq!(state.ammo.value, cost - 1);
        assert_eq!(state.available_ammo(), state.ammo.value);

        // With the shot settled, one more point still buys nothing
        let place = TickInput {
            place_well: Some(Vec2::new(200.0, 300.0)),
            ..Default::default()
        };
        tick(&mut state, &bus, &place, SIM_DT).unwrap();
        assert_eq!(state.wells.len(), 1);
    }

    #[test]
    fn test_kill_during_update_leaves_later_projectiles_alone() {
        // Turret just below the well: the barrel tip starts inside it when
        // aimed straight up, and well clear of it when aimed right.
        let level = Level::from_json(
            r#"{
                "wells": [{ "position": [0.5, 0.3], "strength": 0.3, "unlock_level": 0 }],
                "target_spawns": [[0.9, 0.9]],
                "turret_origin": [0.5, 0.2]
            }"#,
        )
        .unwrap();
        let mut state = GameState::new(level, Tuning::default(), 5).unwrap();
        let bus = SignalBus::new();
        install_core_handlers(&bus);
        let well_id = state.wells[0].id;

        state.turret.aim(Vec2::new(320.0, 1000.0));
        let doomed = state.fire().unwrap().unwrap();
        state.turret.aim(Vec2::new(1000.0, 96.0));
        let survivor = state.fire().unwrap().unwrap();
        assert!(doomed < survivor);

        tick(&mut state, &bus, &TickInput::default(), SIM_DT).unwrap();

        assert_eq!(state.projectiles.len(), 1);
        let p = &state.projectiles[0];
        assert_eq!(p.id, survivor);
        assert_eq!(p.age_ticks, 1);
        assert_eq!(p.trail.len(), 1);
        assert!(state.body(survivor).unwrap().force.length() > 0.0);
        assert!(state.body(doomed).is_none());
        assert_eq!(state.well(well_id).unwrap().hits, 1);
    }

    #[test]
    fn test_shot_into_well_grows_it_and_dies() {
        let (mut state, bus) = setup(1);
        let well_id = state.wells[0].id;
        let well_pos = state.body(well_id).unwrap().position;
        let radius = state.body(well_id).unwrap().radius();

        // Aim straight at the well with a gentle charge
        let input = TickInput {
            aim: Some(well_pos),
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &bus, &input, SIM_DT).unwrap();
        assert_eq!(state.projectiles.len(), 1);

        let idle = TickInput::default();
        for _ in 0..120 {
            tick(&mut state, &bus, &idle, SIM_DT).unwrap();
            if state.projectiles.is_empty() {
                break;
            }
        }
        assert!(state.projectiles.is_empty());
        assert_eq!(state.wells[0].hits, 1);
        assert!(state.body(well_id).unwrap().radius() > radius);
        assert!((state.wells[0].strength - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_kill_for_removed_actor_is_harmless() {
        let (mut state, bus) = setup(1);
        let well_id = state.wells[0].id;
        state.emit(Signal::Kill { actor: 777 });
        state.emit(Signal::Kill { actor: 777 });
        tick(&mut state, &bus, &TickInput::default(), SIM_DT).unwrap();
        state.emit(Signal::Kill { actor: 777 });
        tick(&mut state, &bus, &TickInput::default(), SIM_DT).unwrap();
        assert_eq!(state.wells.len(), 1);
        assert!(state.body(well_id).is_some());
    }

    #[test]
    fn test_handler_failure_aborts_tick() {
        let (mut state, bus) = setup(1);
        bus.register(
            signals::SHOOT,
            &handler(|_: &mut GameState, _: &Signal| Err(SimError::handler(signals::SHOOT, "speaker on fire"))),
        );
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        let err = tick(&mut state, &bus, &fire, SIM_DT).unwrap_err();
        assert!(matches!(err, SimError::Handler { signal: "shoot", .. }));
        // The step was aborted before the integrator ran
        assert_eq!(state.time_ticks, 0);
    }

    #[test]
    fn test_flush_includes_signals_raised_by_handlers() {
        let (mut state, bus) = setup(1);
        state.emit(Signal::TargetHit {
            projectile: 0,
            position: Vec2::ZERO,
        });
        // target_hit -> tier_up
        assert_eq!(flush_signals(&mut state, &bus).unwrap(), 2);
        assert_eq!(state.tier, 2);
    }

    #[test]
    fn test_determinism() {
        let (mut a, bus_a) = setup(2);
        let (mut b, bus_b) = setup(2);
        let inputs = [
            TickInput {
                aim: Some(Vec2::new(400.0, 300.0)),
                fire: true,
                ..Default::default()
            },
            TickInput::default(),
            TickInput {
                place_well: Some(Vec2::new(300.0, 200.0)),
                ..Default::default()
            },
        ];
        for i in 0..200 {
            let input = &inputs[i % inputs.len()];
            tick(&mut a, &bus_a, input, SIM_DT).unwrap();
            tick(&mut b, &bus_b, input, SIM_DT).unwrap();
        }
        assert_eq!(a.score, b.score);
        assert_eq!(a.ammo, b.ammo);
        assert_eq!(a.target.position, b.target.position);
        assert_eq!(a.render_snapshot(), b.render_snapshot());
    }
}
