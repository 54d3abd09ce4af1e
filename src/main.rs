//! Schrocat headless runner
//!
//! Plays a scripted session (aim at the cat, fire at a fixed cadence) and
//! reports what happened. Rendering and audio are left to a front-end.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;

use schrocat::sim::signals::{self, Signal, handler};
use schrocat::sim::{GameState, Level, TickInput};
use schrocat::{Game, Tuning};

#[derive(Parser, Debug)]
#[command(name = "schrocat", about = "Gravity-well turret game core (headless)")]
struct Args {
    /// Built-in level number or path to a level JSON file
    #[arg(short, long, default_value = "1")]
    level: String,

    /// Tuning JSON overriding the default balance
    #[arg(short, long)]
    tuning: Option<PathBuf>,

    /// Number of simulation ticks to run (30 per simulated second)
    #[arg(long, default_value_t = 900)]
    ticks: u32,

    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Fire once every N ticks
    #[arg(long, default_value_t = 15)]
    fire_every: u32,
}

fn load_level(spec: &str) -> Result<Level> {
    match spec.parse::<u32>() {
        Ok(n) => Level::builtin(n).with_context(|| format!("no built-in level {}", n)),
        Err(_) => Level::load(spec).with_context(|| format!("failed to load level {}", spec)),
    }
}

fn load_tuning(path: Option<&PathBuf>) -> Result<Tuning> {
    let Some(path) = path else {
        return Ok(Tuning::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read tuning {}", path.display()))?;
    Tuning::from_json(&json).with_context(|| format!("invalid tuning {}", path.display()))
}

fn main() -> Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let level = load_level(&args.level)?;
    let tuning = load_tuning(args.tuning.as_ref())?;
    let mut game = Game::new(level, tuning, args.seed).context("failed to start game")?;

    log::info!("Schrocat starting ({} ticks)", args.ticks);

    let counts: Rc<RefCell<BTreeMap<&'static str, u32>>> = Rc::new(RefCell::new(BTreeMap::new()));
    let counter = {
        let counts = Rc::clone(&counts);
        handler(move |_: &mut GameState, signal: &Signal| {
            *counts.borrow_mut().entry(signal.name()).or_default() += 1;
            log::debug!("{:?}", signal);
            Ok(())
        })
    };
    for name in [
        signals::SHOOT,
        signals::WELL_PLACED,
        signals::VORTEX_HIT,
        signals::TARGET_HIT,
        signals::KILL,
        signals::TIER_UP,
    ] {
        game.bus().register(name, &counter);
    }

    let fire_every = args.fire_every.max(1);
    let started = Instant::now();
    for t in 0..args.ticks {
        let input = TickInput {
            aim: Some(game.state().target.position),
            fire: t % fire_every == 0,
            place_well: None,
        };
        game.frame(&input, started.elapsed().as_secs_f64())
            .with_context(|| format!("tick {} failed", t))?;
    }

    let state = game.state();
    println!("Level:      {}", state.level.name);
    println!("Simulated:  {:.1}s in {} ticks", state.elapsed_secs(), state.time_ticks);
    println!("Score:      {}", state.score);
    println!("Tier:       {}", state.tier);
    println!("Ammo:       {}/{}", state.ammo.value, state.ammo.max);
    println!("Wells:      {}", state.wells.len());
    println!("In flight:  {}", state.projectiles.len());
    for (name, n) in counts.borrow().iter() {
        println!("  {:<12} {}", name, n);
    }
    Ok(())
}
