//! Frame driver
//!
//! Owns the game state and its signal bus and runs exactly one fixed
//! simulation step per frame. Rendering happens outside, from
//! [`Game::render_snapshot`].

use std::rc::Rc;

use crate::consts::SIM_DT;
use crate::error::SimError;
use crate::sim::{GameState, Level, PhysicsBackend, RenderItem, SignalBus, TickInput, tick};
use crate::sim::tick::install_core_handlers;
use crate::tuning::Tuning;

/// Number of frames averaged for the FPS readout
pub const FPS_WINDOW: usize = 60;

/// Rolling frame timing
#[derive(Debug, Clone)]
pub struct FrameStats {
    frame_times: [Option<f64>; FPS_WINDOW],
    frame_index: usize,
    fps: u32,
    /// Frames recorded since start
    pub frames: u64,
    /// Wall-clock seconds between the two most recent frames
    pub last_frame_secs: f64,
}

impl Default for FrameStats {
    fn default() -> Self {
        Self {
            frame_times: [None; FPS_WINDOW],
            frame_index: 0,
            fps: 0,
            frames: 0,
            last_frame_secs: 0.0,
        }
    }
}

impl FrameStats {
    /// Record a frame finishing at wall-clock `time` (seconds)
    pub fn record(&mut self, time: f64) {
        let prev = (self.frame_index + FPS_WINDOW - 1) % FPS_WINDOW;
        if let Some(prev_time) = self.frame_times[prev] {
            self.last_frame_secs = time - prev_time;
        }

        self.frame_times[self.frame_index] = Some(time);
        self.frame_index = (self.frame_index + 1) % FPS_WINDOW;
        self.frames += 1;

        // Oldest sample is the slot we will overwrite next
        if let Some(oldest) = self.frame_times[self.frame_index] {
            let elapsed = time - oldest;
            if elapsed > 0.0 {
                self.fps = ((FPS_WINDOW - 1) as f64 / elapsed).round() as u32;
            }
        }
    }

    /// Frames per second over the last window (0 until the window fills)
    pub fn fps(&self) -> u32 {
        self.fps
    }
}

pub struct Game {
    state: GameState,
    bus: Rc<SignalBus<GameState>>,
    stats: FrameStats,
}

impl Game {
    pub fn new(level: Level, tuning: Tuning, seed: u64) -> Result<Self, SimError> {
        Ok(Self::from_state(GameState::new(level, tuning, seed)?))
    }

    /// Game integrating through a caller-supplied physics backend
    pub fn with_backend(
        level: Level,
        tuning: Tuning,
        seed: u64,
        backend: Box<dyn PhysicsBackend>,
    ) -> Result<Self, SimError> {
        Ok(Self::from_state(GameState::with_backend(level, tuning, seed, backend)?))
    }

    fn from_state(state: GameState) -> Self {
        let bus = Rc::new(SignalBus::new());
        install_core_handlers(&bus);
        Self {
            state,
            bus,
            stats: FrameStats::default(),
        }
    }

    /// Signal bus for external subscribers (sound, HUD, scoring)
    pub fn bus(&self) -> &Rc<SignalBus<GameState>> {
        &self.bus
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    /// Run one frame: a single fixed step, then frame timing.
    /// `now` is the wall clock in seconds and only feeds the statistics.
    pub fn frame(&mut self, input: &TickInput, now: f64) -> Result<(), SimError> {
        tick(&mut self.state, &self.bus, input, SIM_DT)?;
        self.stats.record(now);
        Ok(())
    }

    /// Run `n` frames with the same input, stamping frames with simulated time
    pub fn run_ticks(&mut self, n: u32, input: &TickInput) -> Result<(), SimError> {
        for _ in 0..n {
            let now = self.state.elapsed_secs();
            self.frame(input, now)?;
        }
        Ok(())
    }

    pub fn render_snapshot(&self) -> Vec<RenderItem> {
        self.state.render_snapshot()
    }
}
