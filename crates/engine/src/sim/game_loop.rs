use std::time::{Duration, Instant};

use tracing::debug;

use crate::app::InputSnapshot;

use super::hud::status_line;
use super::{MotionEngine, SessionController, SessionState, SimulationState};

pub trait Clock {
    fn elapsed(&self) -> Duration;
}

#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    started_at: Instant,
}

impl SystemClock {
    pub fn start() -> Self {
        Self {
            started_at: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}

/// Supplies the current key and pointer levels once per tick.
pub trait InputSource {
    fn poll(&mut self) -> InputSnapshot;
}

pub trait FrameRenderer {
    type Error;

    fn draw_frame(&mut self, frame: &FrameView) -> Result<(), Self::Error>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    Exit,
}

/// Read-only view of one tick's result, handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameView {
    pub sim: SimulationState,
    pub session: SessionState,
}

impl FrameView {
    pub fn status_line(&self) -> String {
        status_line(self.sim.corner_hit_count, self.sim.elapsed_since_start)
    }

    pub fn is_paused(&self) -> bool {
        self.session == SessionState::Paused
    }
}

pub struct GameLoop<C> {
    engine: MotionEngine,
    session: SessionController,
    sim: SimulationState,
    clock: C,
}

impl<C: Clock> GameLoop<C> {
    pub fn new(engine: MotionEngine, initial: SimulationState, clock: C) -> Self {
        Self {
            engine,
            session: SessionController::new(),
            sim: initial,
            clock,
        }
    }

    pub fn session_state(&self) -> SessionState {
        self.session.state()
    }

    pub fn frame(&self) -> FrameView {
        FrameView {
            sim: self.sim,
            session: self.session.state(),
        }
    }

    /// Polls input, steps the session, and advances the logo unless paused.
    /// Returns `Exit` once the session has terminated; the simulation is left
    /// untouched on that tick.
    pub fn tick<I: InputSource + ?Sized>(&mut self, input: &mut I) -> TickOutcome {
        let snapshot = input.poll();
        self.sim.elapsed_since_start = self.clock.elapsed();

        match self.session.update(&snapshot) {
            SessionState::Terminated => return TickOutcome::Exit,
            SessionState::Paused => {}
            SessionState::Running => {
                self.sim = self.engine.advance(self.sim, snapshot.nudge_target());
                if self.sim.hit_corner_this_frame {
                    debug!(corner_hits = self.sim.corner_hit_count, "corner_hit");
                }
            }
        }

        TickOutcome::Continue
    }

    /// One tick followed by one draw, for hosts that render every tick.
    pub fn run_tick<I, R>(
        &mut self,
        input: &mut I,
        renderer: &mut R,
    ) -> Result<TickOutcome, R::Error>
    where
        I: InputSource + ?Sized,
        R: FrameRenderer + ?Sized,
    {
        let outcome = self.tick(input);
        renderer.draw_frame(&self.frame())?;
        Ok(outcome)
    }
}
