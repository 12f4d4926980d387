mod game_loop;
mod hud;
mod motion;
mod session;

pub use game_loop::{
    Clock, FrameRenderer, FrameView, GameLoop, InputSource, SystemClock, TickOutcome,
};
pub use hud::{format_elapsed, status_line, PanelLine, PausePanel};
pub use motion::{MotionEngine, MotionParams, SimulationState};
pub use session::{fresh_press, EdgeTriggeredKey, SessionController, SessionState};

/// Screen-space vector in viewport pixels, origin top-left.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}
