pub mod app;
pub mod asset;
pub mod sim;

pub use app::{
    run_app, AppError, InputAction, InputSnapshot, LoopConfig, LoopMetricsSnapshot, Renderer,
    Viewport,
};
pub use asset::{AssetError, LogoAsset};
pub use sim::{
    format_elapsed, fresh_press, status_line, Clock, EdgeTriggeredKey, FrameRenderer, FrameView,
    GameLoop, InputSource, MotionEngine, MotionParams, PanelLine, PausePanel, SessionController,
    SessionState, SimulationState, SystemClock, TickOutcome, Vec2,
};
