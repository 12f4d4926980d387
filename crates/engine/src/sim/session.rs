use tracing::info;

use crate::app::{InputAction, InputSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Running,
    Paused,
    Terminated,
}

/// A logical press: down now, up on the previous tick.
pub const fn fresh_press(is_down: bool, was_down: bool) -> bool {
    is_down && !was_down
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeTriggeredKey {
    was_down: bool,
}

impl EdgeTriggeredKey {
    /// Records this tick's down-state and reports whether it was a fresh press.
    pub fn update(&mut self, is_down: bool) -> bool {
        let pressed = fresh_press(is_down, self.was_down);
        self.was_down = is_down;
        pressed
    }

    pub fn was_down(&self) -> bool {
        self.was_down
    }
}

/// Pause/quit state machine fed once per tick.
///
/// Escape toggles between running and paused. While paused, a held quit key
/// terminates (level-triggered) and a fresh continue press resumes. Quit is
/// checked before continue. Terminated never changes again.
#[derive(Debug, Default)]
pub struct SessionController {
    state: SessionState,
    escape: EdgeTriggeredKey,
    continue_key: EdgeTriggeredKey,
    quit: EdgeTriggeredKey,
}

impl SessionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn update(&mut self, input: &InputSnapshot) -> SessionState {
        if self.state == SessionState::Terminated {
            return self.state;
        }

        let escape_pressed = self.escape.update(input.is_down(InputAction::Pause));
        let continue_pressed = self.continue_key.update(input.is_down(InputAction::Continue));
        let quit_down = input.is_down(InputAction::Quit);
        self.quit.update(quit_down);

        let mut next = self.state;
        if escape_pressed {
            next = match next {
                SessionState::Running => SessionState::Paused,
                _ => SessionState::Running,
            };
        }
        if next == SessionState::Paused {
            if quit_down {
                next = SessionState::Terminated;
            } else if continue_pressed {
                next = SessionState::Running;
            }
        }

        self.transition_to(next);
        self.state
    }

    fn transition_to(&mut self, next: SessionState) {
        if next == self.state {
            return;
        }
        match next {
            SessionState::Paused => info!("session_paused"),
            SessionState::Running => info!("session_resumed"),
            SessionState::Terminated => info!("session_terminated"),
        }
        self.state = next;
    }
}
