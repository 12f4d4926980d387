use crate::sim::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    Pause,
    Continue,
    Quit,
}

const ACTION_COUNT: usize = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ActionStates {
    down: [bool; ACTION_COUNT],
}

impl ActionStates {
    pub(crate) fn set(&mut self, action: InputAction, is_down: bool) {
        self.down[action.index()] = is_down;
    }

    pub(crate) fn is_down(&self, action: InputAction) -> bool {
        self.down[action.index()]
    }
}

impl InputAction {
    const fn index(self) -> usize {
        match self {
            InputAction::Pause => 0,
            InputAction::Continue => 1,
            InputAction::Quit => 2,
        }
    }
}

/// Key and pointer levels sampled for one tick. Edges are derived later by
/// the session controller, so only down-states are carried here.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputSnapshot {
    actions: ActionStates,
    cursor_position_px: Option<Vec2>,
    primary_button_down: bool,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn new(
        actions: ActionStates,
        cursor_position_px: Option<Vec2>,
        primary_button_down: bool,
    ) -> Self {
        Self {
            actions,
            cursor_position_px,
            primary_button_down,
        }
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.actions.is_down(action)
    }

    pub fn with_action_down(mut self, action: InputAction, is_down: bool) -> Self {
        self.actions.set(action, is_down);
        self
    }

    pub fn cursor_position_px(&self) -> Option<Vec2> {
        self.cursor_position_px
    }

    pub fn with_cursor_position_px(mut self, cursor_position_px: Option<Vec2>) -> Self {
        self.cursor_position_px = cursor_position_px;
        self
    }

    pub fn primary_button_down(&self) -> bool {
        self.primary_button_down
    }

    pub fn with_primary_button_down(mut self, primary_button_down: bool) -> Self {
        self.primary_button_down = primary_button_down;
        self
    }

    /// Pointer position to pull the logo toward, only while the button is held.
    pub fn nudge_target(&self) -> Option<Vec2> {
        if self.primary_button_down {
            self.cursor_position_px
        } else {
            None
        }
    }
}
