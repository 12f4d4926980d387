use std::time::Duration;

const PAUSE_PANEL_WIDTH: i32 = 300;
const PAUSE_PANEL_HEIGHT: i32 = 200;
const PAUSE_PANEL_BORDER: i32 = 2;
const PAUSE_PANEL_LINES: [(&str, i32); 3] = [("PAUSED", 50), ("[C]ontinue", 100), ("[Q]uit", 150)];

/// `HH:MM:SS.hh`; hours grow past two digits instead of wrapping.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total_ms = elapsed.as_millis();
    let hours = total_ms / 3_600_000;
    let minutes = (total_ms / 60_000) % 60;
    let seconds = (total_ms / 1_000) % 60;
    let hundredths = (total_ms % 1_000) / 10;
    format!("{hours:02}:{minutes:02}:{seconds:02}.{hundredths:02}")
}

pub fn status_line(corner_hits: u64, elapsed: Duration) -> String {
    format!("Hits: {corner_hits} | Time: {}", format_elapsed(elapsed))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelLine {
    pub text: &'static str,
    pub center_x: i32,
    pub center_y: i32,
}

/// Pause menu geometry in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PausePanel {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub border: i32,
}

impl PausePanel {
    pub fn centered(viewport_width: u32, viewport_height: u32) -> Self {
        Self {
            x: (viewport_width as i32 - PAUSE_PANEL_WIDTH) / 2,
            y: (viewport_height as i32 - PAUSE_PANEL_HEIGHT) / 2,
            width: PAUSE_PANEL_WIDTH,
            height: PAUSE_PANEL_HEIGHT,
            border: PAUSE_PANEL_BORDER,
        }
    }

    pub fn lines(&self) -> [PanelLine; 3] {
        PAUSE_PANEL_LINES.map(|(text, offset_y)| PanelLine {
            text,
            center_x: self.x + self.width / 2,
            center_y: self.y + offset_y,
        })
    }
}
