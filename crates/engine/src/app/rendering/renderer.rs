use std::sync::Arc;

use pixels::{Error, Pixels, SurfaceTexture, TextureError};
use winit::window::Window;

use crate::asset::LogoAsset;
use crate::sim::{FrameRenderer, FrameView, PausePanel, Vec2};

use super::canvas::{Canvas, SpriteRef};
use super::font::{draw_text, draw_text_centered};
use super::Viewport;

const BACKGROUND_COLOR: [u8; 4] = [0, 0, 255, 255];
const CORNER_FLASH_COLOR: [u8; 4] = [0, 255, 0, 255];
const TEXT_COLOR: [u8; 4] = [255, 255, 255, 255];
const PAUSE_PANEL_COLOR: [u8; 4] = [0, 0, 128, 255];
const PAUSE_BORDER_COLOR: [u8; 4] = [255, 255, 255, 255];
const STATUS_MARGIN_PX: i32 = 8;

/// Software renderer: composes each frame into a fixed viewport-sized pixel
/// buffer and lets `pixels` scale it onto the window surface.
pub struct Renderer {
    pixels: Pixels<'static>,
    viewport: Viewport,
    logo: LogoAsset,
}

impl Renderer {
    pub fn new(window: Arc<Window>, viewport: Viewport, logo: LogoAsset) -> Result<Self, Error> {
        let size = window.inner_size();
        let surface = SurfaceTexture::new(size.width, size.height, window);
        let pixels = Pixels::new(viewport.width, viewport.height, surface)?;
        Ok(Self {
            pixels,
            viewport,
            logo,
        })
    }

    pub fn resize_surface(&mut self, width: u32, height: u32) -> Result<(), TextureError> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels.resize_surface(width, height)
    }

    /// Maps a physical window position into viewport pixels, clamping
    /// positions that fall in the letterbox or outside the window.
    pub fn window_to_viewport_px(&self, x: f32, y: f32) -> Vec2 {
        let (px, py) = self
            .pixels
            .window_pos_to_pixel((x, y))
            .unwrap_or_else(|outside| self.pixels.clamp_pixel_pos(outside));
        Vec2::new(px as f32, py as f32)
    }
}

impl FrameRenderer for Renderer {
    type Error = Error;

    fn draw_frame(&mut self, frame: &FrameView) -> Result<(), Error> {
        compose_frame(self.pixels.frame_mut(), self.viewport, &self.logo, frame);
        self.pixels.render()
    }
}

pub(crate) fn compose_frame(
    buffer: &mut [u8],
    viewport: Viewport,
    logo: &LogoAsset,
    frame: &FrameView,
) {
    if buffer.len() < viewport.byte_len() {
        return;
    }
    let mut canvas = Canvas::new(buffer, viewport.width, viewport.height);

    canvas.fill(if frame.sim.hit_corner_this_frame {
        CORNER_FLASH_COLOR
    } else {
        BACKGROUND_COLOR
    });

    let (source_width, source_height) = logo.source_size();
    canvas.blit_scaled(
        SpriteRef {
            rgba: logo.rgba(),
            width: source_width,
            height: source_height,
        },
        frame.sim.position.x.round() as i32,
        frame.sim.position.y.round() as i32,
        logo.display_width().round() as u32,
        logo.display_height().round() as u32,
    );

    draw_text(
        &mut canvas,
        STATUS_MARGIN_PX,
        STATUS_MARGIN_PX,
        &frame.status_line(),
        TEXT_COLOR,
    );

    if frame.is_paused() {
        draw_pause_panel(
            &mut canvas,
            PausePanel::centered(viewport.width, viewport.height),
        );
    }
}

fn draw_pause_panel(canvas: &mut Canvas<'_>, panel: PausePanel) {
    canvas.fill_rect(
        panel.x,
        panel.y,
        panel.width,
        panel.height,
        PAUSE_PANEL_COLOR,
    );
    canvas.stroke_rect(
        panel.x,
        panel.y,
        panel.width,
        panel.height,
        panel.border,
        PAUSE_BORDER_COLOR,
    );
    for line in panel.lines() {
        draw_text_centered(canvas, line.center_x, line.center_y, line.text, TEXT_COLOR);
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use image::{ImageFormat, Rgba, RgbaImage};

    use super::*;
    use crate::sim::{SessionState, SimulationState};

    const VIEWPORT: Viewport = Viewport {
        width: 800,
        height: 600,
    };
    const LOGO_COLOR: [u8; 4] = [250, 10, 10, 255];

    fn red_logo() -> LogoAsset {
        let image = RgbaImage::from_pixel(24, 12, Rgba(LOGO_COLOR));
        let mut bytes = Cursor::new(Vec::new());
        image
            .write_to(&mut bytes, ImageFormat::Png)
            .expect("encode png");
        LogoAsset::decode(bytes.get_ref(), 120.0).expect("decode")
    }

    fn frame_at(x: f32, y: f32, session: SessionState, hit: bool) -> FrameView {
        FrameView {
            sim: SimulationState {
                position: Vec2::new(x, y),
                hit_corner_this_frame: hit,
                ..SimulationState::default()
            },
            session,
        }
    }

    fn pixel(buffer: &[u8], x: u32, y: u32) -> [u8; 4] {
        let offset = ((y * VIEWPORT.width + x) * 4) as usize;
        [
            buffer[offset],
            buffer[offset + 1],
            buffer[offset + 2],
            buffer[offset + 3],
        ]
    }

    fn compose(frame: &FrameView) -> Vec<u8> {
        let mut buffer = vec![0u8; VIEWPORT.byte_len()];
        compose_frame(&mut buffer, VIEWPORT, &red_logo(), frame);
        buffer
    }

    #[test]
    fn background_is_blue_without_corner_hit() {
        let buffer = compose(&frame_at(300.0, 300.0, SessionState::Running, false));

        assert_eq!(pixel(&buffer, 799, 599), BACKGROUND_COLOR);
    }

    #[test]
    fn background_flashes_green_on_corner_hit() {
        let buffer = compose(&frame_at(0.0, 0.0, SessionState::Running, true));

        assert_eq!(pixel(&buffer, 799, 599), CORNER_FLASH_COLOR);
    }

    #[test]
    fn logo_is_drawn_at_position_with_display_size() {
        let buffer = compose(&frame_at(300.0, 200.0, SessionState::Running, false));

        // 24x12 source scaled to 120x60
        assert_eq!(pixel(&buffer, 300, 200), LOGO_COLOR);
        assert_eq!(pixel(&buffer, 419, 259), LOGO_COLOR);
        assert_eq!(pixel(&buffer, 420, 259), BACKGROUND_COLOR);
        assert_eq!(pixel(&buffer, 419, 260), BACKGROUND_COLOR);
        assert_eq!(pixel(&buffer, 299, 200), BACKGROUND_COLOR);
    }

    #[test]
    fn status_line_is_drawn_in_top_left() {
        let buffer = compose(&frame_at(600.0, 500.0, SessionState::Running, false));
        let hud = (0..40).flat_map(|y| (0..200).map(move |x| (x, y)));

        assert!(hud
            .map(|(x, y)| pixel(&buffer, x, y))
            .any(|p| p == TEXT_COLOR));
    }

    #[test]
    fn pause_panel_only_when_paused() {
        let running = compose(&frame_at(0.0, 0.0, SessionState::Running, false));
        let paused = compose(&frame_at(0.0, 0.0, SessionState::Paused, false));

        assert_eq!(pixel(&running, 260, 210), BACKGROUND_COLOR);
        assert_eq!(pixel(&paused, 260, 210), PAUSE_PANEL_COLOR);
        assert_eq!(pixel(&paused, 250, 200), PAUSE_BORDER_COLOR);
        assert_eq!(pixel(&paused, 251, 201), PAUSE_BORDER_COLOR);
        assert_eq!(pixel(&paused, 549, 399), PAUSE_BORDER_COLOR);
        assert_eq!(pixel(&paused, 252, 202), PAUSE_PANEL_COLOR);
    }

    #[test]
    fn pause_panel_has_text_on_each_line() {
        let paused = compose(&frame_at(0.0, 0.0, SessionState::Paused, false));

        for center_y in [250, 300, 350] {
            let row_has_text = (center_y - 7..=center_y + 7)
                .flat_map(|y| (260..540).map(move |x| (x, y)))
                .any(|(x, y)| pixel(&paused, x, y) == TEXT_COLOR);
            assert!(row_has_text, "no text near y={center_y}");
        }
    }

    #[test]
    fn short_buffer_is_left_untouched() {
        let mut buffer = vec![7u8; 16];
        compose_frame(
            &mut buffer,
            VIEWPORT,
            &red_logo(),
            &frame_at(0.0, 0.0, SessionState::Running, false),
        );

        assert!(buffer.iter().all(|byte| *byte == 7));
    }
}
