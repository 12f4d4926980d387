mod canvas;
mod font;
mod renderer;

pub use renderer::Renderer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub(crate) fn byte_len(self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}
