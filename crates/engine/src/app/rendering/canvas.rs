/// Borrowed RGBA8 frame buffer with clipped drawing primitives.
pub(super) struct Canvas<'a> {
    frame: &'a mut [u8],
    width: u32,
    height: u32,
}

/// Straight-alpha RGBA8 image to be drawn into a [`Canvas`].
#[derive(Debug, Clone, Copy)]
pub(super) struct SpriteRef<'a> {
    pub rgba: &'a [u8],
    pub width: u32,
    pub height: u32,
}

impl<'a> Canvas<'a> {
    pub(super) fn new(frame: &'a mut [u8], width: u32, height: u32) -> Self {
        Self {
            frame,
            width,
            height,
        }
    }

    pub(super) fn fill(&mut self, color: [u8; 4]) {
        for pixel in self.frame.chunks_exact_mut(4) {
            pixel.copy_from_slice(&color);
        }
    }

    pub(super) fn put_pixel(&mut self, x: i32, y: i32, color: [u8; 4]) {
        let Some(offset) = self.byte_offset(x, y) else {
            return;
        };
        self.frame[offset..offset + 4].copy_from_slice(&color);
    }

    pub(super) fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: [u8; 4]) {
        let left = x.max(0);
        let top = y.max(0);
        let right = x.saturating_add(width).min(self.width as i32);
        let bottom = y.saturating_add(height).min(self.height as i32);
        for py in top..bottom {
            for px in left..right {
                self.put_pixel(px, py, color);
            }
        }
    }

    /// Border drawn inward from the rectangle's edges.
    pub(super) fn stroke_rect(
        &mut self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        thickness: i32,
        color: [u8; 4],
    ) {
        if width <= 0 || height <= 0 || thickness <= 0 {
            return;
        }
        self.fill_rect(x, y, width, thickness, color);
        self.fill_rect(x, y + height - thickness, width, thickness, color);
        self.fill_rect(x, y, thickness, height, color);
        self.fill_rect(x + width - thickness, y, thickness, height, color);
    }

    /// Nearest-neighbor scale of `sprite` into the `width`×`height` box at
    /// (`x`, `y`). Partially transparent pixels are blended over the frame.
    pub(super) fn blit_scaled(
        &mut self,
        sprite: SpriteRef<'_>,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    ) {
        if sprite.width == 0 || sprite.height == 0 || width == 0 || height == 0 {
            return;
        }
        if sprite.rgba.len() < sprite.width as usize * sprite.height as usize * 4 {
            return;
        }

        let x_ratio = sprite.width as f32 / width as f32;
        let y_ratio = sprite.height as f32 / height as f32;
        let top = y.max(0);
        let left = x.max(0);
        let bottom = y.saturating_add(height as i32).min(self.height as i32);
        let right = x.saturating_add(width as i32).min(self.width as i32);

        for out_y in top..bottom {
            let src_y = (((out_y - y) as f32 * y_ratio) as u32).min(sprite.height - 1);
            for out_x in left..right {
                let src_x = (((out_x - x) as f32 * x_ratio) as u32).min(sprite.width - 1);
                let src = (src_y as usize * sprite.width as usize + src_x as usize) * 4;
                let source = &sprite.rgba[src..src + 4];
                if source[3] == 0 {
                    continue;
                }
                self.blend_pixel(out_x, out_y, [source[0], source[1], source[2], source[3]]);
            }
        }
    }

    fn blend_pixel(&mut self, x: i32, y: i32, color: [u8; 4]) {
        let Some(offset) = self.byte_offset(x, y) else {
            return;
        };
        let alpha = u16::from(color[3]);
        let dst = &mut self.frame[offset..offset + 4];
        for channel in 0..3 {
            let blended = (u16::from(color[channel]) * alpha
                + u16::from(dst[channel]) * (255 - alpha))
                / 255;
            dst[channel] = blended as u8;
        }
        dst[3] = 255;
    }

    fn byte_offset(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        let offset = (y as usize)
            .checked_mul(self.width as usize)?
            .checked_add(x as usize)?
            .checked_mul(4)?;
        (offset + 4 <= self.frame.len()).then_some(offset)
    }
}
