use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to decode logo image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("logo image has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },
}

/// Decoded logo pixels plus the on-screen size they are drawn at.
#[derive(Debug, Clone)]
pub struct LogoAsset {
    rgba: Vec<u8>,
    source_width: u32,
    source_height: u32,
    display_width: f32,
    display_height: f32,
}

impl LogoAsset {
    /// Decodes an encoded image and scales it to `display_width`, keeping the
    /// source aspect ratio for the height.
    pub fn decode(bytes: &[u8], display_width: f32) -> Result<Self, AssetError> {
        let image = image::load_from_memory(bytes)?.to_rgba8();
        let (source_width, source_height) = image.dimensions();
        if source_width == 0 || source_height == 0 {
            return Err(AssetError::EmptyImage {
                width: source_width,
                height: source_height,
            });
        }

        let scale = display_width / source_width as f32;
        Ok(Self {
            rgba: image.into_raw(),
            source_width,
            source_height,
            display_width,
            display_height: scale * source_height as f32,
        })
    }

    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    pub fn source_size(&self) -> (u32, u32) {
        (self.source_width, self.source_height)
    }

    pub fn display_width(&self) -> f32 {
        self.display_width
    }

    pub fn display_height(&self) -> f32 {
        self.display_height
    }
}
