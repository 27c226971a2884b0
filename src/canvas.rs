use image::{Rgba, RgbaImage};

use crate::config::MAX_DIMENSION;
use crate::error::{CanvasError, CanvasResult};

/// Fully transparent pixel, the initial value of every overlay pixel.
pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Two same-sized RGBA layers: the loaded (or blank) base image and the
/// overlay that holds the user's strokes.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelCanvas {
    base: RgbaImage,
    overlay: RgbaImage,
}

fn validate_dimensions(width: u32, height: u32) -> CanvasResult<()> {
    if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(CanvasError::InvalidDimension { width, height });
    }
    Ok(())
}

impl PixelCanvas {
    /// Create a canvas with a transparent base and a blank overlay.
    pub fn create(width: u32, height: u32) -> CanvasResult<Self> {
        validate_dimensions(width, height)?;
        Ok(Self {
            base: RgbaImage::new(width, height),
            overlay: RgbaImage::new(width, height),
        })
    }

    /// Wrap an already decoded image as the base layer.
    pub fn from_base(base: RgbaImage) -> CanvasResult<Self> {
        validate_dimensions(base.width(), base.height())?;
        let overlay = RgbaImage::new(base.width(), base.height());
        Ok(Self { base, overlay })
    }

    /// Swap in a new base layer from raw RGBA bytes and reset the overlay.
    ///
    /// Everything is validated before either layer is touched.
    pub fn replace_base(&mut self, pixels: Vec<u8>, width: u32, height: u32) -> CanvasResult<()> {
        *self = Self::from_pixels(pixels, width, height)?;
        Ok(())
    }

    /// Build a canvas from raw RGBA bytes with a blank overlay.
    pub fn from_pixels(pixels: Vec<u8>, width: u32, height: u32) -> CanvasResult<Self> {
        validate_dimensions(width, height)?;
        let expected = width as usize * height as usize * 4;
        let actual = pixels.len();
        let base = RgbaImage::from_raw(width, height, pixels)
            .ok_or(CanvasError::BufferSizeMismatch { expected, actual })?;
        Self::from_base(base)
    }

    /// Reallocate both layers as blank buffers of the new size.
    pub fn resize(&mut self, width: u32, height: u32) -> CanvasResult<()> {
        *self = Self::create(width, height)?;
        Ok(())
    }

    pub fn width(&self) -> u32 {
        self.base.width()
    }

    pub fn height(&self) -> u32 {
        self.base.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.base.dimensions()
    }

    pub fn base(&self) -> &RgbaImage {
        &self.base
    }

    pub fn overlay(&self) -> &RgbaImage {
        &self.overlay
    }

    /// Only the rasterizer writes into the overlay.
    pub(crate) fn overlay_mut(&mut self) -> &mut RgbaImage {
        &mut self.overlay
    }

    pub fn overlay_is_blank(&self) -> bool {
        self.overlay.pixels().all(|p| p[3] == 0)
    }
}
