use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CanvasError, CanvasResult};

/// Default canvas size, also the fallback for invalid custom entries.
pub const DEFAULT_CANVAS_SIZE: (u32, u32) = (800, 600);

/// Largest width or height a canvas may have.
pub const MAX_DIMENSION: u32 = 16384;

/// User-tunable settings for brushes, canvases and export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old config
pub struct PaintConfig {
    pub min_brush_size: u32,
    pub max_brush_size: u32,
    pub default_brush_size: u32,
    /// Swatch colors as straight RGBA
    pub palette: Vec<[u8; 4]>,
    pub default_canvas_size: (u32, u32),
    /// Lowercase file extensions accepted by the loader
    pub allowed_extensions: Vec<String>,
    pub jpeg_quality: u8,
    /// Painted under the image when exporting to a format without alpha
    pub flatten_background: [u8; 4],
    /// Releasing the pointer always leaves eraser mode
    pub release_exits_eraser: bool,
}

impl Default for PaintConfig {
    fn default() -> Self {
        Self {
            min_brush_size: 1,
            max_brush_size: 20,
            default_brush_size: 5,
            palette: vec![
                [0, 0, 0, 255],       // black
                [255, 0, 0, 255],     // red
                [0, 0, 255, 255],     // blue
                [0, 255, 0, 255],     // green
                [255, 255, 0, 255],   // yellow
                [255, 0, 255, 255],   // magenta
                [255, 200, 0, 255],   // orange
                [128, 128, 128, 255], // gray
                [255, 255, 255, 255], // white
            ],
            default_canvas_size: DEFAULT_CANVAS_SIZE,
            allowed_extensions: ["jpg", "jpeg", "png", "bmp"]
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            jpeg_quality: 90,
            flatten_background: [255, 255, 255, 255],
            release_exits_eraser: true,
        }
    }
}

impl PaintConfig {
    /// Read a config from a JSON file and validate it.
    pub fn load(path: impl AsRef<Path>) -> CanvasResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .map_err(|e| CanvasError::Config(format!("{}: {}", path.display(), e)))?;
        let config: Self =
            serde_json::from_str(&json).map_err(|e| CanvasError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load the config at `path`, falling back to defaults when it is missing or invalid.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Using default config: {}", err);
                Self::default()
            }
        }
    }

    /// Like `load_or_default`, but a missing file is created with the defaults so
    /// there is something to edit on the next run.
    pub fn load_or_create(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if path.exists() {
            return Self::load_or_default(path);
        }
        let config = Self::default();
        match config.save(path) {
            Ok(()) => log::info!("Wrote default config to {}", path.display()),
            Err(err) => log::warn!("Could not write default config: {}", err),
        }
        config
    }

    pub fn save(&self, path: impl AsRef<Path>) -> CanvasResult<()> {
        let json =
            serde_json::to_string_pretty(self).map_err(|e| CanvasError::Config(e.to_string()))?;
        fs::write(path.as_ref(), json).map_err(|e| CanvasError::Config(e.to_string()))
    }

    pub fn validate(&self) -> CanvasResult<()> {
        if self.min_brush_size == 0 || self.min_brush_size > self.max_brush_size {
            return Err(CanvasError::Config(format!(
                "brush size range {}..={} is empty or starts at zero",
                self.min_brush_size, self.max_brush_size
            )));
        }
        let (width, height) = self.default_canvas_size;
        if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(CanvasError::InvalidDimension { width, height });
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(CanvasError::Config(format!(
                "jpeg quality {} outside 1..=100",
                self.jpeg_quality
            )));
        }
        Ok(())
    }

    /// Never panics, even on a range that failed `validate`.
    pub fn clamp_brush_size(&self, size: u32) -> u32 {
        size.max(self.min_brush_size).min(self.max_brush_size)
    }

    pub fn is_allowed_extension(&self, ext: &str) -> bool {
        let ext = ext.to_ascii_lowercase();
        self.allowed_extensions.iter().any(|allowed| *allowed == ext)
    }
}
