use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};

use crate::canvas::PixelCanvas;
use crate::compositor;
use crate::config::PaintConfig;
use crate::error::CanvasResult;
use crate::file_handler::{self, DecodedImage, ExportFormat};
use crate::input::{InputEvent, InputLocation};
use crate::rasterizer::{StrokeRasterizer, map_to_canvas};
use crate::state::DragState;
use crate::stroke::{CanvasPoint, StrokeState};

/// Owns the canvas and brush state and drives them from pointer events,
/// resize and load requests.
#[derive(Debug, Clone)]
pub struct CanvasController {
    canvas: PixelCanvas,
    stroke: StrokeState,
    drag: DragState,
    config: PaintConfig,
    /// Bumped on every change that affects the composite
    revision: u64,
    clean_revision: Option<u64>,
}

impl CanvasController {
    pub fn new(config: PaintConfig) -> CanvasResult<Self> {
        config.validate()?;
        let (width, height) = config.default_canvas_size;
        let canvas = PixelCanvas::create(width, height)?;
        Ok(Self {
            canvas,
            stroke: StrokeState::new(&config),
            drag: DragState::Idle,
            config,
            revision: 0,
            clean_revision: None,
        })
    }

    pub fn canvas(&self) -> &PixelCanvas {
        &self.canvas
    }

    pub fn stroke(&self) -> &StrokeState {
        &self.stroke
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    pub fn config(&self) -> &PaintConfig {
        &self.config
    }

    fn to_canvas(&self, location: InputLocation) -> CanvasPoint {
        map_to_canvas(location.position, location.display_size, self.canvas.dimensions())
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    pub fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerDown { location } => self.pointer_down(location),
            InputEvent::PointerMove { location } => self.pointer_move(location),
            InputEvent::PointerUp { location } => self.pointer_up(location),
        }
    }

    pub fn pointer_down(&mut self, location: InputLocation) {
        let point = self.to_canvas(location);
        StrokeRasterizer::new(&mut self.canvas, &mut self.stroke).begin_stroke(point);
        self.drag = DragState::Drawing { origin: point };
    }

    /// Ignored unless a stroke is in progress.
    pub fn pointer_move(&mut self, location: InputLocation) {
        if !self.drag.is_drawing() {
            return;
        }
        let point = self.to_canvas(location);
        StrokeRasterizer::new(&mut self.canvas, &mut self.stroke).continue_stroke(point);
        self.touch();
    }

    pub fn pointer_up(&mut self, _location: InputLocation) {
        if !self.drag.is_drawing() {
            return;
        }
        StrokeRasterizer::new(&mut self.canvas, &mut self.stroke).end_stroke();
        self.drag = DragState::Idle;
        self.touch();
    }

    /// Abort any stroke in progress without drawing anything more.
    fn force_idle(&mut self) {
        if self.drag.is_drawing() {
            log::debug!("Aborting stroke in progress");
        }
        self.stroke.abort();
        self.drag = DragState::Idle;
    }

    /// Replace both layers with blank buffers. Invalid sizes leave everything untouched.
    pub fn resize_canvas(&mut self, width: u32, height: u32) -> CanvasResult<()> {
        self.canvas.resize(width, height)?;
        self.force_idle();
        self.touch();
        log::info!("Canvas resized to {}x{}", width, height);
        Ok(())
    }

    /// Replace the base layer and discard the overlay.
    pub fn load_image(&mut self, pixels: Vec<u8>, width: u32, height: u32) -> CanvasResult<()> {
        self.canvas.replace_base(pixels, width, height)?;
        self.force_idle();
        self.touch();
        log::info!("Loaded {}x{} image", width, height);
        Ok(())
    }

    pub fn load_decoded(&mut self, image: DecodedImage) -> CanvasResult<()> {
        self.load_image(image.pixels, image.width, image.height)
    }

    /// Decode a file from disk and load it.
    pub fn open_file(&mut self, path: &Path) -> CanvasResult<()> {
        let image = file_handler::decode_image_file(path, &self.config)?;
        self.load_decoded(image)
    }

    pub fn set_color(&mut self, color: Rgba<u8>) {
        self.stroke.set_color(color);
    }

    pub fn set_brush_size(&mut self, size: u32) -> u32 {
        self.stroke.set_brush_size(size)
    }

    pub fn activate_eraser(&mut self) {
        self.stroke.set_erase_mode(true);
    }

    /// Base and overlay merged for display.
    pub fn composite(&self) -> CanvasResult<RgbaImage> {
        compositor::composite(&self.canvas)
    }

    pub fn export(&self, format: ExportFormat) -> CanvasResult<Vec<u8>> {
        let merged = self.composite()?;
        file_handler::encode_image(&merged, format, &self.config)
    }

    /// Encode and write the composite. Returns the path actually written.
    pub fn save_to(&self, selected: &Path, format: ExportFormat) -> CanvasResult<PathBuf> {
        let bytes = self.export(format)?;
        let path = file_handler::output_path(selected, format);
        file_handler::save_bytes(&path, &bytes)?;
        log::info!("Saved {} to {}", format.label(), path.display());
        Ok(path)
    }

    /// True until `mark_clean` is called after the latest change.
    pub fn is_dirty(&self) -> bool {
        self.clean_revision != Some(self.revision)
    }

    pub fn mark_clean(&mut self) {
        self.clean_revision = Some(self.revision);
    }
}
