use image::Rgba;

use crate::config::PaintConfig;

/// Integer pixel position in canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CanvasPoint {
    pub x: i32,
    pub y: i32,
}

impl CanvasPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// How a segment is painted, captured when the segment is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: Rgba<u8>,
    pub size: u32,
    pub erase: bool,
}

// One rasterized piece of a stroke. Never kept once drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeSegment {
    pub from: CanvasPoint,
    pub to: CanvasPoint,
    pub style: StrokeStyle,
}

/// Brush settings plus the position of the stroke in progress.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeState {
    color: Rgba<u8>,
    brush_size: u32,
    min_size: u32,
    max_size: u32,
    erase_mode: bool,
    release_exits_eraser: bool,
    last_point: Option<CanvasPoint>,
    segments_drawn: bool,
}

impl StrokeState {
    pub fn new(config: &PaintConfig) -> Self {
        let color = config.palette.first().copied().unwrap_or([0, 0, 0, 255]);
        Self {
            color: Rgba(color),
            brush_size: config.clamp_brush_size(config.default_brush_size),
            min_size: config.min_brush_size,
            max_size: config.max_brush_size,
            erase_mode: false,
            release_exits_eraser: config.release_exits_eraser,
            last_point: None,
            segments_drawn: false,
        }
    }

    pub fn color(&self) -> Rgba<u8> {
        self.color
    }

    /// Picking a color always leaves eraser mode.
    pub fn set_color(&mut self, color: Rgba<u8>) {
        self.color = color;
        self.erase_mode = false;
    }

    pub fn brush_size(&self) -> u32 {
        self.brush_size
    }

    /// Returns the size actually applied after clamping.
    pub fn set_brush_size(&mut self, size: u32) -> u32 {
        self.brush_size = size.max(self.min_size).min(self.max_size);
        self.brush_size
    }

    pub fn brush_range(&self) -> std::ops::RangeInclusive<u32> {
        self.min_size..=self.max_size
    }

    pub fn erase_mode(&self) -> bool {
        self.erase_mode
    }

    pub fn set_erase_mode(&mut self, erase: bool) {
        self.erase_mode = erase;
    }

    pub fn last_point(&self) -> Option<CanvasPoint> {
        self.last_point
    }

    pub fn is_stroking(&self) -> bool {
        self.last_point.is_some()
    }

    pub fn style(&self) -> StrokeStyle {
        StrokeStyle {
            color: self.color,
            size: self.brush_size,
            erase: self.erase_mode,
        }
    }

    pub(crate) fn set_anchor(&mut self, point: CanvasPoint) {
        self.last_point = Some(point);
    }

    pub(crate) fn segments_drawn(&self) -> bool {
        self.segments_drawn
    }

    pub(crate) fn mark_drawn(&mut self) {
        self.segments_drawn = true;
    }

    /// Forget the stroke in progress without touching brush settings.
    pub(crate) fn abort(&mut self) {
        self.last_point = None;
        self.segments_drawn = false;
    }

    /// Pointer release: drop the anchor and, if configured, leave eraser mode.
    pub(crate) fn release(&mut self) {
        self.abort();
        if self.release_exits_eraser {
            self.erase_mode = false;
        }
    }
}

impl Default for StrokeState {
    fn default() -> Self {
        Self::new(&PaintConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brush_size_is_clamped() {
        let mut state = StrokeState::default();
        assert_eq!(state.brush_size(), 5);
        assert_eq!(state.set_brush_size(0), 1);
        assert_eq!(state.set_brush_size(50), 20);
    }

    #[test]
    fn test_set_color_exits_eraser() {
        let mut state = StrokeState::default();
        state.set_erase_mode(true);
        state.set_color(Rgba([255, 0, 0, 255]));
        assert!(!state.erase_mode());
    }

    #[test]
    fn test_release_keeps_eraser_when_configured() {
        let config = PaintConfig {
            release_exits_eraser: false,
            ..PaintConfig::default()
        };
        let mut state = StrokeState::new(&config);
        state.set_erase_mode(true);
        state.set_anchor(CanvasPoint::new(1, 1));
        state.release();
        assert!(state.erase_mode());
        assert!(!state.is_stroking());
    }
}
