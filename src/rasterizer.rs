use egui::{Pos2, Vec2};

use crate::canvas::{PixelCanvas, TRANSPARENT};
use crate::compositor::blend_over;
use crate::geometry::{clipped_bounds, distance_sq_to_segment};
use crate::stroke::{CanvasPoint, StrokeSegment, StrokeState, StrokeStyle};

/// Map a pointer position in display space onto canvas pixels.
///
/// Each axis is scaled by `canvas / display` independently. An empty display
/// axis maps 1:1.
pub fn map_to_canvas(point: Pos2, display_size: Vec2, canvas_size: (u32, u32)) -> CanvasPoint {
    let scale = |value: f32, display: f32, canvas: u32| -> i32 {
        if display > 0.0 {
            (f64::from(value) / f64::from(display) * f64::from(canvas)).floor() as i32
        } else {
            value.floor() as i32
        }
    };
    CanvasPoint::new(
        scale(point.x, display_size.x, canvas_size.0),
        scale(point.y, display_size.y, canvas_size.1),
    )
}

/// Draws strokes into the overlay of a canvas.
///
/// Borrows the canvas and the stroke state for the duration of one input event.
pub struct StrokeRasterizer<'a> {
    canvas: &'a mut PixelCanvas,
    state: &'a mut StrokeState,
}

impl<'a> StrokeRasterizer<'a> {
    pub fn new(canvas: &'a mut PixelCanvas, state: &'a mut StrokeState) -> Self {
        Self { canvas, state }
    }

    /// Pointer down: remember where the stroke starts, draw nothing yet.
    pub fn begin_stroke(&mut self, point: CanvasPoint) {
        log::debug!("Stroke begins at {:?}", point);
        self.state.abort();
        self.state.set_anchor(point);
    }

    /// Pointer drag: a line from the anchor, or a dot when there is no anchor.
    pub fn continue_stroke(&mut self, point: CanvasPoint) {
        let style = self.state.style();
        let from = self.state.last_point().unwrap_or(point);
        draw_segment(self.canvas, &StrokeSegment { from, to: point, style });
        self.state.mark_drawn();
        self.state.set_anchor(point);
    }

    /// Pointer release. A click that never moved still leaves a dot.
    pub fn end_stroke(&mut self) {
        if let Some(anchor) = self.state.last_point() {
            if !self.state.segments_drawn() {
                stamp_dot(self.canvas, anchor, self.state.style());
            }
        }
        log::debug!("Stroke ends at {:?}", self.state.last_point());
        self.state.release();
    }
}

/// Fill a circle of diameter `style.size` anchored on `center`.
pub fn stamp_dot(canvas: &mut PixelCanvas, center: CanvasPoint, style: StrokeStyle) {
    draw_segment(
        canvas,
        &StrokeSegment {
            from: center,
            to: center,
            style,
        },
    );
}

/// Where the brush is centered for an anchor pixel: the pixel's center for odd
/// sizes, its top-left corner for even sizes. Either way a brush of size `n`
/// covers exactly `n` pixels across.
fn brush_center(point: CanvasPoint, size: u32) -> (f64, f64) {
    let offset = if size % 2 == 1 { 0.5 } else { 0.0 };
    (f64::from(point.x) + offset, f64::from(point.y) + offset)
}

/// Rasterize a round-capped segment into the overlay.
///
/// A pixel is covered when its center lies within `size / 2` of the segment.
/// Erasing overwrites covered pixels with transparent, painting blends over them.
pub fn draw_segment(canvas: &mut PixelCanvas, segment: &StrokeSegment) {
    let size = segment.style.size;
    let radius = f64::from(size) / 2.0;
    let radius_sq = radius * radius;
    let Some((min_x, min_y, max_x, max_y)) = clipped_bounds(
        segment.from,
        segment.to,
        radius,
        canvas.width(),
        canvas.height(),
    ) else {
        return;
    };

    let from = brush_center(segment.from, size);
    let to = brush_center(segment.to, size);
    let overlay = canvas.overlay_mut();
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let (cx, cy) = (f64::from(x) + 0.5, f64::from(y) + 0.5);
            if distance_sq_to_segment(cx, cy, from, to) > radius_sq {
                continue;
            }
            let pixel = overlay.get_pixel_mut(x, y);
            *pixel = if segment.style.erase {
                TRANSPARENT
            } else {
                blend_over(*pixel, segment.style.color)
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

    fn red_brush(size: u32) -> StrokeState {
        let mut state = StrokeState::default();
        state.set_color(RED);
        state.set_brush_size(size);
        state
    }

    fn painted(canvas: &PixelCanvas) -> usize {
        canvas.overlay().pixels().filter(|p| p[3] != 0).count()
    }

    #[test]
    fn test_map_identity_when_sizes_match() {
        let p = map_to_canvas(Pos2::new(100.0, 42.0), Vec2::new(800.0, 600.0), (800, 600));
        assert_eq!(p, CanvasPoint::new(100, 42));
    }

    #[test]
    fn test_map_scales_axes_independently() {
        let p = map_to_canvas(Pos2::new(50.0, 50.0), Vec2::new(100.0, 200.0), (400, 100));
        assert_eq!(p, CanvasPoint::new(200, 25));
    }

    #[test]
    fn test_map_with_empty_display_is_identity() {
        let p = map_to_canvas(Pos2::new(7.0, 9.0), Vec2::ZERO, (400, 100));
        assert_eq!(p, CanvasPoint::new(7, 9));
    }

    #[test]
    fn test_begin_stroke_draws_nothing() {
        let mut canvas = PixelCanvas::create(20, 20).unwrap();
        let mut state = red_brush(5);
        StrokeRasterizer::new(&mut canvas, &mut state).begin_stroke(CanvasPoint::new(10, 10));
        assert!(canvas.overlay_is_blank());
        assert_eq!(state.last_point(), Some(CanvasPoint::new(10, 10)));
    }

    #[test]
    fn test_brush_size_one_covers_single_pixel() {
        let mut canvas = PixelCanvas::create(5, 5).unwrap();
        let mut state = red_brush(1);
        StrokeRasterizer::new(&mut canvas, &mut state).continue_stroke(CanvasPoint::new(2, 2));
        assert_eq!(painted(&canvas), 1);
        assert_eq!(*canvas.overlay().get_pixel(2, 2), RED);
    }

    #[test]
    fn test_continue_without_anchor_stamps_dot() {
        let mut canvas = PixelCanvas::create(20, 20).unwrap();
        let mut state = red_brush(5);
        StrokeRasterizer::new(&mut canvas, &mut state).continue_stroke(CanvasPoint::new(10, 10));
        // radius 2.5: offsets with dx^2 + dy^2 <= 6.25
        assert_eq!(painted(&canvas), 21);
        assert_eq!(state.last_point(), Some(CanvasPoint::new(10, 10)));
    }

    #[test]
    fn test_line_and_dot_span_exactly_brush_size() {
        for size in 1..=20 {
            let mut canvas = PixelCanvas::create(60, 60).unwrap();
            let mut state = red_brush(size);
            let mut raster = StrokeRasterizer::new(&mut canvas, &mut state);
            raster.begin_stroke(CanvasPoint::new(10, 20));
            raster.continue_stroke(CanvasPoint::new(40, 20));
            raster.end_stroke();
            let rows = (0..60).filter(|&y| canvas.overlay().get_pixel(25, y)[3] != 0).count();
            assert_eq!(rows, size as usize, "line rows for size {}", size);

            let mut canvas = PixelCanvas::create(60, 60).unwrap();
            let mut state = red_brush(size);
            let mut raster = StrokeRasterizer::new(&mut canvas, &mut state);
            raster.continue_stroke(CanvasPoint::new(30, 30));
            let overlay = canvas.overlay();
            let painted_x: Vec<u32> = (0..60)
                .filter(|&x| (0..60).any(|y| overlay.get_pixel(x, y)[3] != 0))
                .collect();
            let painted_y: Vec<u32> = (0..60)
                .filter(|&y| (0..60).any(|x| overlay.get_pixel(x, y)[3] != 0))
                .collect();
            assert_eq!(painted_x.len(), size as usize, "dot width for size {}", size);
            assert_eq!(painted_y.len(), size as usize, "dot height for size {}", size);
            assert!(painted_x.contains(&30) && painted_y.contains(&30));
        }
    }

    #[test]
    fn test_size_two_dot_is_two_by_two() {
        let mut canvas = PixelCanvas::create(10, 10).unwrap();
        let mut state = red_brush(2);
        StrokeRasterizer::new(&mut canvas, &mut state).continue_stroke(CanvasPoint::new(5, 5));
        assert_eq!(painted(&canvas), 4);
        for (x, y) in [(4, 4), (5, 4), (4, 5), (5, 5)] {
            assert_eq!(*canvas.overlay().get_pixel(x, y), RED);
        }
    }

    #[test]
    fn test_dot_near_edge_is_clipped() {
        let mut canvas = PixelCanvas::create(10, 10).unwrap();
        let mut state = red_brush(5);
        StrokeRasterizer::new(&mut canvas, &mut state).continue_stroke(CanvasPoint::new(0, 0));
        // only the quadrant with x >= 0 and y >= 0 survives
        assert_eq!(painted(&canvas), 8);
    }

    #[test]
    fn test_erase_overwrites_instead_of_blending() {
        let mut canvas = PixelCanvas::create(10, 10).unwrap();
        let mut state = red_brush(9);
        let mut raster = StrokeRasterizer::new(&mut canvas, &mut state);
        raster.continue_stroke(CanvasPoint::new(5, 5));
        raster.state.set_erase_mode(true);
        raster.state.set_brush_size(1);
        raster.continue_stroke(CanvasPoint::new(5, 5));
        assert_eq!(*canvas.overlay().get_pixel(5, 5), TRANSPARENT);
        assert_eq!(*canvas.overlay().get_pixel(4, 5), RED);
    }

    #[test]
    fn test_segment_entirely_off_canvas_is_ignored() {
        let mut canvas = PixelCanvas::create(10, 10).unwrap();
        let style = red_brush(3).style();
        draw_segment(
            &mut canvas,
            &StrokeSegment {
                from: CanvasPoint::new(-50, -50),
                to: CanvasPoint::new(-40, -60),
                style,
            },
        );
        assert!(canvas.overlay_is_blank());
    }
}
