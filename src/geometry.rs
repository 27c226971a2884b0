use crate::stroke::CanvasPoint;

/// Squared distance from `(px, py)` to the segment `start..end`, all in continuous
/// canvas coordinates where pixel `(x, y)` spans `[x, x + 1) x [y, y + 1)`.
pub(crate) fn distance_sq_to_segment(
    px: f64,
    py: f64,
    start: (f64, f64),
    end: (f64, f64),
) -> f64 {
    let (sx, sy) = start;
    let (dx, dy) = (end.0 - sx, end.1 - sy);
    let (vx, vy) = (px - sx, py - sy);

    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return vx * vx + vy * vy;
    }

    let t = ((vx * dx + vy * dy) / len_sq).clamp(0.0, 1.0);
    let (ox, oy) = (vx - dx * t, vy - dy * t);
    ox * ox + oy * oy
}

/// Inclusive pixel bounds of a segment padded by `radius`, clipped to `width` x `height`.
///
/// Returns `None` when nothing of the padded segment lies on the canvas.
pub(crate) fn clipped_bounds(
    start: CanvasPoint,
    end: CanvasPoint,
    radius: f64,
    width: u32,
    height: u32,
) -> Option<(u32, u32, u32, u32)> {
    let pad = radius.ceil() as i64;
    let min_x = i64::from(start.x.min(end.x)) - pad;
    let min_y = i64::from(start.y.min(end.y)) - pad;
    let max_x = i64::from(start.x.max(end.x)) + pad;
    let max_y = i64::from(start.y.max(end.y)) + pad;

    let (w, h) = (i64::from(width), i64::from(height));
    if max_x < 0 || max_y < 0 || min_x >= w || min_y >= h {
        return None;
    }

    Some((
        min_x.max(0) as u32,
        min_y.max(0) as u32,
        max_x.min(w - 1) as u32,
        max_y.min(h - 1) as u32,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_to_degenerate_segment() {
        let p = (2.0, 2.0);
        assert_eq!(distance_sq_to_segment(5.0, 6.0, p, p), 25.0);
    }

    #[test]
    fn test_distance_past_segment_end_uses_endpoint() {
        let (a, b) = ((0.0, 0.0), (10.0, 0.0));
        assert_eq!(distance_sq_to_segment(5.0, 3.0, a, b), 9.0);
        assert_eq!(distance_sq_to_segment(13.0, 4.0, a, b), 25.0);
        assert_eq!(distance_sq_to_segment(-3.0, 0.0, a, b), 9.0);
        assert_eq!(distance_sq_to_segment(4.5, 0.5, a, b), 0.25);
    }

    #[test]
    fn test_bounds_are_clipped() {
        let a = CanvasPoint::new(-5, 2);
        let b = CanvasPoint::new(3, 50);
        assert_eq!(clipped_bounds(a, b, 2.5, 10, 10), Some((0, 0, 6, 9)));
        let off = CanvasPoint::new(-20, -20);
        assert_eq!(clipped_bounds(off, off, 2.5, 10, 10), None);
    }
}
