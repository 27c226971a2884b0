//! Merges the overlay onto the base layer and flattens images for formats
//! that cannot store alpha.

use image::{Rgb, RgbImage, Rgba, RgbaImage};
use rayon::prelude::*;

use crate::canvas::PixelCanvas;
use crate::error::{CanvasError, CanvasResult};

/// Default background painted under images exported without alpha.
pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Straight-alpha "source over": `top` composited onto `base`.
pub fn blend_over(base: Rgba<u8>, top: Rgba<u8>) -> Rgba<u8> {
    // Fast paths keep untouched and fully covered pixels bit-exact
    if top[3] == 0 {
        return base;
    }
    if top[3] == 255 || base[3] == 0 {
        return top;
    }

    let top_a = f32::from(top[3]) / 255.0;
    let base_a = f32::from(base[3]) / 255.0;
    let out_a = top_a + base_a * (1.0 - top_a);

    let channel = |t: u8, b: u8| -> u8 {
        let t = f32::from(t) / 255.0;
        let b = f32::from(b) / 255.0;
        let c = (t * top_a + b * base_a * (1.0 - top_a)) / out_a;
        (c * 255.0).round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        channel(top[0], base[0]),
        channel(top[1], base[1]),
        channel(top[2], base[2]),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    ])
}

/// Composite `overlay` over `base` into a new buffer of the same size.
pub fn merge(base: &RgbaImage, overlay: &RgbaImage) -> CanvasResult<RgbaImage> {
    if base.dimensions() != overlay.dimensions() {
        return Err(CanvasError::DimensionMismatch {
            base: base.dimensions(),
            overlay: overlay.dimensions(),
        });
    }
    let (width, height) = base.dimensions();
    if width == 0 || height == 0 {
        return Err(CanvasError::InvalidDimension { width, height });
    }

    let mut merged = base.clone();
    let row_len = base.width() as usize * 4;
    merged
        .par_chunks_mut(row_len)
        .zip(overlay.par_chunks(row_len))
        .for_each(|(dst_row, top_row)| {
            for (dst, top) in dst_row.chunks_exact_mut(4).zip(top_row.chunks_exact(4)) {
                let out = blend_over(
                    Rgba([dst[0], dst[1], dst[2], dst[3]]),
                    Rgba([top[0], top[1], top[2], top[3]]),
                );
                dst.copy_from_slice(&out.0);
            }
        });

    Ok(merged)
}

/// Merge both layers of a canvas.
pub fn composite(canvas: &PixelCanvas) -> CanvasResult<RgbaImage> {
    merge(canvas.base(), canvas.overlay())
}

/// Paint `background` (forced opaque) under `image` and drop the alpha channel.
pub fn flatten_for_opaque_format(image: &RgbaImage, background: Rgba<u8>) -> RgbImage {
    let background = Rgba([background[0], background[1], background[2], 255]);
    let (width, height) = image.dimensions();
    let mut flat = RgbImage::new(width, height);
    if width == 0 || height == 0 {
        return flat;
    }

    let src_row = width as usize * 4;
    let dst_row = width as usize * 3;
    flat.par_chunks_mut(dst_row)
        .zip(image.par_chunks(src_row))
        .for_each(|(dst_row, src_row)| {
            for (dst, src) in dst_row.chunks_exact_mut(3).zip(src_row.chunks_exact(4)) {
                let out = blend_over(background, Rgba([src[0], src[1], src[2], src[3]]));
                dst.copy_from_slice(&out.0[..3]);
            }
        });

    flat
}

/// Convenience for callers that only hold an opaque pixel.
pub fn rgb_of(pixel: Rgba<u8>) -> Rgb<u8> {
    Rgb([pixel[0], pixel[1], pixel[2]])
}
