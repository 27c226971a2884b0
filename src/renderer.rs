use eframe::egui::{self, Color32, ColorImage, Pos2, Rect, TextureHandle, TextureOptions, Vec2};
use image::RgbaImage;

use crate::controller::CanvasController;
use crate::error::CanvasResult;

/// Keeps the composited canvas in an egui texture and paints it.
#[derive(Default)]
pub struct CanvasRenderer {
    texture: Option<TextureHandle>,
}

impl std::fmt::Debug for CanvasRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanvasRenderer")
            .field("texture", &self.texture.as_ref().map(|t| t.size()))
            .finish()
    }
}

impl CanvasRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn to_color_image(image: &RgbaImage) -> ColorImage {
        let size = [image.width() as usize, image.height() as usize];
        ColorImage::from_rgba_unmultiplied(size, image.as_raw())
    }

    /// Re-upload the composite if the canvas changed since the last upload.
    pub fn update(
        &mut self,
        ctx: &egui::Context,
        controller: &mut CanvasController,
    ) -> CanvasResult<()> {
        if !controller.is_dirty() && self.texture.is_some() {
            return Ok(());
        }

        let image = Self::to_color_image(&controller.composite()?);
        match &mut self.texture {
            Some(texture) => texture.set(image, TextureOptions::NEAREST),
            None => self.texture = Some(ctx.load_texture("canvas", image, TextureOptions::NEAREST)),
        }
        controller.mark_clean();
        Ok(())
    }

    /// Paint the canvas stretched over `rect`.
    pub fn render(&self, painter: &egui::Painter, rect: Rect) {
        painter.rect_filled(rect, 0.0, Color32::WHITE);
        if let Some(texture) = &self.texture {
            let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
            painter.image(texture.id(), rect, uv, Color32::WHITE);
        }
    }
}

/// Largest size with the canvas aspect ratio that fits `available`, never upscaled.
pub fn fit_canvas(canvas_size: (u32, u32), available: Vec2) -> Vec2 {
    let canvas = Vec2::new(canvas_size.0 as f32, canvas_size.1 as f32);
    let scale = (available.x / canvas.x).min(available.y / canvas.y).min(1.0).max(0.0);
    canvas * scale
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_color_image_matches_buffer() {
        let mut image = RgbaImage::new(3, 2);
        image.put_pixel(2, 1, Rgba([255, 0, 0, 255]));
        let color_image = CanvasRenderer::to_color_image(&image);
        assert_eq!(color_image.size, [3, 2]);
        assert_eq!(color_image.pixels[5], Color32::from_rgb(255, 0, 0));
        assert_eq!(color_image.pixels[0], Color32::TRANSPARENT);
    }

    #[test]
    fn test_fit_never_upscales() {
        assert_eq!(fit_canvas((400, 300), Vec2::new(1000.0, 1000.0)), Vec2::new(400.0, 300.0));
    }

    #[test]
    fn test_fit_keeps_aspect_ratio() {
        assert_eq!(fit_canvas((800, 600), Vec2::new(400.0, 600.0)), Vec2::new(400.0, 300.0));
    }
}
