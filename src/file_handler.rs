use std::fs;
use std::path::{Path, PathBuf};

use eframe::egui;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, Rgba, RgbaImage};

use crate::compositor::flatten_for_opaque_format;
use crate::config::PaintConfig;
use crate::error::{CanvasError, CanvasResult};

/// Formats the save dialog offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Png,
    Jpg,
}

impl ExportFormat {
    pub const ALL: [Self; 2] = [Self::Png, Self::Jpg];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Png => "PNG",
            Self::Jpg => "JPG",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpg => "jpg",
        }
    }
}

/// A decoded image as straight RGBA8, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl DecodedImage {
    pub fn from_rgba(image: RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            pixels: image.into_raw(),
            width,
            height,
        }
    }
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// Reject paths whose extension is not in the configured allow-list.
pub fn check_extension(path: &Path, config: &PaintConfig) -> CanvasResult<()> {
    let ext = extension_of(path);
    if config.is_allowed_extension(&ext) {
        Ok(())
    } else {
        Err(CanvasError::UnsupportedFileType(path.display().to_string()))
    }
}

/// Check the extension, read the file and decode it.
pub fn decode_image_file(path: &Path, config: &PaintConfig) -> CanvasResult<DecodedImage> {
    check_extension(path, config)?;
    let bytes =
        fs::read(path).map_err(|e| CanvasError::Decode(format!("{}: {}", path.display(), e)))?;
    log::info!("Processing image from path: {}", path.display());
    decode_image_bytes(&bytes)
}

pub fn decode_image_bytes(bytes: &[u8]) -> CanvasResult<DecodedImage> {
    let image = image::load_from_memory(bytes).map_err(|e| CanvasError::Decode(e.to_string()))?;
    log::debug!("Successfully decoded image: {}x{}", image.width(), image.height());
    Ok(DecodedImage::from_rgba(image.to_rgba8()))
}

/// Encode a composited image. Formats without alpha are flattened over the
/// configured background first.
pub fn encode_image(
    image: &RgbaImage,
    format: ExportFormat,
    config: &PaintConfig,
) -> CanvasResult<Vec<u8>> {
    let (width, height) = image.dimensions();
    let mut bytes = Vec::new();

    match format {
        ExportFormat::Png => {
            PngEncoder::new(&mut bytes)
                .write_image(image.as_raw(), width, height, ExtendedColorType::Rgba8)
                .map_err(|e| CanvasError::Encode(e.to_string()))?;
        }
        ExportFormat::Jpg => {
            let flat = flatten_for_opaque_format(image, Rgba(config.flatten_background));
            JpegEncoder::new_with_quality(&mut bytes, config.jpeg_quality)
                .write_image(flat.as_raw(), width, height, ExtendedColorType::Rgb8)
                .map_err(|e| CanvasError::Encode(e.to_string()))?;
        }
    }

    Ok(bytes)
}

/// Path the export is written to: the chosen path with the format's extension appended
/// unless it already carries it.
pub fn output_path(selected: &Path, format: ExportFormat) -> PathBuf {
    let ext = extension_of(selected);
    let wanted = format.extension();
    if ext == wanted || (format == ExportFormat::Jpg && ext == "jpeg") {
        return selected.to_path_buf();
    }
    let mut name = selected.as_os_str().to_owned();
    name.push(".");
    name.push(wanted);
    PathBuf::from(name)
}

pub fn save_bytes(path: &Path, bytes: &[u8]) -> CanvasResult<()> {
    fs::write(path, bytes).map_err(|e| CanvasError::Encode(format!("{}: {}", path.display(), e)))
}

fn drop_preview_text(hovered: usize) -> Option<String> {
    match hovered {
        0 => None,
        1 => Some("Drop to open image".to_owned()),
        n => Some(format!("Drop to open the first of {} files", n)),
    }
}

/// Collects files dropped onto the window and decodes the first image among them.
#[derive(Debug, Default)]
pub struct FileHandler {
    dropped_files: Vec<egui::DroppedFile>,
}

impl FileHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if new files were dropped this frame
    pub fn check_for_dropped_files(&mut self, ctx: &egui::Context) -> bool {
        let mut new_dropped_files = false;

        ctx.input(|i| {
            if !i.raw.dropped_files.is_empty() {
                self.dropped_files = i.raw.dropped_files.clone();
                new_dropped_files = true;
            }
        });

        new_dropped_files
    }

    /// Decode the first dropped file. The rest are ignored because the canvas
    /// holds a single base image.
    pub fn take_dropped_image(
        &mut self,
        config: &PaintConfig,
    ) -> Option<CanvasResult<DecodedImage>> {
        let files = std::mem::take(&mut self.dropped_files);
        let file = files.into_iter().next()?;

        if let Some(path) = &file.path {
            return Some(decode_image_file(path, config));
        }

        let name = Path::new(&file.name);
        if let Err(err) = check_extension(name, config) {
            log::warn!("Dropped file is not a supported type: {}", file.name);
            return Some(Err(err));
        }
        match &file.bytes {
            Some(bytes) => {
                log::info!("Processing image from memory: {} ({} bytes)", file.name, bytes.len());
                Some(decode_image_bytes(bytes))
            }
            None => {
                log::warn!("Dropped file has no accessible data: {}", file.name);
                None
            }
        }
    }

    /// Dim the window while an image is dragged over it.
    pub fn preview_files_being_dropped(&self, ctx: &egui::Context) {
        use egui::{Align2, Color32, FontId, Id, LayerId, Order};

        let hovered = ctx.input(|i| i.raw.hovered_files.len());
        let Some(text) = drop_preview_text(hovered) else {
            return;
        };

        let layer = LayerId::new(Order::Foreground, Id::new("file_drop_target"));
        let painter = ctx.layer_painter(layer);
        let screen_rect = ctx.screen_rect();
        painter.rect_filled(screen_rect, 0.0, Color32::from_black_alpha(192));
        painter.text(
            screen_rect.center(),
            Align2::CENTER_CENTER,
            text,
            FontId::proportional(24.0),
            Color32::WHITE,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_extension_is_rejected_before_reading() {
        let config = PaintConfig::default();
        let result = decode_image_file(Path::new("/definitely/missing/picture.gif"), &config);
        assert!(matches!(result, Err(CanvasError::UnsupportedFileType(_))));
    }

    #[test]
    fn test_missing_file_is_a_decode_error() {
        let config = PaintConfig::default();
        let result = decode_image_file(Path::new("/definitely/missing/picture.PNG"), &config);
        assert!(matches!(result, Err(CanvasError::Decode(_))));
    }

    #[test]
    fn test_garbage_bytes_fail_to_decode() {
        assert!(matches!(decode_image_bytes(b"not an image"), Err(CanvasError::Decode(_))));
    }

    #[test]
    fn test_output_path_appends_extension() {
        let out = |path: &str, format| output_path(Path::new(path), format);
        assert_eq!(out("out/drawing", ExportFormat::Png), PathBuf::from("out/drawing.png"));
        assert_eq!(out("drawing.png", ExportFormat::Png), PathBuf::from("drawing.png"));
        assert_eq!(out("drawing.jpeg", ExportFormat::Jpg), PathBuf::from("drawing.jpeg"));
        assert_eq!(out("drawing.png", ExportFormat::Jpg), PathBuf::from("drawing.png.jpg"));
    }

    #[test]
    fn test_drop_preview_text() {
        assert_eq!(drop_preview_text(0), None);
        assert_eq!(drop_preview_text(1).as_deref(), Some("Drop to open image"));
        assert_eq!(
            drop_preview_text(3).as_deref(),
            Some("Drop to open the first of 3 files")
        );
    }

    #[test]
    fn test_png_keeps_alpha() {
        let mut image = RgbaImage::new(3, 2);
        image.put_pixel(1, 1, Rgba([1, 2, 3, 4]));
        let bytes = encode_image(&image, ExportFormat::Png, &PaintConfig::default()).unwrap();
        let decoded = decode_image_bytes(&bytes).unwrap();
        assert_eq!(decoded, DecodedImage::from_rgba(image));
    }

    #[test]
    fn test_jpg_has_no_alpha_channel() {
        let image = RgbaImage::new(8, 8);
        let bytes = encode_image(&image, ExportFormat::Jpg, &PaintConfig::default()).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert!(!decoded.color().has_alpha());
        assert_eq!((decoded.width(), decoded.height()), (8, 8));
    }
}
