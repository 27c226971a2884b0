use std::path::Path;

use image::Rgba;
use serde::{Deserialize, Serialize};

use crate::config::PaintConfig;
use crate::controller::CanvasController;
use crate::error::{CanvasError, CanvasResult};
use crate::file_handler::{ExportFormat, FileHandler};
use crate::input::InputHandler;
use crate::panels::{self, Dialog, DialogAction};
use crate::renderer::CanvasRenderer;

/// Settings restored when the app restarts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct PersistedSettings {
    pub config: PaintConfig,
    pub brush_size: u32,
    pub color: [u8; 4],
}

impl Default for PersistedSettings {
    fn default() -> Self {
        let config = PaintConfig::default();
        Self {
            brush_size: config.default_brush_size,
            color: config.palette.first().copied().unwrap_or([0, 0, 0, 255]),
            config,
        }
    }
}

pub struct PaintApp {
    pub(crate) controller: CanvasController,
    pub(crate) renderer: CanvasRenderer,
    pub(crate) input: InputHandler,
    pub(crate) files: FileHandler,
    pub(crate) dialog: Option<Dialog>,
}

impl PaintApp {
    /// Called once before the first frame.
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: Option<PaintConfig>,
    ) -> CanvasResult<Self> {
        let mut settings: PersistedSettings = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();
        if let Some(config) = config {
            settings.config = config;
        }
        Self::from_settings(settings)
    }

    pub fn from_settings(settings: PersistedSettings) -> CanvasResult<Self> {
        let config = match settings.config.validate() {
            Ok(()) => settings.config,
            Err(err) => {
                log::warn!("Ignoring stored config: {}", err);
                PaintConfig::default()
            }
        };

        let mut controller = CanvasController::new(config)?;
        controller.set_brush_size(settings.brush_size);
        controller.set_color(Rgba(settings.color));

        Ok(Self {
            controller,
            renderer: CanvasRenderer::new(),
            input: InputHandler::new(),
            files: FileHandler::new(),
            dialog: None,
        })
    }

    pub fn settings(&self) -> PersistedSettings {
        let stroke = self.controller.stroke();
        PersistedSettings {
            config: self.controller.config().clone(),
            brush_size: stroke.brush_size(),
            color: stroke.color().0,
        }
    }

    pub fn controller(&self) -> &CanvasController {
        &self.controller
    }

    fn load(&mut self, path: &Path) {
        match self.controller.open_file(path) {
            Ok(()) => {}
            Err(err @ CanvasError::UnsupportedFileType(_)) => {
                log::warn!("{}", err);
                self.dialog = Some(Dialog::message(
                    "File Load Error",
                    "Error: Unsupported file type. Please select an image file.",
                ));
            }
            Err(err) => {
                log::error!("{}", err);
                self.dialog = Some(Dialog::message("File Load Error", "Error loading image."));
            }
        }
    }

    fn save(&mut self, path: &Path, format: ExportFormat) {
        self.dialog = Some(match self.controller.save_to(path, format) {
            Ok(_) => Dialog::message("Save Image", "Image saved successfully."),
            Err(err) => {
                log::error!("{}", err);
                Dialog::message("Save Image", "Error saving image.")
            }
        });
    }

    fn apply(&mut self, action: DialogAction) {
        match action {
            DialogAction::Load(path) => self.load(&path),
            DialogAction::Save { path, format } => self.save(&path, format),
            DialogAction::Resize(size) => {
                if size.fell_back {
                    self.dialog = Some(Dialog::message(
                        "Canvas Size",
                        "Invalid input. Default size (800x600) will be used.",
                    ));
                }
                if let Err(err) = self.controller.resize_canvas(size.width, size.height) {
                    log::error!("{}", err);
                    self.dialog = Some(Dialog::message("Canvas Size", err.to_string()));
                }
            }
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        self.files.preview_files_being_dropped(ctx);
        if !self.files.check_for_dropped_files(ctx) {
            return;
        }
        let config = self.controller.config().clone();
        match self.files.take_dropped_image(&config) {
            Some(Ok(image)) => {
                if let Err(err) = self.controller.load_decoded(image) {
                    log::error!("{}", err);
                    self.dialog = Some(Dialog::message("File Load Error", "Error loading image."));
                }
            }
            Some(Err(err)) => {
                log::error!("{}", err);
                self.dialog = Some(Dialog::message("File Load Error", err.to_string()));
            }
            None => {}
        }
    }
}

impl eframe::App for PaintApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, &self.settings());
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_dropped_files(ctx);

        panels::tools_panel(self, ctx);
        panels::central_panel(self, ctx);

        if let Some(action) = panels::show_dialog(ctx, &mut self.dialog) {
            self.apply(action);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_round_trip_through_app() {
        let settings = PersistedSettings {
            brush_size: 12,
            color: [255, 0, 0, 255],
            ..PersistedSettings::default()
        };
        let app = PaintApp::from_settings(settings.clone()).unwrap();
        assert_eq!(app.settings(), settings);
    }

    #[test]
    fn test_invalid_stored_config_falls_back() {
        let mut settings = PersistedSettings::default();
        settings.config.jpeg_quality = 0;
        let app = PaintApp::from_settings(settings).unwrap();
        assert_eq!(app.controller().config(), &PaintConfig::default());
    }

    #[test]
    fn test_fallback_resize_shows_message_and_applies_default() {
        let mut app = PaintApp::from_settings(PersistedSettings::default()).unwrap();
        app.controller.resize_canvas(400, 300).unwrap();
        app.apply(DialogAction::Resize(crate::dimensions::resolve_custom("x", "y")));
        assert_eq!(app.controller().canvas().dimensions(), (800, 600));
        assert!(matches!(app.dialog, Some(Dialog::Message { .. })));
    }

    #[test]
    fn test_unsupported_load_shows_error() {
        let mut app = PaintApp::from_settings(PersistedSettings::default()).unwrap();
        app.apply(DialogAction::Load("notes.txt".into()));
        assert_eq!(
            app.dialog,
            Some(Dialog::message(
                "File Load Error",
                "Error: Unsupported file type. Please select an image file."
            ))
        );
    }
}
