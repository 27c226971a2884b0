use std::path::PathBuf;

use eframe::egui;

use crate::dimensions::{CanvasSizeChoice, ResolvedSize, resolve_choice};
use crate::file_handler::ExportFormat;

/// The modal dialog currently shown, if any.
#[derive(Debug, Clone, PartialEq)]
pub enum Dialog {
    Load { path: String },
    SaveFormat { format: ExportFormat },
    SavePath { format: ExportFormat, path: String },
    Resize {
        choice: CanvasSizeChoice,
        width: String,
        height: String,
    },
    Message { title: String, text: String },
}

impl Dialog {
    pub fn message(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Message {
            title: title.into(),
            text: text.into(),
        }
    }

    fn title(&self) -> &str {
        match self {
            Self::Load { .. } => "Load Image",
            Self::SaveFormat { .. } | Self::SavePath { .. } => "Save Image",
            Self::Resize { .. } => "Canvas Size",
            Self::Message { title, .. } => title,
        }
    }
}

/// What the user confirmed in a dialog.
#[derive(Debug, Clone, PartialEq)]
pub enum DialogAction {
    Load(PathBuf),
    Save { path: PathBuf, format: ExportFormat },
    Resize(ResolvedSize),
}

enum Outcome {
    Open,
    Cancel,
    Next(Dialog),
    Done(DialogAction),
}

/// Show the open dialog and return the confirmed action, if any.
///
/// Cancelling closes the dialog and changes nothing.
pub fn show_dialog(ctx: &egui::Context, dialog: &mut Option<Dialog>) -> Option<DialogAction> {
    let current = dialog.as_mut()?;
    let title = current.title().to_owned();

    let mut outcome = Outcome::Open;
    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .show(ctx, |ui| {
            outcome = dialog_contents(ui, current);
        });

    match outcome {
        Outcome::Open => None,
        Outcome::Cancel => {
            *dialog = None;
            None
        }
        Outcome::Next(next) => {
            *dialog = Some(next);
            None
        }
        Outcome::Done(action) => {
            *dialog = None;
            Some(action)
        }
    }
}

fn ok_cancel(ui: &mut egui::Ui) -> (bool, bool) {
    ui.horizontal(|ui| (ui.button("OK").clicked(), ui.button("Cancel").clicked()))
        .inner
}

fn dialog_contents(ui: &mut egui::Ui, dialog: &mut Dialog) -> Outcome {
    match dialog {
        Dialog::Load { path } => {
            ui.label("Image file (jpg, jpeg, png, bmp):");
            ui.text_edit_singleline(path);
            match ok_cancel(ui) {
                (true, _) if !path.trim().is_empty() => {
                    Outcome::Done(DialogAction::Load(PathBuf::from(path.trim())))
                }
                (_, true) => Outcome::Cancel,
                _ => Outcome::Open,
            }
        }
        Dialog::SaveFormat { format } => {
            ui.label("Choose format:");
            egui::ComboBox::from_id_salt("save_format")
                .selected_text(format.label())
                .show_ui(ui, |ui| {
                    for option in ExportFormat::ALL {
                        ui.selectable_value(format, option, option.label());
                    }
                });
            match ok_cancel(ui) {
                (true, _) => Outcome::Next(Dialog::SavePath {
                    format: *format,
                    path: String::new(),
                }),
                (_, true) => Outcome::Cancel,
                _ => Outcome::Open,
            }
        }
        Dialog::SavePath { format, path } => {
            ui.label(format!("Save as {} to:", format.label()));
            ui.text_edit_singleline(path);
            match ok_cancel(ui) {
                (true, _) if !path.trim().is_empty() => Outcome::Done(DialogAction::Save {
                    path: PathBuf::from(path.trim()),
                    format: *format,
                }),
                (_, true) => Outcome::Cancel,
                _ => Outcome::Open,
            }
        }
        Dialog::Resize { choice, width, height } => {
            ui.label("Choose canvas size:");
            egui::ComboBox::from_id_salt("canvas_size")
                .selected_text(choice.label())
                .show_ui(ui, |ui| {
                    for option in CanvasSizeChoice::ALL {
                        ui.selectable_value(choice, option, option.label());
                    }
                });
            if *choice == CanvasSizeChoice::Custom {
                ui.horizontal(|ui| {
                    ui.label("Width:");
                    ui.text_edit_singleline(width);
                });
                ui.horizontal(|ui| {
                    ui.label("Height:");
                    ui.text_edit_singleline(height);
                });
            }
            match ok_cancel(ui) {
                (true, _) => {
                    Outcome::Done(DialogAction::Resize(resolve_choice(*choice, width, height)))
                }
                (_, true) => Outcome::Cancel,
                _ => Outcome::Open,
            }
        }
        Dialog::Message { text, .. } => {
            ui.label(text.as_str());
            if ui.button("OK").clicked() {
                Outcome::Cancel
            } else {
                Outcome::Open
            }
        }
    }
}
