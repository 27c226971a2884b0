use eframe::egui::{self, Color32, Slider};
use image::Rgba;

use crate::PaintApp;
use crate::dimensions::CanvasSizeChoice;
use crate::panels::Dialog;

/// Bottom bar: file buttons, eraser, color swatches, brush size and resize.
pub fn tools_panel(app: &mut PaintApp, ctx: &egui::Context) {
    egui::TopBottomPanel::bottom("tools_panel").show(ctx, |ui| {
        ui.horizontal_wrapped(|ui| {
            if ui.button("Load Image").clicked() {
                app.dialog = Some(Dialog::Load { path: String::new() });
            }
            if ui.button("Save Image").clicked() {
                app.dialog = Some(Dialog::SaveFormat {
                    format: Default::default(),
                });
            }

            let erasing = app.controller.stroke().erase_mode();
            if ui.selectable_label(erasing, "Eraser").clicked() {
                app.controller.activate_eraser();
            }

            ui.separator();

            let palette = app.controller.config().palette.clone();
            let current = app.controller.stroke().color();
            for [r, g, b, a] in palette {
                let fill = Color32::from_rgba_unmultiplied(r, g, b, a);
                let selected = !erasing && current == Rgba([r, g, b, a]);
                let button = egui::Button::new("")
                    .fill(fill)
                    .min_size(egui::vec2(24.0, 24.0))
                    .selected(selected);
                if ui.add(button).clicked() {
                    app.controller.set_color(Rgba([r, g, b, a]));
                }
            }

            ui.separator();

            let mut size = app.controller.stroke().brush_size();
            let range = app.controller.stroke().brush_range();
            if ui.add(Slider::new(&mut size, range).text("Brush")).changed() {
                app.controller.set_brush_size(size);
            }

            ui.separator();

            if ui.button("Resize").clicked() {
                let (width, height) = app.controller.config().default_canvas_size;
                app.dialog = Some(Dialog::Resize {
                    choice: CanvasSizeChoice::default(),
                    width: width.to_string(),
                    height: height.to_string(),
                });
            }

            let (width, height) = app.controller.canvas().dimensions();
            ui.label(format!("{}x{}", width, height));
        });
    });
}
