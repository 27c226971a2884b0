use eframe::egui;

use crate::PaintApp;
use crate::input::canvas_sense;
use crate::panels::Dialog;
use crate::renderer::fit_canvas;

pub fn central_panel(app: &mut PaintApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let size = fit_canvas(app.controller.canvas().dimensions(), ui.available_size());
        let (response, painter) = ui.allocate_painter(size, canvas_sense());

        // Dialogs are modal: the canvas ignores the pointer while one is open
        if app.dialog.is_none() {
            for event in app.input.process_response(&response) {
                app.controller.handle_input(event);
            }
        }

        if let Err(err) = app.renderer.update(ctx, &mut app.controller) {
            log::error!("Failed to composite canvas: {}", err);
            app.dialog = Some(Dialog::message("Render Error", err.to_string()));
        }
        app.renderer.render(&painter, response.rect);
    });
}
