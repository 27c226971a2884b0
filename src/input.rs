use egui::{Pos2, Rect, Response, Sense, Vec2};

/// Where a pointer event happened, relative to the on-screen canvas widget
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputLocation {
    /// Position relative to the canvas widget's top-left corner
    pub position: Pos2,
    /// Current on-screen size of the canvas widget
    pub display_size: Vec2,
}

impl InputLocation {
    pub fn new(position: Pos2, display_size: Vec2) -> Self {
        Self {
            position,
            display_size,
        }
    }

    /// Build a location from an absolute screen position and the widget rect.
    pub fn from_screen(screen_pos: Pos2, canvas_rect: Rect) -> Self {
        Self {
            position: (screen_pos - canvas_rect.min).to_pos2(),
            display_size: canvas_rect.size(),
        }
    }
}

/// Pointer events the canvas controller reacts to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Primary button pressed over the canvas
    PointerDown { location: InputLocation },
    /// Pointer moved while the primary button is held
    PointerMove { location: InputLocation },
    /// Primary button released
    PointerUp { location: InputLocation },
}

/// How the canvas widget senses the pointer.
///
/// Drag only: the press itself starts the drag, so a stroke begins exactly where
/// the button went down and a plain click arrives as a start and a stop.
pub fn canvas_sense() -> Sense {
    Sense::drag()
}

/// Translates the canvas widget's drag response into `InputEvent`s.
#[derive(Debug, Default)]
pub struct InputHandler {
    last_pointer_pos: Option<Pos2>,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn process_response(&mut self, response: &Response) -> Vec<InputEvent> {
        let mut events = Vec::new();
        let rect = response.rect;
        let pointer = response.interact_pointer_pos().or(self.last_pointer_pos);

        if response.drag_started() {
            if let Some(pos) = pointer {
                events.push(InputEvent::PointerDown {
                    location: InputLocation::from_screen(pos, rect),
                });
                self.last_pointer_pos = Some(pos);
            }
        }

        if response.dragged() {
            if let Some(pos) = response.interact_pointer_pos() {
                if Some(pos) != self.last_pointer_pos {
                    events.push(InputEvent::PointerMove {
                        location: InputLocation::from_screen(pos, rect),
                    });
                }
                self.last_pointer_pos = Some(pos);
            }
        }

        if response.drag_stopped() {
            if let Some(pos) = pointer {
                events.push(InputEvent::PointerUp {
                    location: InputLocation::from_screen(pos, rect),
                });
            }
            self.last_pointer_pos = None;
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_is_relative_to_canvas_rect() {
        let rect = Rect::from_min_size(Pos2::new(20.0, 30.0), Vec2::new(400.0, 300.0));
        let location = InputLocation::from_screen(Pos2::new(120.0, 60.0), rect);
        assert_eq!(location.position, Pos2::new(100.0, 30.0));
        assert_eq!(location.display_size, Vec2::new(400.0, 300.0));
    }

    // Feed one frame of raw pointer events through a canvas-sized widget.
    fn run_frame(
        ctx: &egui::Context,
        handler: &mut InputHandler,
        canvas: Rect,
        events: Vec<egui::Event>,
    ) -> Vec<InputEvent> {
        let input = egui::RawInput {
            screen_rect: Some(Rect::from_min_size(Pos2::ZERO, Vec2::new(400.0, 300.0))),
            events,
            ..Default::default()
        };
        let mut out = Vec::new();
        let _ = ctx.run(input, |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                let response = ui.interact(canvas, egui::Id::new("canvas"), canvas_sense());
                out.extend(handler.process_response(&response));
            });
        });
        out
    }

    fn button(pos: Pos2, pressed: bool) -> egui::Event {
        egui::Event::PointerButton {
            pos,
            button: egui::PointerButton::Primary,
            pressed,
            modifiers: egui::Modifiers::NONE,
        }
    }

    #[test]
    fn test_click_without_movement_starts_at_press_position() {
        let ctx = egui::Context::default();
        let mut handler = InputHandler::new();
        let canvas = Rect::from_min_size(Pos2::new(50.0, 40.0), Vec2::new(200.0, 100.0));
        let press = Pos2::new(60.0, 45.0);

        let mut events = run_frame(&ctx, &mut handler, canvas, vec![]);
        let hover = vec![egui::Event::PointerMoved(press)];
        events.extend(run_frame(&ctx, &mut handler, canvas, hover));
        events.extend(run_frame(&ctx, &mut handler, canvas, vec![button(press, true)]));
        events.extend(run_frame(&ctx, &mut handler, canvas, vec![button(press, false)]));
        events.extend(run_frame(&ctx, &mut handler, canvas, vec![]));

        let location = InputLocation::new(Pos2::new(10.0, 5.0), Vec2::new(200.0, 100.0));
        assert_eq!(
            events,
            vec![InputEvent::PointerDown { location }, InputEvent::PointerUp { location }]
        );
    }
}
