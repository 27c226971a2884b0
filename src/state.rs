use crate::stroke::CanvasPoint;

/// Pointer-drag state of the canvas controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Drawing {
        /// Where the pointer went down, in canvas space
        origin: CanvasPoint,
    },
}

impl DragState {
    pub fn is_drawing(&self) -> bool {
        matches!(self, Self::Drawing { .. })
    }
}
