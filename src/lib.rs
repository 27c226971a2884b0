#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod canvas;
pub mod compositor;
pub mod config;
pub mod controller;
pub mod dimensions;
pub mod error;
pub mod file_handler;
mod geometry;
pub mod input;
pub mod panels;
pub mod rasterizer;
pub mod renderer;
pub mod state;
pub mod stroke;

pub use app::PaintApp;
pub use canvas::PixelCanvas;
pub use config::PaintConfig;
pub use controller::CanvasController;
pub use error::{CanvasError, CanvasResult};
pub use file_handler::{DecodedImage, ExportFormat};
pub use input::{InputEvent, InputLocation};
pub use rasterizer::StrokeRasterizer;
pub use renderer::CanvasRenderer;
pub use state::DragState;
pub use stroke::{CanvasPoint, StrokeState};
