use thiserror::Error;

/// Errors surfaced by canvas, file and export operations.
///
/// None of these are fatal: callers report them to the user and the canvas
/// keeps whatever state it had before the failing call.
#[derive(Debug, Error)]
pub enum CanvasError {
    #[error("Invalid canvas dimension {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Failed to encode image: {0}")]
    Encode(String),

    #[error("Layer size mismatch: base is {base:?}, overlay is {overlay:?}")]
    DimensionMismatch {
        base: (u32, u32),
        overlay: (u32, u32),
    },

    #[error("Pixel buffer holds {actual} bytes, expected {expected}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type CanvasResult<T> = Result<T, CanvasError>;
