//! Error types for the stroke canvas.

use thiserror::Error;

/// Result type for canvas operations.
pub type Result<T> = std::result::Result<T, CanvasError>;

/// Errors that can occur while setting up or reading back the canvas.
#[derive(Error, Debug)]
pub enum CanvasError {
    /// The rendering surface/context could not be created. Fatal to this
    /// canvas instance; no drawing operation is valid until it is recreated.
    #[error("graphics initialization failed: {0}")]
    GraphicsInit(String),

    /// Snapshot readback from the GPU failed.
    #[error("snapshot readback failed: {0}")]
    Readback(String),
}
