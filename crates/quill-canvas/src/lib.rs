//! quill-canvas: GPU-backed stroke canvas for signature capture.
//!
//! Owns the committed ribbon geometry for the in-progress and completed
//! stroke, draws it each frame, and supports erase and snapshot-to-bitmap
//! with a transparent background.

pub use wgpu;

mod canvas;
mod error;
mod mesh_store;
mod pipeline;
mod snapshot;

pub use canvas::StrokeCanvas;
pub use error::{CanvasError, Result};
pub use mesh_store::MeshStore;
pub use pipeline::StrokeRenderer;
