//! stroke-core: geometry engine for single-stroke signature capture.
//!
//! Converts a time-ordered stream of pointer samples into a renderable
//! variable-width triangle ribbon, plus the pan-threshold gesture filter
//! that separates taps and long-presses from the start of a stroke. No GPU
//! types beyond the `bytemuck`-compatible vertex layout live here; the
//! actual rendering is in `quill-canvas`.

pub mod color;
pub mod geom;
pub mod gesture;
pub mod ribbon;
pub mod sampler;
pub mod style;

pub use color::Rgba;
pub use geom::{Point, Transform2D};
pub use gesture::{
    DISTANCE_TO_RECOGNIZE_DEFAULT, DISTANCE_TO_RECOGNIZE_MIN, LONG_PRESS_DURATION,
    LONG_PRESS_SLOP, LongPressRecognizer, PanPhase, PanRecognizer,
};
pub use ribbon::{RibbonMeshBuilder, RibbonVertex, SegmentMesh};
pub use sampler::{Segment, StrokePoint, StrokeSampler, TouchSample};
pub use style::{DEFAULT_STROKE_WIDTH_MAX, DEFAULT_STROKE_WIDTH_MIN, StrokeStyle};
