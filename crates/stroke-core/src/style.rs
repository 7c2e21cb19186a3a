//! Stroke appearance parameters with validating setters.

use crate::color::Rgba;

/// Default minimum stroke width (full thickness, logical px).
pub const DEFAULT_STROKE_WIDTH_MIN: f32 = 1.5;

/// Default maximum stroke width (full thickness, logical px).
pub const DEFAULT_STROKE_WIDTH_MAX: f32 = 6.0;

/// Stroke color and the dynamic width range driven by gesture velocity.
///
/// Widths are full thicknesses; the geometry pipeline works in half-widths
/// (`width / 2` offsets perpendicular to the stroke direction).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeStyle {
    color: Rgba,
    width_min: f32,
    width_max: f32,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: Rgba::from_srgba_u8([0, 0, 0, 255]),
            width_min: DEFAULT_STROKE_WIDTH_MIN,
            width_max: DEFAULT_STROKE_WIDTH_MAX,
        }
    }
}

impl StrokeStyle {
    pub fn color(&self) -> Rgba {
        self.color
    }

    pub fn set_color(&mut self, color: Rgba) {
        self.color = color;
    }

    pub fn width_min(&self) -> f32 {
        self.width_min
    }

    pub fn width_max(&self) -> f32 {
        self.width_max
    }

    /// Set the minimum width. Clamped to be non-negative and ≤ the maximum.
    pub fn set_width_min(&mut self, width: f32) {
        self.width_min = width.max(0.0).min(self.width_max);
    }

    /// Set the maximum width. Clamped to be ≥ the minimum.
    pub fn set_width_max(&mut self, width: f32) {
        self.width_max = width.max(self.width_min);
    }

    /// Set both widths at once. The pair is sanitized against itself, not
    /// against the previous values, so a range narrower than the old one is
    /// taken as given; the maximum wins when the pair is inverted.
    pub fn set_widths(&mut self, width_min: f32, width_max: f32) {
        self.width_max = width_max.max(0.0);
        self.width_min = width_min.clamp(0.0, self.width_max);
    }

    pub fn half_width_min(&self) -> f32 {
        self.width_min / 2.0
    }

    pub fn half_width_max(&self) -> f32 {
        self.width_max / 2.0
    }
}
