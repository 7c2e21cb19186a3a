//! Velocity-driven stroke sampling.
//!
//! Converts the raw stream of timestamped pointer positions for one gesture
//! into [`StrokePoint`]s whose half-widths vary inversely with gesture speed,
//! and hands each new segment out immediately so the mesh can grow
//! incrementally instead of being re-tessellated per frame.

use log::debug;

use crate::geom::{self, Point};

/// One pointer sample as delivered by the host input system. Timestamps are
/// monotonic seconds; the sequence for a gesture starts on pointer down and
/// ends on pointer up/cancel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchSample {
    pub position: Point,
    pub timestamp: f64,
}

/// A sampled stroke point: position plus the half-width derived from the
/// velocity against the previous sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokePoint {
    pub position: Point,
    pub half_width: f32,
}

/// Two consecutive stroke points, ready for meshing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub a: StrokePoint,
    pub b: StrokePoint,
}

/// Velocity (logical px per second) at or above which the stroke is at its
/// thinnest. Below this the width interpolates linearly up to the widest
/// setting at zero velocity.
pub const FULL_SPEED: f32 = 100.0;

/// Weight of the previous point's half-width when smoothing a new width.
/// Keeps adjacent segments from jumping in thickness at sampling noise.
pub const WIDTH_SMOOTHING: f32 = 0.4;

/// Samples one continuous gesture into velocity-weighted stroke points.
#[derive(Clone, Debug, Default)]
pub struct StrokeSampler {
    half_width_min: f32,
    half_width_max: f32,
    points: Vec<StrokePoint>,
    last_sample: Option<TouchSample>,
}

impl StrokeSampler {
    /// `width_min`/`width_max` are full stroke thicknesses; the sampler works
    /// in half-widths.
    pub fn new(width_min: f32, width_max: f32) -> Self {
        Self {
            half_width_min: width_min / 2.0,
            half_width_max: width_max / 2.0,
            points: Vec::new(),
            last_sample: None,
        }
    }

    /// Start a new stroke at `position`.
    ///
    /// The first point has no prior movement to estimate speed from, so its
    /// half-width defaults to the widest setting; a pin-thin initial dot
    /// reads as a rendering glitch, a wide one reads as ink.
    pub fn begin(&mut self, position: Point, timestamp: f64) {
        self.points.clear();
        self.points.push(StrokePoint {
            position,
            half_width: self.half_width_max,
        });
        self.last_sample = Some(TouchSample {
            position,
            timestamp,
        });
    }

    /// Append a sample; returns the new segment for immediate meshing.
    ///
    /// Samples with non-positive elapsed time against the previous sample are
    /// duplicates or arrived out of order and are dropped without effect.
    /// Returns `None` when the sample was rejected or no stroke is active.
    pub fn add_point(&mut self, position: Point, timestamp: f64) -> Option<Segment> {
        let last = self.last_sample?;
        let dt = timestamp - last.timestamp;
        if dt <= 0.0 {
            debug!("dropping stroke sample with non-positive dt {dt}");
            return None;
        }

        let prev = *self.points.last()?;
        let velocity = geom::distance(last.position, position) / dt as f32;
        let target = self.width_for_velocity(velocity);
        let half_width = target * (1.0 - WIDTH_SMOOTHING) + prev.half_width * WIDTH_SMOOTHING;

        let point = StrokePoint {
            position,
            half_width,
        };
        self.points.push(point);
        self.last_sample = Some(TouchSample {
            position,
            timestamp,
        });
        Some(Segment { a: prev, b: point })
    }

    /// Finalize the stroke and return its full point sequence. A no-op
    /// returning an empty vec when no stroke was ever begun.
    pub fn end(&mut self) -> Vec<StrokePoint> {
        self.last_sample = None;
        std::mem::take(&mut self.points)
    }

    /// Points sampled so far for the in-progress stroke.
    pub fn points(&self) -> &[StrokePoint] {
        &self.points
    }

    /// Inverse-velocity width mapping, clamped to the configured range:
    /// zero velocity is widest, `FULL_SPEED` and above is thinnest.
    fn width_for_velocity(&self, velocity: f32) -> f32 {
        let t = (velocity / FULL_SPEED).clamp(0.0, 1.0);
        let w = self.half_width_max + t * (self.half_width_min - self.half_width_max);
        w.clamp(self.half_width_min, self.half_width_max)
    }
}
