//! Pan recognition with a movement threshold, plus a long-press recognizer.
//!
//! A raw drag recognizer fires on the first pixel of movement, which makes
//! taps and long-presses indistinguishable from the start of a stroke. The
//! [`PanRecognizer`] here withholds the Began phase until the pointer has
//! travelled a minimum distance from its down-point; interactions that never
//! cross the threshold produce no pan phases at all.

use crate::geom::{self, Point, Transform2D};

/// Default distance (logical px) the pointer must travel before a pan is
/// recognized. Large enough to ignore finger jitter, small enough to feel
/// responsive for intentional drags.
pub const DISTANCE_TO_RECOGNIZE_DEFAULT: f32 = 10.0;

/// Floor for [`PanRecognizer::set_distance_to_recognize`]. A zero threshold
/// would defeat the tap/long-press disambiguation the recognizer exists for.
pub const DISTANCE_TO_RECOGNIZE_MIN: f32 = 1.0;

/// Phase of a recognized pan gesture. `Began` carries the first reported
/// position, which is the move sample that crossed the threshold, never the
/// anchor point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PanPhase {
    Began(Point),
    Changed(Point),
    Ended,
    Cancelled,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PanState {
    Idle,
    Pending,
    Active,
}

/// Drag recognizer that suppresses recognition until cumulative movement from
/// the initial touch exceeds a configurable minimum distance.
///
/// Driven synchronously by the host's pointer delivery:
/// `Idle → Pending → {Active → Idle | Idle}`.
#[derive(Clone, Debug)]
pub struct PanRecognizer {
    distance_to_recognize: f32,
    state: PanState,
    anchor: Option<Point>,
}

impl Default for PanRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

impl PanRecognizer {
    pub fn new() -> Self {
        Self {
            distance_to_recognize: DISTANCE_TO_RECOGNIZE_DEFAULT,
            state: PanState::Idle,
            anchor: None,
        }
    }

    /// Set the recognition threshold. Values below
    /// [`DISTANCE_TO_RECOGNIZE_MIN`] are clamped up to the floor.
    pub fn set_distance_to_recognize(&mut self, distance: f32) {
        self.distance_to_recognize = distance.max(DISTANCE_TO_RECOGNIZE_MIN);
    }

    /// The effective (clamped) recognition threshold.
    pub fn distance_to_recognize(&self) -> f32 {
        self.distance_to_recognize
    }

    /// Record the anchor point and start waiting for threshold movement.
    pub fn pointer_down(&mut self, point: Point) {
        self.anchor = Some(point);
        self.state = PanState::Pending;
    }

    /// Feed a move sample. Returns `Began` exactly once, at the first sample
    /// whose distance from the anchor reaches the threshold; afterwards every
    /// move is forwarded as `Changed`. Below-threshold moves while pending
    /// produce nothing.
    pub fn pointer_move(&mut self, point: Point) -> Option<PanPhase> {
        match self.state {
            PanState::Idle => None,
            PanState::Pending => {
                let anchor = self.anchor?;
                if geom::distance(anchor, point) >= self.distance_to_recognize {
                    self.state = PanState::Active;
                    Some(PanPhase::Began(point))
                } else {
                    None
                }
            }
            PanState::Active => Some(PanPhase::Changed(point)),
        }
    }

    /// Pointer released. A still-pending interaction was a tap: no phase is
    /// emitted and none ever was.
    pub fn pointer_up(&mut self) -> Option<PanPhase> {
        let was_active = self.state == PanState::Active;
        self.state = PanState::Idle;
        was_active.then_some(PanPhase::Ended)
    }

    /// Pointer delivery cancelled by the host.
    pub fn pointer_cancel(&mut self) -> Option<PanPhase> {
        let was_active = self.state == PanState::Active;
        self.state = PanState::Idle;
        was_active.then_some(PanPhase::Cancelled)
    }

    /// The original touch-down point mapped into a caller-chosen coordinate
    /// frame. Valid for the current or most recently completed gesture.
    pub fn anchor_point_in(&self, frame: &Transform2D) -> Option<Point> {
        self.anchor.map(|p| frame.apply(p))
    }
}

/// Duration (seconds) the pointer must stay put for a long press.
pub const LONG_PRESS_DURATION: f64 = 0.5;

/// Movement allowance (logical px) while waiting for a long press.
pub const LONG_PRESS_SLOP: f32 = 10.0;

/// Minimal long-press recognizer; fires at most once per press.
///
/// Used for the erase-on-long-press toggle: a press that stays within the
/// slop radius for the hold duration recognizes, after which the press is
/// consumed until the next pointer down.
#[derive(Clone, Debug, Default)]
pub struct LongPressRecognizer {
    press: Option<(Point, f64)>,
    fired: bool,
}

impl LongPressRecognizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pointer_down(&mut self, point: Point, timestamp: f64) {
        self.press = Some((point, timestamp));
        self.fired = false;
    }

    /// Feed a move or time tick; returns true exactly once when the hold
    /// duration elapses without the pointer leaving the slop radius.
    pub fn poll(&mut self, point: Point, timestamp: f64) -> bool {
        let Some((origin, start)) = self.press else {
            return false;
        };
        if self.fired {
            return false;
        }
        if geom::distance(origin, point) > LONG_PRESS_SLOP {
            self.press = None;
            return false;
        }
        if timestamp - start >= LONG_PRESS_DURATION {
            self.fired = true;
            return true;
        }
        false
    }

    pub fn pointer_up(&mut self) {
        self.press = None;
        self.fired = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn below_threshold_never_begins() {
        let mut pan = PanRecognizer::new();
        pan.set_distance_to_recognize(10.0);
        pan.pointer_down([0.0, 0.0]);
        assert_eq!(pan.pointer_move([3.0, 0.0]), None);
        assert_eq!(pan.pointer_move([0.0, 5.0]), None);
        assert_eq!(pan.pointer_move([9.9, 0.0]), None);
        // Released before the threshold: a tap, no phases at all.
        assert_eq!(pan.pointer_up(), None);
    }

    #[test]
    fn began_fires_once_at_crossing_with_current_point() {
        let mut pan = PanRecognizer::new();
        pan.set_distance_to_recognize(10.0);
        pan.pointer_down([0.0, 0.0]);
        assert_eq!(pan.pointer_move([3.0, 0.0]), None);
        assert_eq!(
            pan.pointer_move([12.0, 0.0]),
            Some(PanPhase::Began([12.0, 0.0]))
        );
        assert_eq!(
            pan.pointer_move([20.0, 0.0]),
            Some(PanPhase::Changed([20.0, 0.0]))
        );
        assert_eq!(pan.pointer_up(), Some(PanPhase::Ended));
    }

    #[test]
    fn threshold_clamps_to_floor() {
        let mut pan = PanRecognizer::new();
        pan.set_distance_to_recognize(0.0);
        assert_eq!(pan.distance_to_recognize(), DISTANCE_TO_RECOGNIZE_MIN);
        pan.set_distance_to_recognize(-5.0);
        assert_eq!(pan.distance_to_recognize(), DISTANCE_TO_RECOGNIZE_MIN);
        pan.set_distance_to_recognize(25.0);
        assert_eq!(pan.distance_to_recognize(), 25.0);
    }

    #[test]
    fn cancel_while_active_reports_cancelled() {
        let mut pan = PanRecognizer::new();
        pan.pointer_down([0.0, 0.0]);
        assert!(pan.pointer_move([50.0, 0.0]).is_some());
        assert_eq!(pan.pointer_cancel(), Some(PanPhase::Cancelled));
        // Back to idle: moves without a down are ignored.
        assert_eq!(pan.pointer_move([60.0, 0.0]), None);
    }

    #[test]
    fn anchor_point_maps_into_requested_frame() {
        let mut pan = PanRecognizer::new();
        assert_eq!(pan.anchor_point_in(&Transform2D::identity()), None);
        pan.pointer_down([4.0, 6.0]);
        assert_eq!(
            pan.anchor_point_in(&Transform2D::identity()),
            Some([4.0, 6.0])
        );
        assert_eq!(
            pan.anchor_point_in(&Transform2D::translate(10.0, -1.0)),
            Some([14.0, 5.0])
        );
        // Still valid after the gesture completed.
        assert!(pan.pointer_move([40.0, 6.0]).is_some());
        pan.pointer_up();
        assert_eq!(
            pan.anchor_point_in(&Transform2D::identity()),
            Some([4.0, 6.0])
        );
    }

    #[test]
    fn long_press_fires_once_within_slop() {
        let mut lp = LongPressRecognizer::new();
        lp.pointer_down([0.0, 0.0], 1.0);
        assert!(!lp.poll([2.0, 0.0], 1.2));
        assert!(lp.poll([2.0, 1.0], 1.6));
        assert!(!lp.poll([2.0, 1.0], 2.0));
    }

    #[test]
    fn long_press_cancelled_by_movement() {
        let mut lp = LongPressRecognizer::new();
        lp.pointer_down([0.0, 0.0], 0.0);
        assert!(!lp.poll([50.0, 0.0], 0.1));
        assert!(!lp.poll([50.0, 0.0], 5.0));
    }
}
