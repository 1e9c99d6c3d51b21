//! Turning pointer motion around a wheel into scroll offsets and list steps.

use crate::angle::{self, FULL_TURN};
use crate::point::Point;
use serde::{Deserialize, Serialize};

/// Offset units gained per full turn, relative to the scrollable extent.
///
/// A ratio of 2.0 means half a turn scrolls the whole list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotaryScale {
    pub sweep_ratio: f64,
}

impl Default for RotaryScale {
    fn default() -> Self {
        Self { sweep_ratio: 2.0 }
    }
}

impl RotaryScale {
    pub fn new(sweep_ratio: f64) -> Self {
        Self { sweep_ratio }
    }

    pub fn offset_per_turn(&self, max_offset: f64) -> f64 {
        let ratio = if self.sweep_ratio.is_finite() {
            self.sweep_ratio
        } else {
            0.0
        };
        max_offset * ratio
    }
}

/// Largest scroll offset of a list of `item_count` rows of `item_extent`
/// shown through a window of `viewport_extent`.
pub fn max_scroll(item_count: usize, item_extent: f64, viewport_extent: f64) -> f64 {
    (item_count as f64 * item_extent - viewport_extent).max(0.0)
}

/// Visual rotation of the wheel for a given scroll offset.
pub fn rotation_degrees(offset: f64, max_offset: f64) -> f64 {
    if max_offset > 0.0 {
        offset / max_offset * FULL_TURN
    } else {
        0.0
    }
}

fn clamp_offset(offset: f64, max_offset: f64) -> f64 {
    if offset.is_nan() {
        return 0.0;
    }
    offset.clamp(0.0, max_offset.max(0.0))
}

/// A continuous drag around a fixed center that scrolls a bounded offset.
///
/// The delta is always measured from the angle at drag start, so crossing the
/// ±180° seam keeps the offset continuous.
#[derive(Debug, Clone, PartialEq)]
pub struct RotaryDrag {
    center: Point,
    start_angle: f64,
    start_offset: f64,
    current_offset: f64,
    max_offset: f64,
    scale: RotaryScale,
}

impl RotaryDrag {
    pub fn begin(
        center: Point,
        pointer: Point,
        start_offset: f64,
        max_offset: f64,
        scale: RotaryScale,
    ) -> Self {
        let max_offset = if max_offset.is_finite() {
            max_offset.max(0.0)
        } else {
            0.0
        };
        let start_offset = clamp_offset(start_offset, max_offset);
        let start_angle = angle::pointer_angle(center, pointer);
        log::trace!(
            "rotary drag start: angle {:.2}, offset {:.2}/{:.2}",
            start_angle,
            start_offset,
            max_offset
        );
        Self {
            center,
            start_angle,
            start_offset,
            current_offset: start_offset,
            max_offset,
            scale,
        }
    }

    pub fn update(&mut self, pointer: Point) -> f64 {
        let current = angle::pointer_angle(self.center, pointer);
        let delta = angle::wrap_delta(current, self.start_angle);
        let moved = delta / FULL_TURN * self.scale.offset_per_turn(self.max_offset);
        self.current_offset = clamp_offset(self.start_offset + moved, self.max_offset);
        self.current_offset
    }

    pub fn finish(self) -> f64 {
        log::trace!("rotary drag end at offset {:.2}", self.current_offset);
        self.current_offset
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn start_angle(&self) -> f64 {
        self.start_angle
    }

    pub fn offset(&self) -> f64 {
        self.current_offset
    }

    pub fn max_offset(&self) -> f64 {
        self.max_offset
    }

    pub fn rotation(&self) -> f64 {
        rotation_degrees(self.current_offset, self.max_offset)
    }
}

/// A drag that walks a list one option per `360 / len` degrees of rotation.
///
/// Unlike [`RotaryDrag`] it accumulates small wrapped deltas between
/// consecutive samples, so several full turns keep counting.
#[derive(Debug, Clone, PartialEq)]
pub struct StepDrag {
    center: Point,
    last_angle: f64,
    accumulated: f64,
    rotation: f64,
    index: usize,
    len: usize,
}

impl StepDrag {
    pub fn begin(center: Point, pointer: Point, index: usize, len: usize) -> Self {
        Self {
            center,
            last_angle: angle::pointer_angle(center, pointer),
            accumulated: 0.0,
            rotation: 0.0,
            index: index.min(len.saturating_sub(1)),
            len,
        }
    }

    pub fn degrees_per_step(&self) -> f64 {
        if self.len == 0 {
            FULL_TURN
        } else {
            FULL_TURN / self.len as f64
        }
    }

    /// Feeds a pointer sample and returns the new index when it changed.
    pub fn update(&mut self, pointer: Point) -> Option<usize> {
        if self.len == 0 {
            return None;
        }
        let current = angle::pointer_angle(self.center, pointer);
        let delta = angle::wrap_delta(current, self.last_angle);
        self.last_angle = current;
        self.rotation += delta;
        self.accumulated += delta;

        let per_step = self.degrees_per_step();
        let steps = (self.accumulated / per_step).trunc();
        if steps == 0.0 {
            return None;
        }
        self.accumulated -= steps * per_step;

        let target = (self.index as f64 + steps).clamp(0.0, (self.len - 1) as f64) as usize;
        if target == self.index {
            return None;
        }
        self.index = target;
        Some(target)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Total visual rotation since the drag started.
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn finish(self) -> usize {
        self.index
    }
}

/// One scroll-wheel notch: down moves forwards, up moves backwards.
pub fn scroll_step(index: usize, len: usize, delta_y: f64) -> usize {
    if len == 0 {
        return 0;
    }
    let last = len - 1;
    let index = index.min(last);
    if delta_y > 0.0 {
        (index + 1).min(last)
    } else if delta_y < 0.0 {
        index.saturating_sub(1)
    } else {
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn at(degrees: f64) -> Point {
        angle::angle_to_position(degrees, 50.0, Point::new(200.0, 200.0))
    }

    #[test]
    fn test_max_scroll_never_negative() {
        assert_eq!(max_scroll(10, 34.0, 170.0), 170.0);
        assert_eq!(max_scroll(3, 34.0, 170.0), 0.0);
    }

    #[test]
    fn test_rotation_of_empty_range_is_zero() {
        assert_eq!(rotation_degrees(10.0, 0.0), 0.0);
        assert_eq!(rotation_degrees(85.0, 170.0), 180.0);
    }

    #[test]
    fn test_quarter_turn_moves_half_the_range_by_default() {
        let mut drag =
            RotaryDrag::begin(Point::new(200.0, 200.0), at(0.0), 0.0, 100.0, RotaryScale::default());
        let offset = drag.update(at(90.0));
        assert!((offset - 50.0).abs() < EPSILON);
    }

    #[test]
    fn test_offset_clamps_to_range() {
        let mut drag =
            RotaryDrag::begin(Point::new(200.0, 200.0), at(0.0), 10.0, 100.0, RotaryScale::default());
        assert_eq!(drag.update(at(-90.0)), 0.0);
        assert_eq!(drag.update(at(170.0)), 100.0);
    }

    #[test]
    fn test_drag_is_continuous_across_seam() {
        let center = Point::new(200.0, 200.0);
        let mut drag = RotaryDrag::begin(center, at(179.0), 50.0, 360.0, RotaryScale::new(1.0));
        let offset = drag.update(at(-179.0));
        // +2 degrees of a 360 unit turn
        assert!((offset - 52.0).abs() < 1e-6);
    }

    #[test]
    fn test_finish_freezes_last_offset() {
        let mut drag =
            RotaryDrag::begin(Point::new(200.0, 200.0), at(0.0), 0.0, 100.0, RotaryScale::default());
        drag.update(at(45.0));
        let last = drag.offset();
        assert_eq!(drag.finish(), last);
    }

    #[test]
    fn test_zero_ratio_never_moves() {
        let mut drag =
            RotaryDrag::begin(Point::new(200.0, 200.0), at(0.0), 30.0, 100.0, RotaryScale::new(0.0));
        assert_eq!(drag.update(at(120.0)), 30.0);
    }

    #[test]
    fn test_start_offset_is_clamped() {
        let drag =
            RotaryDrag::begin(Point::new(0.0, 0.0), Point::new(0.0, -1.0), 500.0, 100.0, RotaryScale::default());
        assert_eq!(drag.offset(), 100.0);
    }

    #[test]
    fn test_step_drag_advances_per_slice() {
        let center = Point::new(200.0, 200.0);
        let mut drag = StepDrag::begin(center, at(0.0), 0, 4);
        assert_eq!(drag.degrees_per_step(), 90.0);
        assert_eq!(drag.update(at(45.0)), None);
        assert_eq!(drag.update(at(95.0)), Some(1));
        assert_eq!(drag.update(at(185.0)), Some(2));
    }

    #[test]
    fn test_step_drag_clamps_at_ends() {
        let center = Point::new(200.0, 200.0);
        let mut drag = StepDrag::begin(center, at(0.0), 0, 3);
        assert_eq!(drag.update(at(-130.0)), None);
        assert_eq!(drag.index(), 0);
    }

    #[test]
    fn test_step_drag_tracks_rotation_across_turns() {
        let center = Point::new(200.0, 200.0);
        let mut drag = StepDrag::begin(center, at(0.0), 0, 100);
        for degrees in (10..=720).step_by(10) {
            drag.update(at(degrees as f64));
        }
        assert!((drag.rotation() - 720.0).abs() < 1e-6);
        assert_eq!(drag.finish(), 99);
    }

    #[test]
    fn test_scroll_step_moves_one_notch() {
        assert_eq!(scroll_step(0, 5, 1.0), 1);
        assert_eq!(scroll_step(4, 5, 1.0), 4);
        assert_eq!(scroll_step(0, 5, -3.0), 0);
        assert_eq!(scroll_step(2, 5, -1.0), 1);
        assert_eq!(scroll_step(2, 0, 1.0), 0);
    }
}
