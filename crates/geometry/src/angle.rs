//! Compass-style angle math shared by every radial widget.
//!
//! Angles are in degrees, 0 points up and values grow clockwise. Screen space
//! has y growing downwards, so a positive angle of 90 lands to the right of the
//! center and 180 lands below it.

use crate::point::Point;

pub const FULL_TURN: f64 = 360.0;
pub const HALF_TURN: f64 = 180.0;

/// Brings any angle into the canonical range (-180, 180].
///
/// Non-finite input collapses to 0 so a bad pointer sample can never poison
/// downstream layout.
pub fn normalize_degrees(degrees: f64) -> f64 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let wrapped = (degrees + HALF_TURN).rem_euclid(FULL_TURN) - HALF_TURN;
    if wrapped <= -HALF_TURN {
        HALF_TURN
    } else {
        wrapped
    }
}

/// Signed rotation from `start` to `current`, taking the short way across the
/// ±180° seam. The result lies in (-180, 180].
pub fn wrap_delta(current: f64, start: f64) -> f64 {
    normalize_degrees(current - start)
}

/// Shortest unsigned distance between two angles, in [0, 180].
pub fn angle_difference(a: f64, b: f64) -> f64 {
    wrap_delta(a, b).abs()
}

/// Cartesian offset of a point at `radius` along `degrees`.
///
/// Negative or NaN radii are treated as 0; a NaN angle is treated as 0.
pub fn polar_offset(degrees: f64, radius: f64) -> Point {
    let radius = if radius.is_nan() { 0.0 } else { radius.max(0.0) };
    let radians = normalize_degrees(degrees).to_radians();
    Point::new(radius * radians.sin(), -radius * radians.cos())
}

/// Absolute screen position of a point at `radius` along `degrees` around `center`.
pub fn angle_to_position(degrees: f64, radius: f64, center: Point) -> Point {
    let offset = polar_offset(degrees, radius);
    center.offset(offset.x, offset.y)
}

/// Compass angle of `pointer` as seen from `center`, in (-180, 180].
///
/// This is the inverse of [`angle_to_position`]. A pointer sitting exactly on
/// the center has no direction and reports 0.
pub fn pointer_angle(center: Point, pointer: Point) -> f64 {
    let (dx, dy) = (pointer.x - center.x, pointer.y - center.y);
    if dx == 0.0 && dy == 0.0 {
        return 0.0;
    }
    normalize_degrees(dx.atan2(-dy).to_degrees())
}
