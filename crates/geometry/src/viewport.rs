//! Screen pixels and the centered, y-up grid frame used by the developer overlay.
//!
//! One grid unit is one pixel at 100% zoom. The conversion is a pure
//! translation plus a y flip, so it round-trips exactly for a given viewport.

use crate::point::Point;
use serde::{Deserialize, Serialize};

/// Design reference resolution used for viewport-relative units.
pub const REFERENCE_WIDTH: f64 = 1920.0;
pub const REFERENCE_HEIGHT: f64 = 1080.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: REFERENCE_WIDTH,
            height: REFERENCE_HEIGHT,
        }
    }
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Both dimensions finite and positive.
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn screen_to_grid(&self, screen: Point) -> GridPoint {
        let origin = self.center();
        GridPoint::new(screen.x - origin.x, origin.y - screen.y)
    }

    pub fn grid_to_screen(&self, grid: GridPoint) -> Point {
        let origin = self.center();
        Point::new(origin.x + grid.x, origin.y - grid.y)
    }
}

/// A point in the grid frame: origin at the viewport center, y up.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GridPoint {
    pub x: f64,
    pub y: f64,
}

impl GridPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Whole-pixel version for readouts.
    pub fn rounded(&self) -> Self {
        Self::new(self.x.round(), self.y.round())
    }

    pub fn distance(&self, other: GridPoint) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    pub fn describe(&self) -> String {
        let p = self.rounded();
        format!("X: {}, Y: {}", format_coord(p.x), format_coord(p.y))
    }
}

pub fn screen_to_grid(px: f64, py: f64, width: f64, height: f64) -> GridPoint {
    Viewport::new(width, height).screen_to_grid(Point::new(px, py))
}

pub fn grid_to_screen(gx: f64, gy: f64, width: f64, height: f64) -> Point {
    Viewport::new(width, height).grid_to_screen(GridPoint::new(gx, gy))
}

/// Signed readout, `+12` or `-4`.
pub fn format_coord(value: f64) -> String {
    // -0 reads as 0
    let value = if value == 0.0 { 0.0 } else { value };
    if value >= 0.0 {
        format!("+{}", value)
    } else {
        format!("{}", value)
    }
}

pub fn px_to_vw(px: f64) -> f64 {
    px * 100.0 / REFERENCE_WIDTH
}

pub fn px_to_vh(px: f64) -> f64 {
    px * 100.0 / REFERENCE_HEIGHT
}

pub fn vw_to_px(vw: f64) -> f64 {
    (vw * REFERENCE_WIDTH / 100.0).round()
}

pub fn vh_to_px(vh: f64) -> f64 {
    (vh * REFERENCE_HEIGHT / 100.0).round()
}
