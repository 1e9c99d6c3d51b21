//! State of the developer grid overlay: grid mode, opacity, pins and
//! element measurement. Everything here is expressed in grid coordinates.

use crate::point::Point;
use crate::viewport::{GridPoint, Viewport};
use serde::Serialize;
use serde_with::DeserializeFromStr;
use strum::{Display as StrumDisplay, EnumIter, EnumString};

pub const STANDARD_SPACING: f64 = 100.0;
pub const FINE_SPACING: f64 = 50.0;
pub const OPACITY_LEVELS: [f64; 5] = [0.2, 0.4, 0.6, 0.8, 1.0];
pub const DEFAULT_OPACITY: f64 = 0.6;
/// Lines drawn on each side of the center axis, at most.
pub const MAX_LINES_PER_SIDE: i64 = 200;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum GridMode {
    #[default]
    Off,
    Standard,
    Fine,
}

impl GridMode {
    pub fn next(&self) -> Self {
        match self {
            Self::Off => Self::Standard,
            Self::Standard => Self::Fine,
            Self::Fine => Self::Off,
        }
    }

    pub fn spacing(&self) -> Option<f64> {
        match self {
            Self::Off => None,
            Self::Standard => Some(STANDARD_SPACING),
            Self::Fine => Some(FINE_SPACING),
        }
    }

    pub fn is_visible(&self) -> bool {
        *self != Self::Off
    }
}

/// Next opacity level, wrapping around. An opacity that is not one of the
/// levels counts as sitting just before the first one.
pub fn cycle_opacity(current: f64, forward: bool) -> f64 {
    let len = OPACITY_LEVELS.len() as i64;
    let idx = OPACITY_LEVELS
        .iter()
        .position(|o| (o - current).abs() < 0.01)
        .map_or(-1, |i| i as i64);
    let step = if forward { 1 } else { -1 };
    OPACITY_LEVELS[(idx + step + len).rem_euclid(len) as usize]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Vertical,
    Horizontal,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLine {
    pub orientation: Orientation,
    /// Screen x for vertical lines, screen y for horizontal ones.
    pub position: f64,
    /// Grid coordinate the line marks.
    pub value: f64,
    pub is_primary: bool,
    pub is_center: bool,
}

pub fn grid_lines(mode: GridMode, viewport: Viewport) -> Vec<GridLine> {
    let Some(spacing) = mode.spacing() else {
        return Vec::new();
    };
    if !viewport.is_valid() {
        log::debug!("no grid lines for invalid viewport {:?}", viewport);
        return Vec::new();
    }
    let center = viewport.center();
    let primary_every = if mode == GridMode::Fine { 2 } else { 1 };
    let reach = |half: f64| ((half / spacing).ceil() as i64 + 1).min(MAX_LINES_PER_SIDE);

    let (max_x, max_y) = (reach(center.x), reach(center.y));
    let vertical = (-max_x..=max_x).map(|i| GridLine {
        orientation: Orientation::Vertical,
        position: center.x + i as f64 * spacing,
        value: i as f64 * spacing,
        is_primary: i % primary_every == 0,
        is_center: i == 0,
    });
    let horizontal = (-max_y..=max_y).map(|i| GridLine {
        orientation: Orientation::Horizontal,
        position: center.y + i as f64 * spacing,
        // screen y grows downwards
        value: -(i as f64) * spacing,
        is_primary: i % primary_every == 0,
        is_center: i == 0,
    });

    vertical.chain(horizontal).collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pin {
    pub id: u64,
    pub position: GridPoint,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    pub dx: f64,
    pub dy: f64,
    pub euclidean: f64,
}

/// Up to two pins and the one currently moved by the arrow keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PinBoard {
    pins: [Option<Pin>; 2],
    active: Option<usize>,
    next_id: u64,
}

impl PinBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pins(&self) -> &[Option<Pin>; 2] {
        &self.pins
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn set_active(&mut self, index: Option<usize>) {
        self.active = index.filter(|&i| self.pins.get(i).is_some_and(Option::is_some));
    }

    pub fn count(&self) -> usize {
        self.pins.iter().flatten().count()
    }

    fn new_pin(&mut self, position: GridPoint) -> Pin {
        let pin = Pin {
            id: self.next_id,
            position,
        };
        self.next_id += 1;
        pin
    }

    /// First click drops pin A, second drops pin B, a third starts over.
    pub fn place(&mut self, position: GridPoint) {
        let pin = Some(self.new_pin(position));
        match self.pins {
            [None, _] => self.pins = [pin, None],
            [Some(first), None] => self.pins = [Some(first), pin],
            [Some(_), Some(_)] => self.pins = [pin, None],
        }
        self.active = Some(0);
    }

    pub fn move_active(&mut self, dx: f64, dy: f64) {
        if let Some(pin) = self.active.and_then(|i| self.pins[i].as_mut()) {
            pin.position.x += dx;
            pin.position.y += dy;
        }
    }

    pub fn remove(&mut self, index: usize) {
        if index >= self.pins.len() {
            return;
        }
        self.pins[index] = None;
        // pin B slides into slot A
        if index == 0 && self.pins[1].is_some() {
            self.pins = [self.pins[1], None];
        }
        self.active = match self.active {
            Some(a) if a == index => None,
            Some(1) if index == 0 => Some(0),
            other => other,
        };
    }

    pub fn remove_last(&mut self) {
        if self.pins[1].is_some() {
            self.pins[1] = None;
        } else if self.pins[0].is_some() {
            self.pins[0] = None;
        }
        self.active = match self.active {
            Some(1) => Some(0),
            _ => None,
        };
    }

    pub fn clear(&mut self) {
        self.pins = [None, None];
        self.active = None;
    }

    pub fn measurement(&self) -> Option<Measurement> {
        let [Some(a), Some(b)] = self.pins else {
            return None;
        };
        Some(Measurement {
            dx: (b.position.x - a.position.x).abs(),
            dy: (b.position.y - a.position.y).abs(),
            euclidean: a.position.distance(b.position).round(),
        })
    }

    pub fn describe(&self, index: usize) -> Option<String> {
        self.pins
            .get(index)
            .copied()
            .flatten()
            .map(|pin| pin.position.describe())
    }
}

/// Screen rectangle of an element under inspection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ScreenRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementMeasure {
    pub top_left: GridPoint,
    pub bottom_right: GridPoint,
    pub center: GridPoint,
    pub width: f64,
    pub height: f64,
}

pub fn measure_rect(rect: ScreenRect, viewport: Viewport) -> ElementMeasure {
    ElementMeasure {
        top_left: viewport.screen_to_grid(Point::new(rect.left, rect.top)),
        bottom_right: viewport
            .screen_to_grid(Point::new(rect.left + rect.width, rect.top + rect.height)),
        center: viewport.screen_to_grid(rect.center()),
        width: rect.width,
        height: rect.height,
    }
}

/// Everything the overlay toggles at runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayState {
    pub mode: GridMode,
    pub opacity: f64,
    pub pointer: GridPoint,
    pub pins: PinBoard,
    pub measuring: bool,
}

impl Default for OverlayState {
    fn default() -> Self {
        Self {
            mode: GridMode::Off,
            opacity: DEFAULT_OPACITY,
            pointer: GridPoint::default(),
            pins: PinBoard::new(),
            measuring: false,
        }
    }
}

impl OverlayState {
    pub fn cycle_mode(&mut self) -> GridMode {
        self.mode = self.mode.next();
        self.mode
    }

    pub fn cycle_opacity(&mut self, forward: bool) -> f64 {
        self.opacity = cycle_opacity(self.opacity, forward);
        self.opacity
    }

    pub fn track_pointer(&mut self, screen: Point, viewport: Viewport) -> GridPoint {
        self.pointer = viewport.screen_to_grid(screen).rounded();
        self.pointer
    }

    pub fn toggle_measuring(&mut self) -> bool {
        self.measuring = !self.measuring;
        self.measuring
    }
}
