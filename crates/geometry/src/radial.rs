use crate::angle::{self, FULL_TURN};
use crate::point::Point;
use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};
use serde_with::DeserializeFromStr;
use strum::{Display as StrumDisplay, EnumIter, EnumString, IntoEnumIterator};

pub const SLOT_COUNT: usize = 8;
pub const ANGLE_STEP: f64 = FULL_TURN / SLOT_COUNT as f64;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[strum(serialize = "North", serialize = "n", serialize = "0")]
    North,
    #[strum(serialize = "NorthEast", serialize = "ne", serialize = "1")]
    NorthEast,
    #[strum(serialize = "East", serialize = "e", serialize = "2")]
    East,
    #[strum(serialize = "SouthEast", serialize = "se", serialize = "3")]
    SouthEast,
    #[strum(serialize = "South", serialize = "s", serialize = "4")]
    South,
    #[strum(serialize = "SouthWest", serialize = "sw", serialize = "5")]
    SouthWest,
    #[strum(serialize = "West", serialize = "w", serialize = "6")]
    West,
    #[strum(serialize = "NorthWest", serialize = "nw", serialize = "7")]
    NorthWest,
}

impl Direction {
    pub fn as_index(&self) -> usize {
        *self as usize
    }

    pub fn from_index(idx: usize) -> Option<Self> {
        Self::iter().nth(idx % SLOT_COUNT)
    }

    /// Compass bearing of this direction in degrees.
    pub fn angle(&self) -> f64 {
        self.as_index() as f64 * ANGLE_STEP
    }

    pub fn is_cardinal(&self) -> bool {
        self.as_index() % 2 == 0
    }
}

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct ItemLabel(String);

crate::impl_label_newtype!(ItemLabel);

/// A circle of fixed radius around a center. Every radial widget places its
/// children through this type so they all share one angle convention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialLayout {
    pub center: Point,
    pub radius: f64,
}

impl RadialLayout {
    pub fn new(center: Point, radius: f64) -> Self {
        Self { center, radius }
    }

    pub fn place(&self, degrees: f64) -> Point {
        angle::angle_to_position(degrees, self.radius, self.center)
    }

    /// `count` positions spread evenly, the first one straight up.
    pub fn evenly_spaced(&self, count: usize) -> Vec<Point> {
        if count == 0 {
            return Vec::new();
        }
        let step = FULL_TURN / count as f64;
        (0..count).map(|i| self.place(i as f64 * step)).collect()
    }

    pub fn tick_marks(&self, count: usize, inner: f64, outer: f64) -> Vec<TickMark> {
        if count == 0 {
            return Vec::new();
        }
        let step = FULL_TURN / count as f64;
        (0..count)
            .map(|i| {
                let degrees = i as f64 * step;
                TickMark {
                    degrees,
                    from: angle::angle_to_position(degrees, inner, self.center),
                    to: angle::angle_to_position(degrees, outer, self.center),
                }
            })
            .collect()
    }
}

/// A radial line segment, drawn from `from` (inner end) to `to` (outer end).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickMark {
    pub degrees: f64,
    pub from: Point,
    pub to: Point,
}

/// Diameters and radii of the compass navigation wheel, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WheelSizes {
    pub collapsed: f64,
    pub expanded: f64,
    pub hub_collapsed: f64,
    pub hub_expanded: f64,
    /// Section labels sit on this circle when expanded.
    pub label_radius: f64,
}

impl Default for WheelSizes {
    fn default() -> Self {
        Self {
            collapsed: 70.0,
            expanded: 280.0,
            hub_collapsed: 54.0,
            hub_expanded: 70.0,
            label_radius: 100.0,
        }
    }
}

/// What lies under a pointer on the wheel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelHit {
    Hub,
    Section(Direction),
    /// Inside the wheel but it has no sections.
    Ring,
    /// The backdrop around the wheel.
    Outside,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavAction {
    Navigate(ItemLabel),
    Expand,
    Collapse,
    Nothing,
}

/// Compass-style navigation: up to eight labelled sections around a hub.
///
/// Collapsed, the wheel is a small button that expands when its hub is
/// clicked. Expanded, a click selects the section nearest to the pointer's
/// bearing, the hub navigates to its own label and the backdrop collapses
/// the wheel again.
#[derive(Debug, Clone)]
pub struct NavWheel {
    center: Point,
    sizes: WheelSizes,
    sections: [Option<ItemLabel>; SLOT_COUNT],
    hub: Option<ItemLabel>,
    expanded: bool,
    hovered: Option<WheelHit>,
}

impl NavWheel {
    pub fn new<I>(sections: I, hub: Option<ItemLabel>, center: Point, sizes: WheelSizes) -> Self
    where
        I: IntoIterator<Item = (Direction, ItemLabel)>,
    {
        let mut slots: [Option<ItemLabel>; SLOT_COUNT] = Default::default();
        for (dir, label) in sections {
            slots[dir.as_index()] = Some(label);
        }
        Self {
            center,
            sizes,
            sections: slots,
            hub,
            expanded: false,
            hovered: None,
        }
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn set_center(&mut self, center: Point) {
        self.center = center;
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn set_expanded(&mut self, expanded: bool) {
        self.expanded = expanded;
        self.hovered = None;
    }

    pub fn section(&self, dir: Direction) -> Option<&ItemLabel> {
        self.sections[dir.as_index()].as_ref()
    }

    pub fn hub_label(&self) -> Option<&ItemLabel> {
        self.hub.as_ref()
    }

    pub fn hovered(&self) -> Option<WheelHit> {
        self.hovered
    }

    pub fn radius(&self) -> f64 {
        let size = if self.expanded {
            self.sizes.expanded
        } else {
            self.sizes.collapsed
        };
        size / 2.0
    }

    pub fn hub_radius(&self) -> f64 {
        let size = if self.expanded {
            self.sizes.hub_expanded
        } else {
            self.sizes.hub_collapsed
        };
        size / 2.0
    }

    fn filled(&self) -> impl Iterator<Item = (Direction, &ItemLabel)> {
        Direction::iter().filter_map(|d| self.section(d).map(|label| (d, label)))
    }

    /// Label anchors of the filled sections; empty while collapsed.
    pub fn label_positions(&self) -> Vec<(Direction, Point)> {
        if !self.expanded {
            return Vec::new();
        }
        let layout = RadialLayout::new(self.center, self.sizes.label_radius);
        self.filled().map(|(d, _)| (d, layout.place(d.angle()))).collect()
    }

    /// Divider strokes at each filled section, from the hub edge to the ring.
    pub fn dividers(&self) -> Vec<TickMark> {
        if !self.expanded {
            return Vec::new();
        }
        let (inner, outer) = (self.hub_radius(), self.radius());
        self.filled()
            .map(|(d, _)| TickMark {
                degrees: d.angle(),
                from: angle::angle_to_position(d.angle(), inner, self.center),
                to: angle::angle_to_position(d.angle(), outer, self.center),
            })
            .collect()
    }

    pub fn hit_test(&self, pointer: Point) -> WheelHit {
        let dist = self.center.distance(pointer);
        if !dist.is_finite() || dist > self.radius() {
            return WheelHit::Outside;
        }
        if dist <= self.hub_radius() || !self.expanded {
            return WheelHit::Hub;
        }
        let bearing = angle::pointer_angle(self.center, pointer);
        self.filled()
            .min_by(|(a, _), (b, _)| {
                angle::angle_difference(bearing, a.angle())
                    .total_cmp(&angle::angle_difference(bearing, b.angle()))
            })
            .map_or(WheelHit::Ring, |(d, _)| WheelHit::Section(d))
    }

    /// Tracks hover while expanded. Returns true when the hovered target changed.
    pub fn hover(&mut self, pointer: Point) -> bool {
        let hit = match self.hit_test(pointer) {
            _ if !self.expanded => None,
            WheelHit::Outside | WheelHit::Ring => None,
            hit => Some(hit),
        };
        let changed = hit != self.hovered;
        self.hovered = hit;
        changed
    }

    pub fn click(&mut self, pointer: Point) -> NavAction {
        let hit = self.hit_test(pointer);
        let action = match (self.expanded, hit) {
            (false, WheelHit::Hub) => NavAction::Expand,
            (false, _) => NavAction::Nothing,
            (true, WheelHit::Hub) => match &self.hub {
                Some(label) => NavAction::Navigate(label.clone()),
                None => NavAction::Collapse,
            },
            (true, WheelHit::Section(d)) => match self.section(d) {
                Some(label) => NavAction::Navigate(label.clone()),
                None => NavAction::Nothing,
            },
            (true, WheelHit::Ring) => NavAction::Nothing,
            (true, WheelHit::Outside) => NavAction::Collapse,
        };
        match action {
            NavAction::Expand => self.set_expanded(true),
            NavAction::Collapse => self.set_expanded(false),
            _ => {}
        }
        log::debug!("nav wheel click {:?} -> {:?}", hit, action);
        action
    }
}
