//! Piecewise-linear scales that split one continuous axis into unit zones.
//!
//! The duration slider is the canonical example: the left quarter of the track
//! counts hours, the middle half counts days and the right quarter counts
//! weeks. Each zone interpolates linearly between its own integer bounds.

use serde::{Deserialize, Serialize};
use serde_with::DeserializeFromStr;
use std::fmt;
use strum::{Display as StrumDisplay, EnumIter, EnumString};
use thiserror::Error;

/// Fraction of a zone's width used to keep a boundary value inside its own zone.
const BOUNDARY_NUDGE: f64 = 1e-9;
const SPAN_TOLERANCE: f64 = 1e-9;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
pub enum DurationUnit {
    #[strum(to_string = "Hours", serialize = "Hour", serialize = "h")]
    Hours,
    #[strum(to_string = "Days", serialize = "Day", serialize = "d")]
    Days,
    #[strum(to_string = "Weeks", serialize = "Week", serialize = "w")]
    Weeks,
}

impl DurationUnit {
    pub fn parse(s: &str) -> Result<Self, ScaleError> {
        s.trim()
            .parse()
            .map_err(|_| ScaleError::UnknownUnit(s.to_string()))
    }

    pub fn singular(&self) -> &'static str {
        match self {
            Self::Hours => "Hour",
            Self::Days => "Day",
            Self::Weeks => "Week",
        }
    }

    pub fn plural(&self) -> &'static str {
        match self {
            Self::Hours => "Hours",
            Self::Days => "Days",
            Self::Weeks => "Weeks",
        }
    }

    pub fn label(&self, value: i64) -> &'static str {
        if value == 1 {
            self.singular()
        } else {
            self.plural()
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScaleError {
    #[error("Unknown unit '{0}'")]
    UnknownUnit(String),
    #[error("No zone of this scale counts {0}")]
    UnitNotInScale(DurationUnit),
    #[error("{0} is not a step of this scale")]
    ValueNotInScale(ZonedValue),
    #[error("A scale needs at least one zone")]
    Empty,
    #[error("Scale span must be positive and finite, got {0}")]
    InvalidSpan(f64),
    #[error("Zone {index} is malformed: {reason}")]
    InvalidZone { index: usize, reason: &'static str },
    #[error("Zones must cover 0..{span} without gaps or overlaps (broken at zone {index})")]
    NotContiguous { index: usize, span: f64 },
}

/// Which zone owns a position that sits exactly on a shared boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Boundary {
    /// Zones are `(start, end]`; the first one also owns 0.
    #[default]
    Lower,
    /// Zones are `[start, end)`; the last one also owns the span end.
    Upper,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ZonedValue {
    pub value: i64,
    pub unit: DurationUnit,
}

impl ZonedValue {
    pub fn new(value: i64, unit: DurationUnit) -> Self {
        Self { value, unit }
    }
}

impl fmt::Display for ZonedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit.label(self.value))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub start: f64,
    pub end: f64,
    pub min: i64,
    pub max: i64,
    pub unit: DurationUnit,
}

impl Zone {
    pub fn new(start: f64, end: f64, min: i64, max: i64, unit: DurationUnit) -> Self {
        Self {
            start,
            end,
            min,
            max,
            unit,
        }
    }

    fn width(&self) -> f64 {
        self.end - self.start
    }

    pub fn contains_value(&self, value: i64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    fn distance_to(&self, value: i64) -> i64 {
        if value < self.min {
            self.min.saturating_sub(value)
        } else if value > self.max {
            value.saturating_sub(self.max)
        } else {
            0
        }
    }

    // i128 keeps configured extremes like i64::MIN..=i64::MAX from overflowing
    fn value_range(&self) -> f64 {
        (i128::from(self.max) - i128::from(self.min)) as f64
    }

    pub fn value_at(&self, position: f64) -> i64 {
        if self.min == self.max {
            return self.min;
        }
        let fraction = ((position - self.start) / self.width()).clamp(0.0, 1.0);
        let value = (self.min as f64 + fraction * self.value_range()).round() as i64;
        value.clamp(self.min, self.max)
    }

    pub fn position_of(&self, value: i64) -> f64 {
        if self.min == self.max {
            return self.start;
        }
        let value = value.clamp(self.min, self.max);
        let fraction = (i128::from(value) - i128::from(self.min)) as f64 / self.value_range();
        self.start + fraction * self.width()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ZonedScale {
    span: f64,
    boundary: Boundary,
    cyclic: bool,
    zones: Vec<Zone>,
}

impl ZonedScale {
    pub fn new(span: f64, boundary: Boundary, zones: Vec<Zone>) -> Result<Self, ScaleError> {
        if !span.is_finite() || span <= 0.0 {
            return Err(ScaleError::InvalidSpan(span));
        }
        if zones.is_empty() {
            return Err(ScaleError::Empty);
        }

        let mut expected_start = 0.0;
        for (index, zone) in zones.iter().enumerate() {
            if !(zone.start.is_finite() && zone.end.is_finite()) || zone.start >= zone.end {
                return Err(ScaleError::InvalidZone {
                    index,
                    reason: "start must be below end",
                });
            }
            if zone.min > zone.max {
                return Err(ScaleError::InvalidZone {
                    index,
                    reason: "min must not exceed max",
                });
            }
            if (zone.start - expected_start).abs() > SPAN_TOLERANCE {
                return Err(ScaleError::NotContiguous { index, span });
            }
            expected_start = zone.end;
        }
        if (expected_start - span).abs() > SPAN_TOLERANCE {
            return Err(ScaleError::NotContiguous {
                index: zones.len() - 1,
                span,
            });
        }

        Ok(Self {
            span,
            boundary,
            cyclic: false,
            zones,
        })
    }

    /// Positions wrap modulo the span instead of clamping to it.
    pub fn cyclic(mut self) -> Self {
        self.cyclic = true;
        self
    }

    /// Hours 1-8, days 2-15 and weeks 4-8 on a 0-100 slider track.
    pub fn duration_slider() -> Self {
        Self {
            span: 100.0,
            boundary: Boundary::Lower,
            cyclic: false,
            zones: vec![
                Zone::new(0.0, 25.0, 1, 8, DurationUnit::Hours),
                Zone::new(25.0, 75.0, 2, 15, DurationUnit::Days),
                Zone::new(75.0, 100.0, 4, 8, DurationUnit::Weeks),
            ],
        }
    }

    /// The single-wheel duration dial: a full turn of 360 degrees where hours
    /// take the first fifth, days the next two fifths and weeks the rest.
    pub fn duration_dial() -> Self {
        Self {
            span: 360.0,
            boundary: Boundary::Upper,
            cyclic: true,
            zones: vec![
                Zone::new(0.0, 72.0, 0, 12, DurationUnit::Hours),
                Zone::new(72.0, 144.0, 1, 5, DurationUnit::Days),
                Zone::new(144.0, 216.0, 6, 10, DurationUnit::Days),
                Zone::new(216.0, 360.0, 3, 30, DurationUnit::Weeks),
            ],
        }
    }

    pub fn span(&self) -> f64 {
        self.span
    }

    pub fn boundary(&self) -> Boundary {
        self.boundary
    }

    pub fn is_cyclic(&self) -> bool {
        self.cyclic
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    fn clamp_position(&self, position: f64) -> f64 {
        if !position.is_finite() {
            return 0.0;
        }
        if self.cyclic {
            position.rem_euclid(self.span)
        } else {
            position.clamp(0.0, self.span)
        }
    }

    fn zone_index_at(&self, position: f64) -> usize {
        let position = self.clamp_position(position);
        let last = self.zones.len() - 1;
        let found = match self.boundary {
            Boundary::Lower => self.zones.iter().position(|z| position <= z.end),
            Boundary::Upper => self
                .zones
                .iter()
                .position(|z| position >= z.start && position < z.end),
        };
        found.unwrap_or(last)
    }

    pub fn zone_at(&self, position: f64) -> &Zone {
        &self.zones[self.zone_index_at(position)]
    }

    pub fn position_to_value(&self, position: f64) -> ZonedValue {
        let position = self.clamp_position(position);
        let zone = self.zone_at(position);
        ZonedValue::new(zone.value_at(position), zone.unit)
    }

    /// Where `value` of `unit` sits on the axis.
    ///
    /// Among the zones counting `unit`, the one containing `value` wins,
    /// otherwise the closest one with the value clamped into it. A position that
    /// would land on a boundary owned by the neighbouring zone is moved just
    /// inside its own zone, so reading it back yields the same value and unit.
    pub fn value_to_position(&self, value: i64, unit: DurationUnit) -> Result<f64, ScaleError> {
        let (index, zone) = self
            .zones
            .iter()
            .enumerate()
            .filter(|(_, z)| z.unit == unit)
            .min_by_key(|(_, z)| z.distance_to(value))
            .ok_or(ScaleError::UnitNotInScale(unit))?;

        let position = zone.position_of(value);
        if self.zone_index_at(position) == index {
            return Ok(position);
        }

        let nudge = zone.width() * BOUNDARY_NUDGE;
        Ok(if position - zone.start <= zone.end - position {
            zone.start + nudge
        } else {
            zone.end - nudge
        })
    }

    /// Convenience for callers holding the unit as text.
    pub fn value_to_position_str(&self, value: i64, unit: &str) -> Result<f64, ScaleError> {
        self.value_to_position(value, DurationUnit::parse(unit)?)
    }

    /// Every discrete value of the scale in axis order.
    pub fn steps(&self) -> Vec<ZonedValue> {
        let mut steps: Vec<ZonedValue> = Vec::new();
        for zone in &self.zones {
            for value in zone.min..=zone.max {
                let step = ZonedValue::new(value, zone.unit);
                if steps.last() != Some(&step) {
                    steps.push(step);
                }
            }
        }
        steps
    }

    /// Moves `delta` discrete values along the axis, stopping at either end.
    pub fn step(&self, current: ZonedValue, delta: i64) -> Result<ZonedValue, ScaleError> {
        let steps = self.steps();
        let idx = steps
            .iter()
            .position(|s| *s == current)
            .ok_or(ScaleError::ValueNotInScale(current))?;
        let target = (idx as i64)
            .saturating_add(delta)
            .clamp(0, steps.len() as i64 - 1) as usize;
        Ok(steps[target])
    }
}
