//! Per-axis error values and per-source error reports.

use std::ops::Sub;

use concord_align::Axis;

use crate::metric::MetricKind;

/// Number of decimal places used when presenting error values.
pub const DISPLAY_DECIMALS: usize = 4;

/// Round `value` to [`DISPLAY_DECIMALS`] places.
///
/// Rounds the exact binary value, so `0.00035` (stored just below the
/// halfway point) becomes `0.0003`. Scaling by `1e4` first would round the
/// product up to `3.5` and display `0.0004`.
///
/// Only for presentation; all arithmetic is done on unrounded values.
#[must_use]
pub fn round_for_display(value: f64) -> f64 {
    format!("{value:.DISPLAY_DECIMALS$}").parse().unwrap_or(value)
}

/// One scalar per axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AxisErrors {
    /// X-axis value.
    pub x: f64,
    /// Y-axis value.
    pub y: f64,
    /// Z-axis value.
    pub z: f64,
}

impl AxisErrors {
    /// Create from explicit per-axis values.
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Build by evaluating `f` once per axis.
    pub fn from_fn(mut f: impl FnMut(Axis) -> f64) -> Self {
        Self {
            x: f(Axis::X),
            y: f(Axis::Y),
            z: f(Axis::Z),
        }
    }

    /// Return the value for `axis`.
    #[must_use]
    pub const fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// Return a copy with every value rounded for display.
    #[must_use]
    pub fn rounded(&self) -> Self {
        Self::from_fn(|axis| round_for_display(self.get(axis)))
    }
}

impl Sub for AxisErrors {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::from_fn(|axis| self.get(axis) - rhs.get(axis))
    }
}

/// Error statistics of one candidate source against the reference.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorReport {
    /// Human-readable identifier of the candidate source.
    pub source_id: String,
    /// Metric the values were computed with.
    pub metric: MetricKind,
    /// Unrounded per-axis error values.
    pub axis_errors: AxisErrors,
}
