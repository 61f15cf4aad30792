//! Timestamped 3D position samples.

use std::fmt;

/// A point in time, stored as signed nanoseconds on a clock shared by all sources.
///
/// The epoch is whatever the sources agree on (Unix epoch for wall-clock data,
/// session start for duration-scaled data). Integer storage keeps distance
/// comparisons exact, which the tie-break rule depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Create a timestamp from nanoseconds since the shared epoch.
    #[must_use]
    pub const fn from_nanos(nanos: i64) -> Self {
        Self(nanos)
    }

    /// Create a timestamp from (fractional) seconds since the shared epoch.
    ///
    /// Returns `None` if `secs` is not finite or does not fit in `i64` nanoseconds.
    #[must_use]
    pub fn from_secs_f64(secs: f64) -> Option<Self> {
        if !secs.is_finite() {
            return None;
        }
        let nanos = (secs * 1e9).round();
        if nanos < i64::MIN as f64 || nanos >= i64::MAX as f64 {
            return None;
        }
        Some(Self(nanos as i64))
    }

    /// Return nanoseconds since the shared epoch.
    #[must_use]
    pub const fn as_nanos(self) -> i64 {
        self.0
    }

    /// Return seconds since the shared epoch.
    #[must_use]
    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / 1e9
    }

    /// Absolute distance to `other` in nanoseconds.
    #[must_use]
    pub const fn abs_diff(self, other: Self) -> u64 {
        self.0.abs_diff(other.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.9}s", self.as_secs_f64())
    }
}

/// One of the three spatial axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// X coordinate.
    X,
    /// Y coordinate.
    Y,
    /// Z coordinate.
    Z,
}

impl Axis {
    /// All axes in canonical order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Canonical lowercase name (`x`, `y`, `z`).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single position fix: timestamp plus canonical `x`, `y`, `z` coordinates.
///
/// Samples are write-once values; sources with different column conventions
/// are normalized to this shape at load time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// When the fix was taken.
    pub timestamp: Timestamp,
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
    /// Z coordinate.
    pub z: f64,
}

impl Sample {
    /// Create a new sample.
    #[must_use]
    pub const fn new(timestamp: Timestamp, x: f64, y: f64, z: f64) -> Self {
        Self { timestamp, x, y, z }
    }

    /// Return the coordinate along `axis`.
    #[must_use]
    pub const fn coord(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }
}
