//! Per-source column mapping onto the canonical `time, x, y, z` layout.

use std::fmt;
use std::str::FromStr;

use crate::IoError;

/// Names of the CSV columns holding one source's timestamp, coordinates, and
/// optional per-axis range (self-reported uncertainty).
///
/// Names are matched exactly, including case: sources disagree on `X` vs `x`,
/// so the mapping is always explicit rather than inferred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    /// Timestamp column.
    pub time: String,
    /// X coordinate column.
    pub x: String,
    /// Y coordinate column.
    pub y: String,
    /// Z coordinate column.
    pub z: String,
    /// Optional X, Y, Z range columns.
    pub ranges: Option<[String; 3]>,
}

impl ColumnMapping {
    /// Create a mapping without range columns.
    #[must_use]
    pub fn new(time: &str, x: &str, y: &str, z: &str) -> Self {
        Self {
            time: time.to_string(),
            x: x.to_string(),
            y: y.to_string(),
            z: z.to_string(),
            ranges: None,
        }
    }

    /// `Time, X, Y, Z`.
    #[must_use]
    pub fn uppercase() -> Self {
        Self::new("Time", "X", "Y", "Z")
    }

    /// `Time, x, y, z`.
    #[must_use]
    pub fn lowercase() -> Self {
        Self::new("Time", "x", "y", "z")
    }

    /// Add per-axis range columns.
    #[must_use]
    pub fn with_ranges(mut self, x: &str, y: &str, z: &str) -> Self {
        self.ranges = Some([x.to_string(), y.to_string(), z.to_string()]);
        self
    }

    /// Return the coordinate column names in `x, y, z` order.
    #[must_use]
    pub fn axes(&self) -> [&str; 3] {
        [&self.x, &self.y, &self.z]
    }
}

impl FromStr for ColumnMapping {
    type Err = IoError;

    /// Parse `TIME,X,Y,Z` or `TIME,X,Y,Z,XRANGE,YRANGE,ZRANGE`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| IoError::InvalidColumnMapping {
            mapping: s.to_string(),
            reason: reason.to_string(),
        };
        let names: Vec<&str> = s.split(',').map(str::trim).collect();
        if names.iter().any(|n| n.is_empty()) {
            return Err(invalid("column names must be non-empty"));
        }
        match names.as_slice() {
            [t, x, y, z] => Ok(Self::new(t, x, y, z)),
            [t, x, y, z, rx, ry, rz] => Ok(Self::new(t, x, y, z).with_ranges(rx, ry, rz)),
            _ => Err(invalid("expected 4 names (time,x,y,z) or 7 (time,x,y,z,xrange,yrange,zrange)")),
        }
    }
}

impl fmt::Display for ColumnMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.time, self.x, self.y, self.z)?;
        if let Some([rx, ry, rz]) = &self.ranges {
            write!(f, ",{rx},{ry},{rz}")?;
        }
        Ok(())
    }
}
