//! Error types for series alignment.

use std::fmt;

use crate::sample::Timestamp;

/// Which side of an alignment a series plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesRole {
    /// The series that drives the alignment; one pair is produced per sample.
    Reference,
    /// The series searched for nearest matches.
    Candidate,
}

impl fmt::Display for SeriesRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reference => f.write_str("reference"),
            Self::Candidate => f.write_str("candidate"),
        }
    }
}

/// Errors from nearest-timestamp alignment.
#[derive(Debug, thiserror::Error)]
pub enum AlignError {
    /// Returned when either input series has no samples.
    #[error("{role} series must be non-empty")]
    EmptySeries {
        /// The side of the alignment that was empty.
        role: SeriesRole,
    },

    /// Returned in strict ordering mode when a timestamp is smaller than its predecessor.
    #[error("{role} series is not sorted: sample {index} at {current} is earlier than the preceding sample at {previous}")]
    UnsortedTimestamp {
        /// The side of the alignment that was out of order.
        role: SeriesRole,
        /// Zero-based index of the first out-of-order sample.
        index: usize,
        /// Timestamp of the sample at `index - 1`.
        previous: Timestamp,
        /// Timestamp of the sample at `index`.
        current: Timestamp,
    },
}

impl AlignError {
    /// The side of the alignment the error is about.
    #[must_use]
    pub const fn role(&self) -> SeriesRole {
        match self {
            Self::EmptySeries { role } | Self::UnsortedTimestamp { role, .. } => *role,
        }
    }
}
