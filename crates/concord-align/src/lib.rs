//! Nearest-timestamp alignment of 3D position series.
//!
//! Pure math library, zero I/O. Pairs every sample of a reference series
//! with the candidate sample whose timestamp is closest (asof matching with
//! direction "nearest"), using a two-cursor merge sweep over the sorted
//! inputs or an optional binary-search fallback.

mod align;
mod config;
mod error;
mod pair;
mod sample;
mod series;

pub use align::align;
pub use config::{AlignConfig, OrderPolicy, SearchStrategy, TieBreak};
pub use error::{AlignError, SeriesRole};
pub use pair::{AlignedPair, AlignedSeries, OffsetSummary};
pub use sample::{Axis, Sample, Timestamp};
pub use series::Series;
