//! Domain types for concord-io.

use concord_align::Series;

/// One source loaded from CSV and normalized to canonical `x, y, z` samples.
///
/// `ranges`, when the mapping names range columns, holds one `[x, y, z]`
/// entry per sample in the same (file) order as `series`.
#[derive(Debug, Clone)]
pub struct LoadedSource {
    /// The samples in file order.
    pub series: Series,
    /// Per-sample self-reported range values, if mapped.
    pub ranges: Option<Vec<[f64; 3]>>,
}

impl LoadedSource {
    /// Return the number of samples.
    #[must_use]
    pub fn n_samples(&self) -> usize {
        self.series.len()
    }

    /// Return the range rows as a slice, if mapped.
    #[must_use]
    pub fn ranges(&self) -> Option<&[[f64; 3]]> {
        self.ranges.as_deref()
    }
}
