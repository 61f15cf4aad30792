//! Alignment output: one pair per reference sample.

use crate::sample::{Axis, Sample};

/// A reference sample and the candidate sample chosen as its nearest match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignedPair {
    /// The reference sample driving this pair.
    pub reference: Sample,
    /// The candidate sample nearest in time to `reference`.
    pub matched: Sample,
}

impl AlignedPair {
    /// Absolute time distance between the two samples, in nanoseconds.
    #[must_use]
    pub fn abs_offset_nanos(&self) -> u64 {
        self.reference.timestamp.abs_diff(self.matched.timestamp)
    }

    /// `reference - matched` along `axis`.
    #[must_use]
    pub fn difference(&self, axis: Axis) -> f64 {
        self.reference.coord(axis) - self.matched.coord(axis)
    }
}

/// Summary of how far matched timestamps drifted from their reference timestamps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffsetSummary {
    /// Mean absolute offset in seconds.
    pub mean_abs_secs: f64,
    /// Largest absolute offset in seconds.
    pub max_abs_secs: f64,
    /// Number of pairs whose timestamps are identical.
    pub n_exact: usize,
}

/// The full pair sequence produced by one alignment.
///
/// Always has exactly as many pairs as the reference series had samples,
/// ordered by reference timestamp.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlignedSeries(Vec<AlignedPair>);

impl AlignedSeries {
    /// Wrap an existing pair sequence.
    #[must_use]
    pub fn new(pairs: Vec<AlignedPair>) -> Self {
        Self(pairs)
    }

    /// Return the number of pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return true if there are no pairs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Return the pairs as a slice.
    #[must_use]
    pub fn pairs(&self) -> &[AlignedPair] {
        &self.0
    }

    /// Iterate over the pairs.
    pub fn iter(&self) -> std::slice::Iter<'_, AlignedPair> {
        self.0.iter()
    }

    /// Iterate over `(reference, matched)` coordinate values along `axis`.
    pub fn axis_values(&self, axis: Axis) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.0
            .iter()
            .map(move |p| (p.reference.coord(axis), p.matched.coord(axis)))
    }

    /// Summarize the time offsets between each reference sample and its match.
    ///
    /// Returns `None` for an empty sequence.
    #[must_use]
    pub fn offset_summary(&self) -> Option<OffsetSummary> {
        if self.0.is_empty() {
            return None;
        }
        let mut sum = 0.0;
        let mut max = 0u64;
        let mut n_exact = 0;
        for pair in &self.0 {
            let offset = pair.abs_offset_nanos();
            sum += offset as f64;
            max = max.max(offset);
            if offset == 0 {
                n_exact += 1;
            }
        }
        Some(OffsetSummary {
            mean_abs_secs: sum / self.0.len() as f64 / 1e9,
            max_abs_secs: max as f64 / 1e9,
            n_exact,
        })
    }

    /// Consume and return the inner vector.
    #[must_use]
    pub fn into_inner(self) -> Vec<AlignedPair> {
        self.0
    }
}

impl<'a> IntoIterator for &'a AlignedSeries {
    type Item = &'a AlignedPair;
    type IntoIter = std::slice::Iter<'a, AlignedPair>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
