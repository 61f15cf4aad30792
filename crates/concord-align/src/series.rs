//! Ordered collections of samples from one tracking source.

use crate::sample::Sample;

/// A sequence of samples from one source, nominally in ascending time order.
///
/// Order is not enforced on construction: alignment sorts defensively unless
/// strict ordering is requested. May be empty; emptiness is rejected by
/// [`align`](crate::align), not here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series(Vec<Sample>);

impl Series {
    /// Create a series from samples in their recorded order.
    #[must_use]
    pub fn new(samples: Vec<Sample>) -> Self {
        Self(samples)
    }

    /// Return the number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return true if the series has no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Return the samples as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Sample] {
        &self.0
    }

    /// Iterate over the samples in stored order.
    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.0.iter()
    }

    /// Index of the first sample whose timestamp is smaller than its predecessor's.
    ///
    /// Equal consecutive timestamps are considered ordered.
    #[must_use]
    pub fn first_unsorted_index(&self) -> Option<usize> {
        self.0
            .windows(2)
            .position(|w| w[1].timestamp < w[0].timestamp)
            .map(|i| i + 1)
    }

    /// Return true if timestamps are non-decreasing.
    #[must_use]
    pub fn is_sorted(&self) -> bool {
        self.first_unsorted_index().is_none()
    }

    /// Return a copy sorted ascending by timestamp.
    ///
    /// The sort is stable: samples sharing a timestamp keep their relative order.
    #[must_use]
    pub fn sorted(&self) -> Self {
        let mut samples = self.0.clone();
        samples.sort_by_key(|s| s.timestamp);
        Self(samples)
    }

    /// Consume and return the inner vector.
    #[must_use]
    pub fn into_inner(self) -> Vec<Sample> {
        self.0
    }
}

impl From<Vec<Sample>> for Series {
    fn from(samples: Vec<Sample>) -> Self {
        Self::new(samples)
    }
}

impl FromIterator<Sample> for Series {
    fn from_iter<I: IntoIterator<Item = Sample>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl AsRef<[Sample]> for Series {
    fn as_ref(&self) -> &[Sample] {
        &self.0
    }
}

impl<'a> IntoIterator for &'a Series {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::Timestamp;

    fn at(nanos: i64, x: f64) -> Sample {
        Sample::new(Timestamp::from_nanos(nanos), x, 0.0, 0.0)
    }

    #[test]
    fn sorted_series_has_no_unsorted_index() {
        let s = Series::new(vec![at(0, 0.0), at(1, 0.0), at(1, 0.0), at(5, 0.0)]);
        assert!(s.is_sorted());
        assert_eq!(s.first_unsorted_index(), None);
    }

    #[test]
    fn detects_first_out_of_order_sample() {
        let s = Series::new(vec![at(0, 0.0), at(4, 0.0), at(2, 0.0), at(1, 0.0)]);
        assert_eq!(s.first_unsorted_index(), Some(2));
        assert!(!s.is_sorted());
    }

    #[test]
    fn sort_is_stable_for_equal_timestamps() {
        let s = Series::new(vec![at(3, 1.0), at(1, 2.0), at(3, 3.0), at(1, 4.0)]);
        let xs: Vec<f64> = s.sorted().iter().map(|s| s.x).collect();
        assert_eq!(xs, vec![2.0, 4.0, 1.0, 3.0]);
    }

    #[test]
    fn empty_series_is_sorted() {
        let s = Series::default();
        assert!(s.is_empty());
        assert!(s.is_sorted());
    }
}
