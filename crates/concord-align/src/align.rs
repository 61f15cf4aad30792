//! Nearest-timestamp (asof) matching between a reference and a candidate series.

use std::borrow::Cow;

use tracing::{debug, instrument};

use crate::config::{AlignConfig, OrderPolicy, SearchStrategy, TieBreak};
use crate::error::{AlignError, SeriesRole};
use crate::pair::{AlignedPair, AlignedSeries};
use crate::sample::{Sample, Timestamp};
use crate::series::Series;

/// Align `reference` against `candidate` with the default configuration.
///
/// Each reference sample is paired with the candidate sample minimizing
/// `|reference.timestamp - candidate.timestamp|`. No distance cutoff is
/// applied: every reference sample gets a match, however far away. When two
/// candidates are equally near, the earlier one wins. Several reference
/// samples may share the same match when the candidate is sparser.
///
/// Both inputs are stable-sorted by timestamp first if they are not already
/// ascending; the returned pairs follow that sorted reference order.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`AlignError::EmptySeries`] | Either series is empty |
pub fn align(reference: &Series, candidate: &Series) -> Result<AlignedSeries, AlignError> {
    AlignConfig::default().align(reference, candidate)
}

#[instrument(skip_all, fields(n_reference = reference.len(), n_candidate = candidate.len()))]
pub(crate) fn align_with(
    config: &AlignConfig,
    reference: &Series,
    candidate: &Series,
) -> Result<AlignedSeries, AlignError> {
    if reference.is_empty() {
        return Err(AlignError::EmptySeries {
            role: SeriesRole::Reference,
        });
    }
    if candidate.is_empty() {
        return Err(AlignError::EmptySeries {
            role: SeriesRole::Candidate,
        });
    }

    let reference = ordered(reference, SeriesRole::Reference, config.order_policy)?;
    let candidate = ordered(candidate, SeriesRole::Candidate, config.order_policy)?;

    let pairs = match config.strategy {
        SearchStrategy::Sweep => sweep(&reference, &candidate, config.tie_break),
        SearchStrategy::BinarySearch => binary_search(&reference, &candidate, config.tie_break),
    };

    debug!(n_pairs = pairs.len(), strategy = ?config.strategy, "alignment complete");
    Ok(AlignedSeries::new(pairs))
}

/// Borrow the samples if already ascending, otherwise sort or reject per `policy`.
fn ordered(series: &Series, role: SeriesRole, policy: OrderPolicy) -> Result<Cow<'_, [Sample]>, AlignError> {
    let Some(index) = series.first_unsorted_index() else {
        return Ok(Cow::Borrowed(series.as_slice()));
    };
    match policy {
        OrderPolicy::Strict => {
            let samples = series.as_slice();
            Err(AlignError::UnsortedTimestamp {
                role,
                index,
                previous: samples[index - 1].timestamp,
                current: samples[index].timestamp,
            })
        }
        OrderPolicy::Sort => {
            debug!(%role, first_unsorted = index, "sorting out-of-order series");
            Ok(Cow::Owned(series.sorted().into_inner()))
        }
    }
}

/// Two-cursor merge pass over sorted inputs.
///
/// `next` only moves forward: since reference timestamps are non-decreasing,
/// the first candidate strictly after the current reference instant never
/// moves back.
fn sweep(reference: &[Sample], candidate: &[Sample], tie_break: TieBreak) -> Vec<AlignedPair> {
    let mut pairs = Vec::with_capacity(reference.len());
    let mut next = 0;
    for r in reference {
        while next < candidate.len() && candidate[next].timestamp <= r.timestamp {
            next += 1;
        }
        let idx = nearest_index(candidate, next, r.timestamp, tie_break);
        pairs.push(AlignedPair {
            reference: *r,
            matched: candidate[idx],
        });
    }
    pairs
}

fn binary_search(reference: &[Sample], candidate: &[Sample], tie_break: TieBreak) -> Vec<AlignedPair> {
    reference
        .iter()
        .map(|r| {
            let next = candidate.partition_point(|c| c.timestamp <= r.timestamp);
            let idx = nearest_index(candidate, next, r.timestamp, tie_break);
            AlignedPair {
                reference: *r,
                matched: candidate[idx],
            }
        })
        .collect()
}

/// Pick between the last candidate at or before `at` (`next - 1`) and the first
/// candidate after it (`next`). `candidate` must be non-empty.
fn nearest_index(candidate: &[Sample], next: usize, at: Timestamp, tie_break: TieBreak) -> usize {
    if next == 0 {
        return 0;
    }
    let before = next - 1;
    if next == candidate.len() {
        return before;
    }
    let d_before = at.abs_diff(candidate[before].timestamp);
    let d_after = candidate[next].timestamp.abs_diff(at);
    let take_before = match tie_break {
        TieBreak::EarlierWins => d_before <= d_after,
        TieBreak::LaterWins => d_before < d_after,
    };
    if take_before { before } else { next }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(t: i64, v: f64) -> Sample {
        Sample::new(Timestamp::from_nanos(t), v, v, v)
    }

    fn series(samples: &[(i64, f64)]) -> Series {
        samples.iter().map(|&(t, v)| s(t, v)).collect()
    }

    fn matched_values(aligned: &AlignedSeries) -> Vec<f64> {
        aligned.iter().map(|p| p.matched.x).collect()
    }

    #[test]
    fn exact_match_preferred_over_distant_sample() {
        let reference = Series::new(vec![Sample::new(Timestamp::from_nanos(0), 1.0, 1.0, 1.0)]);
        let candidate = Series::new(vec![
            Sample::new(Timestamp::from_nanos(0), 1.0, 1.0, 1.0),
            Sample::new(Timestamp::from_nanos(10), 5.0, 5.0, 5.0),
        ]);
        let aligned = align(&reference, &candidate).unwrap();
        assert_eq!(aligned.len(), 1);
        assert_eq!(aligned.pairs()[0].matched, candidate.as_slice()[0]);
    }

    #[test]
    fn sparse_candidate_matches_many_to_one() {
        let reference = series(&[(0, 0.0), (5, 0.0)]);
        let candidate = series(&[(2, 1.0)]);
        let aligned = align(&reference, &candidate).unwrap();
        assert_eq!(aligned.len(), 2);
        assert!(aligned.iter().all(|p| p.matched == candidate.as_slice()[0]));
    }

    #[test]
    fn empty_candidate_fails() {
        let reference = series(&[(0, 0.0)]);
        let err = align(&reference, &Series::default()).unwrap_err();
        assert!(matches!(err, AlignError::EmptySeries { role: SeriesRole::Candidate }));
    }

    #[test]
    fn empty_reference_fails() {
        let candidate = series(&[(0, 0.0)]);
        let err = align(&Series::default(), &candidate).unwrap_err();
        assert!(matches!(err, AlignError::EmptySeries { role: SeriesRole::Reference }));
    }

    #[test]
    fn equidistant_tie_goes_to_earlier_by_default() {
        let reference = series(&[(5, 0.0)]);
        let candidate = series(&[(0, 1.0), (10, 2.0)]);
        let aligned = align(&reference, &candidate).unwrap();
        assert_eq!(matched_values(&aligned), vec![1.0]);
    }

    #[test]
    fn equidistant_tie_goes_to_later_when_configured() {
        let reference = series(&[(5, 0.0)]);
        let candidate = series(&[(0, 1.0), (10, 2.0)]);
        let cfg = AlignConfig::new().with_tie_break(TieBreak::LaterWins);
        let aligned = cfg.align(&reference, &candidate).unwrap();
        assert_eq!(matched_values(&aligned), vec![2.0]);
    }

    #[test]
    fn later_wins_still_prefers_exact_match() {
        let reference = series(&[(10, 0.0)]);
        let candidate = series(&[(10, 1.0), (11, 2.0)]);
        let cfg = AlignConfig::new().with_tie_break(TieBreak::LaterWins);
        let aligned = cfg.align(&reference, &candidate).unwrap();
        assert_eq!(matched_values(&aligned), vec![1.0]);
    }

    #[test]
    fn reference_outside_candidate_span_matches_endpoints() {
        let reference = series(&[(-100, 0.0), (500, 0.0)]);
        let candidate = series(&[(0, 1.0), (10, 2.0), (20, 3.0)]);
        let aligned = align(&reference, &candidate).unwrap();
        assert_eq!(matched_values(&aligned), vec![1.0, 3.0]);
    }

    #[test]
    fn nearest_side_chosen_without_tie() {
        let reference = series(&[(3, 0.0), (7, 0.0)]);
        let candidate = series(&[(0, 1.0), (10, 2.0)]);
        let aligned = align(&reference, &candidate).unwrap();
        assert_eq!(matched_values(&aligned), vec![1.0, 2.0]);
    }

    #[test]
    fn duplicate_candidate_timestamps_pick_adjacent_sample() {
        // Earlier group: last sample at t=0. Later group: first sample at t=10.
        let candidate = series(&[(0, 1.0), (0, 2.0), (10, 3.0), (10, 4.0)]);
        let earlier = align(&series(&[(4, 0.0)]), &candidate).unwrap();
        assert_eq!(matched_values(&earlier), vec![2.0]);
        let later = align(&series(&[(6, 0.0)]), &candidate).unwrap();
        assert_eq!(matched_values(&later), vec![3.0]);
    }

    #[test]
    fn unsorted_inputs_are_sorted_before_matching() {
        let reference = series(&[(9, 0.0), (1, 0.0)]);
        let candidate = series(&[(10, 2.0), (0, 1.0)]);
        let aligned = align(&reference, &candidate).unwrap();
        let ref_times: Vec<i64> = aligned.iter().map(|p| p.reference.timestamp.as_nanos()).collect();
        assert_eq!(ref_times, vec![1, 9]);
        assert_eq!(matched_values(&aligned), vec![1.0, 2.0]);
    }

    #[test]
    fn strict_mode_rejects_unsorted_candidate() {
        let reference = series(&[(0, 0.0)]);
        let candidate = series(&[(0, 1.0), (10, 2.0), (5, 3.0)]);
        let cfg = AlignConfig::new().with_order_policy(OrderPolicy::Strict);
        let err = cfg.align(&reference, &candidate).unwrap_err();
        assert!(matches!(
            err,
            AlignError::UnsortedTimestamp {
                role: SeriesRole::Candidate,
                index: 2,
                ..
            }
        ));
    }

    #[test]
    fn strict_mode_accepts_sorted_input_with_duplicates() {
        let reference = series(&[(0, 0.0), (0, 0.0), (3, 0.0)]);
        let candidate = series(&[(1, 1.0), (1, 2.0)]);
        let cfg = AlignConfig::new().with_order_policy(OrderPolicy::Strict);
        let aligned = cfg.align(&reference, &candidate).unwrap();
        assert_eq!(aligned.len(), 3);
    }

    #[test]
    fn strategies_agree() {
        let reference = series(&[(-3, 0.0), (0, 0.0), (4, 0.0), (5, 0.0), (6, 0.0), (15, 0.0), (40, 0.0)]);
        let candidate = series(&[(0, 1.0), (0, 2.0), (10, 3.0), (12, 4.0), (30, 5.0)]);
        for tie_break in [TieBreak::EarlierWins, TieBreak::LaterWins] {
            let sweep = AlignConfig::new()
                .with_tie_break(tie_break)
                .align(&reference, &candidate)
                .unwrap();
            let bsearch = AlignConfig::new()
                .with_tie_break(tie_break)
                .with_strategy(SearchStrategy::BinarySearch)
                .align(&reference, &candidate)
                .unwrap();
            assert_eq!(sweep, bsearch, "strategies disagree for {tie_break:?}");
        }
    }
}
