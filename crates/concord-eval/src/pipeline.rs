//! One-shot comparison: align each candidate, evaluate, assemble, hand off.

use concord_align::{AlignConfig, AlignedSeries, OffsetSummary, Series, SeriesRole};
use rayon::prelude::*;
use tracing::{info, instrument};

use crate::agreement::{AxisAgreement, agreement};
use crate::error::EvalError;
use crate::metric::{MetricKind, evaluate};
use crate::report::ErrorReport;
use crate::sink::ReportSink;
use crate::table::{ComparisonTable, mean_uncertainty};

/// A named candidate series to compare against the reference.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    /// Label used in reports and error messages.
    pub source_id: &'a str,
    /// The candidate's samples.
    pub series: &'a Series,
}

impl<'a> Candidate<'a> {
    /// Create a new candidate.
    #[must_use]
    pub fn new(source_id: &'a str, series: &'a Series) -> Self {
        Self { source_id, series }
    }
}

/// Everything computed for one candidate.
#[derive(Debug, Clone)]
pub struct CandidateResult {
    /// Full pair sequence against the reference.
    pub aligned: AlignedSeries,
    /// Metric values.
    pub report: ErrorReport,
    /// Bland-Altman statistics.
    pub agreement: AxisAgreement,
    /// Time offsets between reference samples and their matches.
    pub offsets: OffsetSummary,
}

/// Result of a full comparison run.
#[derive(Debug, Clone)]
pub struct ComparisonOutcome {
    /// Per-candidate results in the order candidates were supplied.
    pub candidates: Vec<CandidateResult>,
    /// The summary table.
    pub table: ComparisonTable,
}

/// Configuration for a comparison run.
///
/// Construct via [`Comparison::new`], then chain `with_*` methods to override defaults.
///
/// # Defaults
///
/// | Parameter      | Default                  |
/// |----------------|--------------------------|
/// | `align_config` | [`AlignConfig::default`] |
/// | `parallel`     | true                     |
#[derive(Debug, Clone)]
pub struct Comparison {
    metric: MetricKind,
    align_config: AlignConfig,
    parallel: bool,
}

impl Comparison {
    /// Create a comparison computing `metric`.
    #[must_use]
    pub fn new(metric: MetricKind) -> Self {
        Self {
            metric,
            align_config: AlignConfig::default(),
            parallel: true,
        }
    }

    /// Set the alignment configuration used for every candidate.
    #[must_use]
    pub fn with_align_config(mut self, align_config: AlignConfig) -> Self {
        self.align_config = align_config;
        self
    }

    /// Align candidates concurrently on the rayon pool. Results are identical
    /// either way.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Return the metric.
    #[must_use]
    pub fn metric(&self) -> MetricKind {
        self.metric
    }

    /// Run the comparison and hand results to `sink`.
    ///
    /// Any failure aborts the whole run; no partial table is produced.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`EvalError::CandidateCount`] | Zero or more than two candidates |
    /// | [`EvalError::Reference`] | The reference is empty, or unsorted under a strict order policy |
    /// | [`EvalError::Align`] | A candidate failed to align |
    /// | [`EvalError::EmptyUncertainty`] | `reference_ranges` is `Some` but empty |
    /// | [`EvalError::Sink`] | The sink rejected a result |
    #[instrument(skip_all, fields(metric = self.metric.short_name(), n_candidates = candidates.len()))]
    pub fn run<S: ReportSink>(
        &self,
        reference: &Series,
        reference_ranges: Option<&[[f64; 3]]>,
        candidates: &[Candidate<'_>],
        mut sink: S,
    ) -> Result<ComparisonOutcome, EvalError> {
        if candidates.is_empty() || candidates.len() > 2 {
            return Err(EvalError::CandidateCount { got: candidates.len() });
        }

        let results: Vec<CandidateResult> = if self.parallel {
            candidates
                .par_iter()
                .map(|c| self.run_candidate(reference, c))
                .collect::<Result<_, _>>()?
        } else {
            candidates
                .iter()
                .map(|c| self.run_candidate(reference, c))
                .collect::<Result<_, _>>()?
        };

        let uncertainty = reference_ranges.map(mean_uncertainty).transpose()?;
        let reports: Vec<ErrorReport> = results.iter().map(|r| r.report.clone()).collect();
        let table = ComparisonTable::new(self.metric, &reports, uncertainty);

        for result in &results {
            sink.candidate(result).map_err(|e| EvalError::Sink { source: Box::new(e) })?;
        }
        sink.table(&table).map_err(|e| EvalError::Sink { source: Box::new(e) })?;

        Ok(ComparisonOutcome {
            candidates: results,
            table,
        })
    }

    fn run_candidate(&self, reference: &Series, candidate: &Candidate<'_>) -> Result<CandidateResult, EvalError> {
        let aligned = self
            .align_config
            .align(reference, candidate.series)
            .map_err(|e| match e.role() {
                SeriesRole::Reference => EvalError::Reference { source: e },
                SeriesRole::Candidate => EvalError::Align {
                    source_id: candidate.source_id.to_string(),
                    source: e,
                },
            })?;

        let axis_errors = evaluate(&aligned, self.metric)?;
        let agreement = agreement(&aligned)?;
        let offsets = aligned.offset_summary().ok_or(EvalError::EmptyAlignedSequence)?;

        info!(
            source = candidate.source_id,
            n_pairs = aligned.len(),
            x = axis_errors.x,
            y = axis_errors.y,
            z = axis_errors.z,
            mean_offset_s = offsets.mean_abs_secs,
            max_offset_s = offsets.max_abs_secs,
            "candidate evaluated"
        );

        Ok(CandidateResult {
            aligned,
            report: ErrorReport {
                source_id: candidate.source_id.to_string(),
                metric: self.metric,
                axis_errors,
            },
            agreement,
            offsets,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use concord_align::{AlignError, OrderPolicy, Sample, Timestamp};

    #[derive(Default)]
    struct RecordingSink {
        candidates: Vec<String>,
        tables: usize,
    }

    impl ReportSink for RecordingSink {
        type Error = std::io::Error;

        fn candidate(&mut self, result: &CandidateResult) -> Result<(), Self::Error> {
            self.candidates.push(result.report.source_id.clone());
            Ok(())
        }

        fn table(&mut self, _table: &ComparisonTable) -> Result<(), Self::Error> {
            self.tables += 1;
            Ok(())
        }
    }

    struct FailingSink;

    impl ReportSink for FailingSink {
        type Error = std::io::Error;

        fn candidate(&mut self, _result: &CandidateResult) -> Result<(), Self::Error> {
            Err(std::io::Error::other("closed"))
        }

        fn table(&mut self, _table: &ComparisonTable) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    fn series(samples: &[(i64, f64)]) -> Series {
        samples
            .iter()
            .map(|&(t, v)| Sample::new(Timestamp::from_nanos(t), v, v, v))
            .collect()
    }

    #[test]
    fn two_candidates_produce_difference_row() {
        let reference = series(&[(0, 0.0), (10, 0.0), (20, 0.0)]);
        let a = series(&[(1, 1.0), (11, 1.0), (21, 1.0)]);
        let b = series(&[(0, 0.5), (20, 0.5)]);
        let mut sink = RecordingSink::default();
        let outcome = Comparison::new(MetricKind::MeanSquaredError)
            .run(
                &reference,
                None,
                &[Candidate::new("System 1", &a), Candidate::new("System 2", &b)],
                &mut sink,
            )
            .unwrap();

        assert_eq!(sink.candidates, vec!["System 1", "System 2"]);
        assert_eq!(sink.tables, 1);
        assert_eq!(outcome.candidates.len(), 2);
        assert_eq!(outcome.candidates[0].aligned.len(), 3);
        assert_eq!(outcome.candidates[1].aligned.len(), 3);
        let diff = outcome.table.difference().unwrap();
        assert!((diff.values.x - 0.75).abs() < 1e-12);
    }

    #[test]
    fn parallel_and_sequential_agree() {
        let reference = series(&[(0, 0.0), (7, 1.0), (13, 2.0), (30, 3.0)]);
        let a = series(&[(1, 0.1), (12, 2.2), (29, 2.9)]);
        let b = series(&[(5, 1.5), (25, 2.5)]);
        let candidates = [Candidate::new("a", &a), Candidate::new("b", &b)];
        let par = Comparison::new(MetricKind::MeanAbsoluteError)
            .run(&reference, None, &candidates, RecordingSink::default())
            .unwrap();
        let seq = Comparison::new(MetricKind::MeanAbsoluteError)
            .with_parallel(false)
            .run(&reference, None, &candidates, RecordingSink::default())
            .unwrap();
        assert_eq!(par.table, seq.table);
    }

    #[test]
    fn reference_ranges_add_uncertainty_row() {
        let reference = series(&[(0, 0.0), (10, 0.0)]);
        let a = series(&[(0, 1.0)]);
        let ranges = [[0.2, 0.4, 0.6], [0.4, 0.6, 0.8]];
        let outcome = Comparison::new(MetricKind::MeanAbsoluteError)
            .run(&reference, Some(&ranges[..]), &[Candidate::new("a", &a)], RecordingSink::default())
            .unwrap();
        let row = outcome.table.reference_uncertainty().unwrap();
        assert!((row.values.x - 0.3).abs() < 1e-12);
        assert!((row.values.z - 0.7).abs() < 1e-12);
    }

    #[test]
    fn empty_candidate_aborts_run() {
        let reference = series(&[(0, 0.0)]);
        let a = series(&[(0, 1.0)]);
        let empty = Series::default();
        let mut sink = RecordingSink::default();
        let err = Comparison::new(MetricKind::MeanSquaredError)
            .run(
                &reference,
                None,
                &[Candidate::new("a", &a), Candidate::new("b", &empty)],
                &mut sink,
            )
            .unwrap_err();
        assert!(matches!(
            err,
            EvalError::Align {
                ref source_id,
                source: AlignError::EmptySeries { .. }
            } if source_id == "b"
        ));
        assert!(sink.candidates.is_empty(), "no partial results may reach the sink");
        assert_eq!(sink.tables, 0);
    }

    #[test]
    fn unsorted_reference_is_reported_as_reference_failure() {
        let reference = series(&[(10, 0.0), (0, 1.0)]);
        let a = series(&[(0, 1.0), (10, 2.0)]);
        let err = Comparison::new(MetricKind::MeanSquaredError)
            .with_align_config(AlignConfig::new().with_order_policy(OrderPolicy::Strict))
            .run(&reference, None, &[Candidate::new("a", &a)], RecordingSink::default())
            .unwrap_err();
        assert!(matches!(
            err,
            EvalError::Reference {
                source: AlignError::UnsortedTimestamp { index: 1, .. }
            }
        ));
    }

    #[test]
    fn rejects_three_candidates() {
        let reference = series(&[(0, 0.0)]);
        let a = series(&[(0, 1.0)]);
        let candidates = [Candidate::new("a", &a), Candidate::new("b", &a), Candidate::new("c", &a)];
        let err = Comparison::new(MetricKind::MeanSquaredError)
            .run(&reference, None, &candidates, RecordingSink::default())
            .unwrap_err();
        assert!(matches!(err, EvalError::CandidateCount { got: 3 }));
    }

    #[test]
    fn sink_failure_is_reported() {
        let reference = series(&[(0, 0.0)]);
        let a = series(&[(0, 1.0)]);
        let err = Comparison::new(MetricKind::MeanSquaredError)
            .run(&reference, None, &[Candidate::new("a", &a)], FailingSink)
            .unwrap_err();
        assert!(matches!(err, EvalError::Sink { .. }));
    }
}
