//! Error types for agreement evaluation.

use concord_align::AlignError;

/// Errors from metric evaluation, table assembly, and the comparison pipeline.
#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    /// Returned when a metric is evaluated over zero aligned pairs.
    #[error("cannot evaluate a metric over an empty aligned sequence")]
    EmptyAlignedSequence,

    /// Returned when a metric name does not match any known metric.
    #[error("unknown metric \"{name}\" (expected mse or mae)")]
    UnknownMetric {
        /// The unrecognized name.
        name: String,
    },

    /// Returned when a reference uncertainty row is requested from zero range rows.
    #[error("cannot average an empty set of uncertainty ranges")]
    EmptyUncertainty,

    /// Returned when a comparison is run with other than one or two candidates.
    #[error("a comparison needs one or two candidate sources, got {got}")]
    CandidateCount {
        /// Number of candidates supplied.
        got: usize,
    },

    /// Wraps an alignment failure caused by the reference series itself.
    #[error("the reference series cannot be aligned")]
    Reference {
        /// Underlying alignment error.
        source: AlignError,
    },

    /// Wraps an alignment failure for a named candidate.
    #[error("failed to align candidate \"{source_id}\" against the reference")]
    Align {
        /// The candidate that failed to align.
        source_id: String,
        /// Underlying alignment error.
        source: AlignError,
    },

    /// Wraps a failure reported by a [`ReportSink`](crate::ReportSink).
    #[error("report sink failed")]
    Sink {
        /// Underlying sink error.
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}
