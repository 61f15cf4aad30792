//! Per-axis agreement metrics between a reference and aligned candidates.
//!
//! Pure computation, zero I/O. Computes mean squared or mean absolute error
//! per axis over [`AlignedSeries`](concord_align::AlignedSeries), assembles a
//! comparison table with a difference row, derives Bland-Altman agreement
//! statistics, and hands everything to a [`ReportSink`] for rendering.

mod agreement;
mod error;
mod metric;
mod pipeline;
mod report;
mod sink;
mod table;

pub use agreement::{AgreementStats, AxisAgreement, agreement};
pub use error::EvalError;
pub use metric::{MetricKind, evaluate};
pub use pipeline::{Candidate, CandidateResult, Comparison, ComparisonOutcome};
pub use report::{AxisErrors, DISPLAY_DECIMALS, ErrorReport, round_for_display};
pub use sink::ReportSink;
pub use table::{ComparisonTable, RowKind, TableRow, mean_uncertainty};
