//! Presentation hand-off.

use crate::pipeline::CandidateResult;
use crate::table::ComparisonTable;

/// Receives the results of a comparison run for rendering.
///
/// The pipeline calls [`candidate`](ReportSink::candidate) once per candidate,
/// in the order candidates were supplied, and then [`table`](ReportSink::table)
/// once. Implementations decide how (and whether) to draw or print; the
/// computation never depends on them.
pub trait ReportSink {
    /// Error produced by the sink.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Point-level results for one candidate: full pair sequence, metric
    /// values, agreement statistics, and time offsets.
    fn candidate(&mut self, result: &CandidateResult) -> Result<(), Self::Error>;

    /// The assembled comparison table.
    fn table(&mut self, table: &ComparisonTable) -> Result<(), Self::Error>;
}

impl<S: ReportSink + ?Sized> ReportSink for &mut S {
    type Error = S::Error;

    fn candidate(&mut self, result: &CandidateResult) -> Result<(), Self::Error> {
        (**self).candidate(result)
    }

    fn table(&mut self, table: &ComparisonTable) -> Result<(), Self::Error> {
        (**self).table(table)
    }
}
