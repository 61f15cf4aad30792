//! Comparison table assembly.

use tracing::debug;

use crate::error::EvalError;
use crate::metric::MetricKind;
use crate::report::{AxisErrors, ErrorReport};

/// What a table row represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    /// Metric values of one candidate against the reference.
    Source,
    /// First candidate's values minus the second's.
    Difference,
    /// Mean of the reference's self-reported per-axis range. Not a metric.
    ReferenceUncertainty,
}

/// One labelled row of per-axis values.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    /// Row label shown in the first column.
    pub label: String,
    /// What the row represents.
    pub kind: RowKind,
    /// Unrounded values.
    pub values: AxisErrors,
}

impl TableRow {
    /// Values rounded for display.
    #[must_use]
    pub fn display_values(&self) -> AxisErrors {
        self.values.rounded()
    }
}

/// The summary table handed to a [`ReportSink`](crate::ReportSink).
///
/// Rows appear in this order: one per source, then `Difference` when exactly
/// two sources are compared, then the reference uncertainty row if provided.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonTable {
    metric: MetricKind,
    rows: Vec<TableRow>,
}

impl ComparisonTable {
    /// Label of the difference row.
    pub const DIFFERENCE_LABEL: &'static str = "Difference";
    /// Label of the reference uncertainty row.
    pub const UNCERTAINTY_LABEL: &'static str = "Reference range";

    /// Assemble a table from per-source reports.
    ///
    /// The difference row subtracts unrounded values; rounding happens only
    /// when a row is displayed.
    #[must_use]
    pub fn new(metric: MetricKind, reports: &[ErrorReport], reference_uncertainty: Option<AxisErrors>) -> Self {
        let mut rows: Vec<TableRow> = reports
            .iter()
            .map(|r| TableRow {
                label: r.source_id.clone(),
                kind: RowKind::Source,
                values: r.axis_errors,
            })
            .collect();

        if let [a, b] = reports {
            rows.push(TableRow {
                label: Self::DIFFERENCE_LABEL.to_string(),
                kind: RowKind::Difference,
                values: a.axis_errors - b.axis_errors,
            });
        }

        if let Some(values) = reference_uncertainty {
            rows.push(TableRow {
                label: Self::UNCERTAINTY_LABEL.to_string(),
                kind: RowKind::ReferenceUncertainty,
                values,
            });
        }

        debug!(n_rows = rows.len(), "comparison table assembled");
        Self { metric, rows }
    }

    /// Return the metric the source rows were computed with.
    #[must_use]
    pub fn metric(&self) -> MetricKind {
        self.metric
    }

    /// Return all rows in display order.
    #[must_use]
    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    /// Return the difference row, if present.
    #[must_use]
    pub fn difference(&self) -> Option<&TableRow> {
        self.rows.iter().find(|r| r.kind == RowKind::Difference)
    }

    /// Return the reference uncertainty row, if present.
    #[must_use]
    pub fn reference_uncertainty(&self) -> Option<&TableRow> {
        self.rows.iter().find(|r| r.kind == RowKind::ReferenceUncertainty)
    }
}

/// Average per-axis range values into a single uncertainty row.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`EvalError::EmptyUncertainty`] | `ranges` is empty |
pub fn mean_uncertainty(ranges: &[[f64; 3]]) -> Result<AxisErrors, EvalError> {
    if ranges.is_empty() {
        return Err(EvalError::EmptyUncertainty);
    }
    let n = ranges.len() as f64;
    let mean = |i: usize| ranges.iter().map(|r| r[i]).sum::<f64>() / n;
    Ok(AxisErrors::new(mean(0), mean(1), mean(2)))
}
