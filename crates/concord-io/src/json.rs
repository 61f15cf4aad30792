//! JSON output: a [`ReportSink`] that collects a serializable document.

use std::convert::Infallible;

use concord_align::{AlignedSeries, OffsetSummary};
use concord_eval::{AgreementStats, AxisAgreement, AxisErrors, CandidateResult, ComparisonTable, ReportSink, RowKind};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize)]
struct AxisValues {
    x: f64,
    y: f64,
    z: f64,
}

impl From<AxisErrors> for AxisValues {
    fn from(v: AxisErrors) -> Self {
        Self { x: v.x, y: v.y, z: v.z }
    }
}

/// One aligned pair, flattened for output.
#[derive(Debug, Clone, Serialize)]
pub struct PairRecord {
    /// Reference timestamp in seconds.
    pub reference_time_s: f64,
    /// Matched candidate timestamp in seconds.
    pub matched_time_s: f64,
    /// Reference `[x, y, z]`.
    pub reference: [f64; 3],
    /// Matched candidate `[x, y, z]`.
    pub matched: [f64; 3],
}

/// Flatten an aligned series into [`PairRecord`]s, in reference order.
#[must_use]
pub fn pair_records(aligned: &AlignedSeries) -> Vec<PairRecord> {
    aligned
        .iter()
        .map(|p| PairRecord {
            reference_time_s: p.reference.timestamp.as_secs_f64(),
            matched_time_s: p.matched.timestamp.as_secs_f64(),
            reference: [p.reference.x, p.reference.y, p.reference.z],
            matched: [p.matched.x, p.matched.y, p.matched.z],
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
struct OffsetDocument {
    mean_abs_s: f64,
    max_abs_s: f64,
    n_exact: usize,
}

impl From<OffsetSummary> for OffsetDocument {
    fn from(o: OffsetSummary) -> Self {
        Self {
            mean_abs_s: o.mean_abs_secs,
            max_abs_s: o.max_abs_secs,
            n_exact: o.n_exact,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct AgreementDocument {
    bias: f64,
    sd: f64,
    lower_limit: f64,
    upper_limit: f64,
}

impl From<&AgreementStats> for AgreementDocument {
    fn from(s: &AgreementStats) -> Self {
        Self {
            bias: s.mean_difference,
            sd: s.std_difference,
            lower_limit: s.lower_limit,
            upper_limit: s.upper_limit,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct AxisAgreementDocument {
    x: AgreementDocument,
    y: AgreementDocument,
    z: AgreementDocument,
}

impl From<&AxisAgreement> for AxisAgreementDocument {
    fn from(a: &AxisAgreement) -> Self {
        Self {
            x: (&a.x).into(),
            y: (&a.y).into(),
            z: (&a.z).into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct CandidateDocument {
    source_id: String,
    n_pairs: usize,
    errors: AxisValues,
    offsets: OffsetDocument,
    agreement: AxisAgreementDocument,
    #[serde(skip_serializing_if = "Option::is_none")]
    pairs: Option<Vec<PairRecord>>,
}

#[derive(Debug, Clone, Serialize)]
struct RowDocument {
    label: String,
    kind: &'static str,
    /// Rounded for display.
    values: AxisValues,
    unrounded: AxisValues,
}

/// The full JSON report of one comparison run.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonDocument {
    metric: &'static str,
    candidates: Vec<CandidateDocument>,
    table: Vec<RowDocument>,
}

impl ComparisonDocument {
    /// Serialize as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns the serializer error; only possible for non-string map keys,
    /// which this document never contains.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// A [`ReportSink`] that accumulates results into a [`ComparisonDocument`].
#[derive(Debug, Default)]
pub struct JsonSink {
    include_pairs: bool,
    candidates: Vec<CandidateDocument>,
    table: Option<(&'static str, Vec<RowDocument>)>,
}

impl JsonSink {
    /// Create a sink; `include_pairs` adds every aligned pair to the output.
    #[must_use]
    pub fn new(include_pairs: bool) -> Self {
        Self {
            include_pairs,
            ..Self::default()
        }
    }

    /// Return the collected document, or `None` if no table was received.
    #[must_use]
    pub fn into_document(self) -> Option<ComparisonDocument> {
        let (metric, table) = self.table?;
        Some(ComparisonDocument {
            metric,
            candidates: self.candidates,
            table,
        })
    }
}

impl ReportSink for JsonSink {
    type Error = Infallible;

    fn candidate(&mut self, result: &CandidateResult) -> Result<(), Self::Error> {
        self.candidates.push(CandidateDocument {
            source_id: result.report.source_id.clone(),
            n_pairs: result.aligned.len(),
            errors: result.report.axis_errors.into(),
            offsets: result.offsets.into(),
            agreement: (&result.agreement).into(),
            pairs: self.include_pairs.then(|| pair_records(&result.aligned)),
        });
        Ok(())
    }

    fn table(&mut self, table: &ComparisonTable) -> Result<(), Self::Error> {
        let rows = table
            .rows()
            .iter()
            .map(|row| RowDocument {
                label: row.label.clone(),
                kind: match row.kind {
                    RowKind::Source => "source",
                    RowKind::Difference => "difference",
                    RowKind::ReferenceUncertainty => "reference_uncertainty",
                },
                values: row.display_values().into(),
                unrounded: row.values.into(),
            })
            .collect();
        self.table = Some((table.metric().short_name(), rows));
        Ok(())
    }
}
