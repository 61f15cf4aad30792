//! Error metrics over aligned pairs.

use std::fmt;
use std::str::FromStr;

use concord_align::{AlignedSeries, Axis};
use tracing::{debug, instrument};

use crate::error::EvalError;
use crate::report::AxisErrors;

/// The per-axis error statistic to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    /// Mean over pairs of `(reference - matched)²`.
    MeanSquaredError,
    /// Mean over pairs of `|reference - matched|`.
    MeanAbsoluteError,
}

impl MetricKind {
    /// All supported metrics.
    pub const ALL: [MetricKind; 2] = [MetricKind::MeanSquaredError, MetricKind::MeanAbsoluteError];

    /// Short lowercase name accepted by [`FromStr`].
    #[must_use]
    pub const fn short_name(self) -> &'static str {
        match self {
            Self::MeanSquaredError => "mse",
            Self::MeanAbsoluteError => "mae",
        }
    }

    fn pair_error(self, reference: f64, matched: f64) -> f64 {
        let d = reference - matched;
        match self {
            Self::MeanSquaredError => d * d,
            Self::MeanAbsoluteError => d.abs(),
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MeanSquaredError => f.write_str("mean squared error"),
            Self::MeanAbsoluteError => f.write_str("mean absolute error"),
        }
    }
}

impl FromStr for MetricKind {
    type Err = EvalError;

    /// Parse `mse`/`mae` or the long names, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "mse" | "mean_squared_error" => Ok(Self::MeanSquaredError),
            "mae" | "mean_absolute_error" => Ok(Self::MeanAbsoluteError),
            _ => Err(EvalError::UnknownMetric { name: s.to_string() }),
        }
    }
}

/// Compute `metric` independently for each axis over all pairs.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`EvalError::EmptyAlignedSequence`] | `aligned` has zero pairs |
#[instrument(skip_all, fields(metric = metric.short_name(), n_pairs = aligned.len()))]
pub fn evaluate(aligned: &AlignedSeries, metric: MetricKind) -> Result<AxisErrors, EvalError> {
    if aligned.is_empty() {
        return Err(EvalError::EmptyAlignedSequence);
    }
    let n = aligned.len() as f64;
    let errors = AxisErrors::from_fn(|axis: Axis| {
        aligned
            .axis_values(axis)
            .map(|(r, m)| metric.pair_error(r, m))
            .sum::<f64>()
            / n
    });
    debug!(x = errors.x, y = errors.y, z = errors.z, "axis errors computed");
    Ok(errors)
}
