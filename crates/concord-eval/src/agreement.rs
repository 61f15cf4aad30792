//! Bland-Altman (mean-difference) agreement statistics.

use concord_align::{AlignedSeries, Axis};

use crate::error::EvalError;

/// z-score for the 95% limits of agreement.
const LIMITS_Z: f64 = 1.96;

/// Agreement between the reference and a candidate along one axis.
///
/// Differences are `reference - matched`. The standard deviation is the
/// population value (divides by n).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgreementStats {
    /// Mean difference (bias).
    pub mean_difference: f64,
    /// Standard deviation of the differences.
    pub std_difference: f64,
    /// `mean_difference - 1.96 * std_difference`.
    pub lower_limit: f64,
    /// `mean_difference + 1.96 * std_difference`.
    pub upper_limit: f64,
}

impl AgreementStats {
    fn from_differences(diffs: impl Iterator<Item = f64> + Clone, n: usize) -> Self {
        let n = n as f64;
        let mean = diffs.clone().sum::<f64>() / n;
        let variance = diffs.map(|d| (d - mean).powi(2)).sum::<f64>() / n;
        let std = variance.sqrt();
        Self {
            mean_difference: mean,
            std_difference: std,
            lower_limit: mean - LIMITS_Z * std,
            upper_limit: mean + LIMITS_Z * std,
        }
    }
}

/// Agreement statistics for all three axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisAgreement {
    /// X-axis agreement.
    pub x: AgreementStats,
    /// Y-axis agreement.
    pub y: AgreementStats,
    /// Z-axis agreement.
    pub z: AgreementStats,
}

impl AxisAgreement {
    /// Return the statistics for `axis`.
    #[must_use]
    pub const fn get(&self, axis: Axis) -> &AgreementStats {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
        }
    }
}

/// Compute Bland-Altman statistics for each axis of `aligned`.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`EvalError::EmptyAlignedSequence`] | `aligned` has zero pairs |
pub fn agreement(aligned: &AlignedSeries) -> Result<AxisAgreement, EvalError> {
    if aligned.is_empty() {
        return Err(EvalError::EmptyAlignedSequence);
    }
    let n = aligned.len();
    let per_axis =
        |axis: Axis| AgreementStats::from_differences(aligned.iter().map(move |p| p.difference(axis)), n);
    Ok(AxisAgreement {
        x: per_axis(Axis::X),
        y: per_axis(Axis::Y),
        z: per_axis(Axis::Z),
    })
}
