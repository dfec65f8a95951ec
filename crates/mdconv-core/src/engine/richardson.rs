//! Richardson-extrapolation diagnostics over a step-size refinement sequence.
//!
//! Given observations `A_h` of one scalar at step sizes `h_0 > h_1 > ... > h_n`
//! (each assumed to be the previous divided by a fixed ratio `r`), the table carries,
//! per step size:
//!
//! - the Richardson fraction `F_h[i] = (A[i-1] - A[i-2]) / (A[i] - A[i-1])` for `i >= 2`,
//!   which tends to `r^p` once the method of order `p` is in its asymptotic regime;
//! - the error estimate `E_h[i] = (A[i] - A[i-1]) / (r^p - 1)` for `i >= 1`, the
//!   discretization error left at `h_i`;
//! - the observed order `ln F_h / ln r` and the extrapolated value `A_h + E_h`.
//!
//! The refinement sequence is not validated. Feeding step sizes that are not a
//! geometric sequence yields well-formed but meaningless numbers.

use super::config::RichardsonParams;
use super::error::EngineError;
use super::projection::Projection;
use crate::core::models::series::{StepSize, StepSizeSeries};
use std::fmt;

/// Minimum number of step sizes before any Richardson fraction exists.
pub const MIN_STEPS_FOR_RATIO: usize = 3;
/// Minimum number of step sizes before any error estimate exists.
pub const MIN_STEPS_FOR_ERROR: usize = 2;

/// One derived cell of a convergence row.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Estimate {
    /// Not computable at this row; there are too few coarser step sizes. Presented
    /// as the sentinel `0`, which is not an estimate of zero.
    #[default]
    Undefined,
    Value(f64),
    /// The computation divided by zero or left the finite range, e.g. two
    /// successive observations were exactly equal.
    Degenerate,
}

impl Estimate {
    /// Numeric stand-in for [`Estimate::Undefined`] in tabular output.
    pub const SENTINEL: f64 = 0.0;

    pub fn value(self) -> Option<f64> {
        match self {
            Estimate::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_defined(self) -> bool {
        matches!(self, Estimate::Value(_))
    }

    pub fn is_degenerate(self) -> bool {
        matches!(self, Estimate::Degenerate)
    }

    fn from_quotient(numerator: f64, denominator: f64) -> Self {
        if denominator == 0.0 {
            return Estimate::Degenerate;
        }
        Self::finite_or_degenerate(numerator / denominator)
    }

    fn finite_or_degenerate(value: f64) -> Self {
        if value.is_finite() {
            Estimate::Value(value)
        } else {
            Estimate::Degenerate
        }
    }
}

impl fmt::Display for Estimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Estimate::Undefined => write!(f, "{}", Self::SENTINEL),
            Estimate::Degenerate => f.write_str("degenerate"),
            Estimate::Value(v) => match f.precision() {
                Some(p) => write!(f, "{:.*e}", p, v),
                None => write!(f, "{:e}", v),
            },
        }
    }
}

/// Whether a column of the table had enough step sizes to be computed at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Available,
    InsufficientData { required: usize, available: usize },
}

impl Availability {
    fn for_count(required: usize, available: usize) -> Self {
        if available >= required {
            Availability::Available
        } else {
            Availability::InsufficientData {
                required,
                available,
            }
        }
    }

    pub fn is_available(self) -> bool {
        matches!(self, Availability::Available)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvergenceRow {
    pub step_size: StepSize,
    /// `A_h`, the projected observable at this step size.
    pub value: f64,
    /// `F_h`, defined from the third-coarsest step size on.
    pub ratio: Estimate,
    /// `E_h`, defined from the second-coarsest step size on.
    pub error_estimate: Estimate,
    /// `ln F_h / ln r`, defined where `F_h` is defined and positive. Undefined for a
    /// non-positive `F_h`, degenerate only where `F_h` itself is.
    pub observed_order: Estimate,
    /// `A_h + E_h`, defined where `E_h` is defined.
    pub extrapolated: Estimate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RichardsonTable {
    /// Name of the projected quantity, e.g. `atom 0, x`.
    pub observable: String,
    pub params: RichardsonParams,
    /// Rows ordered from the coarsest to the finest step size.
    pub rows: Vec<ConvergenceRow>,
    pub ratio_availability: Availability,
    pub error_availability: Availability,
}

impl RichardsonTable {
    pub fn defined_ratio_count(&self) -> usize {
        self.rows.iter().filter(|r| r.ratio.is_defined()).count()
    }

    pub fn defined_error_count(&self) -> usize {
        self.rows
            .iter()
            .filter(|r| r.error_estimate.is_defined())
            .count()
    }

    pub fn has_degenerate_cells(&self) -> bool {
        self.rows.iter().any(|r| {
            r.ratio.is_degenerate()
                || r.error_estimate.is_degenerate()
                || r.observed_order.is_degenerate()
        })
    }

    pub fn row(&self, h: StepSize) -> Option<&ConvergenceRow> {
        self.rows.iter().find(|r| r.step_size == h)
    }
}

/// Builds the convergence diagnostic for one scalar projection of `series`.
///
/// The input is only read; every call returns a freshly built table. To study
/// several atoms or axes, call once per projection.
///
/// # Errors
///
/// Returns an error if the projection cannot be applied to some observation
/// (e.g. the atom index is beyond the number of selected atoms).
pub fn richardson_table<V, P>(
    series: &StepSizeSeries<V>,
    projection: &P,
    params: &RichardsonParams,
) -> Result<RichardsonTable, EngineError>
where
    P: Projection<V> + ?Sized,
{
    let sorted = series.descending();
    let steps: Vec<StepSize> = sorted.iter().map(|(h, _)| *h).collect();
    let values = sorted
        .iter()
        .map(|(_, v)| projection.project(v))
        .collect::<Result<Vec<f64>, _>>()?;

    let ratios = richardson_fractions(&values);
    let errors = error_estimates(&values, params);

    let ln_r = params.refinement_ratio().ln();
    let rows = steps
        .iter()
        .zip(&values)
        .zip(ratios.iter().zip(&errors))
        .map(|((&step_size, &value), (&ratio, &error_estimate))| ConvergenceRow {
            step_size,
            value,
            ratio,
            error_estimate,
            observed_order: observed_order(ratio, ln_r),
            extrapolated: match error_estimate {
                Estimate::Value(e) => Estimate::finite_or_degenerate(value + e),
                other => other,
            },
        })
        .collect();

    Ok(RichardsonTable {
        observable: projection.label(),
        params: *params,
        rows,
        ratio_availability: Availability::for_count(MIN_STEPS_FOR_RATIO, values.len()),
        error_availability: Availability::for_count(MIN_STEPS_FOR_ERROR, values.len()),
    })
}

/// `F_h[i] = (A[i-1] - A[i-2]) / (A[i] - A[i-1])`, undefined for the first two rows.
pub fn richardson_fractions(values: &[f64]) -> Vec<Estimate> {
    (0..values.len())
        .map(|i| {
            if i < 2 {
                return Estimate::Undefined;
            }
            Estimate::from_quotient(values[i - 1] - values[i - 2], values[i] - values[i - 1])
        })
        .collect()
}

/// `E_h[i] = (A[i] - A[i-1]) / (r^p - 1)`, undefined for the first row.
pub fn error_estimates(values: &[f64], params: &RichardsonParams) -> Vec<Estimate> {
    let denominator = params.error_denominator();
    (0..values.len())
        .map(|i| {
            if i < 1 {
                return Estimate::Undefined;
            }
            Estimate::from_quotient(values[i] - values[i - 1], denominator)
        })
        .collect()
}

fn observed_order(ratio: Estimate, ln_r: f64) -> Estimate {
    match ratio {
        Estimate::Value(f) if f > 0.0 => Estimate::finite_or_degenerate(f.ln() / ln_r),
        // Oscillating convergence has no real-valued order.
        Estimate::Value(_) | Estimate::Undefined => Estimate::Undefined,
        Estimate::Degenerate => Estimate::Degenerate,
    }
}
