//! Self-similar profile collapse and its RMSE against the ideal Gaussian.

use std::f64::consts::LN_2;

use jf_core::format_value;
use serde::{Deserialize, Serialize};

use crate::row::ComputedRow;
use crate::trace::{CalculationStep, Trace, TracePhase};

/// One row in normalized similarity coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollapsePoint {
    /// r / r½
    pub xr: f64,
    /// u / Uc
    pub ur: f64,
    /// exp(−ln2·xr²), so that ur_ideal(1) = 0.5 matches the r½ definition.
    pub ur_ideal: f64,
    pub error: f64,
}

/// Normalize the profile by (r½, Uc) and score its deviation from the ideal
/// Gaussian as sqrt(mean(error²)).
///
/// When r½ is unresolved (or Uc is not positive) the collapse sequence is
/// empty and RMSE is `None`: not computable from the available data, not an
/// error.
pub fn evaluate_collapse(
    rows: &[ComputedRow],
    uc_mps: f64,
    r_half_m: Option<f64>,
    trace: &mut Trace,
) -> (Vec<CollapsePoint>, Option<f64>) {
    let Some(r_half) = r_half_m.filter(|r| *r > 0.0) else {
        return (Vec::new(), None);
    };
    if uc_mps.is_nan() || uc_mps <= 0.0 {
        trace.warn("similarity collapse skipped: non-positive centerline velocity");
        return (Vec::new(), None);
    }

    let mut points = Vec::with_capacity(rows.len());
    let mut sum_sq = 0.0;
    for (index, row) in rows.iter().enumerate() {
        let xr = row.r_m / r_half;
        let ur = row.u_mps / uc_mps;
        let ur_ideal = (-LN_2 * xr * xr).exp();
        let error = ur - ur_ideal;
        sum_sq += error * error;

        trace.log(
            TracePhase::Collapse,
            CalculationStep::value(
                format!("point {index}: deviation from ideal profile"),
                "e = u/Uc − exp(−ln2·(r/r½)²)",
                format!(
                    "{} − exp(−ln2 × {}²)",
                    format_value(ur),
                    format_value(xr)
                ),
                error,
                "",
            ),
        );
        points.push(CollapsePoint {
            xr,
            ur,
            ur_ideal,
            error,
        });
    }

    let rmse = (sum_sq / points.len() as f64).sqrt();
    trace.log(
        TracePhase::Collapse,
        CalculationStep::value(
            "collapse RMSE",
            "sqrt(mean(e²))",
            format!("sqrt({} / {})", format_value(sum_sq), points.len()),
            rmse,
            "",
        ),
    );

    (points, Some(rmse))
}
