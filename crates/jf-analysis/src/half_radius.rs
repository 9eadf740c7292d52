//! Half-velocity radius solver.
//!
//! Finds r½ with u(r½) = Uc/2. The primary strategy searches in (r², ln u)
//! space, where a near-Gaussian profile is close to linear; the fallback
//! interpolates the raw (r, u) samples. Either way the first bracketing
//! pair wins. Exact equality at the target counts as a bracket.

use jf_core::format_value;

use crate::row::ComputedRow;
use crate::trace::{CalculationStep, Trace, TracePhase};

/// Solve for r½ over rows sorted ascending by radius.
///
/// Returns `None` (with a warning) when the profile never crosses Uc/2,
/// in which case tail correction and collapse normalization are skipped
/// downstream.
pub fn solve_half_radius(rows: &[ComputedRow], uc: f64, trace: &mut Trace) -> Option<f64> {
    if uc > 0.0
        && let Some(r_half) = log_quadratic(rows, uc, trace)
    {
        return Some(r_half);
    }
    if let Some(r_half) = linear(rows, uc, trace) {
        return Some(r_half);
    }
    trace.warn("half-velocity radius unresolved: profile never crosses Uc/2");
    None
}

/// Interpolate ln(u) against r², restricted to rows with u > 0.
///
/// A crossing that lies between a positive-velocity point and a u = 0 point
/// is invisible here (ln 0 is undefined) and is left to the linear fallback.
fn log_quadratic(rows: &[ComputedRow], uc: f64, trace: &mut Trace) -> Option<f64> {
    let target = (uc / 2.0).ln();
    let points: Vec<(f64, f64)> = rows
        .iter()
        .filter(|row| row.u_mps > 0.0)
        .map(|row| (row.r_m * row.r_m, row.u_mps.ln()))
        .collect();

    for pair in points.windows(2) {
        let (x1, y1) = pair[0];
        let (x2, y2) = pair[1];
        if y1 >= target && y2 <= target {
            let r_sq = if y1 == y2 {
                x1
            } else {
                x1 + (target - y1) * (x2 - x1) / (y2 - y1)
            };
            let r_half = r_sq.max(0.0).sqrt();
            trace.log(
                TracePhase::HalfRadius,
                CalculationStep::value(
                    "half-velocity crossing in (r², ln u) space",
                    "r½² = r1² + (ln(Uc/2) − ln u1)·(r2² − r1²)/(ln u2 − ln u1)",
                    format!(
                        "{} + ({} − {}) × ({} − {})/({} − {})",
                        format_value(x1),
                        format_value(target),
                        format_value(y1),
                        format_value(x2),
                        format_value(x1),
                        format_value(y2),
                        format_value(y1)
                    ),
                    r_sq,
                    "m²",
                ),
            );
            trace.log(
                TracePhase::HalfRadius,
                CalculationStep::value(
                    "half-velocity radius",
                    "r½ = sqrt(r½²)",
                    format!("sqrt({})", format_value(r_sq)),
                    r_half,
                    "m",
                ),
            );
            return Some(r_half);
        }
    }
    None
}

/// Direct linear interpolation of u against r with the same bracketing rule.
fn linear(rows: &[ComputedRow], uc: f64, trace: &mut Trace) -> Option<f64> {
    let target = uc / 2.0;

    for pair in rows.windows(2) {
        let (inner, outer) = (pair[0], pair[1]);
        if inner.u_mps >= target && outer.u_mps <= target {
            let r_half = if inner.u_mps == outer.u_mps {
                inner.r_m
            } else {
                inner.r_m
                    + (target - inner.u_mps) * (outer.r_m - inner.r_m)
                        / (outer.u_mps - inner.u_mps)
            };
            trace.log(
                TracePhase::HalfRadius,
                CalculationStep::value(
                    "half-velocity radius (linear fallback)",
                    "r½ = r1 + (Uc/2 − u1)·(r2 − r1)/(u2 − u1)",
                    format!(
                        "{} + ({} − {}) × ({} − {})/({} − {})",
                        format_value(inner.r_m),
                        format_value(target),
                        format_value(inner.u_mps),
                        format_value(outer.r_m),
                        format_value(inner.r_m),
                        format_value(outer.u_mps),
                        format_value(inner.u_mps)
                    ),
                    r_half,
                    "m",
                ),
            );
            return Some(r_half);
        }
    }
    None
}
