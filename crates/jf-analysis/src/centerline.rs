//! Centerline velocity estimation.
//!
//! Uc is rarely measured directly; it is reconstructed from the innermost
//! one or two samples. Strategies are tried in order, first success wins:
//! direct reading at r = 0, two-point fit of u = a·r² + Uc, plain linear
//! interpolation back to r = 0, and finally the single-point identity.

use jf_core::format_value;

use crate::row::ComputedRow;
use crate::trace::{CalculationStep, Trace, TracePhase};

/// Two r² values closer than this are treated as indistinguishable.
const R_SQUARED_EPS: f64 = 1e-12;

/// Estimate the velocity at r = 0 from rows sorted ascending by radius.
///
/// Precondition: `rows` is non-empty (stations with fewer than two usable
/// rows are dropped upstream; the single-point branch only covers the
/// degenerate remainder).
pub fn estimate_centerline(rows: &[ComputedRow], trace: &mut Trace) -> f64 {
    let (r1, u1) = (rows[0].r_m, rows[0].u_mps);

    if r1 == 0.0 {
        trace.log(
            TracePhase::Centerline,
            CalculationStep::value(
                "centerline velocity (measured at r = 0)",
                "Uc = u(0)",
                format_value(u1),
                u1,
                "m/s",
            ),
        );
        return u1;
    }

    if rows.len() >= 2 {
        let (r2, u2) = (rows[1].r_m, rows[1].u_mps);
        let r1_sq = r1 * r1;
        let r2_sq = r2 * r2;

        if (r1_sq - r2_sq).abs() > R_SQUARED_EPS {
            let a = (u1 - u2) / (r1_sq - r2_sq);
            let uc = u1 - a * r1_sq;
            trace.log(
                TracePhase::Centerline,
                CalculationStep::value(
                    "profile curvature",
                    "a = (u1 − u2)/(r1² − r2²)",
                    format!(
                        "({} − {})/({} − {})",
                        format_value(u1),
                        format_value(u2),
                        format_value(r1_sq),
                        format_value(r2_sq)
                    ),
                    a,
                    "1/(m·s)",
                ),
            );
            trace.log(
                TracePhase::Centerline,
                CalculationStep::value(
                    "centerline velocity (quadratic in r²)",
                    "Uc = u1 − a·r1²",
                    format!(
                        "{} − {} × {}",
                        format_value(u1),
                        format_value(a),
                        format_value(r1_sq)
                    ),
                    uc,
                    "m/s",
                ),
            );
            return uc;
        }

        if (r2 - r1).abs() > R_SQUARED_EPS {
            // r² values collapse but the radii themselves still separate:
            // fall back to plain linear interpolation evaluated at r = 0.
            let uc = u1 - r1 * (u2 - u1) / (r2 - r1);
            trace.log(
                TracePhase::Centerline,
                CalculationStep::value(
                    "centerline velocity (linear to r = 0)",
                    "Uc = u1 − r1·(u2 − u1)/(r2 − r1)",
                    format!(
                        "{} − {} × ({} − {})/({} − {})",
                        format_value(u1),
                        format_value(r1),
                        format_value(u2),
                        format_value(u1),
                        format_value(r2),
                        format_value(r1)
                    ),
                    uc,
                    "m/s",
                ),
            );
            return uc;
        }
    }

    trace.warn(
        "centerline extrapolation impossible: only one usable point; \
         taking the innermost velocity as Uc",
    );
    trace.log(
        TracePhase::Centerline,
        CalculationStep::value(
            "centerline velocity (single-point identity)",
            "Uc = u1",
            format_value(u1),
            u1,
            "m/s",
        ),
    );
    u1
}
