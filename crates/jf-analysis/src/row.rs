//! Row-level velocity derivation via the incompressible pitot relation.

use jf_core::{format_value, in_meters, mm};
use serde::{Deserialize, Serialize};

use crate::input::ParsedRow;
use crate::settings::PressureUnit;
use crate::trace::{CalculationStep, Trace, TracePhase};

/// One measurement converted to SI with its derived velocity.
///
/// Invariants: radius ≥ 0 is expected from the rig geometry but not
/// enforced; velocity is always ≥ 0 (negative Δp clamps to 0, never NaN).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComputedRow {
    pub r_m: f64,
    pub delta_p_pa: f64,
    pub u_mps: f64,
}

/// Convert one parsed (radius, Δp) pair into a velocity sample, logging
/// every conversion and the pitot formula with substituted values.
pub fn derive_row(
    index: usize,
    row: ParsedRow,
    rho_kg_m3: f64,
    unit: PressureUnit,
    trace: &mut Trace,
) -> ComputedRow {
    let r_m = in_meters(mm(row.radius_mm));
    trace.log(
        TracePhase::RowVelocity,
        CalculationStep::value(
            format!("row {index}: radius to SI"),
            "r = r_mm / 1000",
            format!("{} / 1000", format_value(row.radius_mm)),
            r_m,
            "m",
        ),
    );

    let delta_p_pa = unit.to_pascals(row.delta_p);
    match unit {
        PressureUnit::Kpa => trace.log(
            TracePhase::RowVelocity,
            CalculationStep::value(
                format!("row {index}: pressure to SI"),
                "Δp_Pa = Δp_kPa × 1000",
                format!("{} × 1000", format_value(row.delta_p)),
                delta_p_pa,
                "Pa",
            ),
        ),
        PressureUnit::Pa => trace.log(
            TracePhase::RowVelocity,
            CalculationStep::value(
                format!("row {index}: pressure to SI"),
                "Δp_Pa = Δp",
                format_value(row.delta_p),
                delta_p_pa,
                "Pa",
            ),
        ),
    }

    // max(0, ·) guards the sqrt domain: negative Δp yields u = 0, not NaN.
    let u_mps = (2.0 * delta_p_pa / rho_kg_m3).max(0.0).sqrt();
    trace.log(
        TracePhase::RowVelocity,
        CalculationStep::value(
            format!("row {index}: pitot velocity"),
            "u = sqrt(max(0, 2·Δp_Pa/ρ))",
            format!(
                "sqrt(max(0, 2 × {} / {}))",
                format_value(delta_p_pa),
                format_value(rho_kg_m3)
            ),
            u_mps,
            "m/s",
        ),
    );

    ComputedRow {
        r_m,
        delta_p_pa,
        u_mps,
    }
}
