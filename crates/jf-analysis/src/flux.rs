//! Mass and momentum flux integration with Gaussian tail correction.
//!
//! Both fluxes are axisymmetric integrals 2π∫f(r) dr over 0..∞ evaluated by
//! the trapezoidal rule on the measured span, plus a closed-form correction
//! for the unmeasured tail beyond the outermost radius. The tail assumes the
//! same self-similar Gaussian used for collapse scoring, which keeps the
//! model internally consistent.

use std::f64::consts::{LN_2, PI};

use jf_core::format_value;
use serde::{Deserialize, Serialize};

use crate::row::ComputedRow;
use crate::trace::{CalculationStep, Trace, TracePhase};

/// Which flux integral is being evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FluxKind {
    /// mdot = 2π∫ρ·u·r dr [kg/s]
    Mass,
    /// I = 2π∫ρ·u²·r dr [N]
    Momentum,
}

impl FluxKind {
    pub fn label(&self) -> &'static str {
        match self {
            FluxKind::Mass => "mass flow",
            FluxKind::Momentum => "momentum flux",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            FluxKind::Mass => "kg/s",
            FluxKind::Momentum => "N",
        }
    }

    fn phase(&self) -> TracePhase {
        match self {
            FluxKind::Mass => TracePhase::MassFlow,
            FluxKind::Momentum => TracePhase::Momentum,
        }
    }

    fn integrand(&self, rho: f64, u: f64, r: f64) -> f64 {
        match self {
            FluxKind::Mass => rho * u * r,
            FluxKind::Momentum => rho * u * u * r,
        }
    }

    fn integrand_name(&self) -> &'static str {
        match self {
            FluxKind::Mass => "ρ·u·r",
            FluxKind::Momentum => "ρ·u²·r",
        }
    }
}

/// One trapezoid panel, retained for audit display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrapezoidSegment {
    pub index: usize,
    pub r_lo_m: f64,
    pub r_hi_m: f64,
    pub u_lo_mps: f64,
    pub u_hi_mps: f64,
    pub f_lo: f64,
    pub f_hi: f64,
    pub dr_m: f64,
    pub contribution: f64,
}

/// Result of one flux integral: trapezoid part, optional tail, and total.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FluxIntegral {
    pub kind: FluxKind,
    pub trapezoid: f64,
    pub tail: Option<f64>,
    pub total: f64,
    pub segments: Vec<TrapezoidSegment>,
}

/// Integrate one flux over rows sorted ascending by radius.
///
/// The tail correction is applied only when Uc is finite and r½ is resolved
/// and positive; otherwise the trapezoid total stands and a warning is
/// logged.
pub fn integrate_flux(
    kind: FluxKind,
    rows: &[ComputedRow],
    rho_kg_m3: f64,
    uc_mps: f64,
    r_half_m: Option<f64>,
    trace: &mut Trace,
) -> FluxIntegral {
    let phase = kind.phase();

    let mut segments = Vec::with_capacity(rows.len().saturating_sub(1));
    let mut sum = 0.0;
    for (index, pair) in rows.windows(2).enumerate() {
        let (lo, hi) = (pair[0], pair[1]);
        let f_lo = kind.integrand(rho_kg_m3, lo.u_mps, lo.r_m);
        let f_hi = kind.integrand(rho_kg_m3, hi.u_mps, hi.r_m);
        let dr_m = hi.r_m - lo.r_m;
        let contribution = 0.5 * (f_lo + f_hi) * dr_m;
        sum += contribution;

        trace.log(
            phase,
            CalculationStep::value(
                format!("segment {index}: trapezoid panel"),
                format!("½·(f1 + f2)·Δr with f = {}", kind.integrand_name()),
                format!(
                    "0.5 × ({} + {}) × {}",
                    format_value(f_lo),
                    format_value(f_hi),
                    format_value(dr_m)
                ),
                contribution,
                format!("{} per 2π", kind.unit()),
            ),
        );
        segments.push(TrapezoidSegment {
            index,
            r_lo_m: lo.r_m,
            r_hi_m: hi.r_m,
            u_lo_mps: lo.u_mps,
            u_hi_mps: hi.u_mps,
            f_lo,
            f_hi,
            dr_m,
            contribution,
        });
    }

    let trapezoid = 2.0 * PI * sum;
    trace.log(
        phase,
        CalculationStep::value(
            format!("{} over measured span", kind.label()),
            "2π × Σ panels",
            format!("2π × {}", format_value(sum)),
            trapezoid,
            kind.unit(),
        ),
    );

    let tail = match (r_half_m, rows.last()) {
        (Some(r_half), Some(outermost)) if r_half > 0.0 && uc_mps.is_finite() => {
            let r_n = outermost.r_m;
            let b = LN_2 / (r_half * r_half);
            trace.log(
                phase,
                CalculationStep::value(
                    "Gaussian decay constant",
                    "B = ln(2)/r½²",
                    format!("ln(2)/{}", format_value(r_half * r_half)),
                    b,
                    "1/m²",
                ),
            );

            let (tail, equation) = match kind {
                FluxKind::Mass => (
                    PI * rho_kg_m3 * uc_mps / b * (-b * r_n * r_n).exp(),
                    "(π·ρ·Uc/B)·exp(−B·r_n²)",
                ),
                FluxKind::Momentum => (
                    PI * rho_kg_m3 * uc_mps * uc_mps / (2.0 * b) * (-2.0 * b * r_n * r_n).exp(),
                    "(π·ρ·Uc²/(2B))·exp(−2B·r_n²)",
                ),
            };
            trace.log(
                phase,
                CalculationStep::value(
                    format!("{} tail beyond r_n", kind.label()),
                    equation,
                    format!(
                        "ρ = {}, Uc = {}, B = {}, r_n = {}",
                        format_value(rho_kg_m3),
                        format_value(uc_mps),
                        format_value(b),
                        format_value(r_n)
                    ),
                    tail,
                    kind.unit(),
                ),
            );
            Some(tail)
        }
        _ => {
            trace.warn(format!(
                "{} tail correction skipped: half-velocity radius unresolved; \
                 reporting the truncated trapezoid total",
                kind.label()
            ));
            None
        }
    };

    let total = trapezoid + tail.unwrap_or(0.0);
    trace.log(
        phase,
        CalculationStep::value(
            format!("total {}", kind.label()),
            "trapezoid + tail",
            format!(
                "{} + {}",
                format_value(trapezoid),
                format_value(tail.unwrap_or(0.0))
            ),
            total,
            kind.unit(),
        ),
    );

    FluxIntegral {
        kind,
        trapezoid,
        tail,
        total,
        segments,
    }
}
