//! Per-station analysis orchestration.

use jf_core::format_value;
use serde::{Deserialize, Serialize};

use crate::centerline::estimate_centerline;
use crate::collapse::{CollapsePoint, evaluate_collapse};
use crate::flux::{FluxIntegral, FluxKind, integrate_flux};
use crate::half_radius::solve_half_radius;
use crate::input::{StationInput, parse_finite, parse_rows};
use crate::row::{ComputedRow, derive_row};
use crate::settings::{PressureUnit, ResolvedSettings};
use crate::trace::{CalculationStep, Trace, TracePhase};

/// The finished per-station record: headline quantities, the sorted row
/// sequence, flux audit detail, collapse points, and the full trace.
/// Built exactly once per station; immutable once returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputedStation {
    pub id: String,
    pub x_over_d: f64,
    pub rho_kg_m3: f64,
    pub pressure_unit: PressureUnit,
    /// Carried through for reporting only.
    pub supply_voltage: String,
    /// Carried through for reporting only.
    pub reference_delta_p: String,
    /// Sorted ascending by radius.
    pub rows: Vec<ComputedRow>,
    pub uc_mps: f64,
    /// `None` = unresolved: the profile never crossed Uc/2.
    pub r_half_m: Option<f64>,
    pub mdot_kg_s: f64,
    pub momentum_n: f64,
    pub mass_flux: FluxIntegral,
    pub momentum_flux: FluxIntegral,
    pub collapse: Vec<CollapsePoint>,
    /// `None` = not computable (r½ unresolved).
    pub rmse: Option<f64>,
    pub trace: Trace,
}

/// Run the full pipeline for one station.
///
/// Returns `None` when the station is unusable: non-finite x/D, or fewer
/// than two rows surviving the finite filters (text that does not parse,
/// or a derived velocity that overflows). Dropping is silent by design;
/// an empty batch result is the caller's signal.
pub fn analyze_station(
    input: &StationInput,
    settings: &ResolvedSettings,
) -> Option<ComputedStation> {
    let Some(x_over_d) = parse_finite(&input.x_over_d) else {
        tracing::debug!(station = %input.id, "station dropped: x/D does not parse");
        return None;
    };

    let parsed = parse_rows(&input.rows);

    let mut trace = Trace::new(settings.keep_trace);
    log_globals(settings, &mut trace);

    // Derive, then keep only rows with finite values: an extreme Δp can
    // overflow u to infinity, which would otherwise surface as NaN in the
    // flux integrands (inf·0 at r = 0).
    let mut rows: Vec<ComputedRow> = parsed
        .iter()
        .enumerate()
        .map(|(index, row)| {
            derive_row(
                index,
                *row,
                settings.rho_kg_m3,
                settings.pressure_unit,
                &mut trace,
            )
        })
        .filter(|row| row.u_mps.is_finite())
        .collect();
    if rows.len() < 2 {
        tracing::debug!(
            station = %input.id,
            usable = rows.len(),
            "station dropped: fewer than two usable rows"
        );
        return None;
    }
    rows.sort_by(|a, b| a.r_m.total_cmp(&b.r_m));
    check_profile(&rows, &mut trace);

    let uc_mps = estimate_centerline(&rows, &mut trace);
    let r_half_m = solve_half_radius(&rows, uc_mps, &mut trace);
    let mass_flux = integrate_flux(
        FluxKind::Mass,
        &rows,
        settings.rho_kg_m3,
        uc_mps,
        r_half_m,
        &mut trace,
    );
    let momentum_flux = integrate_flux(
        FluxKind::Momentum,
        &rows,
        settings.rho_kg_m3,
        uc_mps,
        r_half_m,
        &mut trace,
    );
    let (collapse, rmse) = evaluate_collapse(&rows, uc_mps, r_half_m, &mut trace);

    Some(ComputedStation {
        id: input.id.clone(),
        x_over_d,
        rho_kg_m3: settings.rho_kg_m3,
        pressure_unit: settings.pressure_unit,
        supply_voltage: input.supply_voltage.clone(),
        reference_delta_p: input.reference_delta_p.clone(),
        rows,
        uc_mps,
        r_half_m,
        mdot_kg_s: mass_flux.total,
        momentum_n: momentum_flux.total,
        mass_flux,
        momentum_flux,
        collapse,
        rmse,
        trace,
    })
}

fn log_globals(settings: &ResolvedSettings, trace: &mut Trace) {
    trace.log(
        TracePhase::Globals,
        CalculationStep::value(
            "fluid density",
            "ρ",
            format_value(settings.rho_kg_m3),
            settings.rho_kg_m3,
            "kg/m³",
        ),
    );
    trace.log(
        TracePhase::Globals,
        CalculationStep::value(
            "nozzle exit diameter",
            "D = D_cm / 100",
            format_value(settings.nozzle_d_m),
            settings.nozzle_d_m,
            "m",
        ),
    );
    trace.log(
        TracePhase::Globals,
        CalculationStep::text(
            "pressure unit",
            "Δp entered in",
            "",
            settings.pressure_unit.label(),
        ),
    );
}

/// Advisory profile checks on the sorted rows. Warnings only; computation
/// continues unaltered.
fn check_profile(rows: &[ComputedRow], trace: &mut Trace) {
    for (index, pair) in rows.windows(2).enumerate() {
        let (inner, outer) = (pair[0], pair[1]);
        if outer.r_m == inner.r_m {
            trace.warn(format!(
                "duplicate radius r = {} m (rows {index} and {})",
                format_value(inner.r_m),
                index + 1
            ));
        }
        if outer.u_mps > inner.u_mps {
            trace.warn(format!(
                "velocity rises with radius between r = {} m and r = {} m",
                format_value(inner.r_m),
                format_value(outer.r_m)
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::RawRow;
    use crate::settings::GlobalSettings;

    fn raw(radius: &str, delta_p: &str) -> RawRow {
        RawRow {
            radius_mm: radius.to_string(),
            delta_p: delta_p.to_string(),
        }
    }

    fn station(id: &str, x_over_d: &str, rows: Vec<RawRow>) -> StationInput {
        StationInput {
            id: id.to_string(),
            x_over_d: x_over_d.to_string(),
            rows,
            ..StationInput::default()
        }
    }

    fn resolved() -> ResolvedSettings {
        GlobalSettings::default().resolve()
    }

    #[test]
    fn non_finite_x_over_d_drops_station() {
        let input = station("bad", "not a number", vec![raw("0", "0.2"), raw("5", "0.1")]);
        assert!(analyze_station(&input, &resolved()).is_none());
    }

    #[test]
    fn fewer_than_two_usable_rows_drops_station() {
        let input = station("thin", "10", vec![raw("0", "0.2"), raw("x", "y")]);
        assert!(analyze_station(&input, &resolved()).is_none());
    }

    #[test]
    fn overflowing_delta_p_row_is_filtered_out() {
        // 2·1e308 Pa overflows the pitot relation to an infinite velocity;
        // the row must be dropped after derivation so the flux integrands
        // never see inf·0 = NaN.
        let settings = GlobalSettings {
            pressure_unit: PressureUnit::Pa,
            ..GlobalSettings::default()
        }
        .resolve();
        let input = station(
            "hot",
            "10",
            vec![raw("0", "1e308"), raw("5", "0.2"), raw("10", "0.1")],
        );
        let computed = analyze_station(&input, &settings).unwrap();

        assert_eq!(computed.rows.len(), 2);
        assert!(computed.rows.iter().all(|r| r.u_mps.is_finite()));
        assert!(computed.uc_mps.is_finite());
        assert!(computed.mdot_kg_s.is_finite());
        assert!(computed.momentum_n.is_finite());
    }

    #[test]
    fn station_reduced_below_two_finite_rows_is_dropped() {
        let settings = GlobalSettings {
            pressure_unit: PressureUnit::Pa,
            ..GlobalSettings::default()
        }
        .resolve();
        let input = station("thin", "10", vec![raw("0", "1e308"), raw("5", "0.2")]);
        assert!(analyze_station(&input, &settings).is_none());
    }

    #[test]
    fn rows_are_sorted_ascending_by_radius() {
        let input = station(
            "unsorted",
            "10",
            vec![raw("10", "0.1"), raw("0", "0.3"), raw("5", "0.2")],
        );
        let computed = analyze_station(&input, &resolved()).unwrap();

        let radii: Vec<f64> = computed.rows.iter().map(|r| r.r_m).collect();
        assert!(radii.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn clean_profile_produces_no_warnings() {
        // Strictly decreasing, radius-unique: neither advisory may fire.
        let input = station(
            "clean",
            "10",
            vec![
                raw("0", "0.278"),
                raw("5", "0.244"),
                raw("10", "0.124"),
                raw("15", "0.035"),
            ],
        );
        let computed = analyze_station(&input, &resolved()).unwrap();
        assert!(computed.trace.warnings.is_empty());
    }

    #[test]
    fn duplicate_radius_warns_once() {
        let input = station(
            "dup",
            "10",
            vec![raw("0", "0.278"), raw("5", "0.244"), raw("5", "0.2")],
        );
        let computed = analyze_station(&input, &resolved()).unwrap();

        let dups: Vec<&String> = computed
            .trace
            .warnings
            .iter()
            .filter(|w| w.contains("duplicate radius"))
            .collect();
        assert_eq!(dups.len(), 1);
    }

    #[test]
    fn rising_velocity_warns() {
        let input = station(
            "bump",
            "10",
            vec![raw("0", "0.2"), raw("5", "0.1"), raw("10", "0.15"), raw("15", "0.01")],
        );
        let computed = analyze_station(&input, &resolved()).unwrap();

        assert!(
            computed
                .trace
                .warnings
                .iter()
                .any(|w| w.contains("velocity rises with radius"))
        );
    }

    #[test]
    fn metadata_is_carried_through() {
        let mut input = station("meta", "20", vec![raw("0", "0.2"), raw("5", "0.1")]);
        input.supply_voltage = "12.1".to_string();
        input.reference_delta_p = "0.95".to_string();
        let computed = analyze_station(&input, &resolved()).unwrap();

        assert_eq!(computed.supply_voltage, "12.1");
        assert_eq!(computed.reference_delta_p, "0.95");
        assert_eq!(computed.x_over_d, 20.0);
    }
}
