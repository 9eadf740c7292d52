//! End-to-end tests for the analysis pipeline.

use std::f64::consts::{LN_2, PI};

use jf_analysis::{GlobalSettings, PressureUnit, RawRow, StationInput, analyze};

fn raw(radius_mm: &str, delta_p: &str) -> RawRow {
    RawRow {
        radius_mm: radius_mm.to_string(),
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

/// The worked example from the lab notes: a near-Gaussian traverse at one
/// axial station, pressures in kPa, air at 1.204 kg/m³.
fn example_station() -> StationInput {
    station(
        "x10",
        "10",
        vec![
            raw("0", "0.278"),
            raw("5", "0.244"),
            raw("10", "0.124"),
            raw("15", "0.035"),
            raw("20", "0.020"),
            raw("30", "0.002"),
        ],
    )
}

#[test]
fn worked_example_end_to_end() {
    let settings = GlobalSettings {
        rho: "1.204".to_string(),
        ..GlobalSettings::default()
    };
    let results = analyze(&[example_station()], &settings);

    assert_eq!(results.stations.len(), 1);
    let st = &results.stations[0];

    // Uc comes straight from the r = 0 row: sqrt(2·278/1.204) ≈ 21.5 m/s.
    let uc_expected = (2.0 * 278.0 / 1.204_f64).sqrt();
    assert!((st.uc_mps - uc_expected).abs() < 1e-9);
    assert!((st.uc_mps - 21.5).abs() < 0.1);

    // Velocity falls through Uc/2 between the 10 mm and 15 mm samples.
    let r_half = st.r_half_m.expect("half radius resolves");
    assert!(r_half > 0.010 && r_half < 0.015, "r_half = {r_half}");

    assert!(st.mdot_kg_s > 0.0 && st.mdot_kg_s.is_finite());
    assert!(st.momentum_n > 0.0 && st.momentum_n.is_finite());
    assert!(st.mass_flux.tail.is_some());
    assert!(st.momentum_flux.tail.is_some());

    // The profile is near-Gaussian, so the collapse score is small.
    let rmse = st.rmse.expect("collapse scores");
    assert!(rmse < 0.1, "rmse = {rmse}");

    // Strictly decreasing, radius-unique profile: no advisories.
    assert!(st.trace.warnings.is_empty());

    // Trace carries the full audit: 3 global steps and 3 per row.
    assert_eq!(st.trace.globals.len(), 3);
    assert_eq!(st.trace.row_velocity.len(), 18);
    assert!(!st.trace.mass_flow.is_empty());
    assert!(!st.trace.collapse.is_empty());
}

#[test]
fn unit_mode_switch_scales_centerline_by_sqrt_1000() {
    let kpa_settings = GlobalSettings::default();
    let pa_settings = GlobalSettings {
        pressure_unit: PressureUnit::Pa,
        ..GlobalSettings::default()
    };

    let in_kpa = analyze(&[example_station()], &kpa_settings);
    let in_pa = analyze(&[example_station()], &pa_settings);

    let ratio = in_kpa.stations[0].uc_mps / in_pa.stations[0].uc_mps;
    assert!((ratio - 1000.0_f64.sqrt()).abs() < 1e-9);
}

#[test]
fn synthetic_gaussian_station_round_trips() {
    // Sample u(r) = Uc·exp(−ln2·(r/r0)²) exactly, encode the matching Δp in
    // Pa, and check the pipeline recovers r0 and the analytic fluxes.
    let (rho, uc, r0_mm) = (1.204, 20.0, 10.0);
    let rows: Vec<RawRow> = (0..=60)
        .map(|i| {
            let r_mm = i as f64 * 0.5;
            let u = uc * (-LN_2 * (r_mm / r0_mm).powi(2)).exp();
            let dp_pa = rho * u * u / 2.0;
            raw(&format!("{r_mm}"), &format!("{dp_pa:.12e}"))
        })
        .collect();

    let settings = GlobalSettings {
        rho: "1.204".to_string(),
        pressure_unit: PressureUnit::Pa,
        ..GlobalSettings::default()
    };
    let results = analyze(&[station("gauss", "15", rows)], &settings);
    let st = &results.stations[0];

    let r0_m = r0_mm / 1000.0;
    let r_half = st.r_half_m.unwrap();
    assert!((r_half - r0_m).abs() / r0_m < 1e-6, "r_half = {r_half}");

    let b = LN_2 / (r0_m * r0_m);
    let mdot_true = PI * rho * uc / b;
    let momentum_true = PI * rho * uc * uc / (2.0 * b);
    assert!((st.mdot_kg_s - mdot_true).abs() / mdot_true < 1e-3);
    assert!((st.momentum_n - momentum_true).abs() / momentum_true < 1e-3);

    assert!(st.rmse.unwrap() < 1e-9);
}

#[test]
fn overflowing_pressure_never_leaks_nan_into_fluxes() {
    // A Δp of 1e308 Pa parses as finite but overflows 2·Δp/ρ to infinity.
    // The derived row must be filtered out so mdot and I stay finite.
    let settings = GlobalSettings {
        pressure_unit: PressureUnit::Pa,
        ..GlobalSettings::default()
    };
    let input = station(
        "hot",
        "10",
        vec![raw("0", "1e308"), raw("5", "0.2"), raw("10", "0.1")],
    );
    let results = analyze(&[input], &settings);

    assert_eq!(results.stations.len(), 1);
    let st = &results.stations[0];
    assert_eq!(st.rows.len(), 2);
    assert!(st.uc_mps.is_finite());
    assert!(st.mdot_kg_s.is_finite());
    assert!(st.momentum_n.is_finite());
}

#[test]
fn batch_preserves_order_and_drops_unusable_stations() {
    let stations = vec![
        station("near", "5", vec![raw("0", "0.5"), raw("5", "0.4"), raw("10", "0.2")]),
        station("broken", "10", vec![raw("0", "0.5"), raw("junk", "0.4")]),
        station("far", "20", vec![raw("0", "0.1"), raw("5", "0.08"), raw("10", "0.04")]),
    ];
    let results = analyze(&stations, &GlobalSettings::default());

    let ids: Vec<&str> = results.stations.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["near", "far"]);
}

#[test]
fn empty_batch_returns_resolved_settings_and_no_stations() {
    let stations = vec![
        station("a", "10", vec![raw("0", "0.5")]),
        station("b", "oops", vec![raw("0", "0.5"), raw("5", "0.4")]),
    ];
    let results = analyze(&stations, &GlobalSettings::default());

    assert!(results.stations.is_empty());
    assert_eq!(results.settings.rho_kg_m3, 1.204);
    assert_eq!(results.settings.pressure_unit, PressureUnit::Kpa);
}

#[test]
fn keep_trace_off_still_computes_and_warns() {
    let settings = GlobalSettings {
        keep_trace: false,
        ..GlobalSettings::default()
    };
    // Velocities never drop below Uc/2: r½ unresolved, warnings kept.
    let input = station("flat", "10", vec![raw("0", "0.20"), raw("5", "0.19"), raw("10", "0.18")]);
    let results = analyze(&[input], &settings);
    let st = &results.stations[0];

    assert!(st.trace.globals.is_empty());
    assert!(st.trace.row_velocity.is_empty());
    assert_eq!(st.r_half_m, None);
    assert_eq!(st.rmse, None);
    assert!(st.collapse.is_empty());
    assert!(
        st.trace
            .warnings
            .iter()
            .any(|w| w.contains("half-velocity radius unresolved"))
    );
    assert!(
        st.trace
            .warnings
            .iter()
            .any(|w| w.contains("tail correction skipped"))
    );
    // Fluxes fall back to the truncated trapezoid totals.
    assert_eq!(st.mdot_kg_s, st.mass_flux.trapezoid);
    assert_eq!(st.momentum_n, st.momentum_flux.trapezoid);
}
