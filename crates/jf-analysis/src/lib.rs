//! jf-analysis: pitot-survey post-processing for a turbulent round jet.
//!
//! Turns raw (radius, Δp) traverse data into velocity profiles, centerline
//! decay, jet half-width, mass and momentum flux (with an analytic Gaussian
//! tail correction), and a self-similarity collapse score, while recording
//! an auditable calculation trace for every number produced.
//!
//! The pipeline never returns an error and never panics on malformed input:
//! unusable rows and stations are dropped, unresolved quantities are `None`,
//! and data-quality caveats land in each station's `trace.warnings`.

pub mod centerline;
pub mod collapse;
pub mod flux;
pub mod half_radius;
pub mod input;
pub mod row;
pub mod settings;
pub mod station;
pub mod trace;

pub use collapse::CollapsePoint;
pub use flux::{FluxIntegral, FluxKind, TrapezoidSegment};
pub use input::{RawRow, StationInput};
pub use row::ComputedRow;
pub use settings::{GlobalSettings, PressureUnit, ResolvedSettings};
pub use station::ComputedStation;
pub use trace::{CalculationStep, StepResult, Trace, TracePhase};

use serde::{Deserialize, Serialize};

/// The complete output of one analysis run: the settings actually used and
/// every station that survived filtering, in caller order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputedResults {
    pub settings: ResolvedSettings,
    pub stations: Vec<ComputedStation>,
}

/// Analyze every station with the given settings.
///
/// Output preserves the input station order minus dropped stations. An
/// empty `stations` sequence means no station had at least two usable rows;
/// the host application is expected to surface that to the user.
pub fn analyze(stations: &[StationInput], settings: &GlobalSettings) -> ComputedResults {
    let resolved = settings.resolve();
    let stations = stations
        .iter()
        .filter_map(|input| station::analyze_station(input, &resolved))
        .collect();
    ComputedResults {
        settings: resolved,
        stations,
    }
}
