//! Global run settings and their parsed, defaulted form.

use jf_core::{cm, in_meters, in_pascals, kpa};
use serde::{Deserialize, Serialize};

use crate::input::parse_finite;

/// Fallback fluid density (air at lab conditions) [kg/m³].
pub const DEFAULT_RHO_KG_M3: f64 = 1.204;
/// Fallback nozzle exit diameter [cm].
pub const DEFAULT_NOZZLE_D_CM: f64 = 2.54;

/// Unit the differential pressures were entered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PressureUnit {
    Kpa,
    Pa,
}

impl PressureUnit {
    pub fn label(&self) -> &'static str {
        match self {
            PressureUnit::Kpa => "kPa",
            PressureUnit::Pa => "Pa",
        }
    }

    /// Convert an entered Δp value to pascals.
    pub fn to_pascals(&self, delta_p: f64) -> f64 {
        match self {
            PressureUnit::Kpa => in_pascals(kpa(delta_p)),
            PressureUnit::Pa => delta_p,
        }
    }
}

/// Settings as entered: numeric fields are free-form text and fall back to
/// defaults when they do not parse to finite positive values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalSettings {
    #[serde(default)]
    pub rho: String,
    #[serde(default)]
    pub nozzle_diameter_cm: String,
    #[serde(default = "default_pressure_unit")]
    pub pressure_unit: PressureUnit,
    /// Carried through for reporting only; never used numerically.
    #[serde(default)]
    pub contraction_ratio: String,
    #[serde(default = "default_keep_trace")]
    pub keep_trace: bool,
}

fn default_pressure_unit() -> PressureUnit {
    PressureUnit::Kpa
}

fn default_keep_trace() -> bool {
    true
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            rho: String::new(),
            nozzle_diameter_cm: String::new(),
            pressure_unit: default_pressure_unit(),
            contraction_ratio: String::new(),
            keep_trace: default_keep_trace(),
        }
    }
}

/// The numeric settings a run actually used; embedded in the result set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedSettings {
    pub rho_kg_m3: f64,
    pub nozzle_d_m: f64,
    pub pressure_unit: PressureUnit,
    pub contraction_ratio: Option<f64>,
    pub keep_trace: bool,
}

impl GlobalSettings {
    pub fn resolve(&self) -> ResolvedSettings {
        let rho_kg_m3 = parse_positive(&self.rho).unwrap_or(DEFAULT_RHO_KG_M3);
        let nozzle_d_cm =
            parse_positive(&self.nozzle_diameter_cm).unwrap_or(DEFAULT_NOZZLE_D_CM);
        ResolvedSettings {
            rho_kg_m3,
            nozzle_d_m: in_meters(cm(nozzle_d_cm)),
            pressure_unit: self.pressure_unit,
            contraction_ratio: parse_finite(&self.contraction_ratio),
            keep_trace: self.keep_trace,
        }
    }
}

fn parse_positive(text: &str) -> Option<f64> {
    parse_finite(text).filter(|v| *v > 0.0)
}
