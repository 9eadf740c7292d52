//! Raw survey input as entered by the experimenter.

use serde::{Deserialize, Serialize};

/// One traverse row as entered: free-form numeric text prior to parsing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawRow {
    /// Radial position [mm].
    pub radius_mm: String,
    /// Differential pressure in the configured unit.
    pub delta_p: String,
}

/// One axial measurement station as entered.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StationInput {
    pub id: String,
    /// Axial position normalized by nozzle diameter.
    pub x_over_d: String,
    /// Carried through for reporting only.
    #[serde(default)]
    pub supply_voltage: String,
    /// Carried through for reporting only.
    #[serde(default)]
    pub reference_delta_p: String,
    #[serde(default)]
    pub rows: Vec<RawRow>,
}

/// A row whose fields parsed to finite numbers. Radius still in mm,
/// Δp still in the entered unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedRow {
    pub radius_mm: f64,
    pub delta_p: f64,
}

/// Keep the rows whose fields both parse as finite numbers. Rows that do
/// not parse are dropped without comment: partial entries are expected
/// during data entry, not an error.
pub fn parse_rows(rows: &[RawRow]) -> Vec<ParsedRow> {
    rows.iter()
        .filter_map(|row| {
            let radius_mm = parse_finite(&row.radius_mm)?;
            let delta_p = parse_finite(&row.delta_p)?;
            Some(ParsedRow { radius_mm, delta_p })
        })
        .collect()
}

/// Parse free-form numeric text to a finite float. This is the single
/// usability rule for entered values; hosts checking whether a field would
/// be accepted must use it rather than re-implementing the parse.
pub fn parse_finite(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}
