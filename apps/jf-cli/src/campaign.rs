//! Campaign file schema and loading.
//!
//! A campaign is one YAML document holding the global settings and every
//! measurement station of a survey.

use std::path::Path;

use jf_analysis::{GlobalSettings, StationInput};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Campaign {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub settings: GlobalSettings,
    #[serde(default)]
    pub stations: Vec<StationInput>,
}

pub type CliResult<T> = Result<T, CliError>;

#[derive(thiserror::Error, Debug)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown station: {0}")]
    UnknownStation(String),
}

pub fn load_campaign(path: &Path) -> CliResult<Campaign> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_minimal_campaign() {
        let yaml = r#"
name: free-jet-survey
settings:
  rho: "1.204"
  pressure_unit: kpa
stations:
  - id: x10
    x_over_d: "10"
    rows:
      - { radius_mm: "0", delta_p: "0.278" }
      - { radius_mm: "5", delta_p: "0.244" }
"#;
        let campaign: Campaign = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(campaign.name, "free-jet-survey");
        assert_eq!(campaign.stations.len(), 1);
        assert_eq!(campaign.stations[0].rows.len(), 2);
        assert_eq!(campaign.stations[0].rows[1].radius_mm, "5");
    }

    #[test]
    fn missing_sections_default() {
        let campaign: Campaign = serde_yaml::from_str("name: empty").unwrap();
        assert!(campaign.stations.is_empty());
        assert!(campaign.settings.keep_trace);
    }
}
