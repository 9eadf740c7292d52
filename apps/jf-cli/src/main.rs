mod campaign;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use jf_analysis::{
    ComputedResults, ComputedStation, StepResult, analyze,
    input::{parse_finite, parse_rows},
};
use jf_core::format_value;

use campaign::{CliError, CliResult, load_campaign};

#[derive(Parser)]
#[command(name = "jf-cli")]
#[command(about = "Jetflow CLI - Pitot-survey post-processing for a turbulent round jet", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate campaign file syntax and report usable rows per station
    Validate {
        /// Path to the campaign YAML file
        campaign_path: PathBuf,
    },
    /// Analyze every station and print a summary
    Analyze {
        /// Path to the campaign YAML file
        campaign_path: PathBuf,
        /// Write the full computed result set as JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// Print the full audit trail for one station
    Trace {
        /// Path to the campaign YAML file
        campaign_path: PathBuf,
        /// Station ID to display
        station_id: String,
    },
    /// Export normalized collapse points as CSV for plotting
    ExportCollapse {
        /// Path to the campaign YAML file
        campaign_path: PathBuf,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> CliResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { campaign_path } => cmd_validate(&campaign_path),
        Commands::Analyze {
            campaign_path,
            json,
        } => cmd_analyze(&campaign_path, json.as_deref()),
        Commands::Trace {
            campaign_path,
            station_id,
        } => cmd_trace(&campaign_path, &station_id),
        Commands::ExportCollapse {
            campaign_path,
            output,
        } => cmd_export_collapse(&campaign_path, output.as_deref()),
    }
}

fn cmd_validate(campaign_path: &Path) -> CliResult<()> {
    println!("Validating campaign: {}", campaign_path.display());
    let campaign = load_campaign(campaign_path)?;

    if campaign.stations.is_empty() {
        println!("No stations found in campaign");
        return Ok(());
    }

    for station in &campaign.stations {
        let usable = parse_rows(&station.rows).len();
        // Same usability rule analyze_station applies when dropping.
        let x_ok = parse_finite(&station.x_over_d).is_some();

        let verdict = if !x_ok {
            "would be dropped: x/D does not parse"
        } else if usable < 2 {
            "would be dropped: fewer than two usable rows"
        } else {
            "ok"
        };
        println!(
            "  {} - {}/{} usable rows, {}",
            station.id,
            usable,
            station.rows.len(),
            verdict
        );
    }
    println!("✓ Campaign file is well-formed");
    Ok(())
}

fn cmd_analyze(campaign_path: &Path, json_out: Option<&Path>) -> CliResult<()> {
    let campaign = load_campaign(campaign_path)?;
    let results = analyze(&campaign.stations, &campaign.settings);

    if results.stations.is_empty() {
        println!(
            "No station had at least two rows with finite radius and Δp; \
             nothing to analyze. Check the campaign data."
        );
        return Ok(());
    }

    println!(
        "Analyzed {} of {} stations (ρ = {} kg/m³, D = {} m, Δp in {})",
        results.stations.len(),
        campaign.stations.len(),
        format_value(results.settings.rho_kg_m3),
        format_value(results.settings.nozzle_d_m),
        results.settings.pressure_unit.label()
    );
    println!();
    println!(
        "{:<12} {:>8} {:>10} {:>10} {:>12} {:>12} {:>8}",
        "station", "x/D", "Uc [m/s]", "r½ [mm]", "mdot [kg/s]", "I [N]", "RMSE"
    );
    for st in &results.stations {
        println!(
            "{:<12} {:>8} {:>10} {:>10} {:>12} {:>12} {:>8}",
            st.id,
            format_value(st.x_over_d),
            format_value(st.uc_mps),
            st.r_half_m
                .map(|r| format_value(r * 1000.0))
                .unwrap_or_else(|| "-".to_string()),
            format_value(st.mdot_kg_s),
            format_value(st.momentum_n),
            st.rmse
                .map(format_value)
                .unwrap_or_else(|| "-".to_string()),
        );
    }

    print_warnings(&results);

    if let Some(path) = json_out {
        std::fs::write(path, serde_json::to_string_pretty(&results)?)?;
        println!("✓ Wrote full result set to {}", path.display());
    }
    Ok(())
}

fn print_warnings(results: &ComputedResults) {
    for st in &results.stations {
        if st.trace.warnings.is_empty() {
            continue;
        }
        println!();
        println!("Warnings for {}:", st.id);
        for warning in &st.trace.warnings {
            println!("  ! {}", warning);
        }
    }
}

fn cmd_trace(campaign_path: &Path, station_id: &str) -> CliResult<()> {
    let campaign = load_campaign(campaign_path)?;
    let results = analyze(&campaign.stations, &campaign.settings);

    let station = results
        .stations
        .iter()
        .find(|st| st.id == station_id)
        .ok_or_else(|| CliError::UnknownStation(station_id.to_string()))?;

    println!("Audit trail for station {} (x/D = {})", station.id, station.x_over_d);
    print_station_trace(station);

    if !station.trace.warnings.is_empty() {
        println!("\nWarnings:");
        for warning in &station.trace.warnings {
            println!("  ! {}", warning);
        }
    }
    Ok(())
}

fn print_station_trace(station: &ComputedStation) {
    for (phase, steps) in station.trace.phases() {
        if steps.is_empty() {
            continue;
        }
        println!("\n{}:", phase.label());
        for step in steps {
            let result = match &step.result {
                StepResult::Value { value } => {
                    format!("{} {}", format_value(*value), step.unit)
                }
                StepResult::Text { text } => text.clone(),
            };
            println!("  {}", step.label);
            if step.substitution.is_empty() {
                println!("    {} = {}", step.equation, result);
            } else {
                println!("    {}: {} = {}", step.equation, step.substitution, result);
            }
        }
    }
}

fn cmd_export_collapse(campaign_path: &Path, output: Option<&Path>) -> CliResult<()> {
    let campaign = load_campaign(campaign_path)?;
    let results = analyze(&campaign.stations, &campaign.settings);

    let mut csv = String::from("station,x_over_d,r_over_r_half,u_over_uc,ideal\n");
    let mut points = 0usize;
    for st in &results.stations {
        for point in &st.collapse {
            csv.push_str(&format!(
                "{},{},{},{},{}\n",
                st.id, st.x_over_d, point.xr, point.ur, point.ur_ideal
            ));
            points += 1;
        }
    }

    if let Some(path) = output {
        std::fs::write(path, csv)?;
        println!("✓ Exported {} collapse points to {}", points, path.display());
    } else {
        print!("{}", csv);
    }
    Ok(())
}
