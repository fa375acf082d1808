/*
* Temperature Dashboard Command Line Interface
* -------------------------------------------
* @status: it-aint-much-but-its-honest-work
*
* Command-line front door for the dashboard. clap derive with git-style
* subcommands (because if it's good enough for Linus, it's good enough
* for us).
*
* Command Structure:
* ---------------
* temp-anomaly-dashboard
* ├── serve [--port]                 // starts the dashboard API server
* ├── analyze --file [--city]        // offline pass over a CSV, prints anomalies
* └── init [--force]                 // generates config/default.toml
*
* Usage Examples:
* -------------
* ```bash
* # Serve the dashboard API
* temp-anomaly-dashboard serve --port 1337
*
* # Flag anomalies in a CSV without starting a server
* temp-anomaly-dashboard analyze --file data/temperature_data.csv --city Moscow
* ```
*/

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing::info;

use crate::analysis;
use crate::config::Settings;
use crate::core::dataset::TemperatureDataset;
use crate::core::errors::AnomalyError;

#[derive(Parser)]
#[command(name = "temp-anomaly-dashboard")]
#[command(about = "Temperature Anomaly Dashboard CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the dashboard API server
    Serve {
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Run the historical analyzer over a CSV file and print anomalies
    Analyze {
        #[arg(short, long)]
        file: PathBuf,
        #[arg(short, long)]
        city: Option<String>,
    },
    /// Generate default configuration
    Init {
        #[arg(short, long)]
        force: bool,
    },
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration
    let settings = match &cli.config {
        Some(path) => Settings::new_from_file(path)?,
        None => Settings::new()?,
    };

    match cli.command {
        Commands::Serve { port } => {
            let server_port = port.unwrap_or(settings.server.port);
            info!("Starting server on port {}", server_port);
            crate::run_server(settings, server_port).await?;
        }
        Commands::Analyze { file, city } => handle_analyze_command(file, city)?,
        Commands::Init { force } => handle_init_command(force)?,
    }

    Ok(())
}

fn handle_analyze_command(
    file: PathBuf,
    city: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(&file)?;
    let dataset = TemperatureDataset::parse_csv(&text)?;
    let annotated = analysis::annotate(&dataset);

    match city {
        Some(city) => {
            if !dataset.contains_city(&city) {
                return Err(AnomalyError::UnknownCity(city).into());
            }

            println!("{}", format!("Anomalous readings for {}:", city).bold());
            let mut flagged = 0;
            for row in annotated.iter().filter(|r| r.city == city && r.is_anomaly) {
                flagged += 1;
                println!(
                    "- {} {:.1} °C (rolling avg {:.2}, std {:.2})",
                    row.timestamp.format("%Y-%m-%d"),
                    row.temperature,
                    row.rolling_avg,
                    row.rolling_std.unwrap_or(f64::NAN),
                );
            }
            if flagged == 0 {
                println!("{} Nothing out of the ordinary", "✓".green());
            }
        }
        None => {
            println!("{}", "Anomaly summary:".bold());
            for city in dataset.cities() {
                let rows: Vec<_> = annotated.iter().filter(|r| r.city == city).collect();
                let flagged = rows.iter().filter(|r| r.is_anomaly).count();
                let badge = if flagged > 0 {
                    "!".red()
                } else {
                    "✓".green()
                };
                println!("{} {}: {}/{} readings flagged", badge, city, flagged, rows.len());
            }
        }
    }

    Ok(())
}

fn handle_init_command(force: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = PathBuf::from("config");
    let config_file = config_dir.join("default.toml");
    if config_file.exists() && !force {
        eprintln!(
            "{} Configuration already exists. Use --force to overwrite.",
            "!".red()
        );
        return Ok(());
    }

    std::fs::create_dir_all(&config_dir)?;
    let default_config = crate::config::generate_default_config();
    let config_str = toml::to_string_pretty(&default_config)?;
    std::fs::write(config_file, config_str)?;

    println!("{} Default configuration generated", "✓".green());
    Ok(())
}
