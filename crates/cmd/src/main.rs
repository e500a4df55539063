// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use cmd::common::{CommandContext, DEFAULT_CONFIG_FILE};
use cmd::{device_command, init_command, sensor_command};

#[derive(Parser)]
#[command(author, version, about = "Look up weather station sensor readings", long_about = None)]
#[command(name = "weather")]
struct Cli {
    /// Configuration file (defaults to $WEATHER_CONFIG, then weather-config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write an example configuration file
    Init {
        /// Where to write it (defaults to the resolved --config path)
        path: Option<PathBuf>,
    },
    /// Readings of every configured sensor type for a device and date
    Device {
        /// Device identifier
        device: String,
        /// Date as YYYY-MM-DD
        date: String,
    },
    /// Readings of one sensor type for a device and date
    Sensor {
        /// Device identifier
        device: String,
        /// Date as YYYY-MM-DD
        date: String,
        /// Sensor type, e.g. temperature
        sensor_type: String,
    },
}

#[allow(clippy::print_stdout)]
fn print_line(line: &str) {
    println!("{line}");
}

async fn run(cli: Cli) -> Result<bool> {
    let context = CommandContext::new(cli.config);

    match cli.command {
        Commands::Init { path } => {
            let path = path.unwrap_or_else(|| context.config_path.clone());
            init_command(&path).await?;
            print_line(&format!("Wrote {}", path.display()));
            Ok(true)
        }
        Commands::Device { device, date } => {
            device_command(&context, &device, &date, print_line).await
        }
        Commands::Sensor {
            device,
            date,
            sensor_type,
        } => sensor_command(&context, &device, &date, &sensor_type, print_line).await,
    }
}

#[tokio::main]
#[allow(clippy::print_stderr)]
async fn main() -> ExitCode {
    diagnostics::init_diagnostics();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e:#}");
            if e.to_string().contains(DEFAULT_CONFIG_FILE) {
                eprintln!("Hint: run `weather init` to create {DEFAULT_CONFIG_FILE}");
            }
            ExitCode::FAILURE
        }
    }
}
