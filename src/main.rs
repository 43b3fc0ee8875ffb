use clap::{ArgAction, Parser, Subcommand};
use oceancfc::config::RunConfig;
use oceancfc::output::{
    temperature_range, write_gas_properties, write_trajectories, PropertyConditions,
};
use oceancfc_components::driver::ModelVariant;
use oceancfc_core::compound::Compound;
use oceancfc_core::errors::CfcResult;
use oceancfc_core::gas_exchange::GasExchange;
use oceancfc_core::units::{atm, mps, IceFraction, MixingRatio, Salinity};
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "oceancfc")]
#[command(about = "CFC air-sea exchange and surface-ocean uptake scenarios", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the scenarios of a configuration file
    Run {
        /// Path to the run configuration (TOML)
        #[arg(short, long)]
        config: PathBuf,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print gas exchange properties over a temperature range
    GasProperties {
        #[arg(long, default_value = "CFC-11")]
        compound: Compound,
        /// unit: g/kg
        #[arg(long, default_value_t = 35.0)]
        salinity: f64,
        /// unit: atm
        #[arg(long, default_value_t = 1.0)]
        pressure: f64,
        /// unit: m/s
        #[arg(long, default_value_t = 5.0)]
        wind_speed: f64,
        #[arg(long, default_value_t = 0.0)]
        ice_fraction: f64,
        /// unit: ppt
        #[arg(long, default_value_t = 500.0)]
        mixing_ratio: f64,
        /// unit: degC
        #[arg(long, default_value_t = -2.0, allow_negative_numbers = true)]
        t_min: f64,
        /// unit: degC
        #[arg(long, default_value_t = 30.0, allow_negative_numbers = true)]
        t_max: f64,
        #[arg(long, default_value_t = 2.0)]
        t_step: f64,
    },
}

fn main() -> CfcResult<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Commands::Run { config, output } => cmd_run(&config, output.as_deref()),
        Commands::GasProperties {
            compound,
            salinity,
            pressure,
            wind_speed,
            ice_fraction,
            mixing_ratio,
            t_min,
            t_max,
            t_step,
        } => {
            let conditions = PropertyConditions {
                compound,
                salinity: Salinity::new(salinity),
                surface_pressure: atm(pressure),
                wind_speed: mps(wind_speed),
                ice_fraction: IceFraction::new(ice_fraction),
                mixing_ratio: MixingRatio::new(mixing_ratio),
            };
            let temperatures = temperature_range(t_min, t_max, t_step)?;
            write_gas_properties(
                io::stdout().lock(),
                &GasExchange::omip(),
                &conditions,
                &temperatures,
            )
        }
    }
}

fn cmd_run(config_path: &Path, output: Option<&Path>) -> CfcResult<()> {
    let config = RunConfig::from_file(config_path)?;
    let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));
    let driver = config.driver(base_dir)?;
    let times = config.output_times();

    info!(
        model = %config.model,
        compound = %config.compound,
        scenarios = config.scenarios.len(),
        "starting run"
    );

    let writer: Box<dyn Write> = match output {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(io::stdout().lock()),
    };

    match config.model {
        ModelVariant::Single => {
            let runs =
                driver.run_single_scenarios(&config.scenarios, config.t_start, config.t_end)?;
            write_trajectories(writer, &runs, &times, config.model.state_names())
        }
        ModelVariant::Coupled => {
            let runs =
                driver.run_coupled_scenarios(&config.scenarios, config.t_start, config.t_end)?;
            write_trajectories(writer, &runs, &times, config.model.state_names())
        }
    }
}
