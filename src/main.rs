use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use hexsite::{
    io::write_json,
    sample::{sample_population, sample_stations, SampleConfig},
    scenario::ScenarioLoader,
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Hex-bucketed greedy facility placement")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Propose new facility sites for a scenario
    Plan {
        /// Path to the scenario YAML file
        #[arg(long, default_value = "scenarios/bangalore.yaml")]
        scenario: PathBuf,

        /// Override the maximum number of new facilities
        #[arg(long, allow_negative_numbers = true)]
        k: Option<i64>,

        /// Override the coverage radius in meters
        #[arg(long)]
        coverage_m: Option<f64>,

        /// Override the hex grid radius in meters
        #[arg(long)]
        hex_radius_m: Option<f64>,

        /// Override the proposals output path
        #[arg(long)]
        out: Option<PathBuf>,

        /// Also write the full run report to this path
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Write synthetic stations and population files
    Sample {
        #[arg(long, default_value = "stations.json")]
        stations: PathBuf,

        #[arg(long, default_value = "pop_points.json")]
        pop: PathBuf,

        #[arg(long)]
        station_count: Option<usize>,

        #[arg(long)]
        population_count: Option<usize>,

        #[arg(long)]
        station_seed: Option<u64>,

        #[arg(long)]
        population_seed: Option<u64>,
    },
}

fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Plan {
            scenario,
            k,
            coverage_m,
            hex_radius_m,
            out,
            report,
        } => {
            let loader = ScenarioLoader::new(".");
            let mut scenario = loader.load(&scenario)?;
            init_logging(&scenario.logging.level);

            scenario.k = k.unwrap_or(scenario.k);
            scenario.coverage_radius_m = coverage_m.unwrap_or(scenario.coverage_radius_m);
            scenario.hex_radius_m = hex_radius_m.unwrap_or(scenario.hex_radius_m);
            scenario.output = out.unwrap_or(scenario.output);
            scenario.report = report.or(scenario.report);

            let result = scenario.run(loader.base_dir())?;
            println!(
                "Scenario '{}': proposed {} sites covering {:.0} additional demand. Saved proposals to {}",
                scenario.name,
                result.proposals.len(),
                result.totals.final_covered_weight - result.totals.initially_covered_weight,
                scenario.output.display()
            );
        }
        Command::Sample {
            stations,
            pop,
            station_count,
            population_count,
            station_seed,
            population_seed,
        } => {
            init_logging("info");
            let defaults = SampleConfig::default();
            let config = SampleConfig {
                stations: station_count.unwrap_or(defaults.stations),
                station_seed: station_seed.unwrap_or(defaults.station_seed),
                population: population_count.unwrap_or(defaults.population),
                population_seed: population_seed.unwrap_or(defaults.population_seed),
            };
            write_json(&stations, &sample_stations(config.stations, config.station_seed)?)?;
            println!("Saved {}", stations.display());
            write_json(
                &pop,
                &sample_population(config.population, config.population_seed)?,
            )?;
            println!("Saved {}", pop.display());
        }
    }
    Ok(())
}
