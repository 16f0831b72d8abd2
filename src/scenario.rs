use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::io::{load_population, load_stations, write_json, write_proposals, InputCrs};
use crate::planner::{PlanReport, PlanSettings, Planner};

fn default_coverage_radius_m() -> f64 {
    3_000.0
}

fn default_hex_radius_m() -> f64 {
    3_000.0
}

fn default_k() -> i64 {
    10
}

fn default_padding_m() -> f64 {
    5_000.0
}

fn default_stations_path() -> PathBuf {
    PathBuf::from("stations.json")
}

fn default_population_path() -> PathBuf {
    PathBuf::from("pop_points.json")
}

fn default_output_path() -> PathBuf {
    PathBuf::from("proposals.json")
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub description: Option<String>,
    #[serde(default = "default_stations_path")]
    pub stations: PathBuf,
    #[serde(default = "default_population_path")]
    pub population: PathBuf,
    #[serde(default = "default_output_path")]
    pub output: PathBuf,
    /// Optional full run report (totals, proposals, initial cell scores).
    #[serde(default)]
    pub report: Option<PathBuf>,
    #[serde(default)]
    pub input_crs: InputCrs,
    #[serde(default = "default_coverage_radius_m")]
    pub coverage_radius_m: f64,
    #[serde(default = "default_hex_radius_m")]
    pub hex_radius_m: f64,
    #[serde(default = "default_k")]
    pub k: i64,
    #[serde(default = "default_padding_m")]
    pub padding_m: f64,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

pub struct ScenarioLoader {
    base_dir: PathBuf,
}

impl ScenarioLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<Scenario> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        let scenario: Scenario = serde_yaml::from_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        scenario
            .settings()
            .validate()
            .with_context(|| format!("Invalid scenario {}", path.display()))?;
        Ok(scenario)
    }
}

impl Scenario {
    pub fn settings(&self) -> PlanSettings {
        PlanSettings {
            name: self.name.clone(),
            coverage_radius_m: self.coverage_radius_m,
            hex_radius_m: self.hex_radius_m,
            k: self.k,
            padding_m: self.padding_m,
        }
    }

    /// Reads the inputs, plans, and writes proposals (and the report when
    /// configured). Relative paths resolve against `base_dir`.
    pub fn run(&self, base_dir: impl AsRef<Path>) -> Result<PlanReport> {
        let base_dir = base_dir.as_ref();
        let planner = Planner::new(self.settings())?;

        let facilities = load_stations(base_dir.join(&self.stations), self.input_crs)?;
        let demand = load_population(base_dir.join(&self.population), self.input_crs)?;
        info!(
            scenario = %self.name,
            stations = facilities.len(),
            demand = demand.len(),
            "loaded inputs"
        );

        let report = planner
            .run(demand, &facilities)
            .with_context(|| format!("Planning failed for scenario '{}'", self.name))?;

        let output = base_dir.join(&self.output);
        write_proposals(&output, &report.proposals, self.input_crs)?;
        info!(path = %output.display(), proposals = report.proposals.len(), "saved proposals");
        if let Some(report_path) = &self.report {
            let report_path = base_dir.join(report_path);
            write_json(&report_path, &report)?;
            info!(path = %report_path.display(), "saved run report");
        }
        Ok(report)
    }
}
