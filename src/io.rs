//! JSON records for stations, population and proposals

use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::components::{DemandPoint, FacilityPoint, Proposal};
use crate::projection::{project, unproject};
use crate::spatial::Point2D;

/// Coordinate system of input records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputCrs {
    /// Longitude/latitude degrees, projected to Web Mercator meters.
    #[default]
    Geographic,
    /// Already planar meters; `longitude`/`latitude` carry x/y.
    Planar,
}

impl InputCrs {
    fn to_planar(self, longitude: f64, latitude: f64) -> Result<Point2D> {
        match self {
            InputCrs::Geographic => Ok(project(longitude, latitude)?),
            InputCrs::Planar => Ok(Point2D::new(longitude, latitude)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(alias = "x")]
    pub longitude: f64,
    #[serde(alias = "y")]
    pub latitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulationRecord {
    #[serde(alias = "x")]
    pub longitude: f64,
    #[serde(alias = "y")]
    pub latitude: f64,
    #[serde(alias = "weight")]
    pub population: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposalRecord {
    pub center_x: f64,
    pub center_y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    pub covered_population: f64,
}

impl ProposalRecord {
    pub fn from_proposal(proposal: &Proposal, crs: InputCrs) -> Self {
        let (longitude, latitude) = match crs {
            InputCrs::Geographic => {
                let (lon, lat) = unproject(proposal.position);
                (Some(lon), Some(lat))
            }
            InputCrs::Planar => (None, None),
        };
        Self {
            center_x: proposal.position.x,
            center_y: proposal.position.y,
            longitude,
            latitude,
            covered_population: proposal.gain,
        }
    }
}

pub fn read_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&data).with_context(|| format!("Failed to parse {}", path.display()))
}

pub fn write_json<T: Serialize + ?Sized>(path: impl AsRef<Path>, value: &T) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}

pub fn stations_to_facilities(records: &[StationRecord], crs: InputCrs) -> Result<Vec<FacilityPoint>> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let position = crs
                .to_planar(record.longitude, record.latitude)
                .with_context(|| format!("station {index}"))?;
            Ok(FacilityPoint { position })
        })
        .collect()
}

pub fn population_to_demand(records: &[PopulationRecord], crs: InputCrs) -> Result<Vec<DemandPoint>> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let position = crs
                .to_planar(record.longitude, record.latitude)
                .with_context(|| format!("population point {index}"))?;
            Ok(DemandPoint {
                position,
                weight: record.population,
                covered: false,
            })
        })
        .collect()
}

pub fn load_stations(path: impl AsRef<Path>, crs: InputCrs) -> Result<Vec<FacilityPoint>> {
    let records: Vec<StationRecord> = read_json(path)?;
    stations_to_facilities(&records, crs)
}

pub fn load_population(path: impl AsRef<Path>, crs: InputCrs) -> Result<Vec<DemandPoint>> {
    let records: Vec<PopulationRecord> = read_json(path)?;
    population_to_demand(&records, crs)
}

pub fn write_proposals(path: impl AsRef<Path>, proposals: &[Proposal], crs: InputCrs) -> Result<()> {
    let records: Vec<ProposalRecord> = proposals
        .iter()
        .map(|proposal| ProposalRecord::from_proposal(proposal, crs))
        .collect();
    write_json(path, &records)
}
