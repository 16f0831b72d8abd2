//! Synthetic stations and population for trying the planner
//!
//! Stations cluster around two urban centers; population points are spread
//! uniformly over a surrounding box with Poisson-distributed head counts.

use anyhow::Result;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal, Poisson};
use serde::{Deserialize, Serialize};

use crate::io::{PopulationRecord, StationRecord};

const STATION_CENTERS: [(f64, f64); 2] = [(77.6, 12.97), (77.2, 13.02)];
const STATION_SPREAD_LON: f64 = 0.08;
const STATION_SPREAD_LAT: f64 = 0.05;
const POPULATION_LON: (f64, f64) = (77.0, 78.0);
const POPULATION_LAT: (f64, f64) = (12.6, 13.3);
const MEAN_POPULATION: f64 = 300.0;

fn default_station_count() -> usize {
    8
}

fn default_population_count() -> usize {
    500
}

fn default_population_seed() -> u64 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleConfig {
    #[serde(default = "default_station_count")]
    pub stations: usize,
    #[serde(default)]
    pub station_seed: u64,
    #[serde(default = "default_population_count")]
    pub population: usize,
    #[serde(default = "default_population_seed")]
    pub population_seed: u64,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            stations: default_station_count(),
            station_seed: 0,
            population: default_population_count(),
            population_seed: default_population_seed(),
        }
    }
}

pub fn sample_stations(count: usize, seed: u64) -> Result<Vec<StationRecord>> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let lon_noise = Normal::new(0.0, STATION_SPREAD_LON)?;
    let lat_noise = Normal::new(0.0, STATION_SPREAD_LAT)?;
    Ok((0..count)
        .map(|i| {
            let (lon, lat) = STATION_CENTERS[i % STATION_CENTERS.len()];
            StationRecord {
                id: Some(format!("S{}", i + 1)),
                longitude: lon + lon_noise.sample(&mut rng),
                latitude: lat + lat_noise.sample(&mut rng),
            }
        })
        .collect())
}

pub fn sample_population(count: usize, seed: u64) -> Result<Vec<PopulationRecord>> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let head_count = Poisson::new(MEAN_POPULATION)?;
    Ok((0..count)
        .map(|_| PopulationRecord {
            longitude: rng.gen_range(POPULATION_LON.0..POPULATION_LON.1),
            latitude: rng.gen_range(POPULATION_LAT.0..POPULATION_LAT.1),
            population: head_count.sample(&mut rng),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_is_deterministic() {
        let a = sample_population(50, 9).unwrap();
        let b = sample_population(50, 9).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, sample_population(50, 10).unwrap());
    }

    #[test]
    fn test_population_within_box() {
        let records = sample_population(200, 1).unwrap();
        assert_eq!(records.len(), 200);
        for record in &records {
            assert!((77.0..78.0).contains(&record.longitude));
            assert!((12.6..13.3).contains(&record.latitude));
            assert!(record.population >= 0.0);
            assert_eq!(record.population.fract(), 0.0);
        }
        let mean = records.iter().map(|r| r.population).sum::<f64>() / 200.0;
        assert!((250.0..350.0).contains(&mean), "mean head count {mean}");
    }

    #[test]
    fn test_stations_alternate_between_centers() {
        let records = sample_stations(8, 0).unwrap();
        assert_eq!(records.len(), 8);
        assert_eq!(records[0].id.as_deref(), Some("S1"));
        assert_eq!(records[7].id.as_deref(), Some("S8"));
        for (i, record) in records.iter().enumerate() {
            let (lon, _) = STATION_CENTERS[i % 2];
            assert!((record.longitude - lon).abs() < 0.5);
        }
    }
}
