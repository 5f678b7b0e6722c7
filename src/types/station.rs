//! Station metadata as published in the per-family station rosters.

use crate::types::resolution::Resolution;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One roster row: a station offering one variable family.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct StationMetadata {
    /// Stable numeric station id (`Stations_id`), unique within a roster.
    pub id: u32,
    /// First day of reported coverage (`von_datum`).
    pub start: NaiveDate,
    /// Last day of reported coverage (`bis_datum`).
    pub end: NaiveDate,
    /// Elevation above sea level in meters.
    pub elevation: f64,
    pub latitude: f64,
    pub longitude: f64,
    /// Human-facing station name, used as the join key when loading by name.
    pub name: String,
    /// Federal state (`Bundesland`).
    pub region: String,
}

/// A geographical coordinate, latitude first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon(pub f64, pub f64);

/// Longitude/latitude limits for [`Roster::filter`]. `None` means unbounded on that side.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingBox {
    pub lon_min: Option<f64>,
    pub lat_min: Option<f64>,
    pub lon_max: Option<f64>,
    pub lat_max: Option<f64>,
}

impl BoundingBox {
    pub fn new(lon_min: f64, lat_min: f64, lon_max: f64, lat_max: f64) -> Self {
        Self {
            lon_min: Some(lon_min),
            lat_min: Some(lat_min),
            lon_max: Some(lon_max),
            lat_max: Some(lat_max),
        }
    }
}

/// A period a station's coverage must span for [`Roster::filter`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CoverageWindow {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl CoverageWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }
}

/// The station table of one (family, resolution) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Roster {
    pub family: String,
    pub resolution: Resolution,
    pub stations: Vec<StationMetadata>,
}

impl Roster {
    pub fn new(family: impl Into<String>, resolution: Resolution, stations: Vec<StationMetadata>) -> Self {
        Self {
            family: family.into(),
            resolution,
            stations,
        }
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StationMetadata> {
        self.stations.iter()
    }

    pub fn ids(&self) -> BTreeSet<u32> {
        self.stations.iter().map(|s| s.id).collect()
    }

    pub fn get(&self, id: u32) -> Option<&StationMetadata> {
        self.stations.iter().find(|s| s.id == id)
    }

    /// First row whose name matches exactly. Names are assumed unique within a roster.
    pub fn find_by_name(&self, name: &str) -> Option<&StationMetadata> {
        self.stations.iter().find(|s| s.name == name)
    }

    /// Keeps only the rows whose id is in `ids`, preserving roster order.
    pub fn restrict_to(&self, ids: &BTreeSet<u32>) -> Roster {
        Roster {
            family: self.family.clone(),
            resolution: self.resolution,
            stations: self
                .stations
                .iter()
                .filter(|s| ids.contains(&s.id))
                .cloned()
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Roster {
    type Item = &'a StationMetadata;
    type IntoIter = std::slice::Iter<'a, StationMetadata>;

    fn into_iter(self) -> Self::IntoIter {
        self.stations.iter()
    }
}
