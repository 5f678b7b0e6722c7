use crate::types::station::{BoundingBox, CoverageWindow, LatLon, Roster, StationMetadata};
use chrono::NaiveDate;
use haversine::{distance, Location as HaversineLocation, Units};
use log::warn;
use ordered_float::OrderedFloat;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy)]
struct Extent<T> {
    min: T,
    max: T,
}

fn extent<T: PartialOrd + Copy>(mut values: impl Iterator<Item = T>) -> Option<Extent<T>> {
    let first = values.next()?;
    Some(values.fold(Extent { min: first, max: first }, |acc, v| Extent {
        min: if v < acc.min { v } else { acc.min },
        max: if v > acc.max { v } else { acc.max },
    }))
}

// A bound sitting at the roster's own extremum is treated as unbounded.
fn active<T: PartialEq>(bound: Option<T>, extremum: T) -> Option<T> {
    bound.filter(|b| *b != extremum)
}

fn within_half_open(value: f64, min: Option<f64>, max: Option<f64>) -> bool {
    min.is_none_or(|m| value >= m) && max.is_none_or(|m| value < m)
}

fn spans_window(station: &StationMetadata, start: Option<NaiveDate>, end: Option<NaiveDate>) -> bool {
    start.is_none_or(|s| station.start < s) && end.is_none_or(|e| station.end > e)
}

impl Roster {
    /// Keeps stations inside the bounding box (`[min, max)` on both axes) whose coverage strictly
    /// contains the window. Missing bounds, and bounds equal to the roster's own extrema, do not
    /// constrain.
    pub fn filter(&self, bbox: Option<BoundingBox>, window: Option<CoverageWindow>) -> Roster {
        let bbox = bbox.unwrap_or_default();
        let window = window.unwrap_or_default();

        let (Some(lon), Some(lat), Some(start), Some(end)) = (
            extent(self.stations.iter().map(|s| s.longitude)),
            extent(self.stations.iter().map(|s| s.latitude)),
            extent(self.stations.iter().map(|s| s.start)),
            extent(self.stations.iter().map(|s| s.end)),
        ) else {
            warn!("Filtering an empty {} roster", self.family);
            return self.clone();
        };

        let lon_min = active(bbox.lon_min, lon.min);
        let lon_max = active(bbox.lon_max, lon.max);
        let lat_min = active(bbox.lat_min, lat.min);
        let lat_max = active(bbox.lat_max, lat.max);
        let window_start = active(window.start, start.min);
        let window_end = active(window.end, end.max);

        let stations: Vec<StationMetadata> = self
            .stations
            .iter()
            .filter(|s| {
                within_half_open(s.longitude, lon_min, lon_max)
                    && within_half_open(s.latitude, lat_min, lat_max)
                    && spans_window(s, window_start, window_end)
            })
            .cloned()
            .collect();

        if stations.is_empty() {
            warn!(
                "No station of the {} {} roster matches {:?} and {:?}",
                self.family, self.resolution, bbox, window
            );
        }

        Roster {
            family: self.family.clone(),
            resolution: self.resolution,
            stations,
        }
    }

    /// Up to `n` stations within `max_distance_km` of `location`, closest first, with their
    /// distance in kilometers.
    pub fn nearest(
        &self,
        location: LatLon,
        n: usize,
        max_distance_km: f64,
    ) -> Vec<(StationMetadata, f64)> {
        if n == 0 {
            return vec![];
        }
        let mut candidates: Vec<(OrderedFloat<f64>, &StationMetadata)> = self
            .stations
            .iter()
            .map(|s| {
                let km = distance(
                    HaversineLocation {
                        latitude: location.0,
                        longitude: location.1,
                    },
                    HaversineLocation {
                        latitude: s.latitude,
                        longitude: s.longitude,
                    },
                    Units::Kilometers,
                );
                (OrderedFloat(km), s)
            })
            .filter(|(km, _)| km.0 <= max_distance_km)
            .collect();
        candidates.sort_by_key(|(km, s)| (*km, s.id));
        candidates
            .into_iter()
            .take(n)
            .map(|(km, s)| (s.clone(), km.0))
            .collect()
    }
}

pub fn filter(roster: &Roster, bbox: Option<BoundingBox>, window: Option<CoverageWindow>) -> Roster {
    roster.filter(bbox, window)
}

/// Station ids present in every roster. An empty list yields an empty set.
pub fn intersect_stations(rosters: &[Roster]) -> BTreeSet<u32> {
    let Some((first, rest)) = rosters.split_first() else {
        return BTreeSet::new();
    };
    let mut common = first.ids();
    for roster in rest {
        let ids = roster.ids();
        common.retain(|id| ids.contains(id));
    }
    common
}
