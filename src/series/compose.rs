use crate::types::series::{Collection, StationRecord, StationSeries};
use chrono::NaiveDateTime;
use log::{debug, warn};
use std::collections::BTreeMap;

/// Aligns the series of one station on the union of their timestamps.
///
/// Empty series are dropped. If nothing is left the station has no data for any requested
/// variable and `None` is returned. A column name already contributed by an earlier series is
/// skipped.
pub fn compose_station(station: &str, series: Vec<StationSeries>) -> Option<StationRecord> {
    let series: Vec<StationSeries> = series.into_iter().filter(|s| !s.is_empty()).collect();
    if series.is_empty() {
        warn!("Station {} has no data for any requested variable", station);
        return None;
    }

    let mut columns: Vec<String> = Vec::new();
    let targets: Vec<Vec<Option<usize>>> = series
        .iter()
        .map(|s| {
            s.columns
                .iter()
                .map(|name| {
                    if columns.contains(name) {
                        debug!("Column {} of station {} is already present", name, station);
                        None
                    } else {
                        columns.push(name.clone());
                        Some(columns.len() - 1)
                    }
                })
                .collect()
        })
        .collect();

    let width = columns.len();
    let mut aligned: BTreeMap<NaiveDateTime, Vec<Option<f64>>> = BTreeMap::new();
    for (s, target) in series.iter().zip(&targets) {
        for row in &s.rows {
            let slot = aligned
                .entry(row.time)
                .or_insert_with(|| vec![None; width]);
            for (value, column) in row.values.iter().zip(target) {
                if let Some(column) = column {
                    slot[*column] = *value;
                }
            }
        }
    }

    let (time, values): (Vec<NaiveDateTime>, Vec<Vec<Option<f64>>>) = aligned.into_iter().unzip();
    Some(StationRecord {
        station: station.to_string(),
        columns,
        time,
        values,
    })
}

/// Collects station records in the given order.
pub fn compose_collection(records: impl IntoIterator<Item = StationRecord>) -> Collection {
    Collection {
        records: records.into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::series::Observation;
    use chrono::NaiveDate;

    fn hour(h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2020, 1, 1)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn series(column: &str, hours: &[u32]) -> StationSeries {
        StationSeries::new(
            "Konstanz",
            vec![column.to_string()],
            hours
                .iter()
                .map(|h| Observation::new(hour(*h), vec![Some(*h as f64)]))
                .collect(),
        )
    }

    #[test]
    fn aligns_on_union_of_timestamps() {
        let record = compose_station(
            "Konstanz",
            vec![
                series("air_temperature", &[0, 1, 2]),
                series("precipitation", &[2, 3]),
            ],
        )
        .unwrap();
        assert_eq!(record.columns, vec!["air_temperature", "precipitation"]);
        assert_eq!(record.time, vec![hour(0), hour(1), hour(2), hour(3)]);
        assert_eq!(
            record.column("precipitation").unwrap(),
            vec![None, None, Some(2.0), Some(3.0)]
        );
        assert_eq!(
            record.column("air_temperature").unwrap(),
            vec![Some(0.0), Some(1.0), Some(2.0), None]
        );
    }

    #[test]
    fn empty_variables_are_dropped_and_all_empty_is_none() {
        let record = compose_station(
            "Konstanz",
            vec![
                StationSeries::empty("Konstanz", vec!["sun".into()]),
                series("air_temperature", &[0]),
            ],
        )
        .unwrap();
        assert_eq!(record.columns, vec!["air_temperature"]);

        let none = compose_station(
            "Nowhere",
            vec![StationSeries::empty("Nowhere", vec!["sun".into()])],
        );
        assert!(none.is_none());
        assert!(compose_station("Nowhere", vec![]).is_none());
    }

    #[test]
    fn duplicate_columns_keep_first_series() {
        let first = series("wind_speed", &[0]);
        let mut second = series("wind_speed", &[0]);
        second.rows[0].values = vec![Some(99.0)];
        let record = compose_station("Konstanz", vec![first, second]).unwrap();
        assert_eq!(record.columns, vec!["wind_speed"]);
        assert_eq!(record.values, vec![vec![Some(0.0)]]);
    }

    #[test]
    fn collection_keeps_requested_order() {
        let konstanz = compose_station("Konstanz", vec![series("sun", &[0])]).unwrap();
        let mut freiburg = konstanz.clone();
        freiburg.station = "Freiburg".into();
        let collection = compose_collection(vec![freiburg, konstanz]);
        assert_eq!(collection.station_names(), vec!["Freiburg", "Konstanz"]);
    }
}
