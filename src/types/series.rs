//! In-memory time series produced by the assembly pipeline, and their Polars export.
//!
//! A [`StationSeries`] holds the columns of one requested variable for one station. Several of
//! them are aligned into a [`StationRecord`], and records of many stations form a [`Collection`].
//! All three keep timestamps strictly increasing and unique; missing measurements are `None`.

use chrono::NaiveDateTime;
use polars::prelude::{
    Column, DataFrame, DataType, IntoLazy, LazyFrame, NamedFrom, PolarsResult, Series, TimeUnit,
};

/// One timestamp of a [`StationSeries`], with a value per series column.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub time: NaiveDateTime,
    pub values: Vec<Option<f64>>,
}

impl Observation {
    pub fn new(time: NaiveDateTime, values: Vec<Option<f64>>) -> Self {
        Self { time, values }
    }
}

/// A time-indexed table for one (station, variable) pair.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StationSeries {
    /// The station name the series was requested for.
    pub station: String,
    /// Result column names (e.g. `wind_speed`, `wind_direction`).
    pub columns: Vec<String>,
    pub rows: Vec<Observation>,
}

impl StationSeries {
    pub fn new(station: impl Into<String>, columns: Vec<String>, rows: Vec<Observation>) -> Self {
        Self {
            station: station.into(),
            columns,
            rows,
        }
    }

    /// A series without rows, returned when a station offers no data for a variable.
    pub fn empty(station: impl Into<String>, columns: Vec<String>) -> Self {
        Self::new(station, columns, Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn first_time(&self) -> Option<NaiveDateTime> {
        self.rows.first().map(|r| r.time)
    }

    pub fn last_time(&self) -> Option<NaiveDateTime> {
        self.rows.last().map(|r| r.time)
    }

    pub fn times(&self) -> Vec<NaiveDateTime> {
        self.rows.iter().map(|r| r.time).collect()
    }

    pub fn column(&self, name: &str) -> Option<Vec<Option<f64>>> {
        let index = self.columns.iter().position(|c| c == name)?;
        Some(
            self.rows
                .iter()
                .map(|r| r.values.get(index).copied().flatten())
                .collect(),
        )
    }

    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let mut columns = vec![time_column(self.rows.iter().map(|r| &r.time))?];
        for (index, name) in self.columns.iter().enumerate() {
            let values: Vec<Option<f64>> = self
                .rows
                .iter()
                .map(|r| r.values.get(index).copied().flatten())
                .collect();
            columns.push(Column::from(Series::new(name.as_str().into(), values)));
        }
        DataFrame::new(columns)
    }
}

/// All requested variables of one station, aligned on the union of their timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct StationRecord {
    pub station: String,
    pub columns: Vec<String>,
    pub time: Vec<NaiveDateTime>,
    /// Row-major values; `values[i][j]` belongs to `time[i]` and `columns[j]`.
    pub values: Vec<Vec<Option<f64>>>,
}

impl StationRecord {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn column(&self, name: &str) -> Option<Vec<Option<f64>>> {
        let index = self.columns.iter().position(|c| c == name)?;
        Some(self.values.iter().map(|row| row[index]).collect())
    }

    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let mut columns = vec![time_column(self.time.iter())?];
        for (index, name) in self.columns.iter().enumerate() {
            let values: Vec<Option<f64>> = self.values.iter().map(|row| row[index]).collect();
            columns.push(Column::from(Series::new(name.as_str().into(), values)));
        }
        DataFrame::new(columns)
    }
}

/// Station records keyed by station name, in the order the stations were requested.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Collection {
    pub records: Vec<StationRecord>,
}

impl Collection {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StationRecord> {
        self.records.iter()
    }

    pub fn station_names(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.station.as_str()).collect()
    }

    pub fn get(&self, station: &str) -> Option<&StationRecord> {
        self.records.iter().find(|r| r.station == station)
    }

    /// Union of all record columns, in first-seen order.
    pub fn columns(&self) -> Vec<String> {
        let mut columns: Vec<String> = Vec::new();
        for record in &self.records {
            for name in &record.columns {
                if !columns.contains(name) {
                    columns.push(name.clone());
                }
            }
        }
        columns
    }

    /// Long-format frame: `station`, `time`, then one column per variable.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let names = self.columns();
        let mut stations: Vec<String> = Vec::new();
        let mut times: Vec<&NaiveDateTime> = Vec::new();
        let mut values: Vec<Vec<Option<f64>>> = vec![Vec::new(); names.len()];

        for record in &self.records {
            let positions: Vec<Option<usize>> = names
                .iter()
                .map(|name| record.columns.iter().position(|c| c == name))
                .collect();
            for (time, row) in record.time.iter().zip(&record.values) {
                stations.push(record.station.clone());
                times.push(time);
                for (target, position) in values.iter_mut().zip(&positions) {
                    target.push(position.and_then(|p| row[p]));
                }
            }
        }

        let mut columns = vec![
            Column::from(Series::new("station".into(), stations)),
            time_column(times.into_iter())?,
        ];
        for (name, column) in names.iter().zip(values) {
            columns.push(Column::from(Series::new(name.as_str().into(), column)));
        }
        DataFrame::new(columns)
    }

    pub fn lazy(&self) -> PolarsResult<LazyFrame> {
        Ok(self.to_dataframe()?.lazy())
    }
}

fn time_column<'a>(times: impl Iterator<Item = &'a NaiveDateTime>) -> PolarsResult<Column> {
    let millis: Vec<i64> = times.map(|t| t.and_utc().timestamp_millis()).collect();
    let series = Series::new("time".into(), millis)
        .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?;
    Ok(Column::from(series))
}
