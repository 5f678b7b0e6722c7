use crate::naming::resolver::NamingScheme;
use crate::naming::table::{DataColumn, TimestampFormat};
use crate::series::error::SeriesError;
use crate::types::series::{Observation, StationSeries};
use crate::utils::decode_latin1;
use std::path::Path;

pub const TIMESTAMP_COLUMN: &str = "MESS_DATUM";

/// Marks a missing measurement in the data files.
pub const MISSING_SENTINEL: f64 = -999.0;

const DELIMITER: char = ';';

fn column_index(header: &[&str], name: &str, path: &Path) -> Result<usize, SeriesError> {
    header
        .iter()
        .position(|h| *h == name)
        .ok_or_else(|| SeriesError::MissingColumn {
            path: path.to_path_buf(),
            column: name.to_string(),
        })
}

fn parse_value(raw: &str) -> Result<Option<f64>, ()> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let value: f64 = raw.parse().map_err(|_| ())?;
    Ok((value != MISSING_SENTINEL).then_some(value))
}

/// Parses the text of one data file, keeping the timestamp and the requested columns. Rows come
/// back sorted by time.
pub fn parse_text(
    text: &str,
    columns: &[DataColumn],
    format: TimestampFormat,
    path: &Path,
) -> Result<Vec<Observation>, SeriesError> {
    let mut lines = text.lines().enumerate();
    let Some((_, header)) = lines.next() else {
        return Err(SeriesError::MissingColumn {
            path: path.to_path_buf(),
            column: TIMESTAMP_COLUMN.to_string(),
        });
    };
    let header: Vec<&str> = header.split(DELIMITER).map(str::trim).collect();
    let time_index = column_index(&header, TIMESTAMP_COLUMN, path)?;
    let value_indices = columns
        .iter()
        .map(|c| column_index(&header, c.raw, path))
        .collect::<Result<Vec<usize>, SeriesError>>()?;

    let mut rows = Vec::new();
    for (index, line) in lines {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(DELIMITER).collect();
        let field = |i: usize| fields.get(i).copied().unwrap_or("");

        let raw_time = field(time_index);
        let time = format
            .parse(raw_time)
            .ok_or_else(|| SeriesError::InvalidTimestamp {
                path: path.to_path_buf(),
                line: index + 1,
                value: raw_time.trim().to_string(),
            })?;

        let values = value_indices
            .iter()
            .zip(columns)
            .map(|(&i, column)| {
                parse_value(field(i)).map_err(|()| SeriesError::InvalidValue {
                    path: path.to_path_buf(),
                    line: index + 1,
                    column: column.raw.to_string(),
                    value: field(i).trim().to_string(),
                })
            })
            .collect::<Result<Vec<Option<f64>>, SeriesError>>()?;

        rows.push(Observation::new(time, values));
    }
    rows.sort_by_key(|r| r.time);
    Ok(rows)
}

/// Reads one extracted data file into a series of the scheme's result columns.
pub async fn parse(
    path: &Path,
    station: &str,
    scheme: &NamingScheme,
) -> Result<StationSeries, SeriesError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| SeriesError::Read(path.to_path_buf(), e))?;
    let columns = scheme.columns();
    let format = scheme.timestamp_format();
    let owned_path = path.to_path_buf();
    let rows = tokio::task::spawn_blocking(move || {
        parse_text(&decode_latin1(&bytes), columns, format, &owned_path)
    })
    .await??;
    Ok(StationSeries::new(station, scheme.result_columns(), rows))
}
