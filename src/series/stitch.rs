use crate::types::period::DateBound;
use crate::types::series::{Observation, StationSeries};

/// Concatenates per-archive tables of one station and variable into one series.
///
/// Tables are ordered by their first timestamp. Every table after the first only contributes
/// rows strictly after the last timestamp accumulated so far, so on overlap the earlier table
/// wins up to its end and the later one takes over afterwards. Remaining duplicate timestamps
/// keep their first occurrence. The result is strictly increasing in time.
pub fn stitch(tables: Vec<StationSeries>) -> StationSeries {
    let (station, columns) = match tables.first() {
        Some(first) => (first.station.clone(), first.columns.clone()),
        None => return StationSeries::default(),
    };

    let mut tables: Vec<StationSeries> = tables.into_iter().filter(|t| !t.is_empty()).collect();
    for table in &mut tables {
        table.rows.sort_by_key(|r| r.time);
    }
    tables.sort_by_key(|t| t.first_time());

    let mut rows: Vec<Observation> = Vec::with_capacity(tables.iter().map(StationSeries::len).sum());
    for table in tables {
        match rows.last().map(|r| r.time) {
            Some(last) => rows.extend(table.rows.into_iter().filter(|r| r.time > last)),
            None => rows.extend(table.rows),
        }
    }
    rows.dedup_by_key(|r| r.time);

    StationSeries::new(station, columns, rows)
}

/// Keeps the rows between the start of `start` and the end of `end`, both inclusive. A missing
/// bound leaves that side open.
pub fn restrict(
    mut series: StationSeries,
    start: Option<DateBound>,
    end: Option<DateBound>,
) -> StationSeries {
    series.rows.retain(|r| {
        start.is_none_or(|s| r.time >= s.start) && end.is_none_or(|e| r.time <= e.end)
    });
    series
}
