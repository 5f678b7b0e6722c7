use chrono::{Duration, NaiveDate, NaiveDateTime};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dwd_opendata::{restrict, stitch, DateBound, Observation, StationSeries};

fn hourly(first: NaiveDateTime, hours: i64, value: f64) -> StationSeries {
    let rows = (0..hours)
        .map(|h| Observation::new(first + Duration::hours(h), vec![Some(value)]))
        .collect();
    StationSeries::new("Konstanz", vec!["air_temperature".to_string()], rows)
}

fn bench_stitch(c: &mut Criterion) {
    let start = NaiveDate::from_ymd_opt(1950, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap();
    let historical = hourly(start, 24 * 365 * 66, 1.0);
    // The recent archive overlaps the historical one by roughly a year and a half.
    let recent = hourly(start + Duration::days(365 * 65), 24 * 365 * 5, 2.0);
    let tables = vec![recent, historical];

    c.bench_function("stitch_overlapping_hourly", |b| {
        b.iter(|| stitch(black_box(tables.clone())))
    });

    let stitched = stitch(tables);
    let from: DateBound = "2000".parse().unwrap();
    let to: DateBound = "2010-06".parse().unwrap();
    c.bench_function("restrict_decade", |b| {
        b.iter(|| restrict(black_box(stitched.clone()), Some(from), Some(to)))
    });
}

criterion_group!(benches, bench_stitch);
criterion_main!(benches);
