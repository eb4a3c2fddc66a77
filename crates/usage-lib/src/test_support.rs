//! Series fixtures shared by unit tests

use crate::models::{Sample, SeriesStore};
use chrono::{Duration, NaiveDate, NaiveDateTime};

/// Timestamp `hour` hours after 2024-03-01 00:00
pub fn hour(hour: usize) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("valid fixture date")
        + Duration::hours(hour as i64)
}

/// Hourly series from (usage, leak) pairs
pub fn series_from(points: &[(f64, f64)]) -> SeriesStore {
    SeriesStore::from_samples(
        points
            .iter()
            .enumerate()
            .map(|(i, (usage, leak))| Sample::new(hour(i), *usage, *leak).expect("valid sample")),
    )
    .expect("ordered fixture")
}

pub fn constant_series(len: usize, usage: f64) -> SeriesStore {
    series_from(&vec![(usage, 0.0); len])
}

/// 48 hours at 100 L with a 50 L leak at hour 10
pub fn single_leak_scenario() -> SeriesStore {
    let mut points = vec![(100.0, 0.0); 48];
    points[10] = (150.0, 50.0);
    series_from(&points)
}
