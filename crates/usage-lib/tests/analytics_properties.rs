//! Contract tests for the analytics components through the public API

use chrono::{Duration, NaiveDate, NaiveDateTime};
use usage_lib::{
    flag_anomalies, leak_count, recommend, today_usage, AnalyticsError, AnomalyDetector,
    ForecastEngine, LeakDetector, RecommendationEngine, Sample, SeriesStore,
};

fn start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

fn hourly(points: &[(f64, f64)]) -> SeriesStore {
    SeriesStore::from_samples(points.iter().enumerate().map(|(i, (usage, leak))| {
        Sample::new(start() + Duration::hours(i as i64), *usage, *leak).unwrap()
    }))
    .unwrap()
}

/// A week of readings with a few leaks, similar to generated data
fn week_of_readings() -> SeriesStore {
    let points: Vec<(f64, f64)> = (0..168)
        .map(|i| {
            let base = 80.0 + ((i * 29) % 71) as f64;
            if i % 37 == 5 {
                let leak = 30.0 + (i % 50) as f64;
                (base + leak, leak)
            } else {
                (base, 0.0)
            }
        })
        .collect();
    hourly(&points)
}

fn single_leak_scenario() -> SeriesStore {
    let mut points = vec![(100.0, 0.0); 48];
    points[10] = (150.0, 50.0);
    hourly(&points)
}

#[test]
fn test_leak_count_matches_detected_events() {
    let detector = LeakDetector::default();
    for series in [week_of_readings(), single_leak_scenario(), SeriesStore::new()] {
        assert_eq!(leak_count(&series), detector.detect(&series).len());
    }
}

#[test]
fn test_invalid_samples_never_reach_a_series() {
    let built: Result<Vec<Sample>, AnalyticsError> = (0..20)
        .map(|i| Sample::new(start() + Duration::hours(i), f64::INFINITY, 0.0))
        .collect();
    assert!(matches!(
        built,
        Err(AnalyticsError::InvalidSample { field: "usage", .. })
    ));

    let decoded = serde_json::from_str::<Vec<Sample>>(
        r#"[{"timestamp":"2024-06-01T00:00:00","usage":-5.0,"leak":-3.0}]"#,
    );
    assert!(decoded.is_err());
}

#[test]
fn test_constant_usage_forecast() {
    for len in [2, 3, 24, 168] {
        let series = hourly(&vec![(87.5, 0.0); len]);
        let forecast = ForecastEngine::new().fit_and_predict(&series).unwrap();
        assert_eq!(forecast.predicted_usage, 87.5);
    }
}

#[test]
fn test_short_series_cannot_forecast() {
    for series in [SeriesStore::new(), hourly(&[(100.0, 0.0)])] {
        assert!(matches!(
            ForecastEngine::new().fit_and_predict(&series),
            Err(AnalyticsError::InsufficientData { required: 2, .. })
        ));
    }
}

#[test]
fn test_zero_window_rejected() {
    assert_eq!(
        today_usage(&week_of_readings(), 0),
        Err(AnalyticsError::InvalidWindow(0))
    );
}

#[test]
fn test_recommendation_table() {
    assert_eq!(
        recommend(0, 100.0),
        vec!["Encourage water conservation awareness"]
    );
    assert_eq!(
        recommend(2, 150.0),
        vec![
            "Dispatch maintenance team",
            "Reduce pressure during peak hours",
            "Encourage water conservation awareness",
        ]
    );
}

#[test]
fn test_single_leak_scenario() {
    let series = single_leak_scenario();

    assert_eq!(leak_count(&series), 1);

    let events = LeakDetector::default().detect(&series);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].timestamp, start() + Duration::hours(10));
    assert_eq!(events[0].extra_usage, 50.0);

    let forecast = ForecastEngine::new().fit_and_predict(&series).unwrap();
    assert!((forecast.predicted_usage - 100.0).abs() < 2.0);

    let flags = flag_anomalies(&series, 0.05).unwrap();
    let top = flags
        .iter()
        .max_by(|a, b| a.score.partial_cmp(&b.score).unwrap())
        .unwrap();
    assert_eq!(top.index, 10);
    assert!(top.is_anomaly);
}

#[test]
fn test_week_flags_roughly_contamination() {
    let series = week_of_readings();
    let flags = flag_anomalies(&series, 0.05).unwrap();

    assert_eq!(flags.len(), series.len());
    let flagged = flags.iter().filter(|f| f.is_anomaly).count();
    // 5% of 168 is 8.4
    assert!((5..=12).contains(&flagged), "flagged {}", flagged);
}

#[test]
fn test_repeated_calls_are_identical() {
    let series = week_of_readings();
    let detector = LeakDetector::default();
    let engine = RecommendationEngine::default();
    let anomalies = AnomalyDetector::default().with_seed(123);

    assert_eq!(today_usage(&series, 24), today_usage(&series, 24));
    assert_eq!(detector.detect(&series), detector.detect(&series));
    assert_eq!(engine.recommend(3, 141.0), engine.recommend(3, 141.0));
    assert_eq!(
        ForecastEngine::new().fit_and_predict(&series),
        ForecastEngine::new().fit_and_predict(&series)
    );
    assert_eq!(
        anomalies.flag_anomalies(&series),
        anomalies.flag_anomalies(&series)
    );
}
