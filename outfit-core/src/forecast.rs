use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};
use tracing::{debug, warn};

use crate::{
    calendar::unix_to_utc,
    error::EngineError,
    model::{Condition, DailyFeatures, RawSample, WeatherFeatures},
    normalize::normalize_at,
};

/// Aggregate interval samples into one record per upcoming day, relative to the current UTC date.
pub fn aggregate_daily(
    samples: &[RawSample],
    days: usize,
) -> Result<Vec<DailyFeatures>, EngineError> {
    aggregate_daily_from(samples, days, Utc::now().date_naive())
}

/// Buckets samples by the UTC date of their own timestamp, drops `today` and anything
/// earlier, and aggregates the first `days` remaining dates in ascending order.
///
/// When every sample falls on or before `today` the filter is skipped and the
/// unfiltered buckets are used instead.
pub fn aggregate_daily_from(
    samples: &[RawSample],
    days: usize,
    today: NaiveDate,
) -> Result<Vec<DailyFeatures>, EngineError> {
    if samples.is_empty() {
        return Err(EngineError::EmptyForecast);
    }

    let mut buckets: BTreeMap<NaiveDate, Vec<WeatherFeatures>> = BTreeMap::new();
    for raw in samples {
        let ts = raw.timestamp.ok_or_else(|| EngineError::missing("timestamp"))?;
        let instant = unix_to_utc(ts)?;
        let features = normalize_at(raw, instant)?;
        buckets.entry(instant.date_naive()).or_default().push(features);
    }

    let upcoming: Vec<_> = buckets.iter().filter(|(date, _)| **date > today).collect();
    let selected = if upcoming.is_empty() {
        warn!(%today, buckets = buckets.len(), "forecast has no days after today, using all");
        buckets.iter().collect()
    } else {
        upcoming
    };

    Ok(selected
        .into_iter()
        .take(days)
        .map(|(date, bucket)| {
            let day = aggregate_bucket(*date, bucket);
            debug!(
                %date,
                samples = bucket.len(),
                temperature_c = day.features.temperature_c,
                condition = %day.features.condition,
                "aggregated forecast day"
            );
            day
        })
        .collect())
}

/// Buckets are never empty: each one is created by pushing its first sample.
fn aggregate_bucket(date: NaiveDate, bucket: &[WeatherFeatures]) -> DailyFeatures {
    let first = &bucket[0];
    let count = bucket.len() as f64;
    let mean = |field: fn(&WeatherFeatures) -> f64| bucket.iter().map(field).sum::<f64>() / count;

    let temperatures = bucket.iter().map(|f| f.temperature_c);
    let high_c = temperatures.clone().fold(f64::NEG_INFINITY, f64::max);
    let low_c = temperatures.fold(f64::INFINITY, f64::min);

    let features = WeatherFeatures {
        temperature_c: mean(|f| f.temperature_c),
        feels_like_c: mean(|f| f.feels_like_c),
        humidity: mean(|f| f64::from(f.humidity)).round() as u8,
        wind_speed: mean(|f| f.wind_speed),
        condition: mode(bucket),
        rain: bucket.iter().any(|f| f.rain),
        snow: bucket.iter().any(|f| f.snow),
        season: first.season,
        hour: first.hour,
        day_of_week: first.day_of_week,
        timestamp: first.timestamp,
    };

    DailyFeatures { date, features, high_c, low_c }
}

/// Most frequent condition; ties go to the value encountered first. `bucket` must be non-empty.
fn mode(bucket: &[WeatherFeatures]) -> Condition {
    let mut counts: Vec<(&Condition, usize)> = Vec::new();
    for condition in bucket.iter().map(|f| &f.condition) {
        match counts.iter_mut().find(|(c, _)| *c == condition) {
            Some((_, n)) => *n += 1,
            None => counts.push((condition, 1)),
        }
    }

    let (mut winner, mut top) = counts[0];
    for &(condition, n) in &counts[1..] {
        if n > top {
            (winner, top) = (condition, n);
        }
    }
    winner.clone()
}
