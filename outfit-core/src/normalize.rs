use chrono::{DateTime, Utc};
use tracing::trace;

use crate::{
    calendar::time_features,
    error::EngineError,
    model::{Condition, RawSample, WeatherFeatures},
};

/// Normalize a raw sample, deriving time features from "now" when it carries no timestamp.
pub fn normalize(raw: &RawSample) -> Result<WeatherFeatures, EngineError> {
    normalize_at(raw, Utc::now())
}

pub fn normalize_at(raw: &RawSample, now: DateTime<Utc>) -> Result<WeatherFeatures, EngineError> {
    let temperature_c = finite("temperature", raw.temperature)?;
    let feels_like_c = match raw.feels_like {
        Some(v) => finite("feels_like", Some(v))?,
        None => temperature_c,
    };

    let humidity = finite("humidity", raw.humidity)?;
    if !(0.0..=100.0).contains(&humidity) {
        return Err(EngineError::invalid("humidity", format!("{humidity} is outside 0..=100")));
    }

    let wind_speed = match raw.wind_speed {
        Some(v) => finite("wind_speed", Some(v))?,
        None => 0.0,
    };
    if wind_speed < 0.0 {
        return Err(EngineError::invalid("wind_speed", format!("{wind_speed} is negative")));
    }

    let condition = raw
        .condition
        .as_deref()
        .map(Condition::parse)
        .ok_or_else(|| EngineError::missing("condition"))?;

    if let Condition::Other(name) = &condition {
        trace!(condition = %name, "unrecognised provider condition");
    }

    let rain = condition.is_rainy() || reported(raw.rain_mm);
    let snow = condition.is_snowy() || reported(raw.snow_mm);

    let time = time_features(raw.timestamp, now)?;

    Ok(WeatherFeatures {
        temperature_c,
        feels_like_c,
        humidity: humidity.round() as u8,
        wind_speed,
        condition,
        rain,
        snow,
        season: time.season,
        hour: time.hour,
        day_of_week: time.day_of_week,
        timestamp: raw.timestamp,
    })
}

fn finite(field: &'static str, value: Option<f64>) -> Result<f64, EngineError> {
    match value {
        Some(v) if v.is_finite() => Ok(v),
        Some(v) => Err(EngineError::invalid(field, format!("{v} is not a finite number"))),
        None => Err(EngineError::missing(field)),
    }
}

fn reported(precipitation_mm: Option<f64>) -> bool {
    precipitation_mm.is_some_and(|mm| mm > 0.0)
}
