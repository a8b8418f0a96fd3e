use chrono::Weekday;

use crate::model::{Condition, Season, WeatherFeatures};

/// Feature record with flags derived from the condition alone.
pub(crate) fn features(temperature_c: f64, condition: Condition) -> WeatherFeatures {
    WeatherFeatures {
        temperature_c,
        feels_like_c: temperature_c,
        humidity: 50,
        wind_speed: 1.0,
        rain: condition.is_rainy(),
        snow: condition.is_snowy(),
        condition,
        season: Season::Winter,
        hour: 12,
        day_of_week: Weekday::Mon,
        timestamp: None,
    }
}
