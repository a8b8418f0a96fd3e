//! Season and time-of-week features derived from a timestamp.

use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};

use crate::{error::EngineError, model::Season};

pub fn season_for_month(month: u32) -> Season {
    match month {
        12 | 1 | 2 => Season::Winter,
        3..=5 => Season::Spring,
        6..=8 => Season::Summer,
        _ => Season::Autumn,
    }
}

/// Calendar features of an instant, in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeFeatures {
    pub season: Season,
    pub hour: u32,
    pub day_of_week: Weekday,
}

impl TimeFeatures {
    pub fn at(instant: DateTime<Utc>) -> Self {
        Self {
            season: season_for_month(instant.month()),
            hour: instant.hour(),
            day_of_week: instant.weekday(),
        }
    }
}

pub fn unix_to_utc(ts: i64) -> Result<DateTime<Utc>, EngineError> {
    DateTime::from_timestamp(ts, 0)
        .ok_or_else(|| EngineError::invalid("timestamp", format!("{ts} is out of range")))
}

/// Features for `timestamp`, or for `now` when the sample carries none.
pub fn time_features(
    timestamp: Option<i64>,
    now: DateTime<Utc>,
) -> Result<TimeFeatures, EngineError> {
    let instant = match timestamp {
        Some(ts) => unix_to_utc(ts)?,
        None => now,
    };
    Ok(TimeFeatures::at(instant))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn months_map_to_seasons() {
        let expected = [
            (1, Season::Winter),
            (2, Season::Winter),
            (3, Season::Spring),
            (5, Season::Spring),
            (6, Season::Summer),
            (8, Season::Summer),
            (9, Season::Autumn),
            (11, Season::Autumn),
            (12, Season::Winter),
        ];
        for (month, season) in expected {
            assert_eq!(season_for_month(month), season, "month {month}");
        }
    }

    #[test]
    fn features_from_timestamp() {
        // 2024-07-04T15:30:00Z, a Thursday
        let ts = Utc.with_ymd_and_hms(2024, 7, 4, 15, 30, 0).unwrap().timestamp();
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        let f = time_features(Some(ts), now).unwrap();
        assert_eq!(f.season, Season::Summer);
        assert_eq!(f.hour, 15);
        assert_eq!(f.day_of_week, Weekday::Thu);
    }

    #[test]
    fn falls_back_to_now() {
        let now = Utc.with_ymd_and_hms(2025, 12, 1, 8, 0, 0).unwrap();
        let f = time_features(None, now).unwrap();
        assert_eq!(f.season, Season::Winter);
        assert_eq!(f.hour, 8);
        assert_eq!(f.day_of_week, Weekday::Mon);
    }

    #[test]
    fn rejects_out_of_range_timestamp() {
        let err = unix_to_utc(i64::MAX).unwrap_err();
        assert!(matches!(err, EngineError::ProviderData { field: "timestamp", .. }));
    }
}
