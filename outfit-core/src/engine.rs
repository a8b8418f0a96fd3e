use std::sync::Arc;

use chrono::{NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    error::EngineError,
    forecast::aggregate_daily_from,
    model::{Condition, DailyFeatures, Gender, Outfit, RawSample, Unit, WeatherFeatures},
    normalize::normalize,
    predictor::{OutfitPredictor, RulePredictor},
    rules::RuleTable,
    tips::generate_tips,
    units::display_temperature,
};

pub const MAX_FORECAST_DAYS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub outfit: Outfit,
    pub tips: Vec<String>,
}

/// Current-day recommendation with display-unit temperatures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutfitReport {
    pub location: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: u8,
    pub wind_speed: f64,
    pub condition: Condition,
    pub unit: Unit,
    pub outfit: Outfit,
    pub tips: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDayReport {
    pub date: NaiveDate,
    pub day: Weekday,
    pub temperature: f64,
    pub feels_like: f64,
    pub high: f64,
    pub low: f64,
    pub humidity: u8,
    pub condition: Condition,
    pub unit: Unit,
    pub outfit: Outfit,
    pub tips: Vec<String>,
}

/// Read-only decision context, built once at startup and shared across requests.
#[derive(Debug, Clone)]
pub struct OutfitEngine {
    predictor: Arc<dyn OutfitPredictor>,
}

impl Default for OutfitEngine {
    fn default() -> Self {
        Self::with_rules(Arc::new(RuleTable::builtin()))
    }
}

impl OutfitEngine {
    pub fn new(predictor: Arc<dyn OutfitPredictor>) -> Self {
        Self { predictor }
    }

    pub fn with_rules(rules: Arc<RuleTable>) -> Self {
        Self::new(Arc::new(RulePredictor::new(rules)))
    }

    /// Outfit and tips for one feature record.
    pub fn recommend(
        &self,
        features: &WeatherFeatures,
        gender: Gender,
    ) -> Result<Recommendation, EngineError> {
        let outfit = self.predictor.predict(features, gender)?;
        if let Some(slot) = outfit.first_empty_slot() {
            warn!(slot = slot.as_str(), ?outfit, "predictor left a slot empty");
            return Err(EngineError::Prediction(format!(
                "no label for the `{}` slot",
                slot.as_str()
            )));
        }

        let tips = generate_tips(&outfit, gender, features);
        debug!(?outfit, tips = tips.len(), "recommendation ready");
        Ok(Recommendation { outfit, tips })
    }

    pub fn outfit_report(
        &self,
        location: &str,
        raw: &RawSample,
        gender: Gender,
        unit: Unit,
    ) -> Result<OutfitReport, EngineError> {
        let features = normalize(raw)?;
        self.report_for(location, &features, gender, unit)
    }

    pub fn report_for(
        &self,
        location: &str,
        features: &WeatherFeatures,
        gender: Gender,
        unit: Unit,
    ) -> Result<OutfitReport, EngineError> {
        let Recommendation { outfit, tips } = self.recommend(features, gender)?;

        Ok(OutfitReport {
            location: location.to_string(),
            temperature: display_temperature(features.temperature_c, unit),
            feels_like: display_temperature(features.feels_like_c, unit),
            humidity: features.humidity,
            wind_speed: features.wind_speed,
            condition: features.condition.clone(),
            unit,
            outfit,
            tips,
        })
    }

    pub fn forecast_report(
        &self,
        samples: &[RawSample],
        gender: Gender,
        unit: Unit,
        days: usize,
    ) -> Result<Vec<ForecastDayReport>, EngineError> {
        self.forecast_report_from(samples, gender, unit, days, Utc::now().date_naive())
    }

    /// `days` is clamped to `1..=MAX_FORECAST_DAYS`.
    pub fn forecast_report_from(
        &self,
        samples: &[RawSample],
        gender: Gender,
        unit: Unit,
        days: usize,
        today: NaiveDate,
    ) -> Result<Vec<ForecastDayReport>, EngineError> {
        let days = days.clamp(1, MAX_FORECAST_DAYS);
        aggregate_daily_from(samples, days, today)?
            .iter()
            .map(|day| self.day_report(day, gender, unit))
            .collect()
    }

    fn day_report(
        &self,
        day: &DailyFeatures,
        gender: Gender,
        unit: Unit,
    ) -> Result<ForecastDayReport, EngineError> {
        let features = &day.features;
        let Recommendation { outfit, tips } = self.recommend(features, gender)?;

        Ok(ForecastDayReport {
            date: day.date,
            day: features.day_of_week,
            temperature: display_temperature(features.temperature_c, unit),
            feels_like: display_temperature(features.feels_like_c, unit),
            high: display_temperature(day.high_c, unit),
            low: display_temperature(day.low_c, unit),
            humidity: features.humidity,
            condition: features.condition.clone(),
            unit,
            outfit,
            tips,
        })
    }
}
