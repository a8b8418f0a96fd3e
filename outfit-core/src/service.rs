use tracing::info;

use crate::{
    engine::{ForecastDayReport, OutfitEngine, OutfitReport},
    error::EngineError,
    model::{Gender, Unit},
    provider::WeatherProvider,
};

/// Fetches weather for a location and runs it through the engine.
#[derive(Debug)]
pub struct OutfitService {
    provider: Box<dyn WeatherProvider>,
    engine: OutfitEngine,
}

impl OutfitService {
    pub fn new(provider: Box<dyn WeatherProvider>, engine: OutfitEngine) -> Self {
        Self { provider, engine }
    }

    pub async fn outfit(
        &self,
        location: &str,
        gender: Gender,
        unit: Unit,
    ) -> Result<OutfitReport, EngineError> {
        info!(location, %gender, %unit, "outfit requested");
        let raw = self.provider.fetch_current(location).await?;
        self.engine.outfit_report(location, &raw, gender, unit)
    }

    pub async fn forecast(
        &self,
        location: &str,
        gender: Gender,
        unit: Unit,
        days: usize,
    ) -> Result<Vec<ForecastDayReport>, EngineError> {
        info!(location, %gender, %unit, days, "forecast requested");
        let samples = self.provider.fetch_forecast(location).await?;
        self.engine.forecast_report(&samples, gender, unit, days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RawSample;
    use async_trait::async_trait;
    use chrono::{Duration, Utc};

    #[derive(Debug)]
    struct FakeProvider {
        current: Result<RawSample, EngineError>,
        forecast: Result<Vec<RawSample>, EngineError>,
    }

    #[async_trait]
    impl WeatherProvider for FakeProvider {
        async fn fetch_current(&self, _location: &str) -> Result<RawSample, EngineError> {
            self.current.clone()
        }

        async fn fetch_forecast(&self, _location: &str) -> Result<Vec<RawSample>, EngineError> {
            self.forecast.clone()
        }
    }

    fn sample(temp: f64, condition: &str, ts: i64) -> RawSample {
        RawSample {
            temperature: Some(temp),
            feels_like: None,
            humidity: Some(55.0),
            wind_speed: Some(3.0),
            condition: Some(condition.into()),
            rain_mm: None,
            snow_mm: None,
            timestamp: Some(ts),
        }
    }

    fn service(provider: FakeProvider) -> OutfitService {
        OutfitService::new(Box::new(provider), OutfitEngine::default())
    }

    #[tokio::test]
    async fn outfit_uses_current_weather() {
        let svc = service(FakeProvider {
            current: Ok(sample(28.0, "Clear", Utc::now().timestamp())),
            forecast: Ok(vec![]),
        });

        let report = svc.outfit("Lisbon", Gender::Male, Unit::Celsius).await.unwrap();
        assert_eq!(report.location, "Lisbon");
        assert_eq!(report.temperature, 28.0);
        assert_eq!(report.outfit.bottom, "shorts");
    }

    #[tokio::test]
    async fn forecast_skips_today() {
        let now = Utc::now();
        let samples = (0..4)
            .map(|d| sample(12.0, "Rain", (now + Duration::days(d)).timestamp()))
            .collect();
        let svc = service(FakeProvider {
            current: Err(EngineError::EmptyForecast),
            forecast: Ok(samples),
        });

        let days = svc.forecast("Bergen", Gender::Female, Unit::Celsius, 2).await.unwrap();
        assert_eq!(days.len(), 2);
        assert!(days.iter().all(|d| d.date > now.date_naive()));
        assert!(days.iter().all(|d| d.outfit.accessory == "umbrella"));
    }

    #[tokio::test]
    async fn provider_errors_are_surfaced() {
        let unavailable = EngineError::ProviderUnavailable {
            status: Some(404),
            message: "city not found".into(),
        };
        let svc = service(FakeProvider {
            current: Err(unavailable.clone()),
            forecast: Err(unavailable.clone()),
        });

        let current = svc.outfit("Atlantis", Gender::Male, Unit::Celsius).await;
        assert_eq!(current, Err(unavailable.clone()));

        let forecast = svc.forecast("Atlantis", Gender::Male, Unit::Celsius, 3).await;
        assert_eq!(forecast, Err(unavailable));
    }

    #[tokio::test]
    async fn empty_forecast_is_reported() {
        let svc = service(FakeProvider {
            current: Err(EngineError::EmptyForecast),
            forecast: Ok(vec![]),
        });
        let err = svc.forecast("Void", Gender::Baby, Unit::Fahrenheit, 1).await.unwrap_err();
        assert_eq!(err, EngineError::EmptyForecast);
    }
}
