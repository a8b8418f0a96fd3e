//! Core library for the `outfit` recommender.
//!
//! This crate defines:
//! - The canonical weather feature record and its normalization from provider samples
//! - Daily aggregation of interval forecasts
//! - The garment rule table, slot selection and tip generation
//! - A pluggable predictor seam and the engine context that ties them together
//! - Configuration and the OpenWeather provider client
//!
//! It is used by `outfit-cli`, but can also be reused by other binaries or services.

pub mod calendar;
pub mod config;
pub mod engine;
pub mod error;
pub mod forecast;
pub mod model;
pub mod normalize;
pub mod predictor;
pub mod provider;
pub mod rules;
pub mod select;
pub mod service;
pub mod tips;
pub mod units;

#[cfg(test)]
mod test_support;

pub use config::{Config, Defaults, ProviderConfig};
pub use engine::{ForecastDayReport, OutfitEngine, OutfitReport, Recommendation};
pub use error::EngineError;
pub use model::{
    Condition, DailyFeatures, Gender, Outfit, RawSample, Season, Slot, Unit, WeatherFeatures,
};
pub use predictor::{OutfitPredictor, RulePredictor};
pub use provider::{WeatherProvider, provider_from_config};
pub use rules::{CandidateSet, RuleTable};
pub use service::OutfitService;
