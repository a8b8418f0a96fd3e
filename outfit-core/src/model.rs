use std::{fmt, str::FromStr};

use anyhow::anyhow;
use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// One observation or forecast interval as reported by a weather provider.
///
/// Every numeric field is optional so that gaps in the provider payload reach the
/// normalizer, which decides whether they can be repaired locally.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSample {
    pub temperature: Option<f64>,
    pub feels_like: Option<f64>,
    pub humidity: Option<f64>,
    pub wind_speed: Option<f64>,
    pub condition: Option<String>,
    /// Precipitation volume reported alongside the sample, in mm.
    pub rain_mm: Option<f64>,
    pub snow_mm: Option<f64>,
    /// Unix seconds.
    pub timestamp: Option<i64>,
}

/// Provider weather condition. Unknown provider strings are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Condition {
    Clear,
    Clouds,
    Drizzle,
    Rain,
    Snow,
    Mist,
    Thunderstorm,
    Haze,
    Dust,
    Fog,
    Tornado,
    Other(String),
}

impl Condition {
    pub fn as_str(&self) -> &str {
        match self {
            Condition::Clear => "Clear",
            Condition::Clouds => "Clouds",
            Condition::Drizzle => "Drizzle",
            Condition::Rain => "Rain",
            Condition::Snow => "Snow",
            Condition::Mist => "Mist",
            Condition::Thunderstorm => "Thunderstorm",
            Condition::Haze => "Haze",
            Condition::Dust => "Dust",
            Condition::Fog => "Fog",
            Condition::Tornado => "Tornado",
            Condition::Other(s) => s,
        }
    }

    /// Matches the provider vocabulary case-sensitively; anything else passes through.
    pub fn parse(value: &str) -> Self {
        match value {
            "Clear" => Condition::Clear,
            "Clouds" => Condition::Clouds,
            "Drizzle" => Condition::Drizzle,
            "Rain" => Condition::Rain,
            "Snow" => Condition::Snow,
            "Mist" => Condition::Mist,
            "Thunderstorm" => Condition::Thunderstorm,
            "Haze" => Condition::Haze,
            "Dust" => Condition::Dust,
            "Fog" => Condition::Fog,
            "Tornado" => Condition::Tornado,
            other => Condition::Other(other.to_string()),
        }
    }

    pub fn is_rainy(&self) -> bool {
        matches!(self, Condition::Rain | Condition::Thunderstorm | Condition::Drizzle)
    }

    pub fn is_snowy(&self) -> bool {
        matches!(self, Condition::Snow)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Condition {
    fn from(value: String) -> Self {
        Condition::parse(&value)
    }
}

impl From<Condition> for String {
    fn from(value: Condition) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Baby,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Baby => "baby",
        }
    }

    pub fn is_adult(&self) -> bool {
        matches!(self, Gender::Male | Gender::Female)
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "baby" => Ok(Gender::Baby),
            _ => Err(anyhow!("Unknown gender '{value}'. Supported values: male, female, baby.")),
        }
    }
}

/// Display unit for temperatures. Everything internal stays in Celsius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Unit {
    #[default]
    #[serde(rename = "C")]
    Celsius,
    #[serde(rename = "F")]
    Fahrenheit,
}

impl Unit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Celsius => "C",
            Unit::Fahrenheit => "F",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Unit {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_uppercase().as_str() {
            "C" | "CELSIUS" => Ok(Unit::Celsius),
            "F" | "FAHRENHEIT" => Ok(Unit::Fahrenheit),
            _ => Err(anyhow!("Unknown unit '{value}'. Supported values: C, F.")),
        }
    }
}

/// Canonical weather feature record consumed by every decision component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherFeatures {
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity: u8,
    pub wind_speed: f64,
    pub condition: Condition,
    pub rain: bool,
    pub snow: bool,
    pub season: Season,
    pub hour: u32,
    pub day_of_week: Weekday,
    pub timestamp: Option<i64>,
}

/// Aggregated features for one forecast day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyFeatures {
    pub date: NaiveDate,
    pub features: WeatherFeatures,
    pub high_c: f64,
    pub low_c: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    Top,
    Bottom,
    Footwear,
    Accessory,
}

impl Slot {
    pub const fn all() -> &'static [Slot] {
        &[Slot::Top, Slot::Bottom, Slot::Footwear, Slot::Accessory]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Slot::Top => "top",
            Slot::Bottom => "bottom",
            Slot::Footwear => "footwear",
            Slot::Accessory => "accessory",
        }
    }
}

/// Exactly one label per slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Outfit {
    pub top: String,
    pub bottom: String,
    pub footwear: String,
    pub accessory: String,
}

impl Outfit {
    pub fn get(&self, slot: Slot) -> &str {
        match slot {
            Slot::Top => &self.top,
            Slot::Bottom => &self.bottom,
            Slot::Footwear => &self.footwear,
            Slot::Accessory => &self.accessory,
        }
    }

    /// First slot whose label is empty or whitespace, if any.
    pub fn first_empty_slot(&self) -> Option<Slot> {
        Slot::all().iter().copied().find(|slot| self.get(*slot).trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn condition_parse_is_case_sensitive() {
        assert_eq!(Condition::parse("Rain"), Condition::Rain);
        assert_eq!(Condition::parse("rain"), Condition::Other("rain".into()));
        assert_eq!(Condition::parse("Smoke"), Condition::Other("Smoke".into()));
    }

    #[test]
    fn condition_serializes_as_provider_string() {
        let json = serde_json::to_string(&Condition::Thunderstorm).unwrap();
        assert_eq!(json, "\"Thunderstorm\"");

        let back: Condition = serde_json::from_str("\"Squall\"").unwrap();
        assert_eq!(back, Condition::Other("Squall".into()));
    }

    #[test]
    fn rainy_conditions() {
        assert!(Condition::Drizzle.is_rainy());
        assert!(Condition::Thunderstorm.is_rainy());
        assert!(!Condition::Snow.is_rainy());
        assert!(!Condition::Other("Rain".to_lowercase()).is_rainy());
    }

    #[test]
    fn gender_and_unit_parse() {
        assert_eq!("Female".parse::<Gender>().unwrap(), Gender::Female);
        assert_eq!("f".parse::<Unit>().unwrap(), Unit::Fahrenheit);

        let err = "robot".parse::<Gender>().unwrap_err();
        assert!(err.to_string().contains("Unknown gender"));
        assert!("K".parse::<Unit>().is_err());
    }

    #[test]
    fn unit_serde_uses_letters() {
        assert_eq!(serde_json::to_string(&Unit::Fahrenheit).unwrap(), "\"F\"");
        let unit: Unit = serde_json::from_str("\"C\"").unwrap();
        assert_eq!(unit, Unit::Celsius);
    }

    #[test]
    fn outfit_detects_empty_slot() {
        let outfit = Outfit {
            top: "tshirt".into(),
            bottom: "pants".into(),
            footwear: " ".into(),
            accessory: "none".into(),
        };
        assert_eq!(outfit.first_empty_slot(), Some(Slot::Footwear));
    }
}
