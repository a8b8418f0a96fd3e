use std::{fs, path::Path};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{Gender, WeatherFeatures};

/// Which wearers a temperature rule applies to. `Adult` covers male and female.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleGender {
    Adult,
    Male,
    Female,
    Baby,
}

impl RuleGender {
    pub fn matches(&self, gender: Gender) -> bool {
        match self {
            RuleGender::Adult => gender.is_adult(),
            RuleGender::Male => gender == Gender::Male,
            RuleGender::Female => gender == Gender::Female,
            RuleGender::Baby => gender == Gender::Baby,
        }
    }
}

/// Inclusive temperature band, in Celsius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureRule {
    pub min: f64,
    pub max: f64,
    pub gender: RuleGender,
    pub tags: Vec<String>,
}

/// Applies to every gender whenever the condition matches (case-insensitively).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherOverrideRule {
    pub condition: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Rule {
    Temperature(TemperatureRule),
    Weather(WeatherOverrideRule),
}

impl Rule {
    pub fn tags(&self) -> &[String] {
        match self {
            Rule::Temperature(r) => &r.tags,
            Rule::Weather(r) => &r.tags,
        }
    }
}

/// Garment tags matched for one request, deduplicated, in first-insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateSet {
    tags: Vec<String>,
}

impl CandidateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if the tag was already present.
    pub fn insert(&mut self, tag: &str) -> bool {
        if self.contains(tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }

    pub fn extend<'a>(&mut self, tags: impl IntoIterator<Item = &'a String>) {
        for tag in tags {
            self.insert(tag);
        }
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn is_superset_of(&self, other: &CandidateSet) -> bool {
        other.iter().all(|tag| self.contains(tag))
    }
}

impl<'a> FromIterator<&'a str> for CandidateSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut set = CandidateSet::new();
        for tag in iter {
            set.insert(tag);
        }
        set
    }
}

#[derive(Debug, Deserialize, Serialize)]
struct RuleFile {
    #[serde(rename = "rule")]
    rules: Vec<Rule>,
}

/// Ordered, read-only rule table. Declaration order drives slot tie-breaks.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

impl RuleTable {
    /// Build a table, lowercasing every tag and rejecting inverted temperature bands.
    pub fn new(rules: Vec<Rule>) -> Result<Self> {
        let mut rules = rules;
        for (idx, rule) in rules.iter_mut().enumerate() {
            match rule {
                Rule::Temperature(r) => {
                    if !(r.min.is_finite() && r.max.is_finite()) || r.min > r.max {
                        bail!("Rule #{idx}: invalid temperature band {}..={}", r.min, r.max);
                    }
                    lowercase_all(&mut r.tags);
                }
                Rule::Weather(r) => {
                    if r.condition.trim().is_empty() {
                        bail!("Rule #{idx}: weather override has an empty condition");
                    }
                    lowercase_all(&mut r.tags);
                }
            }
        }
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Parse a table from TOML made of `[[rule]]` entries.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let file: RuleFile = toml::from_str(contents).context("Failed to parse rule table")?;
        Self::new(file.rules)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read rule table: {}", path.display()))?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("Invalid rule table: {}", path.display()))
    }

    /// Union of tags from every matching temperature rule and every matching weather override.
    pub fn resolve(&self, features: &WeatherFeatures, gender: Gender) -> CandidateSet {
        let temperature = features.temperature_c;
        let condition = features.condition.as_str();

        let mut candidates = CandidateSet::new();
        for rule in &self.rules {
            let matched = match rule {
                Rule::Temperature(r) => {
                    r.min <= temperature && temperature <= r.max && r.gender.matches(gender)
                }
                Rule::Weather(r) => r.condition.eq_ignore_ascii_case(condition),
            };
            if matched {
                candidates.extend(rule.tags());
            }
        }

        debug!(
            temperature,
            condition,
            %gender,
            candidates = ?candidates.tags,
            "resolved garment candidates"
        );
        candidates
    }

    /// The rule table compiled into the binary. Adjacent bands meet at the half degree so
    /// every temperature in -10..=45 °C resolves to at least one band.
    pub fn builtin() -> Self {
        use RuleGender::*;

        Self {
            rules: vec![
                // extreme cold
                band(-10.0, 0.5, Adult, &[
                    "insulated_jacket",
                    "insulated_parka",
                    "puffer_jacket",
                    "quilted_jacket",
                    "down_jacket",
                    "warm_pants",
                    "winter_boots",
                    "insulated_gloves",
                    "thermal_hat",
                    "scarf",
                    "gloves",
                ]),
                band(-10.0, 0.5, Baby, &[
                    "winter_jacket",
                    "insulated_snowsuit",
                    "booties",
                    "mittens",
                    "warm_hat",
                    "warm_gloves",
                ]),
                // very cold
                band(0.5, 5.5, Male, &[
                    "fleece_jacket",
                    "puffer_jacket",
                    "medium_winter_jacket",
                    "quilted_jacket",
                    "warm_pants",
                    "winter_boots",
                    "gloves",
                    "scarf",
                ]),
                band(0.5, 5.5, Female, &[
                    "fleece_jacket",
                    "puffer_jacket",
                    "wool_sweater",
                    "winter_long_coat",
                    "quilted_jacket",
                    "warm_pants",
                    "winter_boots",
                    "gloves",
                    "scarf",
                ]),
                band(0.5, 5.5, Baby, &["fleece_jacket", "booties", "soft_cap"]),
                // cold
                band(5.5, 10.5, Male, &[
                    "fleece_jacket",
                    "puffer_jacket",
                    "sweater",
                    "hoodie",
                    "jeans",
                    "warm_pants",
                    "sweatpants",
                    "boots",
                    "gloves",
                    "scarf",
                ]),
                band(5.5, 10.5, Female, &[
                    "puffer_jacket",
                    "fleece_jacket",
                    "sweater",
                    "hoodie",
                    "jeans",
                    "warm_pants",
                    "sweatpants",
                    "ankle_boots",
                    "gloves",
                    "scarf",
                ]),
                band(5.5, 10.5, Baby, &["onesie", "sweater", "fleece_jacket", "booties"]),
                // mild
                band(10.5, 15.5, Male, &[
                    "light_puffer_jacket",
                    "hoodie",
                    "cardigan",
                    "windbreaker",
                    "light_jacket",
                    "jeans_or_chinos",
                    "sweatpants",
                    "boots",
                    "sneakers",
                    "scarf",
                ]),
                band(10.5, 15.5, Female, &[
                    "light_puffer_jacket",
                    "hoodie",
                    "windbreaker",
                    "cardigan",
                    "jeans_or_chinos",
                    "sweatpants",
                    "sneakers",
                    "scarf",
                ]),
                band(10.5, 15.5, Baby, &["onesie", "sweater", "cotton_pants"]),
                // warm
                band(15.5, 20.5, Male, &[
                    "windbreaker",
                    "light_jacket",
                    "light_cardigan",
                    "pants",
                    "sneakers",
                ]),
                band(15.5, 20.5, Female, &[
                    "windbreaker",
                    "light_cardigan",
                    "trench_coat",
                    "leggings",
                    "sneakers",
                ]),
                band(15.5, 20.5, Baby, &["light_onesie", "cotton_pants"]),
                band(20.5, 26.0, Male, &[
                    "long_sleeve_shirt",
                    "sweatshirt",
                    "pant",
                    "sneakers",
                    "cap",
                ]),
                band(20.5, 26.0, Female, &[
                    "sundresses",
                    "long_sleeve_tshirt",
                    "knee_length_skirts",
                    "sneakers",
                    "sandals",
                    "hat",
                ]),
                band(26.0, 30.5, Baby, &["short_sleeve_onesie", "sun_hat"]),
                // hot
                band(26.0, 30.5, Male, &["tshirt", "shorts", "sneakers", "cap"]),
                band(26.0, 30.5, Female, &[
                    "tshirt",
                    "dress",
                    "skirt",
                    "sneakers",
                    "sandals",
                    "sun_hat",
                ]),
                band(20.5, 30.5, Baby, &["short_sleeve_onesie", "sun_hat"]),
                // very hot
                band(30.5, 45.0, Male, &[
                    "tank_top",
                    "tshirt",
                    "shorts",
                    "sandals",
                    "sun_hat",
                    "cap",
                    "sunglasses",
                ]),
                band(30.5, 45.0, Female, &[
                    "baby_tee",
                    "miniskirt",
                    "sandals",
                    "sun_hat",
                    "sunglasses",
                ]),
                band(30.5, 45.0, Baby, &["single_thin_layer", "sun_hat"]),
                // weather overrides
                overlay("Rain", &[
                    "raincoat",
                    "waterproof_jacket",
                    "overtrousers",
                    "gumboot",
                    "umbrella",
                ]),
                overlay("Snow", &[
                    "insulated_parka",
                    "warm_pants",
                    "winter_boots",
                    "sherpa_topi",
                    "gloves",
                    "scarf",
                ]),
            ],
        }
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::builtin()
    }
}

fn band(min: f64, max: f64, gender: RuleGender, tags: &[&str]) -> Rule {
    Rule::Temperature(TemperatureRule { min, max, gender, tags: owned(tags) })
}

fn overlay(condition: &str, tags: &[&str]) -> Rule {
    Rule::Weather(WeatherOverrideRule { condition: condition.to_string(), tags: owned(tags) })
}

fn owned(tags: &[&str]) -> Vec<String> {
    tags.iter().map(|t| t.to_lowercase()).collect()
}

fn lowercase_all(tags: &mut [String]) {
    for tag in tags {
        *tag = tag.to_lowercase();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{model::Condition, test_support::features};

    fn tags(set: &CandidateSet) -> Vec<&str> {
        set.iter().collect()
    }

    #[test]
    fn adult_rule_matches_male_and_female_only() {
        let table = RuleTable::builtin();
        let f = features(-5.0, Condition::Clear);

        let male = table.resolve(&f, Gender::Male);
        let female = table.resolve(&f, Gender::Female);
        let baby = table.resolve(&f, Gender::Baby);

        assert_eq!(male, female);
        assert!(male.contains("insulated_jacket"));
        assert!(!baby.contains("insulated_jacket"));
        assert!(baby.contains("insulated_snowsuit"));
    }

    #[test]
    fn bounds_are_inclusive() {
        let table = RuleTable::builtin();
        for t in [1.0, 5.0] {
            let set = table.resolve(&features(t, Condition::Clear), Gender::Male);
            assert!(set.contains("medium_winter_jacket"), "{t}");
        }
    }

    #[test]
    fn keeps_rule_declaration_order() {
        let table = RuleTable::builtin();
        let set = table.resolve(&features(28.0, Condition::Clear), Gender::Male);
        assert_eq!(tags(&set), ["tshirt", "shorts", "sneakers", "cap"]);
    }

    #[test]
    fn duplicates_collapse_to_first_position() {
        let table = RuleTable::builtin();
        let set = table.resolve(&features(-2.0, Condition::Snow), Gender::Male);

        let scarves = set.iter().filter(|t| *t == "scarf").count();
        assert_eq!(scarves, 1);
        // overlay-only tag lands after the band's tags
        assert_eq!(set.iter().last(), Some("sherpa_topi"));
    }

    #[test]
    fn weather_override_is_additive() {
        let table = RuleTable::builtin();
        let clear = table.resolve(&features(-2.0, Condition::Clear), Gender::Male);
        let rainy = table.resolve(&features(-2.0, Condition::Rain), Gender::Male);

        assert!(rainy.is_superset_of(&clear));
        assert!(rainy.contains("umbrella"));
        assert!(rainy.contains("insulated_jacket"));
        assert!(!clear.contains("umbrella"));
    }

    #[test]
    fn override_condition_is_case_insensitive() {
        let table = RuleTable::builtin();
        let set = table.resolve(&features(12.0, Condition::Other("rain".into())), Gender::Female);
        assert!(set.contains("gumboot"));
    }

    #[test]
    fn overlapping_baby_bands_are_merged() {
        let table = RuleTable::builtin();
        let set = table.resolve(&features(27.0, Condition::Clear), Gender::Baby);
        assert_eq!(tags(&set), ["short_sleeve_onesie", "sun_hat"]);
    }

    #[test]
    fn builtin_bands_cover_the_whole_range() {
        let table = RuleTable::builtin();
        for gender in [Gender::Male, Gender::Female, Gender::Baby] {
            for tenth in -100_i32..=450 {
                let t = f64::from(tenth) / 10.0;
                let set = table.resolve(&features(t, Condition::Clear), gender);
                assert!(!set.is_empty(), "{gender} at {t}");
            }
        }
    }

    #[test]
    fn fractional_temperatures_between_whole_degrees() {
        let table = RuleTable::builtin();
        let chilly = table.resolve(&features(0.4, Condition::Clear), Gender::Male);
        assert!(chilly.contains("insulated_jacket"));

        let near_freezing = table.resolve(&features(0.6, Condition::Clear), Gender::Male);
        assert!(near_freezing.contains("medium_winter_jacket"));

        let warm = table.resolve(&features(30.7, Condition::Clear), Gender::Female);
        assert!(warm.contains("sunglasses"));
    }

    #[test]
    fn no_match_is_empty() {
        let table = RuleTable::builtin();
        assert!(table.resolve(&features(60.0, Condition::Haze), Gender::Male).is_empty());
        assert!(table.resolve(&features(-30.0, Condition::Clear), Gender::Female).is_empty());
    }

    #[test]
    fn builtin_table_tags_are_lowercase() {
        for rule in RuleTable::builtin().rules() {
            for tag in rule.tags() {
                assert_eq!(tag, &tag.to_lowercase());
            }
        }
    }

    #[test]
    fn parses_toml_table() {
        let toml = r#"
            [[rule]]
            kind = "temperature"
            min = -5
            max = 5.5
            gender = "adult"
            tags = ["Parka", "wool_pants", "snow_boots"]

            [[rule]]
            kind = "weather"
            condition = "Fog"
            tags = ["reflective_vest"]
        "#;
        let table = RuleTable::from_toml_str(toml).unwrap();
        assert_eq!(table.rules().len(), 2);

        let set = table.resolve(&features(5.5, Condition::Fog), Gender::Female);
        assert_eq!(tags(&set), ["parka", "wool_pants", "snow_boots", "reflective_vest"]);
    }

    #[test]
    fn rejects_inverted_band() {
        let toml = r#"
            [[rule]]
            kind = "temperature"
            min = 10
            max = 0
            gender = "male"
            tags = ["x"]
        "#;
        let err = RuleTable::from_toml_str(toml).unwrap_err();
        assert!(err.to_string().contains("invalid temperature band"));
    }

    #[test]
    fn rejects_unknown_rule_kind() {
        let toml = r#"
            [[rule]]
            kind = "humidity"
            tags = ["x"]
        "#;
        assert!(RuleTable::from_toml_str(toml).is_err());
    }
}
