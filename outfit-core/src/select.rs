//! Reduces a candidate set to one label per slot.
//!
//! Each slot is described by a [`SlotPolicy`]: a base keyword list, optional weather
//! preferences and a default. A candidate "matches" a keyword list when it contains any
//! of the keywords as a substring. Candidates are scanned in candidate-set order, so the
//! first match under rule-table order always wins.

use crate::{
    model::{Outfit, Slot, WeatherFeatures},
    rules::CandidateSet,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherFlag {
    Snow,
    Rain,
}

impl WeatherFlag {
    pub fn is_set(&self, features: &WeatherFeatures) -> bool {
        match self {
            WeatherFlag::Snow => features.snow,
            WeatherFlag::Rain => features.rain,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Preference {
    pub when: WeatherFlag,
    pub keywords: &'static [&'static str],
}

#[derive(Debug, Clone, Copy)]
pub struct SlotPolicy {
    pub slot: Slot,
    /// Checked in order; only the first preference whose flag is set applies.
    pub preferences: &'static [Preference],
    pub keywords: &'static [&'static str],
    pub default: &'static str,
}

pub const TOP: SlotPolicy = SlotPolicy {
    slot: Slot::Top,
    preferences: &[],
    keywords: &[
        "shirt",
        "tshirt",
        "hoodie",
        "sweater",
        "jacket",
        "coat",
        "blouse",
        "turtleneck",
        "tank",
    ],
    default: "tshirt",
};

pub const BOTTOM: SlotPolicy = SlotPolicy {
    slot: Slot::Bottom,
    preferences: &[],
    keywords: &["pants", "jeans", "shorts", "skirt"],
    default: "pants",
};

pub const FOOTWEAR: SlotPolicy = SlotPolicy {
    slot: Slot::Footwear,
    preferences: &[
        Preference {
            when: WeatherFlag::Snow,
            keywords: &["winter_boots", "snow_boots", "insulated", "waterproof"],
        },
        Preference {
            when: WeatherFlag::Rain,
            keywords: &["gumboot", "rainboot", "waterproof", "boot"],
        },
    ],
    keywords: &["boots", "sandals", "shoes", "sneakers", "booties", "gumboot", "rainboot"],
    default: "sneakers",
};

pub const ACCESSORY: SlotPolicy = SlotPolicy {
    slot: Slot::Accessory,
    preferences: &[
        Preference {
            when: WeatherFlag::Snow,
            keywords: &["sherpa_topi", "gloves", "scarf", "warm_hat"],
        },
        Preference { when: WeatherFlag::Rain, keywords: &["umbrella"] },
    ],
    keywords: &["hat", "cap", "scarf", "umbrella", "sunglasses", "gloves", "sherpa_topi"],
    default: "none",
};

pub const POLICIES: [SlotPolicy; 4] = [TOP, BOTTOM, FOOTWEAR, ACCESSORY];

pub fn contains_any(label: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| label.contains(k))
}

impl SlotPolicy {
    /// A weather-preferred candidate must also match the slot's own keywords, so
    /// `insulated_jacket` can never be picked as footwear.
    pub fn pick(&self, candidates: &CandidateSet, features: &WeatherFeatures) -> String {
        let belongs = |c: &&str| contains_any(c, self.keywords);

        let preferred = self
            .preferences
            .iter()
            .find(|p| p.when.is_set(features))
            .and_then(|p| candidates.iter().filter(belongs).find(|c| contains_any(c, p.keywords)));

        preferred
            .or_else(|| candidates.iter().find(belongs))
            .unwrap_or(self.default)
            .to_string()
    }
}

/// One label per slot; never fails, falling back to each slot's default.
pub fn select_outfit(candidates: &CandidateSet, features: &WeatherFeatures) -> Outfit {
    Outfit {
        top: TOP.pick(candidates, features),
        bottom: BOTTOM.pick(candidates, features),
        footwear: FOOTWEAR.pick(candidates, features),
        accessory: ACCESSORY.pick(candidates, features),
    }
}
