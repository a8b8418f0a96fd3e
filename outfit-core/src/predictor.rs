use std::{fmt::Debug, sync::Arc};

use crate::{
    error::EngineError,
    model::{Gender, Outfit, WeatherFeatures},
    rules::RuleTable,
    select::select_outfit,
};

/// Anything that can turn a feature record into a four-slot outfit.
///
/// The rule-based [`RulePredictor`] is the default; a trained classifier can be
/// plugged in instead as long as it returns one label per slot.
pub trait OutfitPredictor: Send + Sync + Debug {
    fn predict(&self, features: &WeatherFeatures, gender: Gender) -> Result<Outfit, EngineError>;
}

/// Candidate resolution through the rule table followed by slot selection. Never fails.
#[derive(Debug, Clone)]
pub struct RulePredictor {
    rules: Arc<RuleTable>,
}

impl RulePredictor {
    pub fn new(rules: Arc<RuleTable>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }
}

impl Default for RulePredictor {
    fn default() -> Self {
        Self::new(Arc::new(RuleTable::builtin()))
    }
}

impl OutfitPredictor for RulePredictor {
    fn predict(&self, features: &WeatherFeatures, gender: Gender) -> Result<Outfit, EngineError> {
        let candidates = self.rules.resolve(features, gender);
        Ok(select_outfit(&candidates, features))
    }
}
