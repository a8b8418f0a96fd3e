use thiserror::Error;

/// Errors surfaced by the decision engine and the provider client.
///
/// The rule resolver, slot selector and tip generator never produce these;
/// they always resolve to something recommendable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A raw provider sample is missing a required field or carries an unusable value.
    #[error("provider data error: field `{field}` {reason}")]
    ProviderData { field: &'static str, reason: String },

    #[error("forecast contained no samples to aggregate")]
    EmptyForecast,

    /// Non-success provider response. `status` is `None` when the request never got a response.
    #[error("weather provider unavailable{}: {message}", fmt_status(.status))]
    ProviderUnavailable { status: Option<u16>, message: String },

    #[error("outfit prediction failed: {0}")]
    Prediction(String),
}

fn fmt_status(status: &Option<u16>) -> String {
    status.map(|s| format!(" (status {s})")).unwrap_or_default()
}

impl EngineError {
    pub(crate) fn missing(field: &'static str) -> Self {
        Self::ProviderData { field, reason: "is missing".to_string() }
    }

    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::ProviderData { field, reason: reason.into() }
    }
}
