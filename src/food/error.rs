use thiserror::Error;

use crate::providers::traits::ProviderError;

/// Characters of raw model output kept for diagnostics.
pub const RAW_PREVIEW_LIMIT: usize = 500;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("Invalid request body: expected a JSON object")]
    Body,
    #[error("Invalid ingredients: expected an array of strings")]
    Ingredients,
    #[error("Invalid ingredients: no valid ingredients provided")]
    NoValidIngredients,
    #[error("Invalid mealType: expected a non-empty string")]
    MealType,
}

impl InputError {
    /// Name of the offending input as reported to clients.
    pub fn field(&self) -> &'static str {
        match self {
            InputError::Body => "body",
            InputError::Ingredients => "ingredients",
            InputError::NoValidIngredients => "no valid ingredients",
            InputError::MealType => "mealType",
        }
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedReason {
    #[error("no array delimiters")]
    NoArrayDelimiters,
    #[error("invalid json")]
    InvalidJson,
    #[error("not an array")]
    NotAnArray,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SuggestionError {
    #[error(transparent)]
    InvalidInput(#[from] InputError),

    #[error("Malformed AI response: {reason}")]
    MalformedResponse {
        reason: MalformedReason,
        raw_preview: String,
    },

    #[error("No valid recipes in AI response")]
    NoResults,

    #[error("AI service unreachable: {0}")]
    UpstreamUnavailable(String),

    #[error("AI service rejected credentials")]
    UpstreamAuthFailed,

    #[error("AI service rate limited")]
    UpstreamRateLimited { retry_after_secs: Option<u64> },

    #[error("AI service error: {0}")]
    Upstream(String),
}

impl SuggestionError {
    pub fn malformed(reason: MalformedReason, raw: &str) -> Self {
        SuggestionError::MalformedResponse {
            reason,
            raw_preview: preview(raw),
        }
    }
}

impl From<ProviderError> for SuggestionError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Unreachable(msg) => SuggestionError::UpstreamUnavailable(msg),
            ProviderError::AuthFailed => SuggestionError::UpstreamAuthFailed,
            ProviderError::RateLimited { retry_after_secs } => {
                SuggestionError::UpstreamRateLimited { retry_after_secs }
            }
            other @ (ProviderError::Api { .. } | ProviderError::InvalidResponse(_)) => {
                SuggestionError::Upstream(other.to_string())
            }
        }
    }
}

/// Truncates `raw` to at most [`RAW_PREVIEW_LIMIT`] characters.
pub fn preview(raw: &str) -> String {
    match raw.char_indices().nth(RAW_PREVIEW_LIMIT) {
        Some((cut, _)) => raw[..cut].to_string(),
        None => raw.to_string(),
    }
}
