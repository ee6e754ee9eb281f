use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::food::config::SuggestionSettings;
use crate::food::error::{preview, SuggestionError};
use crate::food::extract::parse_reply;
use crate::food::models::RecipeSuggestion;
use crate::food::prompt::build_prompt;
use crate::food::schema::validate_recipes;
use crate::food::validate::SuggestionRequest;
use crate::providers::traits::{CompletionProvider, ProviderError};

/// Turns a validated request into recipes with one completion call.
///
/// Holds no per-request state, so a single instance is shared by all
/// handlers.
pub struct SuggestionGenerator {
    provider: Arc<dyn CompletionProvider>,
    settings: SuggestionSettings,
}

impl SuggestionGenerator {
    pub fn new(provider: Arc<dyn CompletionProvider>, settings: SuggestionSettings) -> Self {
        Self { provider, settings }
    }

    pub fn model_name(&self) -> &str {
        self.provider.model_name()
    }

    pub async fn suggest(
        &self,
        request: &SuggestionRequest,
    ) -> Result<Vec<RecipeSuggestion>, SuggestionError> {
        let prompt = build_prompt(request, &self.settings);

        let raw = self.provider.complete(&prompt).await.map_err(|e| {
            match &e {
                ProviderError::RateLimited { .. } => warn!(error = %e, "Completion call rate limited"),
                _ => error!(error = %e, "Completion call failed"),
            }
            SuggestionError::from(e)
        })?;
        debug!(raw = %preview(&raw), "AI raw response");

        let items = parse_reply(&raw).map_err(|e| {
            warn!(error = %e, "Could not extract a JSON array from AI response");
            e
        })?;
        let recipes = validate_recipes(items)?;

        info!(count = recipes.len(), "Generated recipe suggestions");
        Ok(recipes)
    }
}
