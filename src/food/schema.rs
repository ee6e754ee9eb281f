use serde_json::Value;
use tracing::warn;
use validator::Validate;

use crate::food::error::SuggestionError;
use crate::food::models::RecipeSuggestion;

/// Keeps the elements that conform to the recipe schema, in their original
/// order. An all-invalid (or empty) array is `NoResults`.
pub fn validate_recipes(items: Vec<Value>) -> Result<Vec<RecipeSuggestion>, SuggestionError> {
    let total = items.len();
    let recipes: Vec<RecipeSuggestion> = items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match conform(item) {
            Ok(recipe) => Some(recipe),
            Err(reason) => {
                warn!(index, %reason, "Dropping recipe that does not match schema");
                None
            }
        })
        .collect();

    if recipes.is_empty() {
        warn!(total, "No recipe in AI response survived validation");
        return Err(SuggestionError::NoResults);
    }
    Ok(recipes)
}

fn conform(item: Value) -> Result<RecipeSuggestion, String> {
    let recipe: RecipeSuggestion = serde_json::from_value(item).map_err(|e| e.to_string())?;
    recipe.validate().map_err(|e| e.to_string())?;
    Ok(recipe)
}
