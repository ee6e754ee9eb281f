use serde_json::Value;

use crate::food::error::InputError;
use crate::food::models::{IngredientList, MealTypeTag};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionRequest {
    pub ingredients: IngredientList,
    pub meal_type: MealTypeTag,
}

/// Normalizes a raw `{ingredients, mealType}` body.
///
/// Non-string and blank ingredient entries are dropped silently; the request
/// is rejected only when nothing usable is left.
pub fn validate_request(raw: &Value) -> Result<SuggestionRequest, InputError> {
    let items = raw
        .get("ingredients")
        .and_then(Value::as_array)
        .ok_or(InputError::Ingredients)?;

    let ingredients: Vec<String> = items
        .iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    if ingredients.is_empty() {
        return Err(InputError::NoValidIngredients);
    }

    let meal_type = raw
        .get("mealType")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(InputError::MealType)?;

    Ok(SuggestionRequest {
        ingredients: IngredientList::new(ingredients),
        meal_type: MealTypeTag::new(meal_type.to_string()),
    })
}
