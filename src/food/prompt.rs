use crate::food::config::SuggestionSettings;
use crate::food::validate::SuggestionRequest;
use crate::providers::traits::CompletionRequest;

const SYSTEM_PROMPT: &str = "You are a culinary assistant. You answer with a single valid JSON array \
and nothing else: no explanation, no markdown, no code fences, no comments.";

/// Builds the completion request for a validated suggestion request.
/// The output depends only on its inputs.
pub fn build_prompt(request: &SuggestionRequest, settings: &SuggestionSettings) -> CompletionRequest {
    let user = format!(
        "I want to cook {meal}. Here are the ingredients: {ingredients}.\n\
         Suggest exactly {count} recipes as a JSON array of {count} objects. \
         Each object must have exactly these fields:\n\
         - \"name\": string, the recipe name\n\
         - \"country\": string, the country the dish comes from\n\
         - \"flag\": string, the flag emoji of that country\n\
         - \"description\": string, one or two sentences\n\
         - \"ingredients\": array of {min_ing} to {max_ing} strings\n\
         - \"steps\": array of {min_steps} to {max_steps} strings, one instruction each\n\
         Respond ONLY with the JSON array. Do not wrap it in markdown or code fences \
         and do not add any text before or after it.",
        meal = request.meal_type,
        ingredients = request.ingredients.joined(),
        count = settings.recipe_count,
        min_ing = settings.min_ingredients,
        max_ing = settings.max_ingredients,
        min_steps = settings.min_steps,
        max_steps = settings.max_steps,
    );

    CompletionRequest {
        system: SYSTEM_PROMPT.to_string(),
        user,
        temperature: settings.temperature,
        max_tokens: settings.max_tokens,
    }
}
