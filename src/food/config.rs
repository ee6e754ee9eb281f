/// Bounds the suggestion prompt asks the model to respect, plus the sampling
/// parameters of the single completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionSettings {
    pub recipe_count: usize,
    pub min_ingredients: usize,
    pub max_ingredients: usize,
    pub min_steps: usize,
    pub max_steps: usize,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl Default for SuggestionSettings {
    fn default() -> Self {
        Self {
            recipe_count: 2,
            min_ingredients: 3,
            max_ingredients: 8,
            min_steps: 4,
            max_steps: 8,
            temperature: 0.7,
            max_tokens: 1200,
        }
    }
}
