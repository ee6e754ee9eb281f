pub mod config;
pub mod error;
pub mod extract;
pub mod models;
pub mod prompt;
pub mod schema;
pub mod suggest;
pub mod validate;

pub use config::SuggestionSettings;
pub use error::{InputError, MalformedReason, SuggestionError};
pub use models::{IngredientList, MealTypeTag, RecipeSuggestion};
pub use suggest::SuggestionGenerator;
pub use validate::{validate_request, SuggestionRequest};
