pub mod api;
pub mod config;
pub mod food;
pub mod providers;

// Re-export commonly used items
pub use config::AppConfig;
pub use food::{RecipeSuggestion, SuggestionError, SuggestionGenerator};
