use serde::{Deserialize, Serialize};
use std::fmt;
use validator::{Validate, ValidationError};

/// Ingredients supplied by the user, trimmed and with blank entries removed.
/// Never empty once constructed through the request validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientList(Vec<String>);

impl IngredientList {
    pub(crate) fn new(items: Vec<String>) -> Self {
        Self(items)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn joined(&self) -> String {
        self.0.join(", ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MealTypeTag(String);

impl MealTypeTag {
    pub(crate) fn new(tag: String) -> Self {
        Self(tag)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MealTypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single recipe as returned to the client.
///
/// Deserialization rejects missing fields and scalars where a list is
/// expected; `validate` rejects blank text and empty lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct RecipeSuggestion {
    #[validate(custom = "not_blank")]
    pub name: String,
    #[validate(custom = "not_blank")]
    pub country: String,
    #[validate(custom = "not_blank")]
    pub flag: String,
    #[validate(custom = "not_blank")]
    pub description: String,
    #[validate(custom = "non_blank_entries")]
    pub ingredients: Vec<String>,
    #[validate(custom = "non_blank_entries")]
    pub steps: Vec<String>,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

fn non_blank_entries(values: &[String]) -> Result<(), ValidationError> {
    if values.is_empty() {
        return Err(ValidationError::new("empty_list"));
    }
    if values.iter().any(|v| v.trim().is_empty()) {
        return Err(ValidationError::new("blank_entry"));
    }
    Ok(())
}
