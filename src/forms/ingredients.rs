use chrono::NaiveDateTime;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::ingredient::{NewIngredient, UpdateIngredient};
use crate::forms::{NAME_MAX_LEN_VALIDATOR, sanitize_inline_text};

/// Result type returned by the ingredient form helpers.
pub type IngredientFormResult<T> = Result<T, IngredientFormError>;

#[derive(Debug, Error)]
pub enum IngredientFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// The provided name is empty after sanitization.
    #[error("ingredient name cannot be empty")]
    EmptyName,
}

/// Payload accepted by `POST /api/ingredients`.
#[derive(Debug, Deserialize, Validate)]
pub struct AddIngredientForm {
    /// Name entered by the user.
    #[validate(length(min = 1, max = NAME_MAX_LEN_VALIDATOR))]
    pub name: String,
}

impl AddIngredientForm {
    /// Validates and sanitizes the payload into a domain `NewIngredient`.
    pub fn into_new_ingredient(self, user_id: i32) -> IngredientFormResult<NewIngredient> {
        self.validate()?;

        let sanitized_name = sanitize_inline_text(&self.name);
        if sanitized_name.is_empty() {
            return Err(IngredientFormError::EmptyName);
        }

        Ok(NewIngredient::new(user_id, sanitized_name))
    }
}

/// Payload accepted by `PATCH /api/ingredients/{id}`. An omitted name leaves it as is.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct EditIngredientForm {
    /// Updated name supplied by the user.
    #[validate(length(min = 1, max = NAME_MAX_LEN_VALIDATOR))]
    pub name: Option<String>,
}

impl EditIngredientForm {
    /// Validates and sanitizes the payload into a domain `UpdateIngredient`.
    pub fn into_update_ingredient(
        self,
        updated_at: NaiveDateTime,
    ) -> IngredientFormResult<UpdateIngredient> {
        self.validate()?;

        let name = match self.name {
            Some(name) => {
                let sanitized_name = sanitize_inline_text(&name);
                if sanitized_name.is_empty() {
                    return Err(IngredientFormError::EmptyName);
                }
                Some(sanitized_name)
            }
            None => None,
        };

        Ok(UpdateIngredient { name, updated_at })
    }
}
