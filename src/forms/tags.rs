use chrono::NaiveDateTime;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::tag::{NewTag, UpdateTag};
use crate::forms::{NAME_MAX_LEN_VALIDATOR, sanitize_inline_text};

/// Result type returned by the tag form helpers.
pub type TagFormResult<T> = Result<T, TagFormError>;

/// Errors that can occur while processing tag payloads.
#[derive(Debug, Error)]
pub enum TagFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// The provided name is empty after sanitization.
    #[error("tag name cannot be empty")]
    EmptyName,
}

/// Payload accepted by `POST /api/tags`.
#[derive(Debug, Deserialize, Validate)]
pub struct AddTagForm {
    /// Name entered by the user.
    #[validate(length(min = 1, max = NAME_MAX_LEN_VALIDATOR))]
    pub name: String,
}

impl AddTagForm {
    /// Validates and sanitizes the payload into a domain `NewTag`.
    pub fn into_new_tag(self, user_id: i32) -> TagFormResult<NewTag> {
        self.validate()?;

        let sanitized_name = sanitize_inline_text(&self.name);
        if sanitized_name.is_empty() {
            return Err(TagFormError::EmptyName);
        }

        Ok(NewTag::new(user_id, sanitized_name))
    }
}

/// Payload accepted by `PATCH /api/tags/{id}`. An omitted name leaves it as is.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct EditTagForm {
    /// Updated name supplied by the user.
    #[validate(length(min = 1, max = NAME_MAX_LEN_VALIDATOR))]
    pub name: Option<String>,
}

impl EditTagForm {
    /// Validates and sanitizes the payload into a domain `UpdateTag`.
    pub fn into_update_tag(self, updated_at: NaiveDateTime) -> TagFormResult<UpdateTag> {
        self.validate()?;

        let name = match self.name {
            Some(name) => {
                let sanitized_name = sanitize_inline_text(&name);
                if sanitized_name.is_empty() {
                    return Err(TagFormError::EmptyName);
                }
                Some(sanitized_name)
            }
            None => None,
        };

        Ok(UpdateTag { name, updated_at })
    }
}
