use validator::Validate;

use crate::forms::{NAME_MAX_LEN_VALIDATOR, sanitize_inline_text};

/// Account details accepted by the `create-user` tool.
#[derive(Debug, Clone, Validate)]
pub struct AddUserForm {
    #[validate(email)]
    pub email: String,
    #[validate(length(max = NAME_MAX_LEN_VALIDATOR))]
    pub name: String,
    #[validate(length(min = 1))]
    pub password: String,
}

impl AddUserForm {
    /// Trims the email and sanitizes the display name; the password is kept verbatim.
    pub fn new(email: &str, name: &str, password: impl Into<String>) -> Self {
        Self {
            email: email.trim().to_string(),
            name: sanitize_inline_text(name),
            password: password.into(),
        }
    }
}
