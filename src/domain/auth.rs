use serde::Serialize;

use crate::domain::user::User;

/// Identity of the caller, resolved from the request's API token.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: i32,
    pub email: String,
    pub name: String,
}

impl From<User> for AuthenticatedUser {
    fn from(value: User) -> Self {
        Self {
            id: value.id,
            email: value.email,
            name: value.name,
        }
    }
}
