use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use rand::Rng;
use rand::distributions::Alphanumeric;
use validator::Validate;

use crate::domain::auth::AuthenticatedUser;
use crate::domain::user::{NewUser, User};
use crate::forms::users::AddUserForm;
use crate::repository::{UserReader, UserWriter};
use crate::services::{ServiceError, ServiceResult};

/// Scheme expected in the `Authorization` header.
pub const TOKEN_SCHEME: &str = "Token";
/// Length of generated API token keys.
pub const TOKEN_KEY_LEN: usize = 40;

/// A freshly created account together with its API token key.
#[derive(Debug, Clone)]
pub struct CreatedUser {
    pub user: User,
    pub token: String,
}

/// Resolve the caller from an `Authorization: Token <key>` header value.
pub fn authenticate<R>(repo: &R, header: Option<&str>) -> ServiceResult<AuthenticatedUser>
where
    R: UserReader + ?Sized,
{
    let key = header
        .and_then(parse_token_header)
        .ok_or(ServiceError::Unauthorized)?;

    repo.get_user_by_token(key)
        .map_err(ServiceError::from)?
        .map(AuthenticatedUser::from)
        .ok_or(ServiceError::Unauthorized)
}

/// Create an account and issue its API token.
///
/// The user row and the token are written together, so a failed token write
/// leaves no account behind.
pub fn create_user<R>(repo: &R, form: AddUserForm) -> ServiceResult<CreatedUser>
where
    R: UserReader + UserWriter + ?Sized,
{
    form.validate().map_err(|err| ServiceError::Form(err.to_string()))?;

    let email = form.email.to_lowercase();
    if repo
        .get_user_by_email(&email)
        .map_err(ServiceError::from)?
        .is_some()
    {
        return Err(ServiceError::Form(format!("email {email} is already registered")));
    }

    let new_user = NewUser::new(&email, &form.name, hash_password(&form.password)?);
    let token = generate_token_key();
    let user = repo
        .create_user(&new_user, &token)
        .map_err(ServiceError::from)?;

    Ok(CreatedUser { user, token })
}

/// Hash a password into an argon2 PHC string.
pub fn hash_password(password: &str) -> ServiceResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| ServiceError::Internal(format!("failed to hash password: {err}")))
}

/// Generate a random alphanumeric API token key.
pub fn generate_token_key() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_KEY_LEN)
        .map(char::from)
        .collect()
}

fn parse_token_header(header: &str) -> Option<&str> {
    let mut parts = header.split_whitespace();
    let scheme = parts.next()?;
    let key = parts.next()?;

    if !scheme.eq_ignore_ascii_case(TOKEN_SCHEME) || parts.next().is_some() {
        return None;
    }

    Some(key)
}
