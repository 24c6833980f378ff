pub use errors::{ServiceError, ServiceResult};

pub mod errors;
pub mod ingredients;
pub mod recipes;
pub mod tags;
pub mod users;

/// Interpret a query-string flag. Non-zero integers and `true`/`yes`/`on`
/// (in any case) are set; anything else is unset.
pub(crate) fn is_truthy(value: &str) -> bool {
    let value = value.trim();
    if let Ok(number) = value.parse::<i64>() {
        return number != 0;
    }

    matches!(value.to_ascii_lowercase().as_str(), "true" | "yes" | "on")
}

/// Trim a free-text search term, treating blank input as absent.
pub(crate) fn normalize_search(search: Option<String>) -> Option<String> {
    search
        .map(|term| term.trim().to_string())
        .filter(|term| !term.is_empty())
}
