pub mod ingredients;
pub mod recipes;
pub mod tags;
pub mod users;

/// Maximum allowed length for titles and tag/ingredient names.
pub(crate) const NAME_MAX_LEN: usize = 255;
pub(crate) const NAME_MAX_LEN_VALIDATOR: u64 = NAME_MAX_LEN as u64;

/// Trim the input, collapse inner whitespace runs into single spaces and drop
/// control characters.
pub(crate) fn sanitize_inline_text(input: &str) -> String {
    let mut sanitized = String::with_capacity(input.len());
    let mut previous_whitespace = false;

    for ch in input.trim().chars() {
        if ch.is_whitespace() {
            if !previous_whitespace {
                sanitized.push(' ');
                previous_whitespace = true;
            }
        } else if ch.is_control() {
            continue;
        } else {
            sanitized.push(ch);
            previous_whitespace = false;
        }
    }

    sanitized
}
