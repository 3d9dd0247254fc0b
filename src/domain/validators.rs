//! Pure checks applied to operator input before it reaches the request model.

use crate::domain::entities::Method;
use crate::domain::value_objects::UrlError;
use serde_json::Value;

/// Checks that a URL is non-empty and carries an http or https scheme
pub fn validate_url(input: &str) -> Result<(), UrlError> {
    if input.is_empty() {
        return Err(UrlError::Empty);
    }
    if !input.starts_with("http://") && !input.starts_with("https://") {
        return Err(UrlError::MissingScheme);
    }
    Ok(())
}

/// Resolves a method selection typed at the method prompt.
///
/// Empty input picks `GET`, `1`-`7` index `Method::ALL`, anything else must
/// name one of the supported methods (case-insensitive). `None` means the
/// input is not a valid selection.
pub fn parse_method_choice(input: &str) -> Option<Method> {
    if input.is_empty() {
        return Some(Method::Get);
    }

    if let [digit @ b'1'..=b'7'] = input.as_bytes() {
        return Some(Method::ALL[usize::from(digit - b'1')]);
    }

    input.parse::<Method>().ok()
}

/// Parses `text` as JSON and re-serializes it with two-space indentation
pub fn canonical_json(text: &str) -> Result<String, serde_json::Error> {
    let value: Value = serde_json::from_str(text)?;
    serde_json::to_string_pretty(&value)
}
