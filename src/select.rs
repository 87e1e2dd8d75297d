//! Picks one value out of a fetched payload.

use crate::error::{ResolveError, Result};
use crate::payload::{SecretPayload, SecretValue};

/// Selects the value for `key` from the payload stored at `path`.
///
/// With an empty `key` the payload must hold at most one field. An empty
/// payload and a null value both resolve to the empty string.
///
/// # Errors
///
/// - [`ResolveError::KeyNotFound`] if `key` is set but absent.
/// - [`ResolveError::AmbiguousKey`] if `key` is empty and there are 2+ fields.
/// - [`ResolveError::WrongType`] if the selected value is not a string or null.
pub fn select_value(path: &str, payload: &SecretPayload, key: &str) -> Result<String> {
    let (key, value) = if key.is_empty() {
        let mut fields = payload.iter();
        match (fields.next(), fields.next()) {
            (None, _) => return Ok(String::new()),
            (Some(only), None) => only,
            (Some(_), Some(_)) => {
                return Err(ResolveError::ambiguous_key(path, payload.keys().cloned()));
            }
        }
    } else {
        payload
            .get_key_value(key)
            .ok_or_else(|| ResolveError::key_not_found(path, key, payload.keys().cloned()))?
    };

    match value {
        SecretValue::String(s) => Ok(s.clone()),
        SecretValue::Null => Ok(String::new()),
        SecretValue::Other(_) => Err(ResolveError::WrongType {
            path: path.to_string(),
            key: key.clone(),
            kind: value.kind(),
        }),
    }
}
