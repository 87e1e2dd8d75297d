//! Placeholder parsing.

use std::fmt;

/// Prefix marking an environment value as a secret-store placeholder.
pub const PLACEHOLDER_PREFIX: &str = "vault:";

/// A parsed placeholder: the store path and an optional key within it.
///
/// `key` is empty when the placeholder did not select a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretRef {
    pub path: String,
    pub key: String,
}

impl SecretRef {
    pub fn new(path: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            key: key.into(),
        }
    }

    /// Parses `raw` (e.g. `vault:aws/creds/role:access_key`) into a reference.
    ///
    /// The prefix is stripped if present. When `key_separator` is set and
    /// occurs in the remainder, the split happens on its first occurrence
    /// only, so `vault:a!b!c` with `!` yields path `a` and key `b!c`.
    pub fn parse(raw: &str, key_separator: Option<&str>) -> Self {
        let rest = raw.strip_prefix(PLACEHOLDER_PREFIX).unwrap_or(raw);

        match key_separator.filter(|sep| !sep.is_empty()) {
            Some(sep) => match rest.split_once(sep) {
                Some((path, key)) => Self::new(path, key),
                None => Self::new(rest, ""),
            },
            None => Self::new(rest, ""),
        }
    }

    pub fn has_key(&self) -> bool {
        !self.key.is_empty()
    }
}

impl fmt::Display for SecretRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "path={} key={}", self.path, self.key)
    }
}
