//! Error types for a resolution pass.

use thiserror::Error;

use crate::payload::ValueKind;
use crate::reference::SecretRef;

/// Result type for resolution operations.
pub type Result<T> = std::result::Result<T, ResolveError>;

/// Errors that abort a resolution pass.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// The store read failed. The store's own error is shown as-is.
    #[error("{0:#}")]
    Store(anyhow::Error),

    /// A key was requested that the payload does not contain.
    #[error("No key '{key}' at path '{path}'. Keys were: '{}'", .available.join(","))]
    KeyNotFound {
        path: String,
        key: String,
        available: Vec<String>,
    },

    /// No key was requested and the payload holds more than one field.
    #[error("Found multiple keys at path '{path}'. Keys were: '{}'", .available.join(","))]
    AmbiguousKey { path: String, available: Vec<String> },

    /// The selected value is neither a string nor null.
    #[error("Invalid type for key '{key}' at path '{path}' ({kind})")]
    WrongType {
        path: String,
        key: String,
        kind: ValueKind,
    },

    /// The resolver was asked to do something no store read can satisfy.
    #[error("Misconfigured resolver: {reason}")]
    Misconfigured { reason: String },

    /// Context wrapper naming the variable whose reference failed.
    #[error("{variable} ({reference}): {cause}")]
    Reference {
        variable: String,
        reference: SecretRef,
        cause: Box<ResolveError>,
    },
}

impl ResolveError {
    /// Create a key-not-found error. `available` is sorted before storing.
    pub fn key_not_found(
        path: impl Into<String>,
        key: impl Into<String>,
        available: impl IntoIterator<Item = String>,
    ) -> Self {
        Self::KeyNotFound {
            path: path.into(),
            key: key.into(),
            available: sorted(available),
        }
    }

    /// Create an ambiguous-key error. `available` is sorted before storing.
    pub fn ambiguous_key(
        path: impl Into<String>,
        available: impl IntoIterator<Item = String>,
    ) -> Self {
        Self::AmbiguousKey {
            path: path.into(),
            available: sorted(available),
        }
    }

    pub fn misconfigured(reason: impl Into<String>) -> Self {
        Self::Misconfigured {
            reason: reason.into(),
        }
    }

    /// Wrap `self` with the variable name and reference that produced it.
    pub fn for_variable(self, variable: impl Into<String>, reference: SecretRef) -> Self {
        Self::Reference {
            variable: variable.into(),
            reference,
            cause: Box::new(self),
        }
    }

    /// The innermost error, skipping any [`ResolveError::Reference`] wrappers.
    pub fn root(&self) -> &ResolveError {
        match self {
            ResolveError::Reference { cause, .. } => cause.root(),
            other => other,
        }
    }
}

fn sorted(keys: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut keys: Vec<String> = keys.into_iter().collect();
    keys.sort();
    keys
}
