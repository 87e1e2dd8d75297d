//! Turns placeholder assignments into literal values.
//!
//! A [`Resolver`] runs one pass: find placeholders, parse them, read each
//! distinct path once through a [`ResolutionCache`], select the requested
//! field, and collect the results. The first failure aborts the pass.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::cache::ResolutionCache;
use crate::error::{ResolveError, Result};
use crate::reference::{PLACEHOLDER_PREFIX, SecretRef};
use crate::scan::find_placeholders;
use crate::store::SecretStore;

/// Resolved values keyed by environment-variable name.
pub type ResultMap = BTreeMap<String, String>;

/// Key separator used by the fixed-path mode's synthesized placeholders.
pub const FIXED_PATH_KEY_SEPARATOR: &str = "!!!";

/// Variables filled by the fixed-path mode and the payload field each one reads.
pub const AWS_CREDENTIAL_FIELDS: [(&str, &str); 3] = [
    ("AWS_ACCESS_KEY_ID", "access_key"),
    ("AWS_SECRET_ACCESS_KEY", "secret_key"),
    ("AWS_SESSION_TOKEN", "security_token"),
];

/// What a resolution pass reads its placeholders from.
#[derive(Debug, Clone)]
pub enum ResolutionMode {
    /// Substitute every placeholder found in a `NAME=VALUE` listing.
    Environment {
        environ: Vec<String>,
        key_separator: Option<String>,
    },
    /// Fill the AWS credential variables from the fields of a single path,
    /// e.g. `aws/creds/my-role`.
    FixedPath { path: String },
}

impl ResolutionMode {
    /// The placeholder listing and key separator this mode resolves.
    fn into_placeholders(self) -> Result<(Vec<String>, Option<String>)> {
        match self {
            ResolutionMode::Environment {
                environ,
                key_separator,
            } => Ok((environ, key_separator)),
            ResolutionMode::FixedPath { path } => {
                if path.is_empty() {
                    return Err(ResolveError::misconfigured("fixed path is empty"));
                }
                let environ = AWS_CREDENTIAL_FIELDS
                    .iter()
                    .map(|(var, field)| {
                        format!("{var}={PLACEHOLDER_PREFIX}{path}{FIXED_PATH_KEY_SEPARATOR}{field}")
                    })
                    .collect();
                Ok((environ, Some(FIXED_PATH_KEY_SEPARATOR.to_string())))
            }
        }
    }
}

/// Resolves placeholders against a [`SecretStore`].
pub struct Resolver<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: SecretStore + ?Sized> Resolver<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Runs one resolution pass for `mode`.
    ///
    /// # Errors
    ///
    /// Returns the first failure, wrapped in [`ResolveError::Reference`] with
    /// the variable name and parsed reference. No partial result is returned.
    pub async fn resolve(&self, mode: ResolutionMode) -> Result<ResultMap> {
        let (environ, key_separator) = mode.into_placeholders()?;
        self.substitute(&environ, key_separator.as_deref()).await
    }

    /// Substitutes every placeholder in `environ`, reading each path at most once.
    #[tracing::instrument(skip(self, environ), fields(entries = environ.len()))]
    pub async fn substitute<E: AsRef<str>>(
        &self,
        environ: &[E],
        key_separator: Option<&str>,
    ) -> Result<ResultMap> {
        let placeholders = find_placeholders(environ);
        debug!(count = placeholders.len(), "Placeholders found");

        let mut cache = ResolutionCache::new(self.store);
        let mut resolved = ResultMap::new();

        for (variable, raw) in placeholders {
            let reference = SecretRef::parse(&raw, key_separator);
            if reference.path.is_empty() {
                return Err(ResolveError::misconfigured("placeholder has an empty path")
                    .for_variable(variable, reference));
            }

            debug!(variable = %variable, path = %reference.path, key = %reference.key, "Resolving");
            match cache.lookup(&reference).await {
                Ok(value) => {
                    resolved.insert(variable, value);
                }
                Err(e) => return Err(e.for_variable(variable, reference)),
            }
        }

        info!(
            variables = resolved.len(),
            paths = cache.len(),
            "Placeholders resolved"
        );
        Ok(resolved)
    }
}
