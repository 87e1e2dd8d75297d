//! Per-pass memo of store reads.

use std::collections::HashMap;

use tracing::debug;

use crate::error::{ResolveError, Result};
use crate::payload::SecretPayload;
use crate::reference::SecretRef;
use crate::select::select_value;
use crate::store::SecretStore;

/// Memoizes payloads by path so each path is read from the store at most once.
///
/// Lives for a single resolution pass. Failed reads are not cached.
pub struct ResolutionCache<'a, S: ?Sized> {
    store: &'a S,
    entries: HashMap<String, SecretPayload>,
}

impl<'a, S: SecretStore + ?Sized> ResolutionCache<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            entries: HashMap::new(),
        }
    }

    /// Resolves `reference` to a single string value.
    pub async fn lookup(&mut self, reference: &SecretRef) -> Result<String> {
        let payload = self.payload(&reference.path).await?;
        select_value(&reference.path, payload, &reference.key)
    }

    /// Returns the payload at `path`, reading it from the store on a miss.
    pub async fn payload(&mut self, path: &str) -> Result<&SecretPayload> {
        if self.entries.contains_key(path) {
            debug!(path, "Secret cache hit");
        } else {
            debug!(path, "Reading secret from store");
            let payload = self.store.read(path).await.map_err(ResolveError::Store)?;
            debug!(path, fields = payload.len(), "Secret read");
            self.entries.insert(path.to_string(), payload);
        }

        self.entries
            .get(path)
            .ok_or_else(|| ResolveError::misconfigured(format!("cache lost entry for '{path}'")))
    }

    /// Number of distinct paths held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
