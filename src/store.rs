//! The secret-store read capability.
//!
//! [`SecretStore`] is all the resolver needs from a backend. [`VaultStore`]
//! implements it over Vault's HTTP API.
//!
//! [`VaultStore`]: crate::infra::vault::VaultStore

use anyhow::Result;

use crate::payload::SecretPayload;

/// Reads the payload stored under a path.
#[async_trait::async_trait]
pub trait SecretStore: Send + Sync {
    async fn read(&self, path: &str) -> Result<SecretPayload>;
}
