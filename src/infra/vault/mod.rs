//! HashiCorp Vault backend.
//!
//! [`VaultConfig`] gathers address, token and namespace from the environment.
//! [`VaultStore`] implements [`SecretStore`] over Vault's HTTP API.
//! The [`token_helper`] module finds a token when none was configured.
//!
//! [`SecretStore`]: crate::store::SecretStore

mod client;
mod config;
pub mod token_helper;

pub use client::VaultStore;
pub use config::VaultConfig;
