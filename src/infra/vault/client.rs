use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::{Method, StatusCode, Url};
use serde::Deserialize;
use tracing::debug;

use super::VaultConfig;
use crate::fetch::auth::VaultAuth;
use crate::fetch::{BasicClient, HttpClient};
use crate::payload::{SecretPayload, payload_from_json};
use crate::store::SecretStore;

#[derive(Deserialize)]
struct SecretResponse {
    #[serde(default)]
    data: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    errors: Vec<String>,
}

/// Reads secrets from Vault's logical endpoint, `GET {address}/v1/{path}`.
///
/// Only the top-level `data` object of the response is returned. Reads are
/// not retried.
pub struct VaultStore<C> {
    client: C,
    address: Url,
}

impl VaultStore<VaultAuth<BasicClient>> {
    /// Builds a store with a reqwest client honoring the config's timeout and credentials.
    pub fn from_config(config: &VaultConfig) -> Result<Self> {
        let basic = BasicClient::with_tls(config.timeout, config.tls_options()?)?;
        let client = VaultAuth::new(basic, config.token.as_deref(), config.namespace.as_deref())?;
        if !client.has_token() {
            debug!("No Vault token available, reading without one");
        }
        Self::new(client, &config.address)
    }
}

impl<C: HttpClient> VaultStore<C> {
    pub fn new(client: C, address: &str) -> Result<Self> {
        let address = Url::parse(address.trim_end_matches('/'))
            .with_context(|| format!("Invalid Vault address '{address}'"))?;
        Ok(Self { client, address })
    }

    /// Builds `{address}/v1/{path}` segment by segment, so characters such as
    /// `#` and `?` stay part of the path instead of becoming a fragment or query.
    fn url_for(&self, path: &str) -> Result<Url> {
        let mut url = self.address.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("Vault address '{}' cannot be a base URL", self.address))?
            .pop_if_empty()
            .push("v1")
            .extend(path.trim_start_matches('/').split('/'));
        Ok(url)
    }
}

#[async_trait]
impl<C: HttpClient> SecretStore for VaultStore<C> {
    #[tracing::instrument(skip(self))]
    async fn read(&self, path: &str) -> Result<SecretPayload> {
        let url = self.url_for(path)?;
        let req = reqwest::Request::new(Method::GET, url.clone());

        let response = self
            .client
            .execute(req)
            .await
            .with_context(|| format!("Failed to reach Vault at {}", self.address))?;

        let status = response.status();
        debug!(status = status.as_u16(), "Vault responded");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let errors = serde_json::from_str::<ErrorResponse>(&body)
                .map(|r| r.errors)
                .unwrap_or_default();
            if status == StatusCode::NOT_FOUND && errors.is_empty() {
                return Err(anyhow!("No secret found at path '{path}'"));
            }
            return Err(api_error(&url, status, &errors, &body));
        }

        let body: SecretResponse = response
            .json()
            .await
            .with_context(|| format!("Failed to parse Vault response for '{path}'"))?;

        Ok(body.data.map(payload_from_json).unwrap_or_default())
    }
}

/// Formats a failed request the way the Vault CLI reports it.
fn api_error(url: &Url, status: StatusCode, errors: &[String], body: &str) -> anyhow::Error {
    let mut message = format!(
        "Error making API request.\n\nURL: GET {url}\nCode: {}.",
        status.as_u16()
    );

    if !errors.is_empty() {
        message.push_str(" Errors:\n");
        for e in errors {
            message.push_str(&format!("\n* {e}"));
        }
    } else if !body.trim().is_empty() {
        message.push_str(&format!(" Raw Message:\n\n{}", body.trim()));
    }

    anyhow!(message)
}
