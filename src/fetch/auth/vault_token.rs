use crate::fetch::client::HttpClient;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderName, HeaderValue};

pub const TOKEN_HEADER: &str = "x-vault-token";
pub const NAMESPACE_HEADER: &str = "x-vault-namespace";

/// An [`HttpClient`] wrapper that injects Vault's token and namespace headers.
///
/// Header values are validated once at construction. The token header is
/// marked sensitive so it is redacted from `Debug` output.
pub struct VaultAuth<C> {
    inner: C,
    token: Option<HeaderValue>,
    namespace: Option<HeaderValue>,
}

impl<C> VaultAuth<C> {
    pub fn new(inner: C, token: Option<&str>, namespace: Option<&str>) -> Result<Self> {
        let token = token
            .map(|t| {
                let mut value =
                    HeaderValue::from_str(t).context("Vault token is not a valid header value")?;
                value.set_sensitive(true);
                Ok::<_, anyhow::Error>(value)
            })
            .transpose()?;
        let namespace = namespace
            .map(|ns| {
                HeaderValue::from_str(ns).context("Vault namespace is not a valid header value")
            })
            .transpose()?;

        Ok(Self {
            inner,
            token,
            namespace,
        })
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }
}

#[async_trait]
impl<C: HttpClient> HttpClient for VaultAuth<C> {
    async fn execute(&self, mut req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        let headers = req.headers_mut();
        if let Some(token) = &self.token {
            headers.insert(HeaderName::from_static(TOKEN_HEADER), token.clone());
        }
        if let Some(namespace) = &self.namespace {
            headers.insert(HeaderName::from_static(NAMESPACE_HEADER), namespace.clone());
        }
        self.inner.execute(req).await
    }
}
