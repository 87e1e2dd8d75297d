use std::time::Duration;

use super::client::HttpClient;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::Certificate;

/// TLS trust settings for [`BasicClient`].
#[derive(Default)]
pub struct TlsOptions {
    /// Extra roots trusted on top of the system store.
    pub root_certificates: Vec<Certificate>,
    /// Skip certificate verification entirely.
    pub accept_invalid_certs: bool,
}

/// Plain reqwest-backed client with request and connect timeouts.
pub struct BasicClient(reqwest::Client);

impl BasicClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        Self::with_tls(timeout, TlsOptions::default())
    }

    pub fn with_tls(timeout: Duration, tls: TlsOptions) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .danger_accept_invalid_certs(tls.accept_invalid_certs);
        for cert in tls.root_certificates {
            builder = builder.add_root_certificate(cert);
        }
        Ok(Self(builder.build()?))
    }
}

#[async_trait]
impl HttpClient for BasicClient {
    async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        self.0.execute(req).await
    }
}
