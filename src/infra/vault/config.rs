use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use reqwest::Certificate;
use tracing::{debug, warn};

use super::token_helper;
use crate::fetch::TlsOptions;

pub const DEFAULT_ADDRESS: &str = "https://127.0.0.1:8200";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Connection settings for a Vault server.
///
/// Read from the standard Vault client variables:
/// - `VAULT_ADDR` (default `https://127.0.0.1:8200`)
/// - `VAULT_TOKEN`
/// - `VAULT_NAMESPACE`
/// - `VAULT_CLIENT_TIMEOUT` in seconds, optionally suffixed with `s` (default 60)
/// - `VAULT_CACERT`, a PEM bundle of CA certificates to trust
/// - `VAULT_CAPATH`, a directory of PEM CA certificates to trust
/// - `VAULT_SKIP_VERIFY`, disables TLS verification when true
#[derive(Clone, Default)]
pub struct VaultConfig {
    pub address: String,
    pub token: Option<String>,
    pub namespace: Option<String>,
    pub timeout: Duration,
    pub ca_cert: Option<PathBuf>,
    pub ca_path: Option<PathBuf>,
    pub skip_verify: bool,
}

impl VaultConfig {
    /// Loads the config from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads the config through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let address = non_empty("VAULT_ADDR").unwrap_or_else(|| DEFAULT_ADDRESS.to_string());
        let token = non_empty("VAULT_TOKEN");
        let namespace = non_empty("VAULT_NAMESPACE");
        let timeout = match non_empty("VAULT_CLIENT_TIMEOUT") {
            Some(raw) => parse_timeout(&raw)
                .with_context(|| format!("Invalid VAULT_CLIENT_TIMEOUT '{raw}'"))?,
            None => DEFAULT_TIMEOUT,
        };
        let ca_cert = non_empty("VAULT_CACERT").map(PathBuf::from);
        let ca_path = non_empty("VAULT_CAPATH").map(PathBuf::from);
        let skip_verify = match non_empty("VAULT_SKIP_VERIFY") {
            Some(raw) => parse_bool(&raw)
                .with_context(|| format!("Invalid VAULT_SKIP_VERIFY '{raw}'"))?,
            None => false,
        };

        Ok(Self {
            address,
            token,
            namespace,
            timeout,
            ca_cert,
            ca_path,
            skip_verify,
        })
    }

    /// Loads the configured CA certificates. `VAULT_CACERT` takes precedence
    /// over `VAULT_CAPATH`, as in the Vault CLI.
    pub fn tls_options(&self) -> Result<TlsOptions> {
        if self.skip_verify {
            warn!("VAULT_SKIP_VERIFY is set, TLS certificates will not be verified");
        }

        let root_certificates = match (&self.ca_cert, &self.ca_path) {
            (Some(file), _) => load_pem_file(file)?,
            (None, Some(dir)) => load_pem_dir(dir)?,
            (None, None) => Vec::new(),
        };

        Ok(TlsOptions {
            root_certificates,
            accept_invalid_certs: self.skip_verify,
        })
    }

    /// Fills in the token from the token helper if none was configured.
    pub fn with_token_helper(mut self) -> Self {
        if self.token.is_some() {
            return self;
        }
        debug!("No VAULT_TOKEN set, trying the token helper");
        self.token = token_helper::default_token();
        if self.token.is_some() {
            debug!("Token loaded from token helper");
        }
        self
    }
}

impl fmt::Debug for VaultConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VaultConfig")
            .field("address", &self.address)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("namespace", &self.namespace)
            .field("timeout", &self.timeout)
            .field("ca_cert", &self.ca_cert)
            .field("ca_path", &self.ca_path)
            .field("skip_verify", &self.skip_verify)
            .finish()
    }
}

fn parse_timeout(raw: &str) -> Result<Duration> {
    let secs: u64 = raw.trim().trim_end_matches('s').parse()?;
    Ok(Duration::from_secs(secs))
}

/// Accepts the spellings Go's `strconv.ParseBool` does.
fn parse_bool(raw: &str) -> Result<bool> {
    match raw.trim() {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
        other => bail!("expected a boolean, got '{other}'"),
    }
}

fn load_pem_file(path: &Path) -> Result<Vec<Certificate>> {
    let pem = std::fs::read(path)
        .with_context(|| format!("Failed to read CA certificate {}", path.display()))?;
    let certs = Certificate::from_pem_bundle(&pem)
        .with_context(|| format!("Invalid CA certificate {}", path.display()))?;
    if certs.is_empty() {
        bail!("No certificates found in {}", path.display());
    }
    debug!(path = %path.display(), count = certs.len(), "Loaded CA certificates");
    Ok(certs)
}

fn load_pem_dir(dir: &Path) -> Result<Vec<Certificate>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read CA directory {}", dir.display()))?;

    let mut certs = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_file() {
            certs.extend(load_pem_file(&path)?);
        }
    }
    Ok(certs)
}
