//! Vault's default token helper: a token cached in `~/.vault-token` by `vault login`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

pub const TOKEN_FILE_NAME: &str = ".vault-token";

/// Location of the token file, or `None` if `HOME` is unset.
pub fn token_file_path() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(TOKEN_FILE_NAME))
}

/// Reads a token from `path`. A missing or blank file yields `Ok(None)`.
pub fn read_token(path: &Path) -> Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(contents) => {
            let token = contents.trim();
            Ok((!token.is_empty()).then(|| token.to_string()))
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("Failed to read token file {}", path.display())),
    }
}

/// Best-effort token lookup. Failures are logged at debug level and yield `None`.
pub fn default_token() -> Option<String> {
    let Some(path) = token_file_path() else {
        debug!("HOME is not set, cannot use token helper");
        return None;
    };

    match read_token(&path) {
        Ok(Some(token)) => Some(token),
        Ok(None) => {
            debug!(path = %path.display(), "Token helper has no token");
            None
        }
        Err(e) => {
            debug!(error = %e, "Token helper could not load a token");
            None
        }
    }
}
