mod vault_token;

pub use vault_token::{NAMESPACE_HEADER, TOKEN_HEADER, VaultAuth};
