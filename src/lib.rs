pub mod cache;
pub mod error;
pub mod fetch;
pub mod infra;
pub mod output;
pub mod payload;
pub mod reference;
pub mod resolver;
pub mod scan;
pub mod select;
pub mod store;

pub use error::ResolveError;
pub use resolver::{ResolutionMode, Resolver, ResultMap};
pub use store::SecretStore;
