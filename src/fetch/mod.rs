mod basic;
mod client;
pub mod auth;

pub use basic::{BasicClient, TlsOptions};
pub use client::HttpClient;
