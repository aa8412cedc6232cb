//! Parley Core Library
//!
//! This crate provides a provider-agnostic invocation layer for
//! chat-completion LLM endpoints: a model table maps ids to endpoints and
//! credentials, and `client::LlmClient` handles dialect adaptation, retries,
//! response normalization, and cost accounting.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod pricing;
pub mod protocol;
pub mod providers;
pub mod reasoning;
pub mod throttle;

/// Returns the version of the Parley Core library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
