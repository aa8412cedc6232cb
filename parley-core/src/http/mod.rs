//! HTTP transport and retry scheduling
//!
//! A pooled reqwest client plus the deterministic backoff policy the
//! generation loop runs on. Error classification lives in
//! [`crate::error`]; this layer only moves bytes and schedules re-sends.

pub mod client;
pub mod retry;

pub use client::{HttpClient, HttpResponse};
pub use retry::RetryPolicy;
