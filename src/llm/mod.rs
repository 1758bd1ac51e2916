// src/llm/mod.rs
// Completion endpoint client and stream relay

pub mod client;
pub mod error;
pub mod relay;
pub mod types;

pub use client::CompletionClient;
pub use error::{RelayError, UpstreamError};
pub use relay::{DeltaDecoder, RelayOptions, UpstreamEvent, relay};
