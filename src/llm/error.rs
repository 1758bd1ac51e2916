// src/llm/error.rs

use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failure talking to the completion endpoint before any advice was produced
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("completion endpoint responded with status {status}")]
    Status { status: StatusCode },

    #[error("completion request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("could not decode completion response: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("completion response contained no message content")]
    MissingContent,

    #[error("no response headers from completion endpoint within {0:?}")]
    Timeout(Duration),
}

impl UpstreamError {
    /// Upstream HTTP status, when the endpoint answered at all
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            UpstreamError::Status { status } => Some(*status),
            UpstreamError::Transport(e) | UpstreamError::Decode(e) => e.status(),
            UpstreamError::MissingContent | UpstreamError::Timeout(_) => None,
        }
    }
}

/// Abnormal end of a relayed stream
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("reading upstream stream failed: {0}")]
    Read(#[source] BoxError),

    #[error("upstream stream idle for more than {0:?}")]
    Idle(Duration),
}
