// src/advice/mod.rs
// Advice request domain: inbound payload, validation, prompt, result

pub mod profile;
pub mod prompt;

use futures::stream::BoxStream;
use serde::Deserialize;
use thiserror::Error;

use crate::llm::RelayError;

pub use profile::{CompanyInfo, CompanyProfile};
pub use prompt::{Language, build_prompt};

/// Inbound payload was malformed or incomplete
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("invalid request body: {0}")]
    Malformed(String),

    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("invalid query: {0}")]
    InvalidQuery(String),
}

/// JSON body of `POST /api/advice`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdviceRequestBody {
    pub company_info: CompanyInfo,
    pub language: String,
}

/// A validated request: profile, target language and delivery mode
#[derive(Debug, Clone)]
pub struct AdviceRequest {
    pub profile: CompanyProfile,
    pub language: Language,
    pub stream: bool,
}

impl AdviceRequest {
    /// Validate an inbound body. Unknown language codes are not an error.
    pub fn from_body(body: AdviceRequestBody, stream: bool) -> Result<Self, ValidationError> {
        Ok(Self {
            profile: CompanyProfile::try_from(body.company_info)?,
            language: Language::from_code(&body.language),
            stream,
        })
    }

    pub fn prompt(&self) -> String {
        build_prompt(&self.profile, self.language)
    }
}

/// Text fragments relayed from a streaming completion, in arrival order
pub type AdviceStream = BoxStream<'static, Result<String, RelayError>>;

/// Produced once per request and consumed once by the handler
pub enum AdviceResult {
    Complete(String),
    Streaming(AdviceStream),
}

impl std::fmt::Debug for AdviceResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdviceResult::Complete(text) => f.debug_tuple("Complete").field(text).finish(),
            AdviceResult::Streaming(_) => f.write_str("Streaming(..)"),
        }
    }
}
