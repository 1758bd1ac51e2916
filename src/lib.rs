// src/lib.rs

pub mod advice;
pub mod api;
pub mod config;
pub mod llm;
pub mod state;

pub use advice::{AdviceRequest, AdviceResult, CompanyProfile, Language};
pub use config::AdvisorConfig;
pub use llm::CompletionClient;
pub use state::AppState;
