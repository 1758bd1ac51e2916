// src/state.rs

use std::sync::Arc;

use crate::llm::CompletionClient;

/// Shared handler state. Holds no per-request data.
#[derive(Clone)]
pub struct AppState {
    pub client: Arc<CompletionClient>,
}

impl AppState {
    pub fn new(client: CompletionClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}
