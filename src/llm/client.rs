// src/llm/client.rs
// Client for the OpenAI-compatible chat completions endpoint

use reqwest::{Client, Response, header};
use std::time::Duration;
use tracing::{debug, error};

use crate::advice::{AdviceResult, AdviceStream};
use crate::config::AdvisorConfig;

use super::error::UpstreamError;
use super::relay::{RelayOptions, relay};
use super::types::{ChatCompletionRequest, ChatCompletionResponse};

/// Issues exactly one completion request per call
#[derive(Debug, Clone)]
pub struct CompletionClient {
    http: Client,
    config: AdvisorConfig,
    url: String,
}

impl CompletionClient {
    pub fn new(config: AdvisorConfig) -> Result<Self, UpstreamError> {
        let http = Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(UpstreamError::Transport)?;

        Ok(Self::with_http_client(http, config))
    }

    /// Use a preconfigured reqwest client (shared pools, proxies, tests)
    pub fn with_http_client(http: Client, config: AdvisorConfig) -> Self {
        let url = config.completions_url();
        Self { http, config, url }
    }

    pub fn config(&self) -> &AdvisorConfig {
        &self.config
    }

    /// Send the prompt and return the complete text or a live fragment stream
    pub async fn advise(&self, prompt: &str, stream: bool) -> Result<AdviceResult, UpstreamError> {
        if stream {
            self.stream(prompt).await.map(AdviceResult::Streaming)
        } else {
            self.complete(prompt).await.map(AdviceResult::Complete)
        }
    }

    /// Non-streaming completion: first choice's message text
    pub async fn complete(&self, prompt: &str) -> Result<String, UpstreamError> {
        let response = self.send(prompt, false).await?;

        let body: ChatCompletionResponse = response.json().await.map_err(UpstreamError::Decode)?;

        let content = body.into_content().ok_or(UpstreamError::MissingContent)?;
        debug!(bytes = content.len(), "Completion received");

        Ok(content)
    }

    /// Streaming completion relayed as text fragments
    pub async fn stream(&self, prompt: &str) -> Result<AdviceStream, UpstreamError> {
        let response = self.send(prompt, true).await?;

        let options = RelayOptions {
            idle_timeout: self.config.stream_idle_timeout,
            max_line_bytes: self.config.max_line_bytes,
        };

        Ok(Box::pin(relay(response.bytes_stream(), options)))
    }

    /// Streaming requests wait for headers no longer than one idle period
    fn header_timeout(&self, stream: bool) -> Option<Duration> {
        if stream {
            self.config.stream_idle_timeout
        } else {
            None
        }
    }

    async fn send(&self, prompt: &str, stream: bool) -> Result<Response, UpstreamError> {
        let request = ChatCompletionRequest::single_turn(
            &self.config.model,
            prompt,
            self.config.max_tokens,
            stream,
        );

        let mut builder = self
            .http
            .post(&self.url)
            .bearer_auth(&self.config.api_key)
            .header(header::CONTENT_TYPE, "application/json")
            .json(&request);

        // Streaming: headers bounded below, body reads bounded by the relay
        if !stream {
            builder = builder.timeout(self.config.request_timeout);
        }

        debug!(model = %self.config.model, stream, "Sending completion request");
        let sent = match self.header_timeout(stream) {
            Some(limit) => tokio::time::timeout(limit, builder.send())
                .await
                .map_err(|_| {
                    error!("Completion endpoint sent no headers within {:?}", limit);
                    UpstreamError::Timeout(limit)
                })?,
            None => builder.send().await,
        };
        let response = sent.map_err(|e| {
            error!("Completion request to {} failed: {}", self.url, e);
            UpstreamError::Transport(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<unreadable body: {}>", e));
            error!(%status, body = %body, "Completion endpoint returned an error");
            return Err(UpstreamError::Status { status });
        }

        Ok(response)
    }
}
