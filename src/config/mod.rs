// src/config/mod.rs
// Runtime configuration for the advice service

use reqwest::Url;
use std::time::Duration;
use thiserror::Error;

/// Model identifier sent with every completion request unless overridden
pub const DEFAULT_MODEL: &str = "deepseek-v3-250324";

/// Upper bound on generated tokens per completion
pub const DEFAULT_MAX_TOKENS: u32 = 12_800;

/// Fixed path appended to the configured base URL
pub const COMPLETIONS_PATH: &str = "/v1/chat/completions";

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(300);
pub const DEFAULT_STREAM_IDLE_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Largest partial line the stream relay will buffer (1MB)
pub const DEFAULT_MAX_LINE_BYTES: usize = 1024 * 1024;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("AI API key cannot be empty")]
    EmptyApiKey,

    #[error("AI API URL '{0}' is not a valid http(s) URL")]
    InvalidBaseUrl(String),

    #[error("max tokens must be greater than zero")]
    ZeroMaxTokens,

    #[error("max line bytes must be greater than zero")]
    ZeroMaxLineBytes,
}

/// Configuration for the completion endpoint and the stream relay.
///
/// Constructed once in `main` and handed to the client, never read from
/// the environment at call time.
#[derive(Clone)]
pub struct AdvisorConfig {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
    pub request_timeout: Duration,
    /// `None` waits on a silent upstream indefinitely
    pub stream_idle_timeout: Option<Duration>,
    pub connect_timeout: Duration,
    pub max_line_bytes: usize,
}

impl AdvisorConfig {
    /// Create configuration with defaults for everything but the endpoint and credential
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            stream_idle_timeout: Some(DEFAULT_STREAM_IDLE_TIMEOUT),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            max_line_bytes: DEFAULT_MAX_LINE_BYTES,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_stream_idle_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.stream_idle_timeout = timeout;
        self
    }

    pub fn with_max_line_bytes(mut self, max_line_bytes: usize) -> Self {
        self.max_line_bytes = max_line_bytes;
        self
    }

    /// Full URL of the chat completions endpoint
    pub fn completions_url(&self) -> String {
        format!("{}{}", self.api_url.trim_end_matches('/'), COMPLETIONS_PATH)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::EmptyApiKey);
        }

        match Url::parse(&self.api_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => {}
            _ => return Err(ConfigError::InvalidBaseUrl(self.api_url.clone())),
        }

        if self.max_tokens == 0 {
            return Err(ConfigError::ZeroMaxTokens);
        }
        if self.max_line_bytes == 0 {
            return Err(ConfigError::ZeroMaxLineBytes);
        }

        Ok(())
    }
}

// Manual impl keeps the credential out of debug output
impl std::fmt::Debug for AdvisorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdvisorConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("request_timeout", &self.request_timeout)
            .field("stream_idle_timeout", &self.stream_idle_timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("max_line_bytes", &self.max_line_bytes)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AdvisorConfig::new("https://ark.example.com", "key");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.max_tokens, 12_800);
        assert_eq!(config.stream_idle_timeout, Some(DEFAULT_STREAM_IDLE_TIMEOUT));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_completions_url_strips_trailing_slash() {
        let config = AdvisorConfig::new("https://ark.example.com/api/", "key");
        assert_eq!(
            config.completions_url(),
            "https://ark.example.com/api/v1/chat/completions"
        );

        let config = AdvisorConfig::new("http://localhost:8080", "key");
        assert_eq!(config.completions_url(), "http://localhost:8080/v1/chat/completions");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert_eq!(
            AdvisorConfig::new("https://ark.example.com", "  ").validate(),
            Err(ConfigError::EmptyApiKey)
        );
        assert_eq!(
            AdvisorConfig::new("ark.example.com", "key").validate(),
            Err(ConfigError::InvalidBaseUrl("ark.example.com".into()))
        );
        assert_eq!(
            AdvisorConfig::new("ftp://ark.example.com", "key").validate(),
            Err(ConfigError::InvalidBaseUrl("ftp://ark.example.com".into()))
        );
        assert_eq!(
            AdvisorConfig::new("https://ark.example.com", "key")
                .with_max_tokens(0)
                .validate(),
            Err(ConfigError::ZeroMaxTokens)
        );
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = AdvisorConfig::new("https://ark.example.com", "super-secret");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
