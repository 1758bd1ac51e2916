//! Company Advisor - profile-driven business advice over an LLM completion API
//!
//! Serves `POST /api/advice`, builds a prompt from the submitted company
//! profile and returns the model's answer as JSON or as a plain-text stream.

use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use company_advisor::api::create_router;
use company_advisor::config::{DEFAULT_MAX_LINE_BYTES, DEFAULT_MAX_TOKENS, DEFAULT_MODEL};
use company_advisor::{AdvisorConfig, AppState, CompletionClient};

#[derive(Parser)]
#[command(name = "company-advisor", version)]
#[command(about = "Company profile advice service backed by an LLM completion endpoint")]
struct Args {
    /// Base URL of the completion API (the /v1/chat/completions path is appended)
    #[arg(long, env = "AI_API_URL")]
    ai_api_url: String,

    /// Bearer credential for the completion API
    #[arg(long, env = "ARK_API_KEY", hide_env_values = true)]
    ark_api_key: String,

    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// HTTP server port
    #[arg(long, env = "PORT", default_value_t = 5000)]
    port: u16,

    /// Model identifier sent upstream
    #[arg(long, env = "ADVISOR_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Maximum tokens the model may generate
    #[arg(long, env = "ADVISOR_MAX_TOKENS", default_value_t = DEFAULT_MAX_TOKENS)]
    max_tokens: u32,

    /// Whole-request timeout for non-streaming completions, in seconds
    #[arg(long, env = "ADVISOR_REQUEST_TIMEOUT_SECS", default_value_t = 300)]
    request_timeout_secs: u64,

    /// Longest wait between streamed chunks, in seconds (0 disables)
    #[arg(long, env = "ADVISOR_STREAM_IDLE_TIMEOUT_SECS", default_value_t = 60)]
    stream_idle_timeout_secs: u64,

    /// Largest unterminated stream line buffered before it is dropped
    #[arg(long, env = "ADVISOR_MAX_LINE_BYTES", default_value_t = DEFAULT_MAX_LINE_BYTES)]
    max_line_bytes: usize,
}

impl Args {
    fn advisor_config(&self) -> AdvisorConfig {
        let idle = (self.stream_idle_timeout_secs > 0)
            .then(|| Duration::from_secs(self.stream_idle_timeout_secs));

        AdvisorConfig::new(&self.ai_api_url, &self.ark_api_key)
            .with_model(&self.model)
            .with_max_tokens(self.max_tokens)
            .with_request_timeout(Duration::from_secs(self.request_timeout_secs))
            .with_stream_idle_timeout(idle)
            .with_max_line_bytes(self.max_line_bytes)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional
    let _ = dotenvy::dotenv();

    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,company_advisor=debug,tower_http=info")),
        )
        .init();

    let args = Args::parse();

    let config = args.advisor_config();
    config.validate().context("invalid configuration")?;

    info!("Model: {}", config.model);
    info!("Completion endpoint: {}", config.completions_url());

    let client = CompletionClient::new(config).context("failed to build HTTP client")?;
    let app = create_router(AppState::new(client));

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .with_context(|| format!("invalid bind address {}:{}", args.host, args.port))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            warn!("Could not install Ctrl-C handler: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_args_build_config() {
        let args = Args::try_parse_from([
            "company-advisor",
            "--ai-api-url",
            "https://ark.example.com",
            "--ark-api-key",
            "key",
            "--stream-idle-timeout-secs",
            "0",
        ])
        .unwrap();

        let config = args.advisor_config();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.max_tokens, DEFAULT_MAX_TOKENS);
        assert_eq!(config.stream_idle_timeout, None);
        assert_eq!(config.request_timeout, Duration::from_secs(300));
        assert!(config.validate().is_ok());
    }
}
