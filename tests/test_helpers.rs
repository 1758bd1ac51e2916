// tests/test_helpers.rs
// Shared fixtures: a scripted mock completion endpoint and request builders

#![allow(dead_code)]

use axum::{
    Json, Router,
    body::{Body, Bytes},
    extract::State,
    http::{HeaderMap, Request, StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::convert::Infallible;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use company_advisor::api::create_router;
use company_advisor::{AdvisorConfig, AppState, CompletionClient};

pub const TEST_API_KEY: &str = "test-ark-key";

/// How the mock endpoint answers every request
#[derive(Clone)]
pub enum Script {
    /// 200 with a JSON body
    Json(Value),
    /// Non-success status with a raw body
    Error(StatusCode, String),
    /// 200 event stream, one write per chunk
    Chunks(Vec<Vec<u8>>),
    /// Like `Chunks`, then keeps the connection open without sending more
    ChunksThenStall(Vec<Vec<u8>>),
    /// Accepts the request and never sends headers
    Silent,
}

/// Request as seen by the mock endpoint
#[derive(Debug, Clone)]
pub struct Captured {
    pub authorization: Option<String>,
    pub body: Value,
}

pub struct MockUpstream {
    pub base_url: String,
    requests: Arc<Mutex<Vec<Captured>>>,
}

impl MockUpstream {
    pub fn requests(&self) -> Vec<Captured> {
        self.requests.lock().unwrap().clone()
    }

    pub fn single_request(&self) -> Captured {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one upstream call");
        requests.into_iter().next().unwrap()
    }
}

type UpstreamState = (Arc<Script>, Arc<Mutex<Vec<Captured>>>);

/// Start a mock completion endpoint on an ephemeral port
pub async fn spawn_upstream(script: Script) -> MockUpstream {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let state: UpstreamState = (Arc::new(script), requests.clone());

    let app = Router::new()
        .route("/v1/chat/completions", post(completions))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockUpstream {
        base_url: format!("http://{}", addr),
        requests,
    }
}

async fn completions(
    State((script, requests)): State<UpstreamState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    requests.lock().unwrap().push(Captured {
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(String::from),
        body,
    });

    match script.as_ref() {
        Script::Json(value) => Json(value.clone()).into_response(),
        Script::Error(status, body) => (*status, body.clone()).into_response(),
        Script::Chunks(chunks) => event_stream(chunks.clone(), false),
        Script::ChunksThenStall(chunks) => event_stream(chunks.clone(), true),
        Script::Silent => futures::future::pending().await,
    }
}

fn event_stream(chunks: Vec<Vec<u8>>, stall: bool) -> Response {
    let stream = async_stream::stream! {
        for chunk in chunks {
            // Separate writes so records really arrive split
            tokio::time::sleep(Duration::from_millis(10)).await;
            yield Ok::<_, Infallible>(chunk);
        }
        if stall {
            futures::future::pending::<()>().await;
        }
    };

    Response::builder()
        .header(header::CONTENT_TYPE, "text/event-stream")
        .body(Body::from_stream(stream))
        .unwrap()
}

/// `data:` record carrying one content delta
pub fn delta_record(text: &str) -> String {
    format!(
        "data: {}\n\n",
        json!({ "choices": [{ "index": 0, "delta": { "content": text } }] })
    )
}

pub fn chunks(parts: &[&str]) -> Vec<Vec<u8>> {
    parts.iter().map(|p| p.as_bytes().to_vec()).collect()
}

/// Non-streaming success body with the given message text
pub fn completion_body(content: &str) -> Value {
    json!({
        "id": "cmpl-test",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}

pub fn test_config(base_url: &str) -> AdvisorConfig {
    AdvisorConfig::new(base_url, TEST_API_KEY)
        .with_stream_idle_timeout(Some(Duration::from_secs(5)))
}

pub fn test_client(base_url: &str) -> CompletionClient {
    CompletionClient::new(test_config(base_url)).unwrap()
}

pub fn test_app(base_url: &str) -> Router {
    create_router(AppState::new(test_client(base_url)))
}

/// Inbound body with all required fields and the given language
pub fn advice_body(language: &str) -> Value {
    json!({
        "companyInfo": {
            "gicsGroup": "Software & Services",
            "companyName": "Acme Analytics",
            "teamSize": "12",
            "capital": "250000",
            "numClients": "40",
            "socialImpact": "7",
            "language": language
        },
        "language": language
    })
}

pub fn post_advice(query: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(format!("/api/advice{}", query))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

pub async fn body_bytes(response: Response) -> Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

pub async fn body_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
