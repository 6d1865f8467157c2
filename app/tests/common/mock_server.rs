//! wiremock servers that answer like the Gemini `generateContent` endpoint.

#![allow(dead_code)]

use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_MODEL: &str = "gemini-pro";
pub const TEST_API_KEY: &str = "test-key";

fn generate_path() -> String {
    format!("/models/{}:generateContent", TEST_MODEL)
}

/// Successful response whose first candidate carries `parts` as text parts.
pub fn gemini_response_parts(parts: &[&str]) -> Value {
    let parts: Vec<Value> = parts.iter().map(|p| json!({ "text": p })).collect();
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": parts },
            "finishReason": "STOP"
        }],
        "usageMetadata": {
            "promptTokenCount": 3,
            "candidatesTokenCount": 5,
            "totalTokenCount": 8
        }
    })
}

pub fn gemini_response_single(text: &str) -> Value {
    gemini_response_parts(&[text])
}

/// Server that answers every correctly authenticated request with `body`.
pub async fn gemini_mock_server(body: &Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(generate_path()))
        .and(header("x-goog-api-key", TEST_API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;
    server
}

/// Server that answers with a non-2xx status.
pub async fn gemini_mock_server_error(status: u16, body: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(generate_path()))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(&server)
        .await;
    server
}

pub async fn gemini_mock_server_with_template(template: ResponseTemplate) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(generate_path()))
        .respond_with(template)
        .mount(&server)
        .await;
    server
}
