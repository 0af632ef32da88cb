//! Mock provider setup for integration tests

use ai_email_writer::{GeminiConfig, ReplyGenerator};
use mockito::{Matcher, Mock, Server, ServerGuard};
use serde_json::json;
use std::time::Duration;
use tokio::net::TcpListener;

pub const GENERATE_PATH: &str = "/v1beta/models/gemini-2.0-flash:generateContent";
pub const TEST_API_KEY: &str = "test-key";

/// Test fixture that owns a mock generateContent endpoint
pub struct MockProvider {
    pub server: ServerGuard,
}

impl MockProvider {
    pub async fn new() -> Self {
        Self {
            server: Server::new_async().await,
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.server.url(), GENERATE_PATH)
    }

    /// Generator pointed at the mock with a short timeout
    pub fn generator(&self) -> ReplyGenerator {
        let config = GeminiConfig::new(&self.endpoint(), TEST_API_KEY)
            .expect("valid test config")
            .with_timeout(Duration::from_secs(5));
        ReplyGenerator::builder()
            .config(config)
            .build()
            .expect("generator builds")
    }

    /// Respond to a properly authenticated POST with `status` and `body`
    pub async fn respond(&mut self, status: usize, body: &str) -> Mock {
        self.respond_times(status, body, 1).await
    }

    /// Like `respond`, expecting exactly `hits` requests
    pub async fn respond_times(&mut self, status: usize, body: &str, hits: usize) -> Mock {
        self.server
            .mock("POST", GENERATE_PATH)
            .match_header("x-goog-api-key", TEST_API_KEY)
            .match_header("content-type", "application/json")
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .expect(hits)
            .create_async()
            .await
    }

    /// Respond with a successful generateContent body carrying `text`
    pub async fn reply_with(&mut self, text: &str) -> Mock {
        self.respond(200, &candidate_body(text)).await
    }

    /// Respond with `text` only when the request body matches `matcher`
    pub async fn reply_when(&mut self, matcher: Matcher, text: &str) -> Mock {
        self.server
            .mock("POST", GENERATE_PATH)
            .match_header("x-goog-api-key", TEST_API_KEY)
            .match_header("content-type", "application/json")
            .match_body(matcher)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(candidate_body(text))
            .create_async()
            .await
    }
}

pub fn candidate_body(text: &str) -> String {
    json!({
        "candidates": [{
            "content": { "parts": [{ "text": text }], "role": "model" },
            "finishReason": "STOP",
            "index": 0
        }],
        "usageMetadata": {
            "promptTokenCount": 42,
            "candidatesTokenCount": 12,
            "totalTokenCount": 54
        }
    })
    .to_string()
}

/// A TCP endpoint that accepts connections and never answers.
///
/// Keeps accepted sockets alive until the returned task is dropped or aborted.
pub async fn silent_endpoint() -> (String, tokio::task::JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let handle = tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    (format!("http://{}{}", addr, GENERATE_PATH), handle)
}

/// Generator for an arbitrary endpoint
pub fn generator_for(endpoint: &str, timeout: Duration) -> ReplyGenerator {
    let config = GeminiConfig::new(endpoint, TEST_API_KEY)
        .expect("valid test config")
        .with_timeout(timeout);
    ReplyGenerator::builder()
        .config(config)
        .build()
        .expect("generator builds")
}
