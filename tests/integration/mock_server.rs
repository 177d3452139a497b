//! Mock HTTP server setup for integration tests

use history_qa::config::ClientConfig;
use history_qa::knowledge::KnowledgePreamble;
use history_qa::AnswerClient;
use mockito::{Matcher, Mock, Server, ServerGuard};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

pub const COMPLETIONS_PATH: &str = "/v2/chat/completions";
pub const TEST_KEY: &str = "test-key";

/// Test fixture that manages a mock server
pub struct MockServerFixture {
    pub server: ServerGuard,
    pub endpoint: String,
}

impl MockServerFixture {
    pub async fn new() -> Self {
        let server = Server::new_async().await;
        let endpoint = format!("{}{}", server.url(), COMPLETIONS_PATH);
        Self { server, endpoint }
    }

    pub fn config(&self) -> ClientConfig {
        ClientConfig::new(&self.endpoint).with_credential(TEST_KEY)
    }

    /// Create a test client pointed at the mock server
    pub fn client(&self) -> AnswerClient {
        test_client(self.config())
    }

    /// Mock a JSON response for any completion POST
    pub async fn mock_json_response(&mut self, status: u16, body: &str) -> Mock {
        self.server
            .mock("POST", COMPLETIONS_PATH)
            .with_status(status as usize)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }

    /// Mock a plain-text response
    pub async fn mock_text_response(&mut self, status: u16, body: &str) -> Mock {
        self.server
            .mock("POST", COMPLETIONS_PATH)
            .with_status(status as usize)
            .with_header("content-type", "text/plain")
            .with_body(body)
            .create_async()
            .await
    }

    /// Mock that must never be hit
    pub async fn mock_unreachable(&mut self) -> Mock {
        self.server
            .mock("POST", Matcher::Any)
            .expect(0)
            .create_async()
            .await
    }
}

pub fn test_client(config: ClientConfig) -> AnswerClient {
    AnswerClient::new(config, KnowledgePreamble::default()).expect("client should build")
}

/// Vendor success envelope around one answer
pub fn success_body(content: &str) -> String {
    serde_json::json!({
        "code": 0,
        "message": "Success",
        "sid": "cha000b0001@dx1",
        "choices": [{"index": 0, "message": {"role": "assistant", "content": content}}],
        "usage": {"prompt_tokens": 120, "completion_tokens": 12, "total_tokens": 132}
    })
    .to_string()
}

/// Endpoint that accepts connections and never answers.
pub async fn silent_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind silent listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    format!("http://{}{}", addr, COMPLETIONS_PATH)
}

/// Endpoint that answers with an error status, then closes before the declared body ends.
pub async fn truncated_error_endpoint(status: u16) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind truncated listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let mut buf = vec![0u8; 64 * 1024];
            let _ = socket.read(&mut buf).await;
            let head = format!(
                "HTTP/1.1 {} Error\r\nContent-Type: text/plain\r\nContent-Length: 1000\r\n\r\npartial",
                status
            );
            let _ = socket.write_all(head.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });
    format!("http://{}{}", addr, COMPLETIONS_PATH)
}

pub fn silent_config(endpoint: &str, timeout: Duration) -> ClientConfig {
    ClientConfig::new(endpoint)
        .with_credential(TEST_KEY)
        .with_timeout(timeout)
}
