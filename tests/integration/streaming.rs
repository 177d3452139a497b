//! Streaming retrieval

use crate::mock_server::{
    silent_config, silent_endpoint, test_client, truncated_error_endpoint, MockServerFixture,
};
use futures::StreamExt;
use history_qa::RetrievalFailure;
use std::time::Duration;

#[tokio::test]
async fn test_stream_yields_body_text() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("POST", crate::mock_server::COMPLETIONS_PATH)
        .match_header("accept", "text/event-stream")
        .with_status(200)
        .with_header("content-type", "text/plain; charset=utf-8")
        .with_body("东北师范大学创建于1946年。")
        .create_async()
        .await;

    let stream = fixture
        .client()
        .stream_answer("学校哪年建校？", None)
        .await
        .expect("stream should open");
    let text = stream.collect_text().await.unwrap();

    mock.assert_async().await;
    assert_eq!(text, "东北师范大学创建于1946年。");
}

#[tokio::test]
async fn test_stream_error_status_is_classified() {
    let mut fixture = MockServerFixture::new().await;
    fixture
        .mock_json_response(403, r#"{"code":10019,"message":"content risk"}"#)
        .await;

    let r = fixture.client().stream_answer("q", None).await;
    assert_eq!(
        r.err(),
        Some(RetrievalFailure::ContentPolicy { status: 403 })
    );
}

#[tokio::test]
async fn test_stream_open_times_out() {
    let endpoint = silent_endpoint().await;
    let client = test_client(silent_config(&endpoint, Duration::from_millis(200)));

    let r = client.stream_answer("q", None).await;
    assert_eq!(r.err(), Some(RetrievalFailure::Timeout { timeout_ms: 200 }));
}

#[tokio::test]
async fn test_stream_fragments_concatenate() {
    let mut fixture = MockServerFixture::new().await;
    fixture.mock_text_response(200, "校训：勤奋创新，为人师表。").await;

    let mut stream = fixture.client().stream_answer("校训", None).await.unwrap();
    let mut text = String::new();
    while let Some(fragment) = stream.next().await {
        text.push_str(&fragment.unwrap());
    }
    assert_eq!(text, "校训：勤奋创新，为人师表。");
}

#[tokio::test]
async fn test_stream_error_body_read_failure_is_not_unclassified() {
    let endpoint = truncated_error_endpoint(502).await;
    let client = test_client(silent_config(&endpoint, Duration::from_secs(5)));

    let r = client.stream_answer("q", None).await;
    assert!(
        matches!(r, Err(RetrievalFailure::Unknown(_))),
        "unexpected outcome: {:?}",
        r.err()
    );
}
