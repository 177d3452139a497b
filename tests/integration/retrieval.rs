//! Answer retrieval against a mock completion endpoint

use crate::mock_server::{
    silent_config, silent_endpoint, success_body, test_client, MockServerFixture,
    COMPLETIONS_PATH, TEST_KEY,
};
use history_qa::client::CancelHandle;
use history_qa::config::ClientConfig;
use history_qa::RetrievalFailure;
use mockito::Matcher;
use serde_json::json;
use std::time::{Duration, Instant};

#[tokio::test]
async fn test_answer_is_cleaned() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_json_response(200, &success_body("  东北师范大学**创建于**1946年，\n\n初名东北大学。  "))
        .await;

    let answer = fixture.client().retrieve_answer("学校哪年建校？").await;

    mock.assert_async().await;
    assert_eq!(answer.unwrap(), "东北师范大学创建于1946年， 初名东北大学。");
}

#[tokio::test]
async fn test_request_carries_credential_and_fixed_body() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("POST", COMPLETIONS_PATH)
        .match_header("authorization", format!("Bearer {}", TEST_KEY).as_str())
        .match_header("content-type", "application/json")
        .match_body(Matcher::AllOf(vec![
            Matcher::PartialJson(json!({
                "model": "spark-x",
                "user": "nenu_history_user",
                "temperature": 0.2,
                "max_tokens": 4096,
                "top_p": 0.8,
                "tools": [{"type": "web_search", "web_search": {"enable": false}}],
                "tool_choice": "none",
                "stream": false
            })),
            Matcher::Regex("校训是什么？".to_string()),
        ]))
        .with_status(200)
        .with_body(success_body("勤奋创新，为人师表。"))
        .create_async()
        .await;

    let answer = fixture.client().retrieve_answer("  校训是什么？ ").await;

    mock.assert_async().await;
    assert_eq!(answer.unwrap(), "勤奋创新，为人师表。");
}

#[tokio::test]
async fn test_content_policy_on_error_status() {
    let mut fixture = MockServerFixture::new().await;
    fixture
        .mock_json_response(400, r#"{"code":10019,"message":"content risk"}"#)
        .await;

    let r = fixture.client().retrieve_answer("q").await;
    assert_eq!(r, Err(RetrievalFailure::ContentPolicy { status: 400 }));
}

#[tokio::test]
async fn test_content_policy_on_success_status() {
    let mut fixture = MockServerFixture::new().await;
    fixture
        .mock_json_response(200, r#"{"code":10019,"message":"content risk","sid":"x"}"#)
        .await;

    let r = fixture.client().retrieve_answer("q").await;
    assert_eq!(r, Err(RetrievalFailure::ContentPolicy { status: 200 }));
}

#[tokio::test]
async fn test_remote_error_with_json_body() {
    let mut fixture = MockServerFixture::new().await;
    fixture
        .mock_json_response(401, r#"{"code":11200,"message":"auth failed"}"#)
        .await;

    let r = fixture.client().retrieve_answer("q").await;
    assert_eq!(
        r,
        Err(RetrievalFailure::RemoteApi {
            status: 401,
            code: 11200,
            message: "auth failed".into()
        })
    );
}

#[tokio::test]
async fn test_unclassified_error_keeps_status_and_body() {
    let mut fixture = MockServerFixture::new().await;
    fixture.mock_text_response(502, "Bad Gateway").await;

    let r = fixture.client().retrieve_answer("q").await;
    assert_eq!(
        r,
        Err(RetrievalFailure::UnclassifiedTransport {
            status: 502,
            body: "Bad Gateway".into()
        })
    );
}

#[tokio::test]
async fn test_nonzero_code_on_success_status() {
    let mut fixture = MockServerFixture::new().await;
    fixture
        .mock_json_response(200, r#"{"code":10013,"message":"input invalid"}"#)
        .await;

    let r = fixture.client().retrieve_answer("q").await;
    assert_eq!(
        r,
        Err(RetrievalFailure::RemoteApi {
            status: 200,
            code: 10013,
            message: "input invalid".into()
        })
    );
}

#[tokio::test]
async fn test_empty_choices_is_empty_answer() {
    let mut fixture = MockServerFixture::new().await;
    fixture
        .mock_json_response(200, r#"{"code":0,"message":"Success","choices":[]}"#)
        .await;

    let r = fixture.client().retrieve_answer("q").await;
    assert_eq!(r, Err(RetrievalFailure::EmptyAnswer));
}

#[tokio::test]
async fn test_missing_credential_sends_nothing() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture.mock_unreachable().await;

    let client = test_client(ClientConfig::new(&fixture.endpoint));
    let r = client.retrieve_answer("校训是什么？").await;

    assert!(matches!(r, Err(RetrievalFailure::Configuration(_))));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_silent_endpoint_times_out() {
    let endpoint = silent_endpoint().await;
    let client = test_client(silent_config(&endpoint, Duration::from_millis(200)));

    let start = Instant::now();
    let r = client.retrieve_answer("q").await;

    assert_eq!(r, Err(RetrievalFailure::Timeout { timeout_ms: 200 }));
    assert!(start.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_cancel_aborts_inflight_request() {
    let endpoint = silent_endpoint().await;
    let client = test_client(silent_config(&endpoint, Duration::from_secs(30)));
    let cancel = CancelHandle::new();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let start = Instant::now();
    let r = client.retrieve_answer_with_cancel("q", &cancel).await;

    assert_eq!(r, Err(RetrievalFailure::Cancelled));
    assert!(start.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_success_status_without_code_is_rejected() {
    let mut fixture = MockServerFixture::new().await;
    fixture
        .mock_json_response(200, r#"{"choices":[{"message":{"content":"unvetted"}}]}"#)
        .await;

    let r = fixture.client().retrieve_answer("q").await;
    assert!(matches!(
        r,
        Err(RetrievalFailure::RemoteApi { status: 200, .. })
    ));
}
