//! Conversation controller driving a real client against the mock endpoint

use crate::mock_server::{
    silent_config, silent_endpoint, success_body, test_client, MockServerFixture,
};
use history_qa::conversation::display::{
    MSG_AUTHORIZATION, MSG_CONNECTIVITY, MSG_CONTENT_POLICY, MSG_TIMEOUT,
};
use history_qa::conversation::{
    ConnectivityFlag, ConversationController, Direction, InMemoryNotifier, SubmitOutcome,
};
use history_qa::FailureKind;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_answer_round_trip() {
    let mut fixture = MockServerFixture::new().await;
    fixture
        .mock_json_response(200, &success_body("学校有本部和净月两个校区。"))
        .await;

    let controller = ConversationController::new(Arc::new(fixture.client()));
    assert!(controller.quick_question(1));
    assert_eq!(controller.submit_pending().await, SubmitOutcome::Answered);

    let ex = controller.exchanges();
    assert_eq!(ex.len(), 2);
    assert_eq!(ex[0].text, "学校有哪些校区？");
    assert_eq!(ex[1].direction, Direction::System);
    assert_eq!(ex[1].text, "学校有本部和净月两个校区。");
    assert!(!ex[1].is_error);
}

#[tokio::test]
async fn test_offline_never_reaches_endpoint() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture.mock_unreachable().await;
    let notifier = Arc::new(InMemoryNotifier::new(8));

    let controller = ConversationController::new(Arc::new(fixture.client()))
        .with_connectivity(Arc::new(ConnectivityFlag::new(false)))
        .with_notifier(notifier.clone());

    assert_eq!(
        controller.submit("校训是什么？").await,
        SubmitOutcome::Failed(FailureKind::Connectivity)
    );
    mock.assert_async().await;
    assert_eq!(controller.exchanges()[1].text, MSG_CONNECTIVITY);
    assert_eq!(notifier.events(), vec![MSG_CONNECTIVITY.to_string()]);
}

#[tokio::test]
async fn test_parsed_error_shows_code_and_message() {
    let mut fixture = MockServerFixture::new().await;
    fixture
        .mock_json_response(401, r#"{"code":11200,"message":"auth failed"}"#)
        .await;

    let controller = ConversationController::new(Arc::new(fixture.client()));
    controller.submit("q").await;
    assert_eq!(
        controller.exchanges()[1].text,
        "错误: 接口错误 11200：auth failed..."
    );
}

#[tokio::test]
async fn test_unparseable_unauthorized_shows_authorization_message() {
    let mut fixture = MockServerFixture::new().await;
    fixture.mock_text_response(401, "Unauthorized").await;

    let controller = ConversationController::new(Arc::new(fixture.client()));
    controller.submit("q").await;
    assert_eq!(controller.exchanges()[1].text, MSG_AUTHORIZATION);
}

#[tokio::test]
async fn test_content_policy_display() {
    let mut fixture = MockServerFixture::new().await;
    fixture
        .mock_json_response(200, r#"{"code":10019,"message":"risk"}"#)
        .await;

    let controller = ConversationController::new(Arc::new(fixture.client()));
    assert_eq!(
        controller.submit("q").await,
        SubmitOutcome::Failed(FailureKind::ContentPolicy)
    );
    assert_eq!(controller.exchanges()[1].text, MSG_CONTENT_POLICY);
}

#[tokio::test]
async fn test_busy_clears_after_timeout() {
    let endpoint = silent_endpoint().await;
    let client = test_client(silent_config(&endpoint, Duration::from_millis(200)));
    let controller = ConversationController::new(Arc::new(client));

    assert_eq!(
        controller.submit("q").await,
        SubmitOutcome::Failed(FailureKind::Timeout)
    );
    assert!(!controller.is_busy());
    let ex = controller.exchanges();
    assert_eq!(ex.len(), 2);
    assert_eq!(ex[1].text, MSG_TIMEOUT);
    assert!(ex[1].is_error);
}
