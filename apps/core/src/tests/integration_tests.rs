//! Integration Tests
//!
//! End-to-end flows: email file on disk through the analyzer, and the coach
//! driving the real HTTP actor against a mock completion endpoint.

use serde_json::json;
use tempfile::tempdir;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::actors::llm::LlmActorHandle;
use crate::actors::messages::AppError;
use crate::analysis::labels::{Audience, Intent};
use crate::analysis::Analyzer;
use crate::coach::conversation::Conversation;
use crate::coach::workflow::EmailCoach;
use crate::config::LlmSettings;
use crate::input::read_email_file;

const EML: &str = "From: sam@example.com\r\nTo: jordan@example.com\r\nSubject: Following up on the invoice\r\n\r\nHi Jordan,\r\n\r\nJust following up on my previous email about the invoice. Any updates?\r\n\r\nBest regards,\r\nSam\r\n";

fn completion_body(message: serde_json::Value) -> serde_json::Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [{ "index": 0, "message": message, "finish_reason": "stop" }]
    })
}

#[tokio::test]
async fn test_eml_file_to_analysis() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("chaser.eml");
    std::fs::write(&path, EML).unwrap();

    let text = read_email_file(&path).unwrap();
    assert!(text.starts_with("Subject: Following up on the invoice\n\nHi Jordan,"));
    assert!(!text.contains("From:"));

    let result = Analyzer::new().analyze_parallel(&text).await.unwrap();
    assert_eq!(result.intent, Some(Intent::FollowUp));
    assert_eq!(result.audience, Some(Audience::Professional));
}

#[tokio::test]
async fn test_feedback_through_http_actor() {
    // 1. Arrange
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({ "model": "gpt-4o" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(json!({
            "role": "assistant",
            "content": "State the invoice number up front."
        }))))
        .expect(1)
        .mount(&mock_server)
        .await;

    let handle = LlmActorHandle::new(LlmSettings::new(mock_server.uri()).with_api_key("sk-test")).unwrap();
    let coach = EmailCoach::new(Analyzer::new(), handle);
    let mut conversation = Conversation::feedback();

    // 2. Act
    let result = coach
        .analyze_with_feedback(&mut conversation, "Any updates on the invoice?")
        .await
        .unwrap();

    // 3. Assert
    assert_eq!(result.feedback.as_deref(), Some("State the invoice number up front."));
    assert_eq!(conversation.len(), 3);
}

#[tokio::test]
async fn test_edit_through_http_actor() {
    // 1. Arrange
    let mock_server = MockServer::start().await;
    let arguments = json!({
        "Subjects": ["Invoice follow-up", "Checking on invoice", "Invoice status", "Quick question about the invoice"],
        "Salutations": ["Hi Jordan,", "Hello Jordan,", "Dear Jordan,"],
        "Closings": ["Best regards,", "Thanks,", "Kind regards,"],
        "Bodies": ["Body one", "Body two", "Body three"]
    })
    .to_string();

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({ "function_call": { "name": "edit_email" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(json!({
            "role": "assistant",
            "content": null,
            "function_call": { "name": "edit_email", "arguments": arguments }
        }))))
        .mount(&mock_server)
        .await;

    let handle = LlmActorHandle::new(LlmSettings::new(mock_server.uri())).unwrap();
    let coach = EmailCoach::new(Analyzer::new(), handle);
    let detected = coach.analyzer().analyze(EML);

    // 2. Act
    let suggestions = coach.edit(EML, &detected, None).await.unwrap();

    // 3. Assert
    assert_eq!(suggestions.subjects[0], "Invoice follow-up");
    assert_eq!(suggestions.bodies.len(), 3);
}

#[tokio::test]
async fn test_server_error_propagates_and_keeps_history() {
    // 1. Arrange
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&mock_server)
        .await;

    let handle = LlmActorHandle::new(LlmSettings::new(mock_server.uri())).unwrap();
    let coach = EmailCoach::new(Analyzer::new(), handle);
    let mut conversation = Conversation::generation();

    // 2. Act
    let result = coach
        .generate(&mut conversation, "Ask Jordan about the invoice", None, None)
        .await;

    // 3. Assert
    assert!(matches!(result, Err(AppError::Actor(_))));
    assert!(conversation.is_empty());
}
