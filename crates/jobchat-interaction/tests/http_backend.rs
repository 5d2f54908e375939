//! HttpChatBackend against a mock HTTP server.

use std::time::Duration;

use jobchat_core::backend::{ChatBackend, PostMessageRequest, StartSessionRequest};
use jobchat_interaction::HttpChatBackend;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn start_request() -> StartSessionRequest {
    StartSessionRequest {
        guest_name: "Guest User".to_string(),
        platform: "web".to_string(),
        user_agent: "jobchat-test".to_string(),
    }
}

#[tokio::test]
async fn test_start_session_posts_camel_case_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chatbot/start"))
        .and(body_json(json!({
            "guestName": "Guest User",
            "platform": "web",
            "userAgent": "jobchat-test"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "sessionId": "s1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let backend = HttpChatBackend::new(format!("{}/api", server.uri())).unwrap();
    let response = backend.start_session(&start_request()).await.unwrap();

    assert!(response.success);
    assert_eq!(response.session_id.as_deref(), Some("s1"));
}

#[tokio::test]
async fn test_post_message_returns_bot_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chatbot/message"))
        .and(body_json(json!({
            "sessionId": "s1",
            "message": "Hello",
            "sender": "user"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "botResponse": "Hi there!"
        })))
        .mount(&server)
        .await;

    let backend = HttpChatBackend::new(server.uri()).unwrap();
    let response = backend
        .post_message(&PostMessageRequest::from_user("s1", "Hello"))
        .await
        .unwrap();

    assert_eq!(response.bot_response.as_deref(), Some("Hi there!"));
}

#[tokio::test]
async fn test_unsuccessful_body_is_passed_through() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chatbot/message"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "Session expired"
        })))
        .mount(&server)
        .await;

    let backend = HttpChatBackend::new(server.uri()).unwrap();
    let response = backend
        .post_message(&PostMessageRequest::from_user("s1", "Hello"))
        .await
        .unwrap();

    assert!(!response.success);
    assert_eq!(response.message.as_deref(), Some("Session expired"));
}

#[tokio::test]
async fn test_server_error_maps_to_message_post_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chatbot/message"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "success": false,
            "message": "Internal error"
        })))
        .mount(&server)
        .await;

    let backend = HttpChatBackend::new(server.uri()).unwrap();
    let err = backend
        .post_message(&PostMessageRequest::from_user("s1", "Hello"))
        .await
        .unwrap_err();

    assert!(err.is_message_post_failed());
    assert!(err.to_string().contains("Internal error"));
}

#[tokio::test]
async fn test_server_error_on_start_maps_to_session_creation_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chatbot/start"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let backend = HttpChatBackend::new(server.uri()).unwrap();
    let err = backend.start_session(&start_request()).await.unwrap_err();

    assert!(err.is_session_creation_failed());
}

#[tokio::test]
async fn test_timeout_maps_to_message_post_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chatbot/message"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": true, "botResponse": "late" }))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let backend = HttpChatBackend::with_timeout(server.uri(), Duration::from_millis(50)).unwrap();
    let err = backend
        .post_message(&PostMessageRequest::from_user("s1", "Hello"))
        .await
        .unwrap_err();

    assert!(err.is_message_post_failed());
    assert!(err.to_string().contains("timed out"));
}

#[tokio::test]
async fn test_unreachable_backend() {
    // Nothing listens on port 9 (discard) in test environments.
    let backend =
        HttpChatBackend::with_timeout("http://127.0.0.1:9", Duration::from_millis(500)).unwrap();
    let err = backend.start_session(&start_request()).await.unwrap_err();

    assert!(err.is_session_creation_failed());
}
