//! End-to-end tests of the adapter and session against a mock Gemini API

mod common;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use maguai::adapter::{AdapterError, AdapterSettings, FALLBACK_REPLY};
use maguai::catalog;
use maguai::session::{
    Message, Role, Session, CONNECTIVITY_ERROR_REPLY, CREDENTIAL_ERROR_REPLY,
};

const GENERATE_PATH: &str = "/models/gemini-3-pro-preview:generateContent";

fn text_response(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }],
        "usageMetadata": {
            "promptTokenCount": 12,
            "candidatesTokenCount": 3,
            "totalTokenCount": 15
        }
    })
}

#[tokio::test]
async fn test_converse_success_sends_history_and_settings() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(json!({
            "contents": [
                { "role": "user", "parts": [{ "text": "Hello" }] },
                { "role": "model", "parts": [{ "text": "Hi there" }] },
                { "role": "user", "parts": [{ "text": "Tell me a joke" }] }
            ],
            "generationConfig": { "temperature": 0.7 }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_response("Why did the crab...")))
        .expect(1)
        .mount(&server)
        .await;

    let adapter = common::adapter_for(server.uri());
    let transcript = vec![
        Message::user("Hello"),
        Message::assistant("Hi there"),
        Message::user("Tell me a joke"),
    ];

    let text = adapter.converse(&transcript, false).await.unwrap();
    assert_eq!(text, "Why did the crab...");

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = requests[0].body_json().unwrap();
    assert!(body["generationConfig"].get("thinkingConfig").is_none());
    assert!(body["systemInstruction"]["parts"][0]["text"]
        .as_str()
        .unwrap()
        .contains("helpful"));
}

#[tokio::test]
async fn test_converse_thinking_mode_attaches_budget() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(body_partial_json(json!({
            "generationConfig": { "thinkingConfig": { "thinkingBudget": 32768 } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_response("deep answer")))
        .expect(1)
        .mount(&server)
        .await;

    let adapter = common::adapter_for(server.uri());
    let text = adapter
        .converse(&[Message::user("Prove it")], true)
        .await
        .unwrap();
    assert_eq!(text, "deep answer");
}

#[tokio::test]
async fn test_converse_detailed_returns_thoughts_when_requested() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(body_partial_json(json!({
            "generationConfig": { "thinkingConfig": { "includeThoughts": true } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "parts": [
                    { "text": "Compare both sides.", "thought": true },
                    { "text": "They are equal." }
                ]}
            }]
        })))
        .mount(&server)
        .await;

    let settings = AdapterSettings {
        include_thoughts: true,
        ..Default::default()
    };
    let adapter = common::adapter_with_settings(server.uri(), settings);

    let reply = adapter
        .converse_detailed(&[Message::user("Is 2+2 equal to 4?")], true)
        .await
        .unwrap();
    assert_eq!(reply.text, "They are equal.");
    assert_eq!(reply.thinking.as_deref(), Some("Compare both sides."));
}

#[tokio::test]
async fn test_converse_empty_body_uses_fallback() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let adapter = common::adapter_for(server.uri());
    let text = adapter.converse(&[Message::user("Hello")], false).await.unwrap();
    assert_eq!(text, FALLBACK_REPLY);
}

#[tokio::test]
async fn test_converse_not_found_is_credential_expired() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {
                "code": 404,
                "message": "Requested entity was not found.",
                "status": "NOT_FOUND"
            }
        })))
        .mount(&server)
        .await;

    let adapter = common::adapter_for(server.uri());
    let err = adapter
        .converse(&[Message::user("Hello")], false)
        .await
        .unwrap_err();
    match err {
        AdapterError::CredentialExpired(message) => {
            assert!(message.contains("Requested entity was not found"))
        }
        other => panic!("expected CredentialExpired, got {:?}", other),
    }
}

#[tokio::test]
async fn test_converse_plain_404_is_adapter_failure() {
    let server = MockServer::start().await;

    // Wrong api_base or a proxy in the way: no Gemini error envelope
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(404).set_body_string("404 page not found"))
        .mount(&server)
        .await;

    let adapter = common::adapter_for(server.uri());
    let err = adapter
        .converse(&[Message::user("Hello")], false)
        .await
        .unwrap_err();
    assert!(matches!(err, AdapterError::AdapterFailure(_)));

    let mut session = Session::new(catalog::default_model());
    let reply = session.send("Hello", &adapter).await.unwrap();
    assert_eq!(reply.content, CONNECTIVITY_ERROR_REPLY);
}

#[tokio::test]
async fn test_converse_server_error_is_adapter_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let adapter = common::adapter_for(server.uri());
    let err = adapter
        .converse(&[Message::user("Hello")], false)
        .await
        .unwrap_err();
    assert!(matches!(err, AdapterError::AdapterFailure(_)));
}

#[tokio::test]
async fn test_converse_unreachable_upstream_is_adapter_failure() {
    // Nothing listens on port 9 in the test environment
    let adapter = common::adapter_for("http://127.0.0.1:9".to_string());
    let err = adapter
        .converse(&[Message::user("Hello")], false)
        .await
        .unwrap_err();
    assert!(matches!(err, AdapterError::AdapterFailure(_)));
}

#[tokio::test]
async fn test_session_round_trip_and_error_copy() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_response("Hi there")))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({
            "error": { "code": 503, "message": "overloaded", "status": "UNAVAILABLE" }
        })))
        .mount(&server)
        .await;

    let adapter = common::adapter_for(server.uri());
    let mut session = Session::new(catalog::default_model());

    let reply = session.send("Hello", &adapter).await.unwrap();
    assert_eq!(reply.role, Role::Assistant);
    assert_eq!(reply.content, "Hi there");
    assert!(!session.is_busy());

    let reply = session.send("And again?", &adapter).await.unwrap();
    assert_eq!(reply.content, CONNECTIVITY_ERROR_REPLY);
    assert_eq!(session.transcript().len(), 4);
    assert!(!session.is_busy());

    // The failed turn's history still includes the earlier exchange
    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = requests[1].body_json().unwrap();
    assert_eq!(body["contents"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_session_credential_error_copy() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": { "code": 404, "message": "Requested entity was not found.", "status": "NOT_FOUND" }
        })))
        .mount(&server)
        .await;

    let adapter = common::adapter_for(server.uri());
    let mut session = Session::new(catalog::default_model());

    let reply = session.send("Hello", &adapter).await.unwrap();
    assert_eq!(reply.content, CREDENTIAL_ERROR_REPLY);
    assert!(!session.is_busy());
}

#[tokio::test]
async fn test_dropped_send_releases_busy_flag() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(text_response("too late"))
                .set_delay(std::time::Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let adapter = common::adapter_for(server.uri());
    let mut session = Session::new(catalog::default_model());

    let abandoned = tokio::time::timeout(
        std::time::Duration::from_millis(200),
        session.send("Hello", &adapter),
    )
    .await;
    assert!(abandoned.is_err());

    assert!(!session.is_busy());
    assert_eq!(session.transcript().len(), 1);
    assert_eq!(session.transcript()[0].role, Role::User);
}
