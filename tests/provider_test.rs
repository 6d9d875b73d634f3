//! Wiremock integration tests for the provider HTTP clients.
//!
//! These verify request shape, response parsing, and status-to-error mapping
//! against mocked endpoints.

use std::time::Duration;

use bifrost::{
    BifrostError, ClaudeProvider, GeminiProvider, Message, OpenAiProvider, TextProvider,
};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Gemini
// ============================================================================

#[tokio::test]
async fn gemini_success() {
    let mock_server = MockServer::start().await;
    let model = "gemini-1.5-flash";

    let body = serde_json::json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [{"text": "Hello from Gemini"}]
            },
            "finishReason": "STOP"
        }]
    });

    Mock::given(method("POST"))
        .and(path(format!("/v1beta/models/{model}:generateContent")))
        .and(header("x-goog-api-key", "test_key"))
        .and(body_partial_json(serde_json::json!({
            "contents": [{"role": "user", "parts": [{"text": "hi"}]}],
            "systemInstruction": {"parts": [{"text": "be brief"}]}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&mock_server)
        .await;

    let provider = GeminiProvider::with_base_url("test_key", mock_server.uri());
    let text = provider
        .call(model, "hi", "be brief", None)
        .await
        .expect("call should succeed");
    assert_eq!(text, "Hello from Gemini");
}

#[tokio::test]
async fn gemini_maps_assistant_turns_to_model_role() {
    let mock_server = MockServer::start().await;
    let model = "gemini-1.5-flash";

    Mock::given(method("POST"))
        .and(path(format!("/v1beta/models/{model}:generateContent")))
        .and(body_partial_json(serde_json::json!({
            "contents": [
                {"role": "user", "parts": [{"text": "question"}]},
                {"role": "model", "parts": [{"text": "earlier answer"}]},
                {"role": "user", "parts": [{"text": "follow-up"}]}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": "ok"}]}}]
        })))
        .mount(&mock_server)
        .await;

    let history = vec![
        Message::user("question"),
        Message::assistant("earlier answer"),
    ];
    let provider = GeminiProvider::with_base_url("test_key", mock_server.uri());
    let text = provider
        .call(model, "follow-up", "", Some(&history))
        .await
        .expect("call should succeed");
    assert_eq!(text, "ok");
}

#[tokio::test]
async fn gemini_safety_block_is_content_filtered() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [{
                "content": {"parts": []},
                "finishReason": "SAFETY"
            }]
        })))
        .mount(&mock_server)
        .await;

    let provider = GeminiProvider::with_base_url("test_key", mock_server.uri());
    let result = provider.call("gemini-1.5-flash", "hi", "", None).await;

    match result {
        Err(BifrostError::ContentFiltered { reason }) => assert_eq!(reason, "SAFETY"),
        other => panic!("expected ContentFiltered, got {other:?}"),
    }
}

#[tokio::test]
async fn gemini_empty_candidates_is_empty_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"candidates": []})),
        )
        .mount(&mock_server)
        .await;

    let provider = GeminiProvider::with_base_url("test_key", mock_server.uri());
    let result = provider.call("gemini-1.5-flash", "hi", "", None).await;
    assert!(matches!(result, Err(BifrostError::EmptyResponse)));
}

#[tokio::test]
async fn gemini_403_is_authentication_failed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&mock_server)
        .await;

    let provider = GeminiProvider::with_base_url("bad_key", mock_server.uri());
    let result = provider.call("gemini-1.5-flash", "hi", "", None).await;
    assert!(matches!(result, Err(BifrostError::AuthenticationFailed)));
}

#[tokio::test]
async fn gemini_404_is_model_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let provider = GeminiProvider::with_base_url("test_key", mock_server.uri());
    let result = provider.call("no-such-model", "hi", "", None).await;

    match result {
        Err(BifrostError::ModelNotFound(m)) => assert_eq!(m, "no-such-model"),
        other => panic!("expected ModelNotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn gemini_429_carries_retry_after() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "30"))
        .mount(&mock_server)
        .await;

    let provider = GeminiProvider::with_base_url("test_key", mock_server.uri());
    let result = provider.call("gemini-1.5-flash", "hi", "", None).await;

    match result {
        Err(BifrostError::RateLimited { retry_after }) => {
            assert_eq!(retry_after, Some(Duration::from_secs(30)));
        }
        other => panic!("expected RateLimited, got {other:?}"),
    }
}

#[tokio::test]
async fn gemini_500_is_transient_api_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let provider = GeminiProvider::with_base_url("test_key", mock_server.uri());
    let err = provider
        .call("gemini-1.5-flash", "hi", "", None)
        .await
        .unwrap_err();

    assert!(matches!(err, BifrostError::Api { status: 500, .. }));
    assert!(err.is_transient());
}

// ============================================================================
// Anthropic
// ============================================================================

#[tokio::test]
async fn claude_success() {
    let mock_server = MockServer::start().await;

    let body = serde_json::json!({
        "content": [
            {"type": "text", "text": "Hello from Claude"}
        ],
        "stop_reason": "end_turn"
    });

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "test_key"))
        .and(header("anthropic-version", "2023-06-01"))
        .and(body_partial_json(serde_json::json!({
            "model": "claude-3-5-sonnet",
            "system": "be brief",
            "messages": [{"role": "user", "content": "hi"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&mock_server)
        .await;

    let provider = ClaudeProvider::with_base_url("test_key", mock_server.uri());
    let text = provider
        .call("claude-3-5-sonnet", "hi", "be brief", None)
        .await
        .expect("call should succeed");
    assert_eq!(text, "Hello from Claude");
}

#[tokio::test]
async fn claude_skips_non_text_blocks() {
    let mock_server = MockServer::start().await;

    let body = serde_json::json!({
        "content": [
            {"type": "thinking", "thinking": "hmm"},
            {"type": "text", "text": "visible answer"}
        ]
    });

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&mock_server)
        .await;

    let provider = ClaudeProvider::with_base_url("test_key", mock_server.uri());
    let text = provider
        .call("claude-3-5-sonnet", "hi", "", None)
        .await
        .expect("call should succeed");
    assert_eq!(text, "visible answer");
}

#[tokio::test]
async fn claude_529_overload_is_transient() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(529))
        .mount(&mock_server)
        .await;

    let provider = ClaudeProvider::with_base_url("test_key", mock_server.uri());
    let err = provider
        .call("claude-3-5-sonnet", "hi", "", None)
        .await
        .unwrap_err();

    match &err {
        BifrostError::Api { status, message } => {
            assert_eq!(*status, 529);
            assert!(message.contains("overloaded"));
        }
        other => panic!("expected Api {{ status: 529 }}, got {other:?}"),
    }
    assert!(err.is_transient());
}

#[tokio::test]
async fn claude_401_is_authentication_failed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    let provider = ClaudeProvider::with_base_url("bad_key", mock_server.uri());
    let result = provider.call("claude-3-5-sonnet", "hi", "", None).await;
    assert!(matches!(result, Err(BifrostError::AuthenticationFailed)));
}

// ============================================================================
// OpenAI
// ============================================================================

#[tokio::test]
async fn openai_success() {
    let mock_server = MockServer::start().await;

    let body = serde_json::json!({
        "choices": [{
            "message": {"role": "assistant", "content": "Hello from GPT"},
            "finish_reason": "stop"
        }]
    });

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer test_key"))
        .and(body_partial_json(serde_json::json!({
            "model": "gpt-4o-mini",
            "messages": [
                {"role": "system", "content": "be brief"},
                {"role": "user", "content": "hi"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&mock_server)
        .await;

    let provider = OpenAiProvider::with_base_url("test_key", mock_server.uri());
    let text = provider
        .call("gpt-4o-mini", "hi", "be brief", None)
        .await
        .expect("call should succeed");
    assert_eq!(text, "Hello from GPT");
}

#[tokio::test]
async fn openai_content_filter_finish_reason() {
    let mock_server = MockServer::start().await;

    let body = serde_json::json!({
        "choices": [{
            "message": {"role": "assistant", "content": null},
            "finish_reason": "content_filter"
        }]
    });

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&mock_server)
        .await;

    let provider = OpenAiProvider::with_base_url("test_key", mock_server.uri());
    let result = provider.call("gpt-4o-mini", "hi", "", None).await;
    assert!(matches!(result, Err(BifrostError::ContentFiltered { .. })));
}

#[tokio::test]
async fn openai_429_carries_retry_after() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "5"))
        .mount(&mock_server)
        .await;

    let provider = OpenAiProvider::with_base_url("test_key", mock_server.uri());
    let result = provider.call("gpt-4o-mini", "hi", "", None).await;

    match result {
        Err(BifrostError::RateLimited { retry_after }) => {
            assert_eq!(retry_after, Some(Duration::from_secs(5)));
        }
        other => panic!("expected RateLimited, got {other:?}"),
    }
}

#[tokio::test]
async fn openai_empty_choices_is_empty_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})),
        )
        .mount(&mock_server)
        .await;

    let provider = OpenAiProvider::with_base_url("test_key", mock_server.uri());
    let result = provider.call("gpt-4o-mini", "hi", "", None).await;
    assert!(matches!(result, Err(BifrostError::EmptyResponse)));
}
