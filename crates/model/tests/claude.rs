//! Anthropic adapter against a local mock server.

use learnkit_model::{Claude, Client};
use lcore::{FinishReason, GenerationRequest, ModelConfig, TaskKind};
use serde_json::{Value, json};
use std::sync::Arc;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path},
};

fn request() -> GenerationRequest {
    GenerationRequest {
        task: TaskKind::LineExplanation,
        input: "E = mc^2".into(),
        prompt: "Explain: E = mc^2".into(),
        temperature: Some(0.7),
        config: Arc::new(
            ModelConfig::new("Claude", "claude-sonnet-4-5", "sk-ant").max_completion_tokens(512),
        ),
    }
}

#[tokio::test]
async fn sends_messages_body_and_joins_text_blocks() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "sk-ant"))
        .and(header("anthropic-version", "2023-06-01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "msg_1",
            "type": "message",
            "model": "claude-sonnet-4-5",
            "content": [
                { "type": "text", "text": "Energy equals mass" },
                { "type": "thinking", "thinking": "..." },
                { "type": "text", "text": "times c squared." }
            ],
            "stop_reason": "end_turn",
            "usage": { "input_tokens": 20, "output_tokens": 9 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider =
        Claude::custom(Client::new(), "sk-ant", &format!("{}/v1", server.uri())).unwrap();
    let raw = provider.send(&request()).await.unwrap();

    assert_eq!(raw.text, "Energy equals mass\ntimes c squared.");
    assert_eq!(raw.finish_reason, Some(FinishReason::Stop));
    assert_eq!(raw.usage.prompt_tokens, 20);
    assert_eq!(raw.usage.completion_tokens, 9);
    assert_eq!(raw.usage.total_tokens, 29);

    let received = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&received[0].body).unwrap();
    assert_eq!(body["model"], "claude-sonnet-4-5");
    assert_eq!(body["max_tokens"], 512);
    assert_eq!(body["messages"][0]["content"], "Explain: E = mc^2");
}

#[tokio::test]
async fn max_tokens_stop_is_length() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [{ "type": "text", "text": "cut" }],
            "stop_reason": "max_tokens",
            "usage": { "input_tokens": 1, "output_tokens": 512 }
        })))
        .mount(&server)
        .await;

    let provider = Claude::custom(Client::new(), "sk-ant", &server.uri()).unwrap();
    let raw = provider.send(&request()).await.unwrap();
    assert_eq!(raw.finish_reason, Some(FinishReason::Length));
    assert_eq!(raw.model, "claude-sonnet-4-5");
}

#[tokio::test]
async fn overloaded_is_transient() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(529).set_body_json(json!({
            "type": "error",
            "error": { "type": "overloaded_error", "message": "Overloaded" }
        })))
        .mount(&server)
        .await;

    let provider = Claude::custom(Client::new(), "sk-ant", &server.uri()).unwrap();
    let err = provider.send(&request()).await.unwrap_err();
    assert!(err.is_transient());
    assert!(err.to_string().contains("Overloaded"));
}

#[tokio::test]
async fn oversized_usage_saturates_total() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [{ "type": "text", "text": "ok" }],
            "stop_reason": "end_turn",
            "usage": { "input_tokens": u32::MAX, "output_tokens": 7 }
        })))
        .mount(&server)
        .await;

    let provider = Claude::custom(Client::new(), "sk-ant", &server.uri()).unwrap();
    let raw = provider.send(&request()).await.unwrap();
    assert_eq!(raw.usage.prompt_tokens, u32::MAX);
    assert_eq!(raw.usage.total_tokens, u32::MAX);
}
