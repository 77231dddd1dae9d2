//! OpenAI-compatible adapter against a local mock server.

use learnkit_model::{Client, OpenAI};
use lcore::{
    Error, FinishReason, GenerationRequest, ModelConfig, ProviderStatus, TaskKind,
};
use serde_json::{Value, json};
use std::sync::Arc;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path},
};

fn request(config: ModelConfig) -> GenerationRequest {
    GenerationRequest {
        task: TaskKind::Summary,
        input: "Photosynthesis converts light.".into(),
        prompt: "Summarize: Photosynthesis converts light.".into(),
        temperature: Some(0.7),
        config: Arc::new(config),
    }
}

fn completion(content: &str) -> Value {
    json!({
        "id": "chatcmpl-1",
        "model": "gemini-2.0-flash",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 12, "completion_tokens": 7, "total_tokens": 19 }
    })
}

#[tokio::test]
async fn sends_prompt_and_parses_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer g-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("Plants make sugar.")))
        .expect(1)
        .mount(&server)
        .await;

    let config = ModelConfig::new("Gemini", "gemini-2.0-flash", "g-key")
        .max_completion_tokens(800)
        .extra("top_p", json!(0.9));
    let provider = OpenAI::custom(Client::new(), "g-key", &format!("{}/v1", server.uri())).unwrap();
    let raw = provider.send(&request(config)).await.unwrap();

    assert_eq!(raw.text, "Plants make sugar.");
    assert_eq!(raw.usage.total_tokens, 19);
    assert_eq!(raw.finish_reason, Some(FinishReason::Stop));
    assert_eq!(raw.provider, "Gemini");

    let received = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&received[0].body).unwrap();
    assert_eq!(body["model"], "gemini-2.0-flash");
    assert_eq!(body["max_tokens"], 800);
    assert_eq!(body["top_p"], 0.9);
    assert_eq!(body["messages"][0]["role"], "user");
    assert_eq!(
        body["messages"][0]["content"],
        "Summarize: Photosynthesis converts light."
    );
    assert!((body["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
}

#[tokio::test]
async fn extra_parameters_override_typed_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("ok")))
        .mount(&server)
        .await;

    let config = ModelConfig::new("Gemini", "gemini-2.0-flash", "k").extra("max_tokens", json!(42));
    let provider = OpenAI::custom(Client::new(), "k", &server.uri()).unwrap();
    provider.send(&request(config)).await.unwrap();

    let received = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&received[0].body).unwrap();
    assert_eq!(body["max_tokens"], 42);
}

#[tokio::test]
async fn rate_limit_maps_to_transient_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(429)
                .set_body_json(json!({ "error": { "message": "slow down" } })),
        )
        .mount(&server)
        .await;

    let provider = OpenAI::custom(Client::new(), "k", &server.uri()).unwrap();
    let err = provider
        .send(&request(ModelConfig::new("Gemini", "gemini-2.0-flash", "k")))
        .await
        .unwrap_err();

    assert!(err.is_transient());
    match err {
        Error::Provider { status, message } => {
            assert_eq!(status, ProviderStatus::Http(429));
            assert_eq!(message, "slow down");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn unauthorized_is_permanent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
        .mount(&server)
        .await;

    let provider = OpenAI::custom(Client::new(), "k", &server.uri()).unwrap();
    let err = provider
        .send(&request(ModelConfig::new("OpenAI", "gpt-4o", "k")))
        .await
        .unwrap_err();

    assert!(!err.is_transient());
    assert!(err.to_string().contains("bad key"));
}

#[tokio::test]
async fn missing_choices_is_invalid_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let provider = OpenAI::custom(Client::new(), "k", &server.uri()).unwrap();
    let err = provider
        .send(&request(ModelConfig::new("OpenAI", "gpt-4o", "k")))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Provider {
            status: ProviderStatus::InvalidBody,
            ..
        }
    ));
}

#[tokio::test]
async fn empty_key_sends_no_authorization() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("local")))
        .mount(&server)
        .await;

    let provider = OpenAI::custom(Client::new(), "", &server.uri()).unwrap();
    provider
        .send(&request(ModelConfig::new("Ollama", "llama3", "unused")))
        .await
        .unwrap();

    let received = server.received_requests().await.unwrap();
    assert!(!received[0].headers.contains_key("authorization"));
}
