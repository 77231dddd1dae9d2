//! Tests for `ProviderRegistry` loading, selection and reload.

use learnkit_model::{DispatchPolicy, Fallback, ProviderRegistry};
use lcore::{Error, ModelConfig};
use std::io::Write;

const KEY_FILE: &str = r#"{
    "default": "Gemini",
    "fallback": { "kind": "provider", "name": "OpenAI" },
    "dispatch": { "max_attempts": 5, "timeout_secs": 30 },
    "models": [
        {
            "name": "OpenAI",
            "model_name": "gpt-4o-mini",
            "api_key": "sk-openai",
            "max_completion_tokens": 2000
        },
        {
            "name": "Gemini",
            "model_name": "gemini-2.0-flash",
            "api_key": "sk-gemini",
            "base_url": "https://generativelanguage.googleapis.com/v1beta/openai/",
            "max_completion_tokens": 8192,
            "extra_body": { "google": { "thinking_config": { "thinking_budget": 0 } } }
        }
    ]
}"#;

#[test]
fn loads_key_file() {
    let registry = ProviderRegistry::from_json(KEY_FILE).unwrap();
    assert_eq!(registry.len(), 2);
    assert_eq!(registry.default_name(), "Gemini");
    assert_eq!(
        registry.fallback(),
        Some(Fallback::Provider {
            name: "OpenAI".into()
        })
    );

    let policy = registry.policy();
    assert_eq!(policy.max_attempts, 5);
    assert_eq!(policy.timeout_secs, 30);
    // Unset fields keep their defaults.
    assert_eq!(policy.base_delay_ms, DispatchPolicy::default().base_delay_ms);
}

#[test]
fn select_default_and_by_name() {
    let registry = ProviderRegistry::from_json(KEY_FILE).unwrap();
    let default = registry.select(None).unwrap();
    assert_eq!(default.model, "gemini-2.0-flash");
    assert!(default.extra.contains_key("google"));

    let openai = registry.select(Some("OpenAI")).unwrap();
    assert_eq!(openai.max_completion_tokens, 2000);
}

#[test]
fn select_unknown_is_not_found() {
    let registry = ProviderRegistry::from_json(KEY_FILE).unwrap();
    let err = registry.select(Some("Mistral")).unwrap_err();
    assert!(matches!(err, Error::NotFound(name) if name == "Mistral"));
}

#[test]
fn first_entry_is_default_when_unset() {
    let registry = ProviderRegistry::from_configs(vec![
        ModelConfig::new("a", "gpt-4o", "k1"),
        ModelConfig::new("b", "claude-sonnet-4-5", "k2"),
    ])
    .unwrap();
    assert_eq!(registry.default_name(), "a");
    let entries = registry.list();
    assert_eq!(entries.len(), 2);
    assert!(entries[0].default);
    assert!(!entries[1].default);
}

#[test]
fn missing_fields_are_config_errors() {
    for models in [
        r#"[{ "model_name": "gpt-4o", "api_key": "k" }]"#,
        r#"[{ "name": "a", "api_key": "k" }]"#,
        r#"[{ "name": "a", "model_name": "gpt-4o" }]"#,
    ] {
        let text = format!(r#"{{ "models": {models} }}"#);
        let err = ProviderRegistry::from_json(&text).unwrap_err();
        assert!(matches!(err, Error::Config(_)), "{models}: {err}");
    }
}

#[test]
fn empty_models_fails() {
    let err = ProviderRegistry::from_json(r#"{ "models": [] }"#).unwrap_err();
    assert!(err.to_string().contains("at least one model"));
}

#[test]
fn duplicate_names_fail() {
    let result = ProviderRegistry::from_configs(vec![
        ModelConfig::new("a", "gpt-4o", "k1"),
        ModelConfig::new("a", "gpt-4o-mini", "k2"),
    ]);
    assert!(result.unwrap_err().to_string().contains("duplicate"));
}

#[test]
fn unknown_default_fails() {
    let text = r#"{ "default": "nope", "models": [
        { "name": "a", "model_name": "gpt-4o", "api_key": "k" }
    ] }"#;
    assert!(matches!(
        ProviderRegistry::from_json(text),
        Err(Error::Config(_))
    ));
}

#[test]
fn unknown_fallback_provider_fails() {
    let registry =
        ProviderRegistry::from_configs(vec![ModelConfig::new("a", "gpt-4o", "k")]).unwrap();
    let result = registry.with_fallback(Fallback::Provider { name: "b".into() });
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn invalid_json_is_config_error() {
    assert!(matches!(
        ProviderRegistry::from_json("{ models: "),
        Err(Error::Config(_))
    ));
}

#[test]
fn expands_env_api_key() {
    // SAFETY: tests in this binary do not read this variable concurrently.
    unsafe { std::env::set_var("LEARNKIT_TEST_REGISTRY_KEY", "sk-from-env") };
    let text = r#"{ "models": [
        { "name": "a", "model_name": "gpt-4o", "api_key": "${LEARNKIT_TEST_REGISTRY_KEY}" }
    ] }"#;
    let registry = ProviderRegistry::from_json(text).unwrap();
    assert_eq!(registry.select(None).unwrap().api_key, "sk-from-env");
}

#[test]
fn unset_env_api_key_fails() {
    let text = r#"{ "models": [
        { "name": "a", "model_name": "gpt-4o", "api_key": "${LEARNKIT_TEST_UNSET_VARIABLE}" }
    ] }"#;
    let err = ProviderRegistry::from_json(text).unwrap_err();
    assert!(err.to_string().contains("LEARNKIT_TEST_UNSET_VARIABLE"));
}

#[test]
fn load_and_reload_from_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(KEY_FILE.as_bytes()).unwrap();
    let registry = ProviderRegistry::load(file.path()).unwrap();
    let held = registry.select(None).unwrap();

    let mut next = tempfile::NamedTempFile::new().unwrap();
    next.write_all(
        br#"{ "models": [ { "name": "Claude", "model_name": "claude-sonnet-4-5", "api_key": "k" } ] }"#,
    )
    .unwrap();
    registry.reload(next.path()).unwrap();

    assert_eq!(registry.len(), 1);
    assert_eq!(registry.default_name(), "Claude");
    assert!(registry.get("Gemini").is_none());
    // Snapshots taken before the reload stay valid.
    assert_eq!(held.name, "Gemini");
}

#[test]
fn failed_reload_keeps_current_set() {
    let registry = ProviderRegistry::from_json(KEY_FILE).unwrap();
    let mut broken = tempfile::NamedTempFile::new().unwrap();
    broken.write_all(br#"{ "models": [] }"#).unwrap();
    assert!(registry.reload(broken.path()).is_err());
    assert_eq!(registry.len(), 2);
}

#[test]
fn clones_share_replacement() {
    let registry = ProviderRegistry::from_json(KEY_FILE).unwrap();
    let clone = registry.clone();
    let other =
        ProviderRegistry::from_configs(vec![ModelConfig::new("solo", "gpt-4o", "k")]).unwrap();
    registry.replace(&other);
    assert_eq!(clone.default_name(), "solo");
}
