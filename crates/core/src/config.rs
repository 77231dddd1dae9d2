//! Model configuration
//!
//! One entry of the provider configuration file. Field names on the wire
//! follow the `key.json` layout (`model_name`, `extra_body`).

use crate::Error;
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Default completion budget when an entry does not set one.
pub const DEFAULT_MAX_COMPLETION_TOKENS: usize = 1000;

/// A named model configuration. Immutable once loaded.
#[derive(Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelConfig {
    /// Unique name of this entry (e.g. `"Gemini"`).
    #[serde(default)]
    pub name: CompactString,
    /// Provider-native model identifier.
    #[serde(default, rename = "model_name", alias = "model")]
    pub model: CompactString,
    /// API key. `${VAR}` values are expanded by the registry at load.
    #[serde(default)]
    pub api_key: String,
    /// Base URL of the provider API; the provider default when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Maximum tokens the provider may generate per call.
    #[serde(default = "default_max_completion_tokens")]
    pub max_completion_tokens: usize,
    /// Provider-specific body parameters, merged into the request verbatim.
    #[serde(
        default,
        rename = "extra_body",
        alias = "extra_parameters",
        skip_serializing_if = "Map::is_empty"
    )]
    pub extra: Map<String, Value>,
    /// Wire shape override. Detected from the model and base URL when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api: Option<ApiShape>,
}

/// Wire shape of a provider API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiShape {
    /// OpenAI chat completions (also Gemini, DeepSeek, Ollama, ...).
    #[serde(rename = "openai")]
    OpenAI,
    /// Anthropic Messages API.
    Anthropic,
}

impl ModelConfig {
    /// Create a config with the default token budget and no extras.
    pub fn new(
        name: impl Into<CompactString>,
        model: impl Into<CompactString>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
            api_key: api_key.into(),
            base_url: None,
            max_completion_tokens: DEFAULT_MAX_COMPLETION_TOKENS,
            extra: Map::new(),
            api: None,
        }
    }

    /// Set the base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the completion token budget.
    pub fn max_completion_tokens(mut self, tokens: usize) -> Self {
        self.max_completion_tokens = tokens;
        self
    }

    /// Add a provider-specific body parameter.
    pub fn extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Resolve the wire shape.
    ///
    /// `claude-*` models without a custom base URL talk to Anthropic;
    /// everything else is treated as OpenAI-compatible.
    pub fn shape(&self) -> ApiShape {
        if let Some(api) = self.api {
            return api;
        }
        if self.model.starts_with("claude-") && self.base_url.is_none() {
            ApiShape::Anthropic
        } else {
            ApiShape::OpenAI
        }
    }

    /// Validate required fields.
    pub fn validate(&self) -> Result<(), Error> {
        if self.name.trim().is_empty() {
            return Err(Error::Config("model entry is missing 'name'".into()));
        }
        if self.model.trim().is_empty() {
            return Err(Error::Config(format!(
                "model '{}' is missing 'model_name'",
                self.name
            )));
        }
        if self.api_key.trim().is_empty() {
            return Err(Error::Config(format!(
                "model '{}' is missing 'api_key'",
                self.name
            )));
        }
        if self.max_completion_tokens == 0 {
            return Err(Error::Config(format!(
                "model '{}' has max_completion_tokens = 0",
                self.name
            )));
        }
        Ok(())
    }
}

impl fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelConfig")
            .field("name", &self.name)
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("max_completion_tokens", &self.max_completion_tokens)
            .field("extra", &self.extra)
            .field("api", &self.api)
            .finish()
    }
}

fn default_max_completion_tokens() -> usize {
    DEFAULT_MAX_COMPLETION_TOKENS
}
