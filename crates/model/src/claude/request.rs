//! Request body for the Anthropic Messages API.

use crate::http::with_extra;
use lcore::GenerationRequest;
use serde::Serialize;
use serde_json::{Map, Value, json};

/// The request body for the Anthropic Messages API.
#[derive(Debug, Clone, Serialize)]
pub struct Request {
    /// The model identifier.
    pub model: String,
    /// Maximum tokens to generate.
    pub max_tokens: usize,
    /// The messages array.
    pub messages: Vec<Value>,
    /// Temperature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Provider-specific parameters, merged into the body verbatim.
    #[serde(skip)]
    pub extra: Map<String, Value>,
}

impl Request {
    /// The JSON body with `extra` merged on top of the typed fields.
    pub fn body(&self) -> Value {
        with_extra(self, &self.extra)
    }
}

impl From<&GenerationRequest> for Request {
    fn from(req: &GenerationRequest) -> Self {
        Self {
            model: req.config.model.to_string(),
            max_tokens: req.config.max_completion_tokens,
            messages: vec![json!({
                "role": "user",
                "content": req.prompt,
            })],
            temperature: req.temperature,
            extra: req.config.extra.clone(),
        }
    }
}
