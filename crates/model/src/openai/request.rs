//! Chat completions request body.

use crate::http::with_extra;
use lcore::GenerationRequest;
use serde::Serialize;
use serde_json::{Map, Value};

/// OpenAI-compatible chat completions request body.
#[derive(Debug, Clone, Serialize)]
pub struct Request {
    /// The model identifier.
    pub model: String,
    /// The messages to send.
    pub messages: Vec<Message>,
    /// Maximum tokens to generate.
    pub max_tokens: usize,
    /// Temperature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Provider-specific parameters, merged into the body verbatim.
    #[serde(skip)]
    pub extra: Map<String, Value>,
}

/// A chat message.
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    /// The role of the author.
    pub role: &'static str,
    /// The content of the message.
    pub content: String,
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
            messages: vec![Message {
                role: "user",
                content: req.prompt.clone(),
            }],
            max_tokens: req.config.max_completion_tokens,
            temperature: req.temperature,
            extra: req.config.extra.clone(),
        }
    }
}
