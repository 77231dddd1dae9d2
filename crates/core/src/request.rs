//! Per-call generation request.

use crate::{ModelConfig, TaskKind};
use std::sync::Arc;

/// A filled prompt bound to one model configuration.
///
/// Created per user action by the request builder and consumed by the
/// dispatcher. Provider adapters turn it into their own wire body.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// The task this request was built for.
    pub task: TaskKind,
    /// The user text substituted into the template.
    pub input: String,
    /// The template with the marker replaced by `input`.
    pub prompt: String,
    /// Sampling temperature.
    pub temperature: Option<f32>,
    /// The model this request targets.
    pub config: Arc<ModelConfig>,
}

impl GenerationRequest {
    /// Input length in characters, as checked by the dispatcher guard.
    pub fn input_chars(&self) -> usize {
        self.input.chars().count()
    }

    /// Re-target the request at another model configuration.
    pub fn with_config(&self, config: Arc<ModelConfig>) -> Self {
        Self {
            config,
            ..self.clone()
        }
    }
}
