//! `RequestBuilder` — fills a task template with the user's text.

use crate::template::{MARKER, TemplateStore};
use lcore::{Error, GenerationRequest, ModelConfig, Result, TaskKind};
use std::{collections::BTreeMap, sync::Arc};

/// Builds [`GenerationRequest`]s from the template store.
///
/// Cheap to clone; the store is shared.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    templates: Arc<TemplateStore>,
    temperatures: BTreeMap<TaskKind, f32>,
}

/// Sampling temperature used when the builder has no override.
pub fn default_temperature(task: TaskKind) -> f32 {
    match task {
        TaskKind::SummaryTree => 0.5,
        _ => 0.7,
    }
}

impl RequestBuilder {
    /// Create a builder over a template store.
    pub fn new(templates: Arc<TemplateStore>) -> Self {
        Self {
            templates,
            temperatures: BTreeMap::new(),
        }
    }

    /// Override the temperature for one task kind.
    pub fn with_temperature(mut self, task: TaskKind, temperature: f32) -> Self {
        self.temperatures.insert(task, temperature);
        self
    }

    /// The temperature requests for `task` are built with.
    pub fn temperature(&self, task: TaskKind) -> f32 {
        self.temperatures
            .get(&task)
            .copied()
            .unwrap_or_else(|| default_temperature(task))
    }

    /// The template store.
    pub fn templates(&self) -> &TemplateStore {
        &self.templates
    }

    /// Build the request for `task` with `text` substituted into its template.
    ///
    /// The marker is replaced once, literally; the rest of the template is
    /// left untouched. Empty text is still built. No truncation happens here.
    pub fn build(
        &self,
        task: TaskKind,
        text: &str,
        config: Arc<ModelConfig>,
    ) -> Result<GenerationRequest> {
        let template = self
            .templates
            .get(task)
            .ok_or_else(|| Error::UnknownTask(task.to_string()))?;

        let prompt = template.replacen(MARKER, text, 1);
        tracing::trace!("built {task} prompt ({} chars)", prompt.len());
        Ok(GenerationRequest {
            task,
            input: text.to_owned(),
            prompt,
            temperature: Some(self.temperature(task)),
            config,
        })
    }

    /// Like [`build`](Self::build), with the task kind given by name.
    pub fn build_named(
        &self,
        task: &str,
        text: &str,
        config: Arc<ModelConfig>,
    ) -> Result<GenerationRequest> {
        self.build(task.parse()?, text, config)
    }
}

/// Input text for a question about a context.
pub fn qa_input(question: &str, context: &str) -> String {
    format!("Context:\n{context}\n\nQuestion:\n{question}")
}

/// Input text for explaining one line, optionally within its context.
pub fn line_input(line: &str, context: Option<&str>) -> String {
    match context {
        Some(context) => format!("Context:\n{context}\n\nLine to explain:\n{line}"),
        None => format!("Line to explain:\n{line}"),
    }
}

/// Input text for generating examples of a concept.
pub fn examples_input<S: AsRef<str>>(
    concept: &str,
    example_types: &[S],
    context: Option<&str>,
) -> String {
    let types = example_types
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(", ");
    let mut input = format!("Concept: \"{concept}\"\nProvide these types of examples: {types}");
    if let Some(context) = context {
        input.push_str("\n\nContext:\n");
        input.push_str(context);
    }
    input
}
