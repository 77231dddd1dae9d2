//! `Assistant` — build, send and parse for every task kind.

use crate::{AppConfig, Hook};
use compact_str::CompactString;
use lcore::{
    Chunk, ConceptMap, Error, Flashcard, GenerationResult, Result, SummaryLevel, TaskKind,
    Transport, Usage,
};
use model::{Dispatcher, HttpTransport, ProviderRegistry};
use prompt::{RequestBuilder, ResponseParser, TemplateStore, examples_input, line_input, qa_input};
use serde::Serialize;
use std::{collections::BTreeSet, sync::Arc};

/// A parsed result plus the metadata of the call that produced it.
#[derive(Debug, Clone, Serialize)]
pub struct Generation {
    /// The typed result.
    pub result: GenerationResult,
    /// Tokens consumed, as reported by the provider.
    pub usage: Usage,
    /// Model identifier that answered.
    pub model: CompactString,
    /// Registry entry that served the call.
    pub provider: CompactString,
    /// Attempts the dispatcher made.
    pub attempts: u32,
}

/// Output of [`Assistant::process`].
#[derive(Debug, Clone, Serialize)]
pub struct Processed {
    pub summary: String,
    pub chunks: Vec<Chunk>,
    pub concept_map: ConceptMap,
}

/// The learning assistant.
///
/// Holds no mutable state; share it behind an `Arc` for concurrent use.
pub struct Assistant<H = (), T = HttpTransport> {
    registry: ProviderRegistry,
    builder: RequestBuilder,
    dispatcher: Dispatcher<T>,
    parser: ResponseParser,
    allowed: BTreeSet<TaskKind>,
    model: Option<CompactString>,
    hook: H,
}

impl Assistant {
    /// An assistant talking HTTP to the registry's providers.
    pub fn new(registry: ProviderRegistry, templates: TemplateStore) -> Self {
        let dispatcher = Dispatcher::http(registry.clone());
        Self::with_dispatcher(registry, templates, dispatcher)
    }
}

impl<T: Transport> Assistant<(), T> {
    /// An assistant over a custom dispatcher (e.g. one with a fake transport).
    pub fn with_dispatcher(
        registry: ProviderRegistry,
        templates: TemplateStore,
        dispatcher: Dispatcher<T>,
    ) -> Self {
        Self {
            registry,
            builder: RequestBuilder::new(Arc::new(templates)),
            dispatcher,
            parser: ResponseParser::new(),
            allowed: TaskKind::ALL.into_iter().collect(),
            model: None,
            hook: (),
        }
    }
}

impl<H: Hook, T: Transport> Assistant<H, T> {
    /// Replace the hook.
    pub fn with_hook<H2: Hook>(self, hook: H2) -> Assistant<H2, T> {
        Assistant {
            registry: self.registry,
            builder: self.builder,
            dispatcher: self.dispatcher,
            parser: self.parser,
            allowed: self.allowed,
            model: self.model,
            hook,
        }
    }

    /// Replace the request builder (e.g. to override temperatures).
    pub fn with_builder(mut self, builder: RequestBuilder) -> Self {
        self.builder = builder;
        self
    }

    /// Restrict the task kinds this assistant runs.
    pub fn with_allowed(mut self, allowed: impl IntoIterator<Item = TaskKind>) -> Self {
        self.allowed = allowed.into_iter().collect();
        self
    }

    /// Restrict the task kinds to those enabled in the feature configuration.
    pub fn with_features(self, config: &AppConfig) -> Self {
        self.with_allowed(config.allowed())
    }

    /// Use the named registry entry instead of the default.
    pub fn with_model(mut self, name: impl Into<CompactString>) -> Self {
        self.model = Some(name.into());
        self
    }

    /// The provider registry.
    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// The hook.
    pub fn hook(&self) -> &H {
        &self.hook
    }

    /// The dispatcher.
    pub fn dispatcher(&self) -> &Dispatcher<T> {
        &self.dispatcher
    }

    /// The task kinds this assistant runs.
    pub fn allowed(&self) -> &BTreeSet<TaskKind> {
        &self.allowed
    }

    /// Whether `task` is enabled.
    pub fn is_enabled(&self, task: TaskKind) -> bool {
        self.allowed.contains(&task)
    }

    /// Run one task: build the prompt, send it, parse the reply.
    ///
    /// `model` names a registry entry; `None` uses the assistant's model,
    /// or the registry default.
    pub async fn generate(
        &self,
        task: TaskKind,
        text: &str,
        model: Option<&str>,
    ) -> Result<Generation> {
        match self.run(task, text, model).await {
            Ok(generation) => Ok(generation),
            Err(e) => {
                tracing::warn!("{task} generation failed: {e}");
                self.hook.on_error(task, &e);
                Err(e)
            }
        }
    }

    async fn run(&self, task: TaskKind, text: &str, model: Option<&str>) -> Result<Generation> {
        if !self.is_enabled(task) {
            return Err(Error::Disabled(task));
        }
        let text = self.hook.on_text(task, text.to_owned());
        let config = self
            .registry
            .select(model.or(self.model.as_deref()))?;
        let request = self.builder.build(task, &text, config)?;
        let raw = self.dispatcher.send(&request).await?;
        let result = self.parser.parse(task, &raw.text)?;
        tracing::debug!("{task} parsed from '{}'", raw.provider);

        Ok(Generation {
            result: self.hook.on_result(result),
            usage: raw.usage,
            model: raw.model,
            provider: raw.provider,
            attempts: raw.attempts,
        })
    }

    /// Plain-text summary of `text`.
    pub async fn summarize(&self, text: &str) -> Result<String> {
        match self.result(TaskKind::Summary, text).await? {
            GenerationResult::Summary(summary) => Ok(summary),
            other => Err(mismatch(TaskKind::Summary, &other)),
        }
    }

    /// Concept map of `text`.
    pub async fn concept_map(&self, text: &str) -> Result<ConceptMap> {
        match self.result(TaskKind::ConceptMap, text).await? {
            GenerationResult::ConceptMap(map) => Ok(map),
            other => Err(mismatch(TaskKind::ConceptMap, &other)),
        }
    }

    /// Learner-sized chunks of `text`.
    pub async fn chunk(&self, text: &str) -> Result<Vec<Chunk>> {
        match self.result(TaskKind::Chunking, text).await? {
            GenerationResult::ChunkList(chunks) => Ok(chunks),
            other => Err(mismatch(TaskKind::Chunking, &other)),
        }
    }

    /// Flashcards for `text`.
    pub async fn flashcards(&self, text: &str) -> Result<Vec<Flashcard>> {
        match self.result(TaskKind::Flashcard, text).await? {
            GenerationResult::FlashcardList(cards) => Ok(cards),
            other => Err(mismatch(TaskKind::Flashcard, &other)),
        }
    }

    /// Answer `question` from `context`.
    pub async fn ask(&self, question: &str, context: &str) -> Result<String> {
        let input = qa_input(question, context);
        match self.result(TaskKind::Qa, &input).await? {
            GenerationResult::QaAnswer(answer) => Ok(answer),
            other => Err(mismatch(TaskKind::Qa, &other)),
        }
    }

    /// Explain one line, optionally within its surrounding text.
    pub async fn explain_line(&self, line: &str, context: Option<&str>) -> Result<String> {
        let input = line_input(line, context);
        match self.result(TaskKind::LineExplanation, &input).await? {
            GenerationResult::LineExplanation(explanation) => Ok(explanation),
            other => Err(mismatch(TaskKind::LineExplanation, &other)),
        }
    }

    /// Examples of `concept` for each of `example_types`.
    pub async fn examples<S: AsRef<str>>(
        &self,
        concept: &str,
        example_types: &[S],
        context: Option<&str>,
    ) -> Result<String> {
        let input = examples_input(concept, example_types, context);
        match self.result(TaskKind::Example, &input).await? {
            GenerationResult::Examples(examples) => Ok(examples),
            other => Err(mismatch(TaskKind::Example, &other)),
        }
    }

    /// Multi-level summary of `text`, most abstract level first.
    pub async fn summary_tree(&self, text: &str) -> Result<Vec<SummaryLevel>> {
        match self.result(TaskKind::SummaryTree, text).await? {
            GenerationResult::SummaryTree(levels) => Ok(levels),
            other => Err(mismatch(TaskKind::SummaryTree, &other)),
        }
    }

    /// Summary, chunks and concept map of one text, one call after another.
    pub async fn process(&self, text: &str) -> Result<Processed> {
        let summary = self.summarize(text).await?;
        let chunks = self.chunk(text).await?;
        let concept_map = self.concept_map(text).await?;
        Ok(Processed {
            summary,
            chunks,
            concept_map,
        })
    }

    async fn result(&self, task: TaskKind, text: &str) -> Result<GenerationResult> {
        Ok(self.generate(task, text, None).await?.result)
    }
}

/// A hook returned a result for another task kind.
fn mismatch(task: TaskKind, result: &GenerationResult) -> Error {
    Error::schema(task, format!("hook returned a {} result", result.task()))
}
