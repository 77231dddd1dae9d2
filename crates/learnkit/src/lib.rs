//! learnkit: an LLM adapter for study material.
//!
//! [`Assistant`] ties the provider registry, the prompt templates, the
//! dispatcher and the response parser together behind one call per task
//! kind. Everything is passed in explicitly; there is no global provider.
//!
//! # Example
//!
//! ```rust,ignore
//! use learnkit::{Assistant, AppConfig, ProviderRegistry, TemplateStore};
//!
//! let registry = ProviderRegistry::load("key.json")?;
//! let assistant = Assistant::new(registry, TemplateStore::builtin())
//!     .with_features(&AppConfig::load("config.json")?);
//! let cards = assistant.flashcards(&text).await?;
//! ```

pub use assistant::{Assistant, Generation, Processed};
pub use config::{AppConfig, Feature};
pub use hook::Hook;
pub use lcore::{
    ApiShape, Chunk, ConceptMap, Edge, Error, Flashcard, GenerationRequest, GenerationResult,
    MappedSection, ModelConfig, Node, ProviderStatus, RawResponse, Result, SummaryLevel, TaskKind,
    Transport, Usage,
};
pub use model::{
    DispatchPolicy, Dispatcher, Fallback, HttpTransport, ModelEntry, ProviderRegistry,
};
pub use prompt::chunker;
pub use prompt::{
    MARKER, RequestBuilder, ResponseParser, TemplateStore, examples_input, line_input,
    local_chunks, qa_input,
};

mod assistant;
mod config;
pub mod export;
mod hook;
