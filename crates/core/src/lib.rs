//! Core types for learnkit.
//!
//! Shared by the provider, prompt and facade crates: the task kinds, the
//! model configuration, the per-call request and raw response, the typed
//! generation results, the error taxonomy, and the [`Transport`] seam that
//! the dispatcher sends through.

pub use config::{ApiShape, ModelConfig};
pub use error::{Error, ProviderStatus, Result};
pub use request::GenerationRequest;
pub use response::{FinishReason, RawResponse, Usage};
pub use result::{
    Chunk, ConceptMap, Edge, Flashcard, GenerationResult, MappedSection, Node, SummaryLevel,
};
pub use task::TaskKind;
pub use transport::Transport;

mod config;
mod error;
mod request;
mod response;
mod result;
mod task;
mod transport;
