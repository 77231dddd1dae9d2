//! Prompt side of learnkit.
//!
//! `TemplateStore` holds one `{{TEXT}}` template per task kind,
//! `RequestBuilder` fills a template into a [`lcore::GenerationRequest`],
//! and `ResponseParser` turns the provider's reply into a typed
//! [`lcore::GenerationResult`]. `chunker` splits text locally, without a
//! provider call.

pub use builder::{
    RequestBuilder, default_temperature, examples_input, line_input, qa_input,
};
pub use chunker::{estimated_minutes, local_chunks};
pub use parser::ResponseParser;
pub use template::{MARKER, TemplateStore};

mod builder;
pub mod chunker;
mod json;
mod parser;
mod template;
