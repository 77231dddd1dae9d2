//! Provider side of learnkit.
//!
//! `ProviderRegistry` loads the model configurations from `key.json` and
//! hands out immutable snapshots. `Provider` wraps the concrete wire shapes
//! (OpenAI-compatible, Anthropic) behind one `send`, `HttpTransport` builds
//! providers on top of a shared connection pool, and `Dispatcher` adds the
//! input guard, per-attempt timeout, retry with backoff and fallback.

pub use claude::Claude;
pub use dispatch::{DispatchPolicy, Dispatcher, Fallback};
pub use http::HttpProvider;
pub use openai::OpenAI;
pub use provider::{HttpTransport, Provider, build_provider};
pub use registry::{ModelEntry, ProviderRegistry};
pub use reqwest::{self, Client};

pub mod claude;
mod dispatch;
mod http;
pub mod openai;
mod provider;
mod registry;
