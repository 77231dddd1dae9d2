//! Provider implementation.
//!
//! Unified `Provider` enum with enum dispatch over the concrete wire shapes.
//! `build_provider()` matches on the `ApiShape` resolved from the model
//! configuration. `HttpTransport` is the production [`Transport`]: one
//! shared `reqwest::Client`, a provider built per request.

use crate::{claude::Claude, openai::OpenAI};
use lcore::{ApiShape, GenerationRequest, ModelConfig, RawResponse, Result, Transport};
use reqwest::Client;

/// Unified LLM provider enum.
#[derive(Clone)]
pub enum Provider {
    /// OpenAI-compatible chat completions API.
    OpenAI(OpenAI),
    /// Anthropic Messages API.
    Claude(Claude),
}

impl Provider {
    /// Send one request to this provider.
    pub async fn send(&self, request: &GenerationRequest) -> Result<RawResponse> {
        match self {
            Self::OpenAI(p) => p.send(request).await,
            Self::Claude(p) => p.send(request).await,
        }
    }

    /// The endpoint this provider posts to.
    pub fn endpoint(&self) -> &str {
        match self {
            Self::OpenAI(p) => p.endpoint(),
            Self::Claude(p) => p.endpoint(),
        }
    }
}

/// Construct a `Provider` from config and a shared HTTP client.
pub fn build_provider(config: &ModelConfig, client: Client) -> Result<Provider> {
    let key = config.api_key.as_str();
    let base_url = config.base_url.as_deref();

    let provider = match config.shape() {
        ApiShape::OpenAI => match base_url {
            Some(url) => Provider::OpenAI(OpenAI::custom(client, key, url)?),
            None => Provider::OpenAI(OpenAI::api(client, key)?),
        },
        ApiShape::Anthropic => match base_url {
            Some(url) => Provider::Claude(Claude::custom(client, key, url)?),
            None => Provider::Claude(Claude::anthropic(client, key)?),
        },
    };
    Ok(provider)
}

/// HTTP transport over a shared connection pool.
///
/// Cloning shares the pool. Safe for concurrent use.
#[derive(Clone, Default)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a transport with a fresh client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport over an existing client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: &GenerationRequest) -> Result<RawResponse> {
        let provider = build_provider(&request.config, self.client.clone())?;
        tracing::debug!(
            "posting {} request for '{}' to {}",
            request.task,
            request.config.name,
            provider.endpoint()
        );
        provider.send(request).await
    }
}
