//! OpenAI-compatible provider.
//!
//! Covers OpenAI itself and every gateway that speaks the chat completions
//! shape (Gemini's OpenAI endpoint, DeepSeek, OpenRouter, Ollama, ...).

use crate::http::{HttpProvider, endpoint};
use lcore::Result;
use reqwest::Client;
pub use request::{Message, Request};

mod provider;
mod request;

/// The default OpenAI API base URL.
pub const BASE_URL: &str = "https://api.openai.com/v1";

/// Path of the chat completions endpoint under the base URL.
const PATH: &str = "chat/completions";

/// The OpenAI-compatible provider.
#[derive(Clone)]
pub struct OpenAI {
    http: HttpProvider,
}

impl OpenAI {
    /// Create a provider targeting the OpenAI API.
    pub fn api(client: Client, key: &str) -> Result<Self> {
        Self::custom(client, key, BASE_URL)
    }

    /// Create a provider targeting an OpenAI-compatible base URL.
    ///
    /// An empty key skips the `Authorization` header.
    pub fn custom(client: Client, key: &str, base_url: &str) -> Result<Self> {
        let url = endpoint(base_url, PATH);
        let http = if key.is_empty() {
            HttpProvider::no_auth(client, &url)
        } else {
            HttpProvider::bearer(client, key, &url)?
        };
        Ok(Self { http })
    }

    /// The resolved chat completions endpoint.
    pub fn endpoint(&self) -> &str {
        self.http.endpoint()
    }
}
