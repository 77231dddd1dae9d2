//! Claude (Anthropic) provider.
//!
//! Implements the Anthropic Messages API, which differs from the OpenAI
//! chat completions format in authentication, body and reply shape.

use crate::http::{HttpProvider, endpoint};
use lcore::Result;
use reqwest::Client;
pub use request::Request;

mod provider;
mod request;

/// The default Anthropic API base URL.
pub const BASE_URL: &str = "https://api.anthropic.com/v1";

/// Path of the Messages endpoint under the base URL.
const PATH: &str = "messages";

/// The Anthropic API version header value.
const API_VERSION: &str = "2023-06-01";

/// The Claude provider.
#[derive(Clone)]
pub struct Claude {
    http: HttpProvider,
}

impl Claude {
    /// Create a provider targeting the Anthropic API.
    pub fn anthropic(client: Client, key: &str) -> Result<Self> {
        Self::custom(client, key, BASE_URL)
    }

    /// Create a provider targeting a custom Anthropic-compatible base URL.
    pub fn custom(client: Client, key: &str, base_url: &str) -> Result<Self> {
        let http = HttpProvider::custom_headers(
            client,
            &[("x-api-key", key), ("anthropic-version", API_VERSION)],
            &endpoint(base_url, PATH),
        )?;
        Ok(Self { http })
    }

    /// The resolved Messages endpoint.
    pub fn endpoint(&self) -> &str {
        self.http.endpoint()
    }
}
