//! Shared HTTP transport for the provider adapters.
//!
//! `HttpProvider` wraps a `reqwest::Client` with pre-configured headers and
//! endpoint URL. `post()` sends one JSON body and returns the reply text,
//! translating transport failures and non-success statuses into
//! [`Error::Provider`].

use lcore::{Error, ProviderStatus, Result};
use reqwest::{
    Client, Method,
    header::{self, HeaderMap, HeaderName, HeaderValue},
};
use serde::Serialize;
use serde_json::{Map, Value};

/// Longest provider error body echoed back in an error message.
const MAX_ERROR_BODY: usize = 512;

/// Shared HTTP transport.
///
/// Holds a `reqwest::Client` (cheap to clone, shares the connection pool),
/// pre-built headers (auth + content-type), and the target endpoint URL.
#[derive(Clone)]
pub struct HttpProvider {
    client: Client,
    headers: HeaderMap,
    endpoint: String,
}

impl HttpProvider {
    /// Create a provider with Bearer token authentication.
    pub fn bearer(client: Client, key: &str, endpoint: &str) -> Result<Self> {
        let mut headers = json_headers();
        let value = format!("Bearer {key}")
            .parse::<HeaderValue>()
            .map_err(|e| Error::Config(format!("invalid api key: {e}")))?;
        headers.insert(header::AUTHORIZATION, value);
        Ok(Self {
            client,
            headers,
            endpoint: endpoint.to_owned(),
        })
    }

    /// Create a provider without authentication (e.g. a local Ollama).
    pub fn no_auth(client: Client, endpoint: &str) -> Self {
        Self {
            client,
            headers: json_headers(),
            endpoint: endpoint.to_owned(),
        }
    }

    /// Create a provider with custom authentication headers.
    ///
    /// Used by providers that don't use Bearer tokens (e.g. Anthropic
    /// uses `x-api-key` plus a version header).
    pub fn custom_headers(client: Client, pairs: &[(&str, &str)], endpoint: &str) -> Result<Self> {
        let mut headers = json_headers();
        for (name, value) in pairs {
            let header_name = name
                .parse::<HeaderName>()
                .map_err(|e| Error::Config(format!("invalid header name '{name}': {e}")))?;
            let header_value = value
                .parse::<HeaderValue>()
                .map_err(|e| Error::Config(format!("invalid value for header '{name}': {e}")))?;
            headers.insert(header_name, header_value);
        }
        Ok(Self {
            client,
            headers,
            endpoint: endpoint.to_owned(),
        })
    }

    /// POST a JSON body and return the reply text of a 2xx response.
    pub async fn post(&self, body: &impl Serialize) -> Result<String> {
        if let Ok(body) = serde_json::to_string(body) {
            tracing::trace!("request: {body}");
        }
        let response = self
            .client
            .request(Method::POST, &self.endpoint)
            .headers(self.headers.clone())
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let text = response.text().await.map_err(transport_error)?;
        tracing::trace!("response ({status}): {text}");

        if !status.is_success() {
            return Err(Error::provider(
                ProviderStatus::Http(status.as_u16()),
                error_message(&text),
            ));
        }
        Ok(text)
    }

    /// Get the endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Get a reference to the headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}

/// Join a base URL and an API path, tolerating a trailing slash and a base
/// that already names the full endpoint.
pub(crate) fn endpoint(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    if base.ends_with(path) {
        base.to_owned()
    } else {
        format!("{base}/{path}")
    }
}

/// Serialize `body` and merge `extra` over its top-level fields.
///
/// Extras win on key collisions; they are passed through uninterpreted.
pub(crate) fn with_extra(body: &impl Serialize, extra: &Map<String, Value>) -> Value {
    let mut value = serde_json::to_value(body).unwrap_or(Value::Null);
    if let Value::Object(map) = &mut value {
        map.extend(extra.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    value
}

fn json_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
    headers
}

fn transport_error(e: reqwest::Error) -> Error {
    let status = if e.is_timeout() {
        ProviderStatus::Timeout
    } else {
        ProviderStatus::Transport
    };
    Error::provider(status, e.to_string())
}

/// Pull `error.message` out of an error body, or echo a bounded prefix.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.pointer("/error/message")
                .and_then(Value::as_str)
                .map(str::to_owned)
        })
        .unwrap_or_else(|| body.chars().take(MAX_ERROR_BODY).collect())
}
