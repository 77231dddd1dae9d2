//! Send implementation for the Claude (Anthropic) provider.

use super::{Claude, Request};
use compact_str::CompactString;
use lcore::{Error, FinishReason, GenerationRequest, ProviderStatus, RawResponse, Result, Usage};
use serde::Deserialize;

/// Raw Anthropic non-streaming response.
#[derive(Deserialize)]
struct AnthropicResponse {
    #[serde(default)]
    model: Option<CompactString>,
    #[serde(default)]
    content: Vec<ContentBlock>,
    #[serde(default)]
    stop_reason: Option<CompactString>,
    #[serde(default)]
    usage: AnthropicUsage,
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(other)]
    Other,
}

#[derive(Deserialize, Default)]
struct AnthropicUsage {
    #[serde(default)]
    input_tokens: u32,
    #[serde(default)]
    output_tokens: u32,
}

impl Claude {
    /// Send one Messages request.
    pub async fn send(&self, req: &GenerationRequest) -> Result<RawResponse> {
        let body = Request::from(req).body();
        let text = self.http.post(&body).await?;
        let raw: AnthropicResponse = serde_json::from_str(&text).map_err(|e| {
            Error::provider(
                ProviderStatus::InvalidBody,
                format!("unreadable anthropic response: {e}"),
            )
        })?;
        Ok(to_response(raw, req))
    }
}

/// Convert an Anthropic response to the unified [`RawResponse`].
fn to_response(raw: AnthropicResponse, req: &GenerationRequest) -> RawResponse {
    let mut text = String::new();
    for block in raw.content {
        if let ContentBlock::Text { text: part } = block {
            if !text.is_empty() {
                text.push('\n');
            }
            text.push_str(&part);
        }
    }

    let finish_reason = raw.stop_reason.as_deref().map(|r| match r {
        "end_turn" | "stop_sequence" => FinishReason::Stop,
        "max_tokens" => FinishReason::Length,
        "refusal" => FinishReason::ContentFilter,
        _ => FinishReason::Other,
    });

    RawResponse {
        text,
        usage: Usage {
            prompt_tokens: raw.usage.input_tokens,
            completion_tokens: raw.usage.output_tokens,
            total_tokens: raw.usage.input_tokens.saturating_add(raw.usage.output_tokens),
        },
        model: raw.model.unwrap_or_else(|| req.config.model.clone()),
        finish_reason,
        provider: req.config.name.clone(),
        attempts: 0,
    }
}
