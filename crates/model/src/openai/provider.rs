//! Send implementation for the OpenAI-compatible provider.

use super::{OpenAI, Request};
use compact_str::CompactString;
use lcore::{Error, FinishReason, GenerationRequest, ProviderStatus, RawResponse, Result, Usage};
use serde::Deserialize;

/// Raw chat completions response.
#[derive(Deserialize)]
struct Completion {
    #[serde(default)]
    model: Option<CompactString>,
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
    #[serde(default)]
    finish_reason: Option<FinishReason>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAI {
    /// Send one chat completion request.
    pub async fn send(&self, req: &GenerationRequest) -> Result<RawResponse> {
        let body = Request::from(req).body();
        let text = self.http.post(&body).await?;
        let completion: Completion = serde_json::from_str(&text).map_err(|e| {
            Error::provider(
                ProviderStatus::InvalidBody,
                format!("unreadable completion: {e}"),
            )
        })?;

        let Some(choice) = completion.choices.into_iter().next() else {
            return Err(Error::provider(
                ProviderStatus::InvalidBody,
                "completion has no choices",
            ));
        };
        let Some(content) = choice.message.content else {
            return Err(Error::provider(
                ProviderStatus::InvalidBody,
                "completion has no message content",
            ));
        };

        Ok(RawResponse {
            text: content,
            usage: completion.usage.unwrap_or_default(),
            model: completion.model.unwrap_or_else(|| req.config.model.clone()),
            finish_reason: choice.finish_reason,
            provider: req.config.name.clone(),
            attempts: 0,
        })
    }
}
