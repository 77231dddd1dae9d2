//! Raw provider response, normalized across wire shapes.

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// The textual payload of a provider reply plus metadata.
#[derive(Debug, Clone, Default)]
pub struct RawResponse {
    /// Message content, handed to the response parser.
    pub text: String,
    /// Token usage reported by the provider.
    pub usage: Usage,
    /// Model identifier reported by the provider (or requested).
    pub model: CompactString,
    /// Why the provider stopped generating.
    pub finish_reason: Option<FinishReason>,
    /// Name of the registry entry that served the call.
    pub provider: CompactString,
    /// Number of attempts the dispatcher made, including the successful one.
    pub attempts: u32,
}

/// Token usage statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Tokens in the prompt.
    #[serde(default)]
    pub prompt_tokens: u32,
    /// Tokens in the completion.
    #[serde(default)]
    pub completion_tokens: u32,
    /// Total tokens consumed.
    #[serde(default)]
    pub total_tokens: u32,
}

/// The reason the model stopped generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// The model finished naturally.
    Stop,
    /// The model hit the token limit.
    Length,
    /// Content was filtered.
    ContentFilter,
    /// Any other provider-specific reason.
    #[serde(other)]
    Other,
}
