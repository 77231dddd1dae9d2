//! Error taxonomy shared by every learnkit crate.

use crate::TaskKind;
use compact_str::CompactString;
use std::fmt;

/// Result alias using the learnkit [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Every failure the engine reports to its caller.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Bad or missing provider, template or feature configuration.
    #[error("config: {0}")]
    Config(String),

    /// No template is registered for the requested task kind.
    #[error("unknown task '{0}'")]
    UnknownTask(String),

    /// No model configuration matches the requested name.
    #[error("model '{0}' not found")]
    NotFound(CompactString),

    /// The task kind is switched off in the feature configuration.
    #[error("task '{0}' is disabled")]
    Disabled(TaskKind),

    /// The input would not fit the model's budget; nothing was sent.
    #[error("input too large: {chars} characters exceeds the limit of {limit}")]
    InputTooLarge { chars: usize, limit: usize },

    /// The provider call failed (after retries, when transient).
    #[error("provider error ({status}): {message}")]
    Provider {
        status: ProviderStatus,
        message: String,
    },

    /// No JSON value could be recovered from the provider reply.
    #[error("malformed {task} response")]
    MalformedResponse { task: TaskKind, raw: String },

    /// The reply decoded but does not have the shape the task expects.
    #[error("{task} response does not match schema: {reason}")]
    SchemaMismatch { task: TaskKind, reason: String },
}

impl Error {
    /// Shorthand for a provider error.
    pub fn provider(status: ProviderStatus, message: impl Into<String>) -> Self {
        Self::Provider {
            status,
            message: message.into(),
        }
    }

    /// Shorthand for a schema mismatch.
    pub fn schema(task: TaskKind, reason: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            task,
            reason: reason.into(),
        }
    }

    /// Whether the dispatcher may retry after this error.
    ///
    /// Only timeouts, transport failures, rate limits (429) and server
    /// errors (5xx) are transient.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Provider { status, .. } => status.is_transient(),
            _ => false,
        }
    }
}

/// Status attached to a [`Error::Provider`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderStatus {
    /// The provider answered with a non-success HTTP status.
    Http(u16),
    /// The attempt exceeded the configured timeout.
    Timeout,
    /// The request never completed (connect, DNS, body read, ...).
    Transport,
    /// The provider answered 2xx but the envelope was unreadable.
    InvalidBody,
}

impl ProviderStatus {
    /// Whether a retry may succeed.
    pub fn is_transient(self) -> bool {
        match self {
            Self::Http(code) => code == 429 || (500..600).contains(&code),
            Self::Timeout | Self::Transport => true,
            Self::InvalidBody => false,
        }
    }
}

impl fmt::Display for ProviderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(code) => write!(f, "{code}"),
            Self::Timeout => f.write_str("timeout"),
            Self::Transport => f.write_str("transport"),
            Self::InvalidBody => f.write_str("invalid body"),
        }
    }
}
