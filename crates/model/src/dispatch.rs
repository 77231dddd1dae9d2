//! `Dispatcher` — sends a built request through a [`Transport`] with an
//! input guard, per-attempt timeout, retry with exponential backoff, and an
//! optional fallback target.
//!
//! Per request: `Built → Sent → {Succeeded | Retrying → Sent | Failed}`.
//! Only transient provider errors (timeout, transport, 429, 5xx) enter
//! `Retrying`; everything else goes straight to `Failed`.

use crate::{HttpTransport, ProviderRegistry};
use compact_str::CompactString;
use lcore::{
    Error, GenerationRequest, ModelConfig, ProviderStatus, RawResponse, Result, Transport,
};
use serde::{Deserialize, Serialize};
use std::{fmt, sync::Arc, time::Duration};

/// Guard, retry and timeout settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchPolicy {
    /// Attempts per target, including the first. Values below 1 count as 1.
    pub max_attempts: u32,
    /// Delay before the first retry; doubles on every further retry.
    pub base_delay_ms: u64,
    /// Upper bound for a single backoff delay.
    pub max_delay_ms: u64,
    /// Maximum wait for a single attempt.
    pub timeout_secs: u64,
    /// Input characters allowed per completion token. `0` disables the guard.
    pub input_char_multiple: usize,
}

impl Default for DispatchPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 500,
            max_delay_ms: 8_000,
            timeout_secs: 60,
            input_char_multiple: 100,
        }
    }
}

impl DispatchPolicy {
    /// Per-attempt timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Delay after the `attempt`-th failed attempt (1-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u64 << attempt.saturating_sub(1).min(20);
        Duration::from_millis(
            self.base_delay_ms
                .saturating_mul(factor)
                .min(self.max_delay_ms),
        )
    }

    /// Largest accepted input, in characters, for a model.
    pub fn input_limit(&self, config: &ModelConfig) -> Option<usize> {
        (self.input_char_multiple > 0).then(|| {
            self.input_char_multiple
                .saturating_mul(config.max_completion_tokens)
        })
    }
}

/// What to try once the selected model has exhausted its retries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Fallback {
    /// Same provider entry (key, endpoint) with another model identifier.
    SameProvider { model: CompactString },
    /// Another registry entry.
    Provider { name: CompactString },
}

#[derive(Debug, Clone, Copy)]
enum Phase {
    Built,
    Sent,
    Retrying,
    Succeeded,
    Failed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Built => "built",
            Self::Sent => "sent",
            Self::Retrying => "retrying",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        })
    }
}

/// Sends generation requests.
///
/// Holds no mutable state of its own; share it behind an `Arc` or clone it
/// (clones share the transport's connection pool and the registry).
///
/// Unless overridden, the policy and fallback are read from the registry on
/// every send, so a reloaded key file applies as a whole.
#[derive(Clone)]
pub struct Dispatcher<T = HttpTransport> {
    transport: T,
    registry: ProviderRegistry,
    policy: Option<DispatchPolicy>,
}

impl Dispatcher<HttpTransport> {
    /// Dispatcher over HTTP with the registry's policy.
    pub fn http(registry: ProviderRegistry) -> Self {
        Self::new(HttpTransport::new(), registry)
    }
}

impl<T: Transport> Dispatcher<T> {
    /// Create a dispatcher using the policy from the registry's file.
    pub fn new(transport: T, registry: ProviderRegistry) -> Self {
        Self {
            transport,
            registry,
            policy: None,
        }
    }

    /// Override the dispatch policy, ignoring the registry's.
    pub fn with_policy(mut self, policy: DispatchPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    /// The policy the next send uses.
    pub fn policy(&self) -> DispatchPolicy {
        match &self.policy {
            Some(policy) => policy.clone(),
            None => self.registry.policy(),
        }
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send a request and return the raw reply.
    ///
    /// Fails with [`Error::InputTooLarge`] before any network call when the
    /// input exceeds the guard, and with [`Error::Provider`] once retries
    /// (and the fallback, if configured) are exhausted.
    pub async fn send(&self, request: &GenerationRequest) -> Result<RawResponse> {
        tracing::debug!(
            "{} {} request for '{}'",
            Phase::Built,
            request.task,
            request.config.name
        );
        let (fallback, policy) = self.registry.dispatch_settings();
        let policy = self.policy.clone().unwrap_or(policy);
        guard(&policy, request)?;

        let mut attempts = 0;
        let err = match self.run(&policy, request, &mut attempts).await {
            Ok(raw) => return Ok(raw),
            Err(e) => e,
        };
        if !err.is_transient() {
            return Err(err);
        }

        let Some(target) = fallback.and_then(|f| self.fallback_for(f, &request.config)) else {
            return Err(err);
        };
        tracing::warn!(
            "'{}' exhausted after {attempts} attempt(s) ({err}); falling back to '{}' ({})",
            request.config.name,
            target.name,
            target.model
        );
        let retargeted = request.with_config(target);
        guard(&policy, &retargeted)?;
        self.run(&policy, &retargeted, &mut attempts).await
    }

    /// Attempt one target until success, a permanent error, or exhaustion.
    async fn run(
        &self,
        policy: &DispatchPolicy,
        request: &GenerationRequest,
        attempts: &mut u32,
    ) -> Result<RawResponse> {
        let max = policy.max_attempts.max(1);
        let timeout = policy.timeout();
        let mut attempt = 0;
        loop {
            attempt += 1;
            *attempts += 1;
            tracing::debug!(
                "{} {} attempt {attempt}/{max} to '{}'",
                Phase::Sent,
                request.task,
                request.config.name
            );

            let outcome = match tokio::time::timeout(timeout, self.transport.send(request)).await
            {
                Ok(outcome) => outcome,
                Err(_) => Err(Error::provider(
                    ProviderStatus::Timeout,
                    format!("no reply within {timeout:?}"),
                )),
            };

            match outcome {
                Ok(mut raw) => {
                    raw.attempts = *attempts;
                    if raw.provider.is_empty() {
                        raw.provider = request.config.name.clone();
                    }
                    tracing::info!(
                        "{} {} via '{}' in {} attempt(s), {} tokens",
                        Phase::Succeeded,
                        request.task,
                        raw.provider,
                        raw.attempts,
                        raw.usage.total_tokens
                    );
                    return Ok(raw);
                }
                Err(e) if e.is_transient() && attempt < max => {
                    let delay = policy.backoff(attempt);
                    tracing::warn!(
                        "{} {} after attempt {attempt}/{max} to '{}': {e}; next in {delay:?}",
                        Phase::Retrying,
                        request.task,
                        request.config.name
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    tracing::warn!(
                        "{} {} after attempt {attempt}/{max} to '{}': {e}",
                        Phase::Failed,
                        request.task,
                        request.config.name
                    );
                    return Err(e);
                }
            }
        }
    }

    /// Resolve the fallback target for a config, if it differs from it.
    fn fallback_for(
        &self,
        fallback: Fallback,
        config: &Arc<ModelConfig>,
    ) -> Option<Arc<ModelConfig>> {
        match fallback {
            Fallback::SameProvider { model } => (model != config.model).then(|| {
                Arc::new(ModelConfig {
                    model,
                    ..(**config).clone()
                })
            }),
            Fallback::Provider { name } => {
                if name == config.name {
                    return None;
                }
                self.registry.get(&name)
            }
        }
    }
}

/// Reject inputs that exceed the model's character budget.
fn guard(policy: &DispatchPolicy, request: &GenerationRequest) -> Result<()> {
    let Some(limit) = policy.input_limit(&request.config) else {
        return Ok(());
    };
    let chars = request.input_chars();
    if chars > limit {
        tracing::warn!(
            "{} input of {chars} characters rejected for '{}' (limit {limit})",
            request.task,
            request.config.name
        );
        return Err(Error::InputTooLarge { chars, limit });
    }
    Ok(())
}
