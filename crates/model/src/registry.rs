//! `ProviderRegistry` — the set of model configurations loaded from
//! `key.json`, swappable as a whole.

use crate::dispatch::{DispatchPolicy, Fallback};
use compact_str::CompactString;
use lcore::{Error, ModelConfig, Result};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::{path::Path, sync::Arc};

/// Read-only set of model configurations with a default selection.
///
/// Readers take a snapshot under a short read lock and never hold it across
/// a provider call. `reload()` and `replace()` swap the whole set at once,
/// so a reader sees either the old or the new set, never a mix.
pub struct ProviderRegistry {
    inner: Arc<RwLock<Arc<Inner>>>,
}

#[derive(Debug)]
struct Inner {
    /// Entries in file order.
    models: Vec<Arc<ModelConfig>>,
    /// Name of the default entry.
    default: CompactString,
    /// What to try when the selected model is exhausted.
    fallback: Option<Fallback>,
    /// Guard, retry and timeout settings from the file.
    policy: DispatchPolicy,
}

/// Info about a single entry returned by `list()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelEntry {
    /// Entry name.
    pub name: CompactString,
    /// Provider-native model identifier.
    pub model: CompactString,
    /// Whether this is the default entry.
    pub default: bool,
}

/// On-disk layout of the provider configuration file.
#[derive(Deserialize)]
struct KeyFile {
    #[serde(default)]
    default: Option<CompactString>,
    #[serde(default)]
    fallback: Option<Fallback>,
    #[serde(default)]
    dispatch: DispatchPolicy,
    #[serde(default)]
    models: Vec<ModelConfig>,
}

impl ProviderRegistry {
    /// Load the registry from a provider configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;
        let registry = Self::from_json(&text)?;
        tracing::info!(
            "loaded {} model(s) from {}",
            registry.len(),
            path.display()
        );
        Ok(registry)
    }

    /// Parse the registry from the JSON text of a provider configuration file.
    pub fn from_json(text: &str) -> Result<Self> {
        let file: KeyFile = serde_json::from_str(text)
            .map_err(|e| Error::Config(format!("invalid provider configuration: {e}")))?;
        let inner = Inner::new(file.models, file.default, file.fallback, file.dispatch)?;
        Ok(Self::wrap(inner))
    }

    /// Create a registry from configs. The first one becomes the default.
    pub fn from_configs(configs: Vec<ModelConfig>) -> Result<Self> {
        let inner = Inner::new(configs, None, None, DispatchPolicy::default())?;
        Ok(Self::wrap(inner))
    }

    /// Set the fallback target, validating it against the current entries.
    pub fn with_fallback(self, fallback: Fallback) -> Result<Self> {
        let current = self.snapshot();
        let inner = Inner::new(
            current.models.iter().map(|m| (**m).clone()).collect(),
            Some(current.default.clone()),
            Some(fallback),
            current.policy.clone(),
        )?;
        self.swap(inner);
        Ok(self)
    }

    /// Select a model by name, or the default when `name` is `None`.
    pub fn select(&self, name: Option<&str>) -> Result<Arc<ModelConfig>> {
        let inner = self.snapshot();
        let name = name.unwrap_or(inner.default.as_str());
        inner
            .find(name)
            .ok_or_else(|| Error::NotFound(CompactString::from(name)))
    }

    /// Look up a model by name.
    pub fn get(&self, name: &str) -> Option<Arc<ModelConfig>> {
        self.snapshot().find(name)
    }

    /// Name of the default entry.
    pub fn default_name(&self) -> CompactString {
        self.snapshot().default.clone()
    }

    /// Configured fallback, if any.
    pub fn fallback(&self) -> Option<Fallback> {
        self.snapshot().fallback.clone()
    }

    /// Dispatch settings from the configuration file.
    pub fn policy(&self) -> DispatchPolicy {
        self.snapshot().policy.clone()
    }

    /// Fallback and dispatch settings, read from one snapshot.
    pub fn dispatch_settings(&self) -> (Option<Fallback>, DispatchPolicy) {
        let inner = self.snapshot();
        (inner.fallback.clone(), inner.policy.clone())
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.snapshot().models.len()
    }

    /// Whether the registry has no entries. Never true for a loaded registry.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// List all entries with their default flag, in file order.
    pub fn list(&self) -> Vec<ModelEntry> {
        let inner = self.snapshot();
        inner
            .models
            .iter()
            .map(|m| ModelEntry {
                name: m.name.clone(),
                model: m.model.clone(),
                default: m.name == inner.default,
            })
            .collect()
    }

    /// Re-read the configuration file and swap it in.
    ///
    /// On error the current set stays in place.
    pub fn reload(&self, path: impl AsRef<Path>) -> Result<()> {
        let fresh = Self::load(path)?;
        self.replace(&fresh);
        Ok(())
    }

    /// Swap in the entries of another registry.
    pub fn replace(&self, other: &ProviderRegistry) {
        let next = other.snapshot();
        *self.inner.write() = next;
    }

    fn wrap(inner: Inner) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(inner))),
        }
    }

    fn swap(&self, inner: Inner) {
        *self.inner.write() = Arc::new(inner);
    }

    fn snapshot(&self) -> Arc<Inner> {
        self.inner.read().clone()
    }
}

impl Inner {
    fn new(
        mut models: Vec<ModelConfig>,
        default: Option<CompactString>,
        fallback: Option<Fallback>,
        policy: DispatchPolicy,
    ) -> Result<Self> {
        if models.is_empty() {
            return Err(Error::Config(
                "at least one model configuration is required".into(),
            ));
        }

        for (index, model) in models.iter_mut().enumerate() {
            model.api_key = expand_env(&model.api_key)?;
            if let Err(e) = model.validate() {
                let reason = match e {
                    Error::Config(reason) => reason,
                    other => other.to_string(),
                };
                return Err(Error::Config(format!("models[{index}]: {reason}")));
            }
        }
        for (index, model) in models.iter().enumerate() {
            if models[..index].iter().any(|m| m.name == model.name) {
                return Err(Error::Config(format!(
                    "duplicate model name '{}'",
                    model.name
                )));
            }
        }

        let default = default.unwrap_or_else(|| models[0].name.clone());
        if !models.iter().any(|m| m.name == default) {
            return Err(Error::Config(format!(
                "default model '{default}' is not configured"
            )));
        }
        if let Some(Fallback::Provider { name }) = &fallback
            && !models.iter().any(|m| m.name == *name)
        {
            return Err(Error::Config(format!(
                "fallback model '{name}' is not configured"
            )));
        }

        Ok(Self {
            models: models.into_iter().map(Arc::new).collect(),
            default,
            fallback,
            policy,
        })
    }

    fn find(&self, name: &str) -> Option<Arc<ModelConfig>> {
        self.models.iter().find(|m| m.name == name).cloned()
    }
}

/// Expand a `${VAR}` API key from the environment. Other values pass through.
fn expand_env(value: &str) -> Result<String> {
    let Some(var) = value
        .trim()
        .strip_prefix("${")
        .and_then(|rest| rest.strip_suffix('}'))
    else {
        return Ok(value.to_owned());
    };
    std::env::var(var)
        .map_err(|_| Error::Config(format!("environment variable '{var}' is not set")))
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.snapshot();
        f.debug_struct("ProviderRegistry")
            .field("default", &inner.default)
            .field("count", &inner.models.len())
            .finish()
    }
}

impl Clone for ProviderRegistry {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}
