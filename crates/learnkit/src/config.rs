//! Feature configuration (`config.json`).
//!
//! Only `features.<name>.enabled` matters here; UI keys such as colours are
//! ignored. Names go through [`TaskKind`]'s parser, so `flashcards` and
//! `flashcard` are the same feature.

use lcore::{Error, Result, TaskKind};
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, BTreeSet},
    path::Path,
};

/// Parsed feature configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Feature switches by name.
    #[serde(default)]
    pub features: BTreeMap<String, Feature>,
}

/// One feature switch.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Feature {
    /// Whether the feature is offered.
    #[serde(default = "enabled")]
    pub enabled: bool,
}

fn enabled() -> bool {
    true
}

impl AppConfig {
    /// Load the feature configuration from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;
        Self::from_json(&text)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), reason(e))))
    }

    /// Parse the feature configuration from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map_err(|e| Error::Config(format!("invalid feature configuration: {e}")))
    }

    /// The task kinds that are switched on.
    ///
    /// Task kinds without an entry stay enabled; entries that name no task
    /// kind are ignored.
    pub fn allowed(&self) -> BTreeSet<TaskKind> {
        let mut allowed: BTreeSet<_> = TaskKind::ALL.into_iter().collect();
        for (name, feature) in &self.features {
            let Ok(task) = name.parse::<TaskKind>() else {
                tracing::debug!("ignoring feature '{name}': not a task kind");
                continue;
            };
            if !feature.enabled {
                allowed.remove(&task);
            }
        }
        allowed
    }
}

fn reason(e: Error) -> String {
    match e {
        Error::Config(reason) => reason,
        other => other.to_string(),
    }
}
