//! Prompt templates, one per task kind.
//!
//! The built-in set lives in `prompts/*.txt` and is compiled in via
//! `include_str!`. A directory of `<task>.txt` files can be overlaid on top.

use lcore::{Error, Result, TaskKind};
use std::{collections::BTreeMap, path::Path};

/// The substitution marker every template carries exactly once.
pub const MARKER: &str = "{{TEXT}}";

const SUMMARY: &str = include_str!("../prompts/summary.txt");
const CONCEPT_MAP: &str = include_str!("../prompts/concept_map.txt");
const CHUNKING: &str = include_str!("../prompts/chunking.txt");
const FLASHCARD: &str = include_str!("../prompts/flashcard.txt");
const QA: &str = include_str!("../prompts/qa.txt");
const LINE_EXPLANATION: &str = include_str!("../prompts/line_explanation.txt");
const EXAMPLE: &str = include_str!("../prompts/example.txt");
const SUMMARY_TREE: &str = include_str!("../prompts/summary_tree.txt");

/// Read-only map from task kind to template text.
#[derive(Debug, Clone, Default)]
pub struct TemplateStore {
    templates: BTreeMap<TaskKind, String>,
}

impl TemplateStore {
    /// The templates shipped with the crate, one per task kind.
    pub fn builtin() -> Self {
        let templates = TaskKind::ALL
            .into_iter()
            .map(|task| (task, builtin_template(task).to_owned()))
            .collect();
        Self { templates }
    }

    /// A store with no templates.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in templates overlaid with the `<task>.txt` files in `dir`.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let mut store = Self::builtin();
        store.overlay_dir(dir)?;
        Ok(store)
    }

    /// Overlay `<task>.txt` files from `dir`, returning how many were read.
    ///
    /// File stems go through [`TaskKind`]'s parser, so aliases such as
    /// `chunk.txt` are accepted. Other files are skipped.
    pub fn overlay_dir(&mut self, dir: impl AsRef<Path>) -> Result<usize> {
        let dir = dir.as_ref();
        let entries = std::fs::read_dir(dir).map_err(|e| {
            Error::Config(format!("failed to read template dir {}: {e}", dir.display()))
        })?;

        let mut count = 0;
        for entry in entries {
            let path = entry
                .map_err(|e| Error::Config(format!("failed to list {}: {e}", dir.display())))?
                .path();
            if path.extension().and_then(|e| e.to_str()) != Some("txt") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let Ok(task) = stem.parse::<TaskKind>() else {
                tracing::debug!("skipping {}: not a task template", path.display());
                continue;
            };

            let text = std::fs::read_to_string(&path)
                .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;
            self.insert(task, text).map_err(|e| match e {
                Error::Config(reason) => Error::Config(format!("{}: {reason}", path.display())),
                other => other,
            })?;
            tracing::debug!("loaded {task} template from {}", path.display());
            count += 1;
        }
        tracing::info!("loaded {count} template(s) from {}", dir.display());
        Ok(count)
    }

    /// Register a template, replacing any previous one for the task.
    ///
    /// Fails with [`Error::Config`] unless the text holds exactly one marker.
    pub fn insert(&mut self, task: TaskKind, template: impl Into<String>) -> Result<()> {
        let template = template.into();
        let markers = template.matches(MARKER).count();
        if markers != 1 {
            return Err(Error::Config(format!(
                "{task} template must contain exactly one {MARKER} marker, found {markers}"
            )));
        }
        self.templates.insert(task, template);
        Ok(())
    }

    /// The template for a task kind.
    pub fn get(&self, task: TaskKind) -> Option<&str> {
        self.templates.get(&task).map(String::as_str)
    }

    /// Task kinds with a registered template, in declaration order.
    pub fn tasks(&self) -> impl Iterator<Item = TaskKind> + '_ {
        self.templates.keys().copied()
    }

    /// Number of registered templates.
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Whether no template is registered.
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

fn builtin_template(task: TaskKind) -> &'static str {
    match task {
        TaskKind::Summary => SUMMARY,
        TaskKind::ConceptMap => CONCEPT_MAP,
        TaskKind::Chunking => CHUNKING,
        TaskKind::Flashcard => FLASHCARD,
        TaskKind::Qa => QA,
        TaskKind::LineExplanation => LINE_EXPLANATION,
        TaskKind::Example => EXAMPLE,
        TaskKind::SummaryTree => SUMMARY_TREE,
    }
}
