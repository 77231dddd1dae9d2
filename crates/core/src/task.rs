//! Task kinds — the fixed set of learning operations.

use crate::Error;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// One of the learning operations the engine can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    /// Plain-text summary of the input.
    Summary,
    /// Graph of concepts and their relationships.
    ConceptMap,
    /// Learner-sized segments with estimated study time.
    #[serde(alias = "chunk")]
    Chunking,
    /// Question/answer cards.
    #[serde(alias = "flashcards")]
    Flashcard,
    /// Answer to a question about a context.
    Qa,
    /// Analytical explanation of a single line.
    LineExplanation,
    /// Concrete examples for a concept.
    #[serde(alias = "examples")]
    Example,
    /// Multi-level summary with mappings back to the source.
    SummaryTree,
}

impl TaskKind {
    /// Every task kind, in declaration order.
    pub const ALL: [TaskKind; 8] = [
        Self::Summary,
        Self::ConceptMap,
        Self::Chunking,
        Self::Flashcard,
        Self::Qa,
        Self::LineExplanation,
        Self::Example,
        Self::SummaryTree,
    ];

    /// Canonical name, also the template file stem.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::ConceptMap => "concept_map",
            Self::Chunking => "chunking",
            Self::Flashcard => "flashcard",
            Self::Qa => "qa",
            Self::LineExplanation => "line_explanation",
            Self::Example => "example",
            Self::SummaryTree => "summary_tree",
        }
    }

    /// Whether the provider is asked for JSON rather than prose.
    pub fn is_structured(self) -> bool {
        matches!(
            self,
            Self::ConceptMap | Self::Chunking | Self::Flashcard | Self::SummaryTree
        )
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "summary" | "summaries" => Self::Summary,
            "concept_map" | "concept_maps" | "concepts" => Self::ConceptMap,
            "chunking" | "chunk" | "chunks" => Self::Chunking,
            "flashcard" | "flashcards" => Self::Flashcard,
            "qa" | "q&a" | "question" | "questions" => Self::Qa,
            "line_explanation" | "explain_line" | "explanation" => Self::LineExplanation,
            "example" | "examples" => Self::Example,
            "summary_tree" | "summaries_tree" => Self::SummaryTree,
            _ => return Err(Error::UnknownTask(s.to_owned())),
        };
        Ok(kind)
    }
}
