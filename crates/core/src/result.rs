//! Typed generation results, one variant per task kind.

use crate::TaskKind;
use serde::{Deserialize, Serialize};

/// The parsed outcome of one generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "task", content = "data", rename_all = "snake_case")]
pub enum GenerationResult {
    /// Plain-text summary.
    Summary(String),
    /// Concept graph.
    ConceptMap(ConceptMap),
    /// Learner-sized chunks.
    ChunkList(Vec<Chunk>),
    /// Flashcards.
    FlashcardList(Vec<Flashcard>),
    /// Answer to a question.
    QaAnswer(String),
    /// Explanation of a line.
    LineExplanation(String),
    /// Generated examples.
    Examples(String),
    /// Multi-level summary.
    SummaryTree(Vec<SummaryLevel>),
}

impl GenerationResult {
    /// The task kind this result answers.
    pub fn task(&self) -> TaskKind {
        match self {
            Self::Summary(_) => TaskKind::Summary,
            Self::ConceptMap(_) => TaskKind::ConceptMap,
            Self::ChunkList(_) => TaskKind::Chunking,
            Self::FlashcardList(_) => TaskKind::Flashcard,
            Self::QaAnswer(_) => TaskKind::Qa,
            Self::LineExplanation(_) => TaskKind::LineExplanation,
            Self::Examples(_) => TaskKind::Example,
            Self::SummaryTree(_) => TaskKind::SummaryTree,
        }
    }

    /// Wrap provider prose in the variant for a text task.
    ///
    /// Returns `None` for structured tasks.
    pub fn text(task: TaskKind, text: String) -> Option<Self> {
        match task {
            TaskKind::Summary => Some(Self::Summary(text)),
            TaskKind::Qa => Some(Self::QaAnswer(text)),
            TaskKind::LineExplanation => Some(Self::LineExplanation(text)),
            TaskKind::Example => Some(Self::Examples(text)),
            _ => None,
        }
    }

    /// The prose of a text result.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Summary(t) | Self::QaAnswer(t) | Self::LineExplanation(t) | Self::Examples(t) => {
                Some(t)
            }
            _ => None,
        }
    }
}

/// A graph of concepts (nodes) and labeled directed relationships (edges).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConceptMap {
    /// Concepts, unique by id.
    pub nodes: Vec<Node>,
    /// Relationships between existing nodes.
    pub edges: Vec<Edge>,
}

impl ConceptMap {
    /// Look up a node by id.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

/// A concept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A directed relationship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub label: String,
}

/// A learner-sized segment of the source text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub title: String,
    pub content: String,
    /// Estimated study time in minutes. Always positive.
    pub estimated_time: f64,
}

/// A question/answer card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub question: String,
    pub answer: String,
}

/// One level of a summary tree, most abstract first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryLevel {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub mapped_sections: Vec<MappedSection>,
}

/// An excerpt of the original text a summary level points back to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappedSection {
    pub title: String,
    pub content: String,
}
