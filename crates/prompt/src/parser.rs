//! `ResponseParser` — provider text to typed [`GenerationResult`].
//!
//! Text tasks pass the trimmed reply through. Structured tasks recover the
//! outermost JSON values (see `json`) and keep the first that validates
//! against the task's shape. Chunk and flashcard lists follow a
//! partial-success policy: items that do not conform are dropped with a
//! warning, and only an empty result fails.

use crate::{chunker::estimated_minutes, json};
use lcore::{
    Chunk, ConceptMap, Edge, Error, Flashcard, GenerationResult, Node, Result, SummaryLevel,
    TaskKind,
};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Parses provider replies. Stateless.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseParser;

impl ResponseParser {
    /// Create a parser.
    pub fn new() -> Self {
        Self
    }

    /// Parse the raw reply for `task`.
    pub fn parse(&self, task: TaskKind, raw: &str) -> Result<GenerationResult> {
        if !task.is_structured() {
            let text = raw.trim();
            if text.is_empty() {
                return Err(malformed(task, raw));
            }
            return GenerationResult::text(task, text.to_owned())
                .ok_or_else(|| Error::UnknownTask(task.to_string()));
        }

        let candidates = json::candidates(raw);
        if candidates.is_empty() {
            return Err(malformed(task, raw));
        }

        // The first candidate that validates wins. Otherwise report the
        // first object's error, which is usually the intended payload.
        let mut object_error = None;
        let mut first_error = None;
        for value in candidates {
            let is_object = value.is_object();
            match structured(task, value) {
                Ok(result) => return Ok(result),
                Err(e) if is_object => {
                    object_error.get_or_insert(e);
                }
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }
        Err(object_error
            .or(first_error)
            .unwrap_or_else(|| malformed(task, raw)))
    }

    /// Like [`parse`](Self::parse), with the task kind given by name.
    pub fn parse_named(&self, task: &str, raw: &str) -> Result<GenerationResult> {
        self.parse(task.parse()?, raw)
    }
}

fn structured(task: TaskKind, value: Value) -> Result<GenerationResult> {
    match task {
        TaskKind::ConceptMap => concept_map(value).map(GenerationResult::ConceptMap),
        TaskKind::Chunking => chunks(value).map(GenerationResult::ChunkList),
        TaskKind::Flashcard => flashcards(value).map(GenerationResult::FlashcardList),
        TaskKind::SummaryTree => summary_tree(value).map(GenerationResult::SummaryTree),
        _ => Err(Error::UnknownTask(task.to_string())),
    }
}

fn malformed(task: TaskKind, raw: &str) -> Error {
    tracing::warn!("no usable {task} content in provider reply ({} chars)", raw.len());
    Error::MalformedResponse {
        task,
        raw: raw.to_owned(),
    }
}

/// The list under `key`, or the value itself when it is a bare array.
fn list(task: TaskKind, value: Value, key: &str) -> Result<Vec<Value>> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => match map.remove(key) {
            Some(Value::Array(items)) => Ok(items),
            Some(_) => Err(Error::schema(task, format!("'{key}' is not an array"))),
            None => Err(Error::schema(task, format!("missing '{key}' array"))),
        },
        _ => Err(Error::schema(task, format!("expected an object with '{key}'"))),
    }
}

#[derive(Deserialize)]
struct WireNode {
    #[serde(deserialize_with = "id")]
    id: String,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Deserialize)]
struct WireEdge {
    #[serde(deserialize_with = "id", alias = "from")]
    source: String,
    #[serde(deserialize_with = "id", alias = "to")]
    target: String,
    #[serde(default)]
    label: Option<String>,
}

/// Node ids as strings; models sometimes emit them as numbers.
fn id<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(serde_json::Number),
    }
    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}

fn concept_map(value: Value) -> Result<ConceptMap> {
    let task = TaskKind::ConceptMap;
    let Value::Object(mut map) = value else {
        return Err(Error::schema(task, "expected an object with 'nodes' and 'edges'"));
    };
    let nodes = required_array(task, &mut map, "nodes")?;
    let edges = required_array(task, &mut map, "edges")?;

    let mut ids = HashSet::new();
    let mut out = ConceptMap::default();
    for (i, node) in nodes.into_iter().enumerate() {
        let node: WireNode = serde_json::from_value(node)
            .map_err(|e| Error::schema(task, format!("nodes[{i}]: {e}")))?;
        if !ids.insert(node.id.clone()) {
            return Err(Error::schema(task, format!("duplicate node id '{}'", node.id)));
        }
        out.nodes.push(Node {
            label: node.label.unwrap_or_else(|| node.id.clone()),
            id: node.id,
            description: node.description,
        });
    }
    for (i, edge) in edges.into_iter().enumerate() {
        let edge: WireEdge = serde_json::from_value(edge)
            .map_err(|e| Error::schema(task, format!("edges[{i}]: {e}")))?;
        for end in [&edge.source, &edge.target] {
            if !ids.contains(end) {
                return Err(Error::schema(
                    task,
                    format!("edges[{i}] references unknown node '{end}'"),
                ));
            }
        }
        out.edges.push(Edge {
            source: edge.source,
            target: edge.target,
            label: edge.label.unwrap_or_default(),
        });
    }
    Ok(out)
}

fn required_array(task: TaskKind, map: &mut Map<String, Value>, key: &str) -> Result<Vec<Value>> {
    match map.remove(key) {
        Some(Value::Array(items)) => Ok(items),
        Some(_) => Err(Error::schema(task, format!("'{key}' is not an array"))),
        None => Err(Error::schema(task, format!("missing '{key}'"))),
    }
}

fn chunks(value: Value) -> Result<Vec<Chunk>> {
    let task = TaskKind::Chunking;
    let items = list(task, value, "chunks")?;
    let total = items.len();
    let kept = items
        .into_iter()
        .enumerate()
        .filter_map(|(i, item)| match chunk(&item) {
            Ok(chunk) => Some(chunk),
            Err(reason) => {
                tracing::warn!("dropping chunks[{i}]: {reason}");
                None
            }
        })
        .collect::<Vec<_>>();

    if kept.is_empty() {
        return Err(Error::schema(
            task,
            format!("none of {total} chunk(s) is well-formed"),
        ));
    }
    Ok(kept)
}

fn chunk(item: &Value) -> std::result::Result<Chunk, String> {
    let title = non_empty(item, "title")?;
    let content = non_empty(item, "content")?;
    let estimated_time = match item.get("estimated_time") {
        None | Some(Value::Null) => estimated_minutes(&content),
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| format!("estimated_time {n} is not a number"))?,
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("estimated_time '{s}' is not a number"))?,
        Some(other) => return Err(format!("estimated_time {other} is not a number")),
    };
    if !(estimated_time.is_finite() && estimated_time > 0.0) {
        return Err(format!("estimated_time {estimated_time} is not positive"));
    }
    Ok(Chunk {
        title,
        content,
        estimated_time,
    })
}

fn flashcards(value: Value) -> Result<Vec<Flashcard>> {
    let task = TaskKind::Flashcard;
    let items = list(task, value, "flashcards")?;
    let total = items.len();
    let kept = items
        .into_iter()
        .enumerate()
        .filter_map(|(i, item)| {
            let card = non_empty(&item, "question").and_then(|question| {
                non_empty(&item, "answer").map(|answer| Flashcard { question, answer })
            });
            card.map_err(|reason| tracing::warn!("dropping flashcards[{i}]: {reason}"))
                .ok()
        })
        .collect::<Vec<_>>();

    if kept.is_empty() {
        return Err(Error::schema(
            task,
            format!("none of {total} flashcard(s) is well-formed"),
        ));
    }
    Ok(kept)
}

fn summary_tree(value: Value) -> Result<Vec<SummaryLevel>> {
    let task = TaskKind::SummaryTree;
    let items = list(task, value, "levels")?;
    if items.is_empty() {
        return Err(Error::schema(task, "no summary levels"));
    }
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            serde_json::from_value::<SummaryLevel>(item)
                .map_err(|e| Error::schema(task, format!("levels[{i}]: {e}")))
        })
        .collect()
}

/// A required, non-blank string field.
fn non_empty(item: &Value, key: &str) -> std::result::Result<String, String> {
    match item.get(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.trim().to_owned()),
        Some(Value::String(_)) => Err(format!("'{key}' is empty")),
        Some(_) => Err(format!("'{key}' is not a string")),
        None => Err(format!("missing '{key}'")),
    }
}
