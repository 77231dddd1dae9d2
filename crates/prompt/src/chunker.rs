//! Rule-based chunking that respects paragraph and heading boundaries.
//!
//! Used when no provider call is wanted. Provider chunking goes through the
//! `chunking` template and the response parser instead.

use lcore::Chunk;
use regex::Regex;
use std::sync::LazyLock;

/// Default lower bound of a chunk, in characters.
pub const MIN_CHUNK_CHARS: usize = 500;

/// Default upper bound of a chunk, in characters.
pub const MAX_CHUNK_CHARS: usize = 1500;

/// Reading speed behind [`estimated_minutes`].
const WORDS_PER_MINUTE: f64 = 200.0;

static PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("valid paragraph regex"));
static ATX_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#{1,6}\s+(.+)$").expect("valid heading regex"));
static SETEXT_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+)\n[=\-]{3,}$").expect("valid heading regex"));
static FIRST_SENTENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^.!?]+[.!?])").expect("valid sentence regex"));

/// Study time in minutes for `content`: words / 200, rounded, at least 1.
pub fn estimated_minutes(content: &str) -> f64 {
    let words = content.split_whitespace().count() as f64;
    (words / WORDS_PER_MINUTE).round_ties_even().max(1.0)
}

/// Split `text` into chunks of roughly `min_chars..=max_chars` characters.
///
/// A heading starts a new chunk, named after it, when it is top-level (`# `)
/// or the current chunk already reached `min_chars`. A paragraph that would overflow
/// `max_chars` starts a new chunk titled after its first sentence.
pub fn local_chunks(text: &str, min_chars: usize, max_chars: usize) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut size = 0;
    let mut title = String::from("Introduction");

    for para in PARAGRAPH_BREAK.split(text) {
        if para.trim().is_empty() {
            continue;
        }
        let len = para.chars().count();

        if let Some(heading) = heading(para) {
            let top_level = para.starts_with("# ");
            // A heading only names the chunk it opens; text before the first
            // split stays under "Introduction".
            if !current.is_empty() && (top_level || size >= min_chars) {
                chunks.push(chunk(&title, &current));
                current.clear();
                size = 0;
                title = heading.to_owned();
            }
        } else if size + len > max_chars && size >= min_chars {
            chunks.push(chunk(&title, &current));
            current.clear();
            size = 0;
            title = match FIRST_SENTENCE.captures(para) {
                Some(caps) => format!("{}...", caps[1].trim()),
                None => String::from("Continued..."),
            };
        }
        current.push(para);
        size += len;
    }

    if !current.is_empty() {
        chunks.push(chunk(&title, &current));
    }
    tracing::debug!("split {} chars into {} local chunk(s)", text.len(), chunks.len());
    chunks
}

fn heading(para: &str) -> Option<&str> {
    ATX_HEADING
        .captures(para)
        .or_else(|| SETEXT_HEADING.captures(para))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}

fn chunk(title: &str, paragraphs: &[&str]) -> Chunk {
    let content = paragraphs.join("\n\n");
    Chunk {
        title: title.to_owned(),
        estimated_time: estimated_minutes(&content),
        content,
    }
}
