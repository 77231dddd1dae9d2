//! Recovering JSON values from model output.
//!
//! Providers wrap JSON in prose or code fences, and occasionally leave
//! trailing commas or `//` comments copied from the prompt's example. Prose
//! may also carry bracketed fragments such as `[1]` citations, so every
//! outermost value is collected: first from the text as is, then from a
//! repaired copy. The caller picks the first one that fits its task.

use serde_json::Value;

/// Upper bound on candidate start positions tried per pass.
const MAX_CANDIDATES: usize = 64;

/// Every outermost JSON value in `text`, strict pass first, then repaired.
pub(crate) fn candidates(text: &str) -> Vec<Value> {
    let mut values = outermost_values(text);
    let repaired = repair(text);
    if repaired != text {
        let fresh: Vec<Value> = outermost_values(&repaired)
            .into_iter()
            .filter(|value| !values.contains(value))
            .collect();
        if !fresh.is_empty() {
            tracing::debug!("recovered {} JSON value(s) after repair", fresh.len());
        }
        values.extend(fresh);
    }
    values
}

/// The outermost `{...}` and `[...]` spans that decode, in order.
///
/// Starts nested inside a balanced span are never tried, so a broken outer
/// value is never mistaken for one of its elements.
fn outermost_values(text: &str) -> Vec<Value> {
    let mut values = Vec::new();
    let mut offset = 0;
    for _ in 0..MAX_CANDIDATES {
        let Some(found) = text[offset..].find(['{', '[']) else {
            break;
        };
        let start = offset + found;
        match balanced_end(&text[start..]) {
            Some(len) => {
                if let Ok(value) = serde_json::from_str(&text[start..start + len]) {
                    values.push(value);
                }
                offset = start + len;
            }
            None => offset = start + 1,
        }
    }
    values
}

/// Byte length of the balanced value at the start of `text`.
///
/// Brackets inside string literals are ignored.
fn balanced_end(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (i, c) in text.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' | '[' => depth += 1,
            '}' | ']' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i + c.len_utf8());
                }
            }
            _ => {}
        }
    }
    None
}

/// Strip code fences, `//` line comments and trailing commas.
fn repair(text: &str) -> String {
    let unfenced = text
        .lines()
        .filter(|line| !line.trim_start().starts_with("```"))
        .collect::<Vec<_>>()
        .join("\n");

    let mut out = String::with_capacity(unfenced.len());
    let mut chars = unfenced.chars().peekable();
    let mut in_string = false;
    let mut escaped = false;
    while let Some(c) = chars.next() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            out.push(c);
            continue;
        }
        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            '/' if chars.peek() == Some(&'/') => {
                while chars.next_if(|&n| n != '\n').is_some() {}
            }
            ',' => {
                let mut lookahead = chars.clone();
                let next = loop {
                    match lookahead.next() {
                        Some(n) if n.is_whitespace() => continue,
                        Some('/') if lookahead.peek() == Some(&'/') => {
                            while lookahead.next_if(|&n| n != '\n').is_some() {}
                        }
                        other => break other,
                    }
                };
                if !matches!(next, Some('}' | ']')) {
                    out.push(c);
                }
            }
            _ => out.push(c),
        }
    }
    out
}
