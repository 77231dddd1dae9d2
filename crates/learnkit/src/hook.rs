//! Hook trait — extension points around each generation.
//!
//! Every method has a pass-through default, so an implementation only
//! overrides what it needs. `()` is the no-op hook.

use lcore::{Error, GenerationResult, TaskKind};

/// Callbacks run by the [`Assistant`](crate::Assistant).
pub trait Hook: Send + Sync {
    /// Rewrite the input text before the request is built.
    fn on_text(&self, task: TaskKind, text: String) -> String {
        let _ = task;
        text
    }

    /// Rewrite the parsed result before it is returned.
    fn on_result(&self, result: GenerationResult) -> GenerationResult {
        result
    }

    /// Observe a failed generation.
    fn on_error(&self, task: TaskKind, error: &Error) {
        let _ = (task, error);
    }
}

impl Hook for () {}
