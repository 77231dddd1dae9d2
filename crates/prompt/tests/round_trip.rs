//! Build then parse, for every task kind: the result variant always
//! matches the task that was built.

use learnkit_prompt::{RequestBuilder, ResponseParser, TemplateStore};
use lcore::{ModelConfig, TaskKind};
use std::sync::Arc;

/// A well-formed reply a provider could give for `task`.
fn synthetic_reply(task: TaskKind) -> &'static str {
    match task {
        TaskKind::Summary => "Photosynthesis turns light into chemical energy.",
        TaskKind::Qa => "Overfitting is fitting noise instead of signal.",
        TaskKind::LineExplanation => "The line states that energy is conserved.",
        TaskKind::Example => "## Real-world\nA ball rolling downhill.",
        TaskKind::ConceptMap => {
            r#"{"nodes": [{"id": "a", "label": "Light"}, {"id": "b", "label": "Sugar"}],
                "edges": [{"source": "a", "target": "b", "label": "becomes"}]}"#
        }
        TaskKind::Chunking => {
            r#"{"chunks": [{"title": "Light", "content": "Plants absorb light.", "estimated_time": 1}]}"#
        }
        TaskKind::Flashcard => {
            r#"{"flashcards": [{"question": "What do plants absorb?", "answer": "Light"}]}"#
        }
        TaskKind::SummaryTree => {
            r#"[{"title": "Level 1", "content": "Plants make food.", "mapped_sections": []}]"#
        }
    }
}

#[test]
fn every_task_round_trips_to_its_variant() {
    let builder = RequestBuilder::new(Arc::new(TemplateStore::builtin()));
    let parser = ResponseParser::new();
    let config = Arc::new(ModelConfig::new("OpenAI", "gpt-4o", "k"));

    for task in TaskKind::ALL {
        let request = builder
            .build(task, "Plants absorb light to make sugar.", config.clone())
            .unwrap();
        assert_eq!(request.task, task);

        let result = parser.parse(request.task, synthetic_reply(task)).unwrap();
        assert_eq!(result.task(), task, "{task}");
        assert_eq!(result.as_text().is_some(), !task.is_structured(), "{task}");
    }
}
