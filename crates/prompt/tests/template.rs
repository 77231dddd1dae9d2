//! Tests for the template store.

use learnkit_prompt::{MARKER, TemplateStore};
use lcore::{Error, TaskKind};
use std::fs;

#[test]
fn builtin_covers_every_task_with_one_marker() {
    let store = TemplateStore::builtin();
    assert_eq!(store.len(), TaskKind::ALL.len());
    for task in TaskKind::ALL {
        let template = store.get(task).unwrap();
        assert_eq!(template.matches(MARKER).count(), 1, "{task}");
    }
}

#[test]
fn insert_rejects_missing_or_repeated_marker() {
    let mut store = TemplateStore::empty();
    let err = store.insert(TaskKind::Summary, "no marker here").unwrap_err();
    assert!(matches!(err, Error::Config(_)));

    let err = store
        .insert(TaskKind::Summary, "{{TEXT}} and again {{TEXT}}")
        .unwrap_err();
    assert!(err.to_string().contains("found 2"));
    assert!(store.is_empty());
}

#[test]
fn load_dir_overlays_builtin() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("qa.txt"), "Q: {{TEXT}}").unwrap();
    fs::write(dir.path().join("chunk.txt"), "Split: {{TEXT}}").unwrap();
    fs::write(dir.path().join("README.md"), "not a template").unwrap();
    fs::write(dir.path().join("notes.txt"), "not a task").unwrap();

    let store = TemplateStore::load_dir(dir.path()).unwrap();
    assert_eq!(store.get(TaskKind::Qa), Some("Q: {{TEXT}}"));
    assert_eq!(store.get(TaskKind::Chunking), Some("Split: {{TEXT}}"));
    assert_eq!(
        store.get(TaskKind::Summary),
        TemplateStore::builtin().get(TaskKind::Summary)
    );
}

#[test]
fn overlay_counts_loaded_templates() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("summary.txt"), "S {{TEXT}}").unwrap();
    fs::write(dir.path().join("flashcards.txt"), "F {{TEXT}}").unwrap();

    let mut store = TemplateStore::empty();
    assert_eq!(store.overlay_dir(dir.path()).unwrap(), 2);
    assert_eq!(
        store.tasks().collect::<Vec<_>>(),
        vec![TaskKind::Summary, TaskKind::Flashcard]
    );
}

#[test]
fn bad_template_file_names_the_path() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("summary.txt"), "forgot the marker").unwrap();

    let err = TemplateStore::load_dir(dir.path()).unwrap_err();
    match err {
        Error::Config(reason) => assert!(reason.contains("summary.txt"), "{reason}"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn missing_dir_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = TemplateStore::load_dir(dir.path().join("absent")).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}
