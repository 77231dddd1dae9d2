//! Tests for CLI argument parsing.

use clap::Parser;
use learnkit::TaskKind;
use learnkit_cli::{Cli, Command};
use std::path::PathBuf;

#[test]
fn cli_parse_models_with_defaults() {
    let cli = Cli::parse_from(["learnkit", "models"]);
    assert!(matches!(cli.command, Command::Models));
    assert_eq!(cli.keys, PathBuf::from("key.json"));
    assert!(cli.config.is_none());
    assert!(cli.model.is_none());
}

#[test]
fn cli_parse_run_task_alias() {
    let cli = Cli::parse_from(["learnkit", "run", "flashcards", "notes.md"]);
    match cli.command {
        Command::Run { task, input } => {
            assert_eq!(task, TaskKind::Flashcard);
            assert_eq!(input, Some(PathBuf::from("notes.md")));
        }
        other => panic!("expected Run, got {other:?}"),
    }
}

#[test]
fn cli_rejects_unknown_task() {
    assert!(Cli::try_parse_from(["learnkit", "run", "poetry"]).is_err());
}

#[test]
fn cli_parse_global_flags_after_subcommand() {
    let cli = Cli::parse_from([
        "learnkit",
        "process",
        "--keys",
        "conf/key.json",
        "--model",
        "Gemini",
        "--config",
        "config.json",
    ]);
    assert_eq!(cli.keys, PathBuf::from("conf/key.json"));
    assert_eq!(cli.model.as_deref(), Some("Gemini"));
    assert_eq!(cli.config, Some(PathBuf::from("config.json")));
    assert!(matches!(cli.command, Command::Process { input: None }));
}

#[test]
fn cli_parse_examples_types() {
    let cli = Cli::parse_from([
        "learnkit",
        "examples",
        "--concept",
        "entropy",
        "--types",
        "real-world,numerical",
    ]);
    match cli.command {
        Command::Examples { concept, types, context } => {
            assert_eq!(concept, "entropy");
            assert_eq!(types, ["real-world", "numerical"]);
            assert!(context.is_none());
        }
        other => panic!("expected Examples, got {other:?}"),
    }
}

#[test]
fn cli_parse_local_chunk_bounds() {
    let cli = Cli::parse_from(["learnkit", "chunk", "--local", "--max-chars", "800", "-"]);
    match cli.command {
        Command::Chunk {
            local,
            min_chars,
            max_chars,
            input,
        } => {
            assert!(local);
            assert_eq!(min_chars, 500);
            assert_eq!(max_chars, 800);
            assert_eq!(input, Some(PathBuf::from("-")));
        }
        other => panic!("expected Chunk, got {other:?}"),
    }
}

#[test]
fn cli_batch_requires_files() {
    assert!(Cli::try_parse_from(["learnkit", "batch", "summary"]).is_err());
    let cli = Cli::parse_from(["learnkit", "batch", "summary", "-j", "2", "a.txt", "b.txt"]);
    match cli.command {
        Command::Batch { task, jobs, files } => {
            assert_eq!(task, TaskKind::Summary);
            assert_eq!(jobs, 2);
            assert_eq!(files.len(), 2);
        }
        other => panic!("expected Batch, got {other:?}"),
    }
}
