//! CLI argument parsing and subcommand handlers.

use crate::{batch, input};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use compact_str::CompactString;
use learnkit::{
    AppConfig, Assistant, ProviderRegistry, TaskKind, TemplateStore, export::flashcards_csv,
    local_chunks,
};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Study material from text with LLMs.
#[derive(Parser, Debug)]
#[command(name = "learnkit", about = "Study material from text with LLMs")]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Provider configuration file.
    #[arg(long, global = true, default_value = "key.json")]
    pub keys: PathBuf,

    /// Feature configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory of `<task>.txt` templates overlaid on the built-in ones.
    #[arg(long, global = true)]
    pub templates: Option<PathBuf>,

    /// Model name override.
    #[arg(long, global = true)]
    pub model: Option<CompactString>,
}

/// Top-level subcommands.
///
/// `INPUT` is a file path; omitted or `-` reads stdin.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the configured models.
    Models,
    /// Run any task kind and print the result with usage metadata.
    Run {
        /// Task kind (summary, concept_map, chunking, flashcard, qa,
        /// line_explanation, example, summary_tree).
        task: TaskKind,
        /// Input file.
        input: Option<PathBuf>,
    },
    /// Summary, chunks and concept map of one text.
    Process {
        /// Input file.
        input: Option<PathBuf>,
    },
    /// Answer a question from a context.
    Ask {
        /// The question.
        #[arg(long, short)]
        question: String,
        /// Context file.
        input: Option<PathBuf>,
    },
    /// Explain one line, optionally within a context.
    Explain {
        /// The line to explain.
        #[arg(long, short)]
        line: String,
        /// Optional context file.
        context: Option<PathBuf>,
    },
    /// Generate examples for a concept.
    Examples {
        /// The concept.
        #[arg(long, short)]
        concept: String,
        /// Comma-separated example types.
        #[arg(long, value_delimiter = ',', default_value = "real-world,analogy")]
        types: Vec<String>,
        /// Optional context file.
        context: Option<PathBuf>,
    },
    /// Generate flashcards.
    Flashcards {
        /// Print CSV (`question,answer`) for Anki import instead of JSON.
        #[arg(long)]
        csv: bool,
        /// Input file.
        input: Option<PathBuf>,
    },
    /// Split text into learner-sized chunks.
    Chunk {
        /// Split locally by paragraphs and headings, without a provider.
        #[arg(long)]
        local: bool,
        /// Minimum chunk size in characters (local mode).
        #[arg(long, default_value_t = learnkit::chunker::MIN_CHUNK_CHARS)]
        min_chars: usize,
        /// Maximum chunk size in characters (local mode).
        #[arg(long, default_value_t = learnkit::chunker::MAX_CHUNK_CHARS)]
        max_chars: usize,
        /// Input file.
        input: Option<PathBuf>,
    },
    /// Run one task over many files, printing one JSON line per file.
    Batch {
        /// Task kind.
        task: TaskKind,
        /// Files processed at the same time.
        #[arg(long, short, default_value_t = 4)]
        jobs: usize,
        /// Input files.
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

impl Cli {
    /// Run the selected subcommand.
    pub async fn run(self) -> Result<()> {
        if let Command::Chunk {
            local: true,
            min_chars,
            max_chars,
            input,
        } = &self.command
        {
            let text = input::read(input.as_deref()).await?;
            return print_json(&local_chunks(&text, *min_chars, *max_chars));
        }

        let registry = ProviderRegistry::load(&self.keys)
            .with_context(|| format!("failed to load {}", self.keys.display()))?;
        if let Command::Models = self.command {
            return print_json(&registry.list());
        }
        let assistant = self.assistant(registry)?;

        match self.command {
            Command::Models | Command::Chunk { local: true, .. } => Ok(()),
            Command::Run { task, input } => {
                let text = input::read(input.as_deref()).await?;
                print_json(&assistant.generate(task, &text, None).await?)
            }
            Command::Process { input } => {
                let text = input::read(input.as_deref()).await?;
                print_json(&assistant.process(&text).await?)
            }
            Command::Ask { question, input } => {
                let context = input::read(input.as_deref()).await?;
                println!("{}", assistant.ask(&question, &context).await?);
                Ok(())
            }
            Command::Explain { line, context } => {
                let context = input::context(context.as_deref()).await?;
                println!("{}", assistant.explain_line(&line, context.as_deref()).await?);
                Ok(())
            }
            Command::Examples {
                concept,
                types,
                context,
            } => {
                let context = input::context(context.as_deref()).await?;
                let examples = assistant
                    .examples(&concept, &types, context.as_deref())
                    .await?;
                println!("{examples}");
                Ok(())
            }
            Command::Flashcards { csv, input } => {
                let text = input::read(input.as_deref()).await?;
                let cards = assistant.flashcards(&text).await?;
                if csv {
                    flashcards_csv(&cards, std::io::stdout().lock())
                        .context("failed to write csv")?;
                    Ok(())
                } else {
                    print_json(&cards)
                }
            }
            Command::Chunk { input, .. } => {
                let text = input::read(input.as_deref()).await?;
                print_json(&assistant.chunk(&text).await?)
            }
            Command::Batch { task, jobs, files } => {
                for item in batch::run(&assistant, task, files, jobs).await {
                    println!("{}", serde_json::to_string(&item)?);
                }
                Ok(())
            }
        }
    }

    fn assistant(&self, registry: ProviderRegistry) -> Result<Assistant> {
        let templates = match &self.templates {
            Some(dir) => TemplateStore::load_dir(dir)?,
            None => TemplateStore::builtin(),
        };
        let mut assistant = Assistant::new(registry, templates);
        if let Some(path) = &self.config {
            assistant = assistant.with_features(&load_features(path)?);
        }
        if let Some(model) = &self.model {
            assistant = assistant.with_model(model.clone());
        }
        Ok(assistant)
    }
}

fn load_features(path: &Path) -> Result<AppConfig> {
    AppConfig::load(path).with_context(|| format!("failed to load {}", path.display()))
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
