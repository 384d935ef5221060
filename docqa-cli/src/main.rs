//! The `docqa` command-line entry point.
//!
//! `docqa ingest` is the offline half: it builds and persists the vector
//! index from a corpus directory. `docqa ask` and `docqa chat` are the
//! online half: they load the persisted index (failing fast if ingestion
//! has not run) and answer questions through the agent.

mod settings;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use docqa_agent::RagAgent;
use docqa_model::OpenAIChatModel;
use docqa_rag::{IngestionPipeline, RagConfig, Retriever};
use docqa_session::SessionStore;
use rustyline::error::ReadlineError;

use crate::settings::Settings;

#[derive(Parser)]
#[command(name = "docqa", version, about = "Question answering over a private document corpus")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ingest a directory of plain-text files into the vector index.
    Ingest {
        /// Directory of `.txt` corpus files.
        corpus_dir: PathBuf,
        /// Where to write the index artifacts.
        #[arg(long, default_value = "data/vector_store")]
        index_dir: PathBuf,
    },
    /// Ask a single question.
    Ask {
        /// The question to answer.
        query: String,
        /// Continue an existing session.
        #[arg(long)]
        session: Option<String>,
        /// Where the index artifacts live.
        #[arg(long, default_value = "data/vector_store")]
        index_dir: PathBuf,
    },
    /// Interactive chat holding one session for the whole run.
    Chat {
        /// Where the index artifacts live.
        #[arg(long, default_value = "data/vector_store")]
        index_dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Ingest { corpus_dir, index_dir } => ingest(&corpus_dir, &index_dir).await,
        Command::Ask { query, session, index_dir } => ask(&query, session, &index_dir).await,
        Command::Chat { index_dir } => chat(&index_dir).await,
    }
}

async fn ingest(corpus_dir: &Path, index_dir: &Path) -> Result<()> {
    let settings = Settings::from_env()?;
    let pipeline = IngestionPipeline::builder()
        .config(RagConfig::default())
        .embedding_provider(Arc::new(settings.embedder()?))
        .build()?;

    let report = pipeline.ingest(corpus_dir, index_dir).await?;
    println!("Ingested {} document(s) into {} chunk(s).", report.documents, report.chunks);
    Ok(())
}

/// Wire up the full online stack. Fails fast when the index is missing or
/// the environment lacks a credential.
fn build_agent(settings: &Settings, index_dir: &Path) -> Result<RagAgent> {
    let embedder = Arc::new(settings.embedder()?);
    let retriever = Retriever::load(index_dir, embedder)?;
    let model = OpenAIChatModel::new(settings.chat.clone());

    Ok(RagAgent::builder()
        .model(Arc::new(model))
        .retriever(Arc::new(retriever))
        .sessions(Arc::new(SessionStore::default()))
        .build()?)
}

async fn ask(query: &str, session: Option<String>, index_dir: &Path) -> Result<()> {
    let settings = Settings::from_env()?;
    let agent = build_agent(&settings, index_dir)?;

    let response = agent.ask(query, session).await?;
    print_response(&response.answer, &response.sources);
    println!("Session: {}", response.session_id);
    Ok(())
}

async fn chat(index_dir: &Path) -> Result<()> {
    let settings = Settings::from_env()?;
    let agent = build_agent(&settings, index_dir)?;

    let mut editor = rustyline::DefaultEditor::new()?;
    let mut session_id: Option<String> = None;
    println!("docqa chat — ctrl-d to quit");

    loop {
        match editor.readline("you> ") {
            Ok(line) => {
                let query = line.trim();
                if query.is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(query);
                match agent.ask(query, session_id.clone()).await {
                    Ok(response) => {
                        print_response(&response.answer, &response.sources);
                        session_id = Some(response.session_id);
                    }
                    Err(e) => eprintln!("error: {e}"),
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

fn print_response(answer: &str, sources: &std::collections::BTreeSet<String>) {
    println!("{answer}");
    if !sources.is_empty() {
        let cited: Vec<&str> = sources.iter().map(String::as_str).collect();
        println!("Sources: {}", cited.join(", "));
    }
}
