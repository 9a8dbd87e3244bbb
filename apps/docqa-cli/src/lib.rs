//! Outer layer for the document QA engine: directory ingestion, result
//! rendering and the interactive shell command set.

use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{debug, info};

use docqa_core::config::Settings;
use docqa_core::data_processor::{DataProcessor, SourceDocument};
use docqa_core::error::{Error, ErrorKind};
use docqa_core::types::{Answer, DocumentMeta, ScoredChunk};
use docqa_engine::DocumentStore;

/// Read every `.txt` file under `dir` and index it into `store`.
pub fn load_corpus(store: &DocumentStore, settings: &Settings, dir: &Path, show_progress: bool) -> anyhow::Result<Vec<DocumentMeta>> {
    let processor = DataProcessor::with_settings(settings.chunking.clone());
    let sources = processor.process_directory(dir)?;
    let pb = if show_progress { ProgressBar::new(sources.len() as u64) } else { ProgressBar::hidden() };
    pb.set_style(ProgressStyle::default_bar().template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} documents {msg}")?.progress_chars("#>-"));
    let mut loaded = Vec::with_capacity(sources.len());
    for source in sources {
        pb.set_message(source.name.clone());
        loaded.push(ingest_source(store, source)?);
        pb.inc(1);
    }
    pb.finish_and_clear();
    info!(documents = loaded.len(), dir = %dir.display(), "corpus loaded");
    Ok(loaded)
}

fn ingest_source(store: &DocumentStore, source: SourceDocument) -> anyhow::Result<DocumentMeta> {
    let meta = store.ingest(source.name, source.chunks)?;
    debug!(doc_id = %meta.doc_id, path = %source.path.display(), "ingested file");
    Ok(meta)
}

/// Read one text file and index it into `store` as a new document.
pub fn add_document(store: &DocumentStore, settings: &Settings, path: &Path) -> anyhow::Result<DocumentMeta> {
    if path.as_os_str().is_empty() {
        return Err(Error::InvalidInput("a file path is required".into()).into());
    }
    if !path.is_file() {
        return Err(Error::NotFound(format!("file '{}'", path.display())).into());
    }
    let processor = DataProcessor::with_settings(settings.chunking.clone());
    ingest_source(store, processor.read_document(path)?)
}

/// Process exit code for a failed command.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<Error>().map(Error::kind) {
        Some(ErrorKind::InvalidInput) => 2,
        Some(ErrorKind::NotFound) => 4,
        _ => 1,
    }
}

pub fn to_json<T: Serialize>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

pub fn render_results(query: &str, results: &[ScoredChunk]) -> String {
    let mut out = format!("Found {} results for: \"{}\"\n", results.len(), query);
    for (i, r) in results.iter().enumerate() {
        out.push_str(&format!("\n  {}. score={:.4}  source={}  chunk={}  doc={}\n", i + 1, r.score, r.source, r.chunk_index, r.doc_id));
        out.push_str(&format!("     {}\n", r.text.trim()));
    }
    out
}

pub fn render_answer(answer: &Answer) -> String {
    let mut out = format!("{}\n", answer.answer);
    if !answer.sources.is_empty() {
        out.push_str("\nSources:\n");
        for s in &answer.sources {
            out.push_str(&format!("  - {} (chunk {}, score {:.4})\n", s.name, s.chunk_index, s.score));
        }
    }
    out
}

pub fn render_documents(docs: &[DocumentMeta]) -> String {
    if docs.is_empty() { return "No documents indexed.\n".to_string(); }
    let mut out = String::new();
    for d in docs {
        out.push_str(&format!("{}  {}  ({} chunks)\n", d.doc_id, d.name, d.chunks));
    }
    out
}

/// What the shell should do after a line has been handled.
#[derive(Debug, PartialEq, Eq)]
pub enum ShellOutcome {
    Continue(String),
    Quit,
}

pub const SHELL_HELP: &str = "commands: extract <query> | answer <query> | list | add <path> | delete <id> | help | quit\n";

/// Execute one line of the interactive shell against `store`.
pub fn run_shell_command(store: &DocumentStore, settings: &Settings, line: &str, json: bool) -> anyhow::Result<ShellOutcome> {
    let line = line.trim();
    let (cmd, rest) = line.split_once(char::is_whitespace).map_or((line, ""), |(c, r)| (c, r.trim()));
    let output = match cmd {
        "" => String::new(),
        "quit" | "exit" => return Ok(ShellOutcome::Quit),
        "help" => SHELL_HELP.to_string(),
        "list" => {
            let docs = store.list();
            if json { to_json(&docs)? } else { render_documents(&docs) }
        }
        "extract" => {
            let results = docqa_engine::extract(store, rest, settings.query.extract_default_k)?;
            if json { to_json(&results)? } else { render_results(rest, &results) }
        }
        "answer" => {
            let answer = docqa_engine::answer(store, rest, settings.query.answer_default_k, settings.query.max_answer_chars)?;
            if json { to_json(&answer)? } else { render_answer(&answer) }
        }
        "add" => {
            let meta = add_document(store, settings, Path::new(rest))?;
            if json { to_json(&meta)? } else { format!("added {} ({}, {} chunks)\n", meta.doc_id, meta.name, meta.chunks) }
        }
        "delete" => {
            let meta = store.remove(rest)?;
            format!("deleted {} ({})\n", meta.doc_id, meta.name)
        }
        other => return Err(Error::InvalidInput(format!("unknown command '{other}'")).into()),
    };
    Ok(ShellOutcome::Continue(output))
}
