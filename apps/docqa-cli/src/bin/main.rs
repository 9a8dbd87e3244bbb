//! docqa: index a directory of text files in memory, then query it.
//!
//! Usage:
//!   docqa extract "how to purify water" -k 5
//!   docqa answer "how to start a fire" --dir ~/notes
//!   docqa list --json
//!   docqa shell

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use docqa_cli::{exit_code, load_corpus, render_answer, render_documents, render_results, run_shell_command, to_json, ShellOutcome, SHELL_HELP};
use docqa_core::config::{resolve_with_base, Config};
use docqa_engine::DocumentStore;

#[derive(Parser)]
#[command(name = "docqa", version, about = "Lexical question answering over local text documents")]
struct Cli {
    /// Config file (an `<stem>.<env>.toml` sibling is merged when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory of .txt documents (overrides `data.docs_dir`)
    #[arg(long)]
    dir: Option<String>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Rank passages across all documents
    Extract {
        query: String,
        #[arg(short)]
        k: Option<usize>,
    },
    /// Build an answer from the best passages
    Answer {
        query: String,
        #[arg(short)]
        k: Option<usize>,
    },
    /// List indexed documents
    List,
    /// Interactive session over the loaded corpus
    Shell,
}

fn main() {
    let cli = Cli::parse();
    let level = if cli.verbose { "debug" } else { "info" };
    let filter = format!("docqa={level},docqa_cli={level},docqa_core={level},docqa_text={level},docqa_engine={level}");
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(exit_code(&e));
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path, &std::env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string()))?,
        None => Config::load()?,
    };
    let settings = config.settings()?;
    let dir_setting = cli.dir.clone().unwrap_or_else(|| settings.data.docs_dir.clone());
    let docs_dir = resolve_with_base(&std::env::current_dir()?, dir_setting);

    let store = DocumentStore::with_settings(settings.index.clone());
    load_corpus(&store, &settings, &docs_dir, !cli.json)?;

    let out = match cli.command {
        Command::Extract { query, k } => {
            let results = docqa_engine::extract(&store, &query, k.unwrap_or(settings.query.extract_default_k))?;
            if cli.json { to_json(&results)? } else { render_results(&query, &results) }
        }
        Command::Answer { query, k } => {
            let k = k.unwrap_or(settings.query.answer_default_k);
            let answer = docqa_engine::answer(&store, &query, k, settings.query.max_answer_chars)?;
            if cli.json { to_json(&answer)? } else { render_answer(&answer) }
        }
        Command::List => {
            let docs = store.list();
            if cli.json { to_json(&docs)? } else { render_documents(&docs) }
        }
        Command::Shell => return shell(&store, &settings, &docs_dir, cli.json),
    };
    print!("{out}");
    Ok(())
}

fn shell(store: &DocumentStore, settings: &docqa_core::config::Settings, docs_dir: &Path, json: bool) -> anyhow::Result<()> {
    println!("docqa shell: {} documents from {}", store.len(), docs_dir.display());
    print!("{SHELL_HELP}");
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("> ");
        stdout.flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 { break; }
        match run_shell_command(store, settings, &line, json) {
            Ok(ShellOutcome::Continue(out)) => print!("{out}"),
            Ok(ShellOutcome::Quit) => break,
            Err(e) => eprintln!("Error: {e:#}"),
        }
    }
    Ok(())
}
