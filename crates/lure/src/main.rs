use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use herald::JournalHandle;
use lure::api::ResilientExecutor;
use lure::app::{App, Command};
use lure::config::{ApiConfig, ENV_API_KEY};
use lure::factors::FactorTable;
use lure::view::{OutputFormat, ViewModel};

#[derive(Parser)]
#[command(name = "lure")]
#[command(
  about = "Lure - Social Engineering Factor Database\n\
           Look up how often psychological factors drive attacks, and research them live"
)]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), ", courtesy of Kernelle Software"))]
struct Cli {
  #[command(subcommand)]
  command: Cmd,

  /// Path to a YAML config file
  #[arg(long, global = true)]
  config: Option<PathBuf>,

  /// API key for the generative-language service (overrides config and LURE_API_KEY)
  #[arg(long, global = true)]
  api_key: Option<String>,

  /// Print results as JSON
  #[arg(long, global = true)]
  json: bool,

  /// Show debug logging
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Print every request attempt after the command finishes
  #[arg(long, global = true)]
  trace: bool,
}

#[derive(Subcommand)]
enum Cmd {
  /// List all factors with their percentages
  Factors,
  /// Show the percentage for one factor
  Lookup {
    /// Factor name (case-insensitive)
    #[arg(required = true)]
    factor: Vec<String>,
  },
  /// Generate a definition, example attack and defense tips for a factor
  Explain {
    /// Factor name (case-insensitive)
    #[arg(required = true)]
    factor: Vec<String>,
  },
  /// Research a question against grounded web sources
  Research {
    /// Question terms (space-separated)
    #[arg(required = true)]
    terms: Vec<String>,
    /// Append a shareable text report
    #[arg(short, long)]
    share: bool,
    /// Write the share report to a file instead of stdout
    #[arg(short, long)]
    out: Option<PathBuf>,
  },
}

impl Cmd {
  fn needs_service(&self) -> bool {
    matches!(self, Cmd::Explain { .. } | Cmd::Research { .. })
  }
}

fn into_command(cmd: Cmd) -> (Command, Option<PathBuf>) {
  match cmd {
    Cmd::Factors => (Command::ListFactors, None),
    Cmd::Lookup { factor } => (Command::Lookup { factor: factor.join(" ") }, None),
    Cmd::Explain { factor } => (Command::Explain { factor: factor.join(" ") }, None),
    Cmd::Research { terms, share, out } => {
      let share = share || out.is_some();
      (Command::Research { query: terms.join(" "), share }, out)
    }
  }
}

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();
  let journal = cli.trace.then(JournalHandle::default);
  herald::init(cli.verbose, journal.as_ref());

  let mut config = ApiConfig::load(cli.config.as_deref())?;
  if let Some(api_key) = cli.api_key {
    config = config.with_api_key(api_key);
  }

  if config.api_key.is_empty() && cli.command.needs_service() {
    herald::warn(&format!("No API key configured; set {ENV_API_KEY} or pass --api-key"));
  }

  let executor = Arc::new(ResilientExecutor::from_config(&config)?);
  let app = App::new(FactorTable::builtin(), executor, &config)?;

  let (command, out) = into_command(cli.command);
  let format = if cli.json { OutputFormat::Json } else { OutputFormat::Pretty };
  let mut view = ViewModel::new(format).with_inline_reports(out.is_none());

  let succeeded = app.dispatch(command, &mut view).await;

  let output = view.output();
  if !output.is_empty() {
    println!("{output}");
  }
  for message in view.errors() {
    herald::error(message);
  }

  if let (Some(path), Some(report)) = (out, view.shared_report()) {
    std::fs::write(&path, &report.full_text)
      .with_context(|| format!("Failed to write report to {}", path.display()))?;
    herald::success(&format!("Report written to {}", path.display()));
  }

  if let Some(journal) = journal {
    let rendered = journal.render();
    if !rendered.is_empty() {
      herald::announce("Request attempts");
      herald::verbose(&rendered);
    }
  }

  if !succeeded {
    std::process::exit(1);
  }
  Ok(())
}
