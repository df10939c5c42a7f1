//! ## Features
//!
//! - Leveled terminal logging (warn, error, success, verbose)
//! - Multi-line message support with consistent prefixes
//! - Banner displays for section headings
//! - `tracing` subscriber setup for library-level diagnostics
//! - An in-memory journal of outbound request attempts
//!
//! All output goes to stderr so that stdout stays clean for results and reports.

use colored::*;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

pub mod journal;

pub use journal::{AttemptJournal, JournalEntry, JournalHandle, JournalLayer};

/// Environment variable consulted for the tracing filter
pub const LOG_ENV: &str = "LURE_LOG";

/// Install the global tracing subscriber.
///
/// `LURE_LOG` wins when set; otherwise `verbose` picks between `debug` and `warn`.
/// The filter only applies to terminal output: a `journal`, when given, sees every
/// attempt event. Calling this more than once is harmless, later calls are ignored.
pub fn init(verbose: bool, journal: Option<&JournalHandle>) {
  let fallback = if verbose { "debug" } else { "warn" };
  let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));

  let terminal = tracing_subscriber::fmt::layer().with_writer(std::io::stderr).with_filter(filter);

  let _ = tracing_subscriber::registry()
    .with(terminal)
    .with(journal.map(JournalHandle::layer))
    .try_init();
}

/// Core logging function that handles the actual output
pub fn log(message: &str) {
  for line in message.lines() {
    eprintln!("{line}");
  }
}

fn format_prefix(color: Color, prefix: &str) -> String {
  format!("[{}]{:<width$}", prefix.color(color).bold(), "", width = 7 - prefix.len() - 2)
}

/// Prefix every line of `message` with a colored level tag
pub fn prefixed(color: Color, tag: &str, message: &str) -> String {
  let prefix = format_prefix(color, tag);
  message.lines().map(|line| format!("{prefix} {line}")).collect::<Vec<_>>().join("\n")
}

/// Create a banner line of the specified length and character
pub fn banner_line(length: usize, char: char) -> String {
  char.to_string().repeat(length)
}

/// Display a message with a banner around it
pub fn as_banner<F>(log_fn: F, message: &str, width: Option<usize>, border_char: Option<char>)
where
  F: Fn(&str),
{
  let banner = banner_line(width.unwrap_or(50), border_char.unwrap_or('='));

  log_fn(&banner);
  log_fn(message);
  log_fn(&banner);
}

pub fn verbose(message: &str) {
  log(&prefixed(Color::Cyan, "verb", message));
}

/// Warning level logging - something needs attention
pub fn warn(message: &str) {
  log(&prefixed(Color::Yellow, "warn", message));
}

/// Error level logging - something went wrong
pub fn error(message: &str) {
  log(&prefixed(Color::Red, "error", message));
}

/// Success level logging - something completed successfully
pub fn success(message: &str) {
  log(&prefixed(Color::Green, "sccs", message));
}

/// Announce - section headings
pub fn announce(message: &str) {
  as_banner(|msg| log(&msg.blue().bold().to_string()), message, Some(50), Some('-'));
}
