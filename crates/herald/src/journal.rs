//! Bounded in-memory record of outbound request attempts.
//!
//! Attempts reach the journal as `tracing` events. Any event carrying both a
//! `request_id` and an `attempt` field is recorded by [`JournalLayer`]; the
//! code emitting those events never sees the journal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex};
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

/// One attempt as reported by the request executor
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct JournalEntry {
  pub timestamp: DateTime<Utc>,
  pub request_id: String,
  pub attempt: u32,
  pub level: String,
  pub message: String,
}

pub struct AttemptJournal {
  entries: VecDeque<JournalEntry>,
  max_entries: usize,
}

impl Default for AttemptJournal {
  fn default() -> Self {
    Self::new(64)
  }
}

impl AttemptJournal {
  /// Create a journal holding at most `max_entries` entries
  pub fn new(max_entries: usize) -> Self {
    Self { entries: VecDeque::with_capacity(max_entries), max_entries }
  }

  /// Append an entry, evicting the oldest one when full
  pub fn record(&mut self, request_id: &str, attempt: u32, level: &str, message: &str) {
    if self.max_entries == 0 {
      return;
    }
    if self.entries.len() >= self.max_entries {
      self.entries.pop_front();
    }

    self.entries.push_back(JournalEntry {
      timestamp: Utc::now(),
      request_id: request_id.to_string(),
      attempt,
      level: level.to_string(),
      message: message.to_string(),
    });
  }

  /// Entries in insertion order
  pub fn entries(&self) -> Vec<JournalEntry> {
    self.entries.iter().cloned().collect()
  }

  /// Render entries one per line for terminal display
  pub fn render(&self) -> String {
    self
      .entries
      .iter()
      .map(|e| {
        format!(
          "{} [{}] #{} {}: {}",
          e.timestamp.format("%H:%M:%S%.3f"),
          e.request_id.chars().take(8).collect::<String>(),
          e.attempt,
          e.level,
          e.message
        )
      })
      .collect::<Vec<_>>()
      .join("\n")
  }
}

/// Cloneable handle to a journal shared with its [`JournalLayer`]
#[derive(Clone, Default)]
pub struct JournalHandle {
  journal: Arc<Mutex<AttemptJournal>>,
}

impl JournalHandle {
  pub fn new(max_entries: usize) -> Self {
    Self { journal: Arc::new(Mutex::new(AttemptJournal::new(max_entries))) }
  }

  /// A subscriber layer feeding this journal
  pub fn layer(&self) -> JournalLayer {
    JournalLayer { handle: self.clone() }
  }

  pub fn entries(&self) -> Vec<JournalEntry> {
    self.journal.lock().map(|journal| journal.entries()).unwrap_or_default()
  }

  pub fn render(&self) -> String {
    self.journal.lock().map(|journal| journal.render()).unwrap_or_default()
  }

  fn record(&self, request_id: &str, attempt: u32, level: &str, message: &str) {
    if let Ok(mut journal) = self.journal.lock() {
      journal.record(request_id, attempt, level, message);
    }
  }
}

pub struct JournalLayer {
  handle: JournalHandle,
}

#[derive(Default)]
struct AttemptFields {
  request_id: Option<String>,
  attempt: Option<u32>,
  message: String,
}

impl Visit for AttemptFields {
  fn record_str(&mut self, field: &Field, value: &str) {
    match field.name() {
      "request_id" => self.request_id = Some(value.to_string()),
      "message" => self.message = value.to_string(),
      _ => {}
    }
  }

  fn record_u64(&mut self, field: &Field, value: u64) {
    if field.name() == "attempt" {
      self.attempt = u32::try_from(value).ok();
    }
  }

  fn record_i64(&mut self, field: &Field, value: i64) {
    if field.name() == "attempt" {
      self.attempt = u32::try_from(value).ok();
    }
  }

  fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
    if field.name() == "message" {
      self.message = format!("{value:?}");
    }
  }
}

impl<S: Subscriber> Layer<S> for JournalLayer {
  fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
    let mut fields = AttemptFields::default();
    event.record(&mut fields);

    if let (Some(request_id), Some(attempt)) = (fields.request_id, fields.attempt) {
      let level = event.metadata().level().to_string().to_lowercase();
      self.handle.record(&request_id, attempt, &level, &fields.message);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tracing_subscriber::prelude::*;

  #[test]
  fn test_record_and_read_back_in_order() {
    let mut journal = AttemptJournal::new(4);
    journal.record("req-1", 1, "warn", "Server error (status 429)");
    journal.record("req-1", 2, "info", "ok");

    let entries = journal.entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].attempt, 1);
    assert_eq!(entries[1].message, "ok");
  }

  #[test]
  fn test_oldest_entry_is_evicted_at_capacity() {
    let mut journal = AttemptJournal::new(2);
    journal.record("r", 1, "warn", "a");
    journal.record("r", 2, "warn", "b");
    journal.record("r", 3, "info", "c");

    let messages: Vec<String> = journal.entries().into_iter().map(|e| e.message).collect();
    assert_eq!(messages, vec!["b", "c"]);
  }

  #[test]
  fn test_zero_capacity_journal_stays_empty() {
    let mut journal = AttemptJournal::new(0);
    journal.record("r", 1, "warn", "dropped");
    assert!(journal.entries().is_empty());
  }

  #[test]
  fn test_render_includes_short_request_id() {
    let mut journal = AttemptJournal::new(2);
    journal.record("0123456789abcdef", 1, "warn", "Server error (status 503)");
    let rendered = journal.render();
    assert!(rendered.contains("[01234567]"));
    assert!(rendered.contains("#1 warn: Server error (status 503)"));
  }

  #[test]
  fn test_entries_serialize() {
    let mut journal = AttemptJournal::new(1);
    journal.record("r", 1, "info", "ok");
    let json = serde_json::to_string(&journal.entries()).unwrap();
    assert!(json.contains("\"request_id\":\"r\""));
  }

  #[test]
  fn test_layer_records_only_attempt_events() {
    let handle = JournalHandle::new(8);
    let subscriber = tracing_subscriber::registry().with(handle.layer());

    tracing::subscriber::with_default(subscriber, || {
      tracing::warn!(request_id = "req-a", attempt = 2u32, "Server error (status 429)");
      tracing::info!("unrelated event");
      tracing::info!(attempt = 1u32, "no request id");
    });

    let entries = handle.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].request_id, "req-a");
    assert_eq!(entries[0].attempt, 2);
    assert_eq!(entries[0].level, "warn");
    assert_eq!(entries[0].message, "Server error (status 429)");
  }

  #[test]
  fn test_handles_share_one_journal() {
    let handle = JournalHandle::new(8);
    let subscriber = tracing_subscriber::registry().with(handle.clone().layer());

    tracing::subscriber::with_default(subscriber, || {
      tracing::info!(request_id = "req-b", attempt = 1u32, "ok");
    });

    assert!(handle.render().contains("#1 info: ok"));
  }
}
