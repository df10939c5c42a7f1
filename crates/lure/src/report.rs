//! Shareable text reports for research results.

use serde::Serialize;

use crate::model::GroundedAnswer;

const SNIPPET_CHARS: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShareReport {
  pub title: String,
  /// Short teaser for share targets with limited space
  pub snippet: String,
  pub full_text: String,
}

impl ShareReport {
  pub fn build(answer: &GroundedAnswer, query: &str, share_url: &str) -> Self {
    let summary = answer.summary_text.as_deref();

    let snippet = match summary {
      Some(summary) => format!("{}...", summary.chars().take(SNIPPET_CHARS).collect::<String>()),
      None => "Check out this research".to_string(),
    };

    let sources = answer
      .sources
      .iter()
      .enumerate()
      .map(|(i, source)| format!("[Source {}] {}: {}", i + 1, source.title, source.uri))
      .collect::<Vec<_>>()
      .join("\n");

    let mut full_text = format!(
      "Research on: \"{query}\"\n\nResearch Summary:\n{}\n\nGrounded Sources:\n{sources}",
      summary.unwrap_or("N/A")
    );
    if !share_url.is_empty() {
      full_text.push_str(&format!("\n\nFound via Cybersecurity Factor Database: {share_url}"));
    }

    Self { title: format!("Research: {query}"), snippet, full_text }
  }
}
