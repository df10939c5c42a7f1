//! Presentation of results on the terminal
//!
//! `ViewModel` is built once by the binary and handed by `&mut` to whatever
//! renders into it. Nothing in `api` or `services` knows it exists.

use colored::*;
use serde::Serialize;

use crate::error::Failure;
use crate::factors::FactorRecord;
use crate::model::{FactorDetail, GroundedAnswer};
use crate::report::ShareReport;

pub const NO_SUMMARY: &str = "No summary was generated, but you can review the sources above.";

/// Which request a failure belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureContext {
  Research,
  Detail,
}

/// Anything results can be rendered into
pub trait RenderSink {
  fn factors(&mut self, records: &[FactorRecord]);
  fn lookup(&mut self, record: &FactorRecord);
  fn unknown_factor(&mut self, name: &str, known: &[&str]);
  fn empty_query(&mut self);
  fn answer(&mut self, query: &str, answer: &GroundedAnswer);
  fn report(&mut self, report: &ShareReport);
  fn detail(&mut self, factor: &str, detail: &FactorDetail);
  fn failure(&mut self, context: FailureContext, failure: &Failure);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
  #[default]
  Pretty,
  Json,
}

#[derive(Debug)]
pub struct ViewModel {
  format: OutputFormat,
  stdout: Vec<String>,
  errors: Vec<String>,
  last_failure: Option<Failure>,
  shared_report: Option<ShareReport>,
  inline_reports: bool,
}

impl ViewModel {
  pub fn new(format: OutputFormat) -> Self {
    Self {
      format,
      stdout: Vec::new(),
      errors: Vec::new(),
      last_failure: None,
      shared_report: None,
      inline_reports: true,
    }
  }

  /// Keep share reports out of stdout, e.g. when they go to a file instead
  pub fn with_inline_reports(mut self, inline: bool) -> Self {
    self.inline_reports = inline;
    self
  }

  pub fn shared_report(&self) -> Option<&ShareReport> {
    self.shared_report.as_ref()
  }

  /// Text destined for stdout
  pub fn output(&self) -> String {
    self.stdout.join("\n")
  }

  /// Messages destined for stderr
  pub fn errors(&self) -> &[String] {
    &self.errors
  }

  pub fn last_failure(&self) -> Option<&Failure> {
    self.last_failure.as_ref()
  }

  fn push(&mut self, line: impl Into<String>) {
    self.stdout.push(line.into());
  }

  fn heading(&mut self, title: &str) {
    self.push(title.bold().underline().to_string());
  }

  fn push_json<T: Serialize>(&mut self, value: &T) {
    match serde_json::to_string_pretty(value) {
      Ok(json) => self.push(json),
      Err(e) => self.errors.push(format!("Failed to encode output: {e}")),
    }
  }

  fn is_json(&self) -> bool {
    self.format == OutputFormat::Json
  }
}

impl RenderSink for ViewModel {
  fn factors(&mut self, records: &[FactorRecord]) {
    if self.is_json() {
      return self.push_json(&records);
    }
    let width = records.iter().map(|r| r.name.chars().count()).max().unwrap_or(0);
    for record in records {
      self.push(format!("{:<width$}  {:>3}%", record.name, record.percentage));
    }
  }

  fn lookup(&mut self, record: &FactorRecord) {
    if self.is_json() {
      return self.push_json(record);
    }
    self.push(format!("{}%", record.percentage).yellow().bold().to_string());
    self.push(format!("of studied incidents involved {}", record.name.cyan()));
  }

  fn unknown_factor(&mut self, name: &str, known: &[&str]) {
    self.errors.push(format!("Unknown factor '{name}'. Known factors: {}", known.join(", ")));
  }

  fn empty_query(&mut self) {
    self.errors.push("Please enter a research question.".to_string());
  }

  fn answer(&mut self, query: &str, answer: &GroundedAnswer) {
    if self.is_json() {
      return self.push_json(answer);
    }

    self.heading(&format!("Research: {query}"));
    if !answer.sources.is_empty() {
      self.push("");
      self.heading("Grounded Sources");
      for (i, source) in answer.sources.iter().enumerate() {
        self.push(format!("[Source {}] {}", i + 1, source.title.blue()));
        self.push(format!("    {}", source.uri.dimmed()));
      }
    }

    self.push("");
    self.heading("Research Summary");
    let summary = answer.summary_text.clone().unwrap_or_else(|| NO_SUMMARY.to_string());
    self.push(summary);
  }

  fn report(&mut self, report: &ShareReport) {
    self.shared_report = Some(report.clone());
    if !self.inline_reports {
      return;
    }
    if self.is_json() {
      return self.push_json(report);
    }
    self.push("");
    self.push(report.full_text.clone());
  }

  fn detail(&mut self, factor: &str, detail: &FactorDetail) {
    if self.is_json() {
      return self.push_json(detail);
    }

    self.heading(factor);
    self.push("");
    self.heading("Definition");
    self.push(detail.definition.clone());
    self.push("");
    self.heading("Example Attack Scenario");
    self.push(detail.example.clone());
    self.push("");
    self.heading("Defense Tips");
    if detail.defense_tips.is_empty() {
      self.push("(no defense tips provided)");
    }
    for tip in &detail.defense_tips {
      self.push(format!("  • {tip}"));
    }
  }

  fn failure(&mut self, context: FailureContext, failure: &Failure) {
    let message = match context {
      FailureContext::Research => failure.message.clone(),
      FailureContext::Detail => format!("Failed to generate insights: {}", failure.message),
    };
    self.errors.push(message);
    self.last_failure = Some(failure.clone());

    if self.is_json() {
      self.push_json(failure);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::SourceRef;

  fn plain() -> ViewModel {
    colored::control::set_override(false);
    ViewModel::new(OutputFormat::Pretty)
  }

  #[test]
  fn test_factor_listing_is_aligned() {
    let mut view = plain();
    view.factors(&[
      FactorRecord { name: "Greed".into(), percentage: 6 },
      FactorRecord { name: "Authority".into(), percentage: 59 },
    ]);
    let output = view.output();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines, vec!["Greed        6%", "Authority   59%"]);
  }

  #[test]
  fn test_answer_without_summary_uses_fallback() {
    let mut view = plain();
    view.answer(
      "q",
      &GroundedAnswer {
        summary_text: None,
        sources: vec![SourceRef { uri: "https://x".into(), title: "X".into() }],
      },
    );
    let output = view.output();
    assert!(output.contains("[Source 1] X"));
    assert!(output.contains("https://x"));
    assert!(output.ends_with(NO_SUMMARY));
  }

  #[test]
  fn test_detail_sections() {
    let mut view = plain();
    view.detail(
      "Urgency",
      &FactorDetail {
        definition: "Pressure to act now.".into(),
        example: "Your account closes in 1 hour.".into(),
        defense_tips: vec!["Slow down".into(), "Verify out of band".into()],
      },
    );
    let output = view.output();
    let expected_sections =
      ["Definition", "Example Attack Scenario", "Defense Tips", "• Verify out of band"];
    for expected in expected_sections {
      assert!(output.contains(expected), "missing {expected}");
    }
  }

  #[test]
  fn test_detail_failure_message_is_prefixed() {
    let mut view = plain();
    view.failure(FailureContext::Detail, &Failure::malformed("invalid response structure"));
    assert_eq!(view.errors(), ["Failed to generate insights: invalid response structure"]);
    assert!(view.output().is_empty());
    assert!(view.last_failure().is_some());
  }

  #[test]
  fn test_report_can_be_kept_off_stdout() {
    let report = ShareReport::build(&GroundedAnswer::default(), "q", "u");

    let mut inline = plain();
    inline.report(&report);
    assert!(inline.output().contains("Research on: \"q\""));

    let mut detached = plain().with_inline_reports(false);
    detached.report(&report);
    assert!(detached.output().is_empty());
    assert_eq!(detached.shared_report(), Some(&report));
  }

  #[test]
  fn test_json_output() {
    let mut view = ViewModel::new(OutputFormat::Json);
    view.lookup(&FactorRecord { name: "Liking".into(), percentage: 8 });
    let value: serde_json::Value = serde_json::from_str(&view.output()).unwrap();
    assert_eq!(value["percentage"], 8);
  }

  #[test]
  fn test_json_failure_is_machine_readable() {
    let mut view = ViewModel::new(OutputFormat::Json);
    view.failure(FailureContext::Research, &Failure::no_results("none"));
    let value: serde_json::Value = serde_json::from_str(&view.output()).unwrap();
    assert_eq!(value["kind"], "no_results");
  }
}
