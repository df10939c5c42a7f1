use serde::{Deserialize, Serialize};

use crate::error::{Failure, RequestOutcome};

/// A user's research question, trimmed and guaranteed non-empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
  text: String,
}

impl SearchQuery {
  pub fn new(raw: &str) -> Option<Self> {
    let text = raw.trim();
    if text.is_empty() {
      return None;
    }
    Some(Self { text: text.to_string() })
  }

  pub fn text(&self) -> &str {
    &self.text
  }
}

/// A cited web source; both fields are always non-empty
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
  pub uri: String,
  pub title: String,
}

/// Summary plus the sources it was grounded on
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundedAnswer {
  pub summary_text: Option<String>,
  pub sources: Vec<SourceRef>,
}

impl GroundedAnswer {
  pub fn is_empty(&self) -> bool {
    self.summary_text.is_none() && self.sources.is_empty()
  }
}

/// Structured explanation of one factor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactorDetail {
  pub definition: String,
  pub example: String,
  pub defense_tips: Vec<String>,
}

impl FactorDetail {
  /// Parse the JSON object the structured-generation endpoint replies with
  pub fn from_json(text: &str) -> RequestOutcome<Self> {
    serde_json::from_str(text)
      .map_err(|e| Failure::malformed(format!("Failed to parse factor details: {e}")))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::FailureKind;

  #[test]
  fn test_search_query_trims() {
    let query = SearchQuery::new("  pretexting losses \n").unwrap();
    assert_eq!(query.text(), "pretexting losses");
  }

  #[test]
  fn test_search_query_rejects_blank() {
    assert!(SearchQuery::new("").is_none());
    assert!(SearchQuery::new("   \t").is_none());
  }

  #[test]
  fn test_factor_detail_from_json() {
    let detail =
      FactorDetail::from_json(r#"{"definition":"d","example":"e","defense_tips":["t1","t2"]}"#)
        .unwrap();
    assert_eq!(detail.defense_tips, vec!["t1", "t2"]);
  }

  #[test]
  fn test_factor_detail_empty_tips_are_legal() {
    let detail = FactorDetail::from_json(r#"{"definition":"d","example":"e","defense_tips":[]}"#);
    assert!(detail.unwrap().defense_tips.is_empty());
  }

  #[test]
  fn test_factor_detail_missing_field() {
    let failure = FactorDetail::from_json(r#"{"definition":"d","example":"e"}"#).unwrap_err();
    assert_eq!(failure.kind, FailureKind::MalformedResponse);
    assert!(failure.message.contains("defense_tips"));
  }

  #[test]
  fn test_grounded_answer_emptiness() {
    assert!(GroundedAnswer::default().is_empty());
    let answer = GroundedAnswer { summary_text: Some("s".into()), sources: vec![] };
    assert!(!answer.is_empty());
  }
}
