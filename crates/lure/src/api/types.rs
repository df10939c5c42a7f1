//! Wire types for the `generateContent` service contract.
//!
//! Every response field is optional so that shape problems surface from the
//! normalizer as named failures instead of deserialization errors.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub text: Option<String>,
}

impl Part {
  pub fn text(text: impl Into<String>) -> Self {
    Self { text: Some(text.into()) }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub role: Option<String>,
  #[serde(default)]
  pub parts: Option<Vec<Part>>,
}

impl Content {
  pub fn from_text(text: impl Into<String>) -> Self {
    Self { role: None, parts: Some(vec![Part::text(text)]) }
  }

  pub fn user(text: impl Into<String>) -> Self {
    Self { role: Some("user".to_string()), ..Self::from_text(text) }
  }

  /// Text of the first part, if any
  pub fn first_text(&self) -> Option<&str> {
    self.parts.as_ref()?.first()?.text.as_deref()
  }
}

// --- Requests ---

/// Enables web-grounded search on a request
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GoogleSearch {}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tool {
  pub google_search: GoogleSearch,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
  pub response_mime_type: String,
  pub response_schema: serde_json::Value,
  pub temperature: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
  pub contents: Vec<Content>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub system_instruction: Option<Content>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub tools: Option<Vec<Tool>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub generation_config: Option<GenerationConfig>,
}

// --- Responses ---

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawServiceResponse {
  #[serde(default)]
  pub candidates: Option<Vec<Candidate>>,
  #[serde(default)]
  pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
  #[serde(default)]
  pub content: Option<Content>,
  #[serde(default)]
  pub finish_reason: Option<String>,
  #[serde(default)]
  pub grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingMetadata {
  #[serde(default)]
  pub grounding_attributions: Option<Vec<GroundingAttribution>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroundingAttribution {
  #[serde(default)]
  pub web: Option<WebSource>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebSource {
  #[serde(default)]
  pub uri: Option<String>,
  #[serde(default)]
  pub title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
  #[serde(default)]
  pub block_reason: Option<String>,
}

/// `{ "error": { "message": ... } }` bodies on rejected requests
#[derive(Debug, Default, Deserialize)]
pub struct ErrorEnvelope {
  #[serde(default)]
  pub error: Option<ErrorDetail>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ErrorDetail {
  #[serde(default)]
  pub message: Option<String>,
}

impl ErrorEnvelope {
  /// The service's own message, when the body carries one
  pub fn message_from(body: &str) -> Option<String> {
    let envelope: ErrorEnvelope = serde_json::from_str(body).ok()?;
    envelope.error?.message.filter(|m| !m.is_empty())
  }
}
