//! Structured explanation of a single factor.

use serde_json::json;
use std::sync::Arc;
use url::Url;

use crate::api::normalize::{extract_candidate, to_factor_detail};
use crate::api::types::{Content, GenerateRequest, GenerationConfig};
use crate::api::RequestExecutor;
use crate::error::RequestOutcome;
use crate::model::FactorDetail;

pub const DETAIL_SYSTEM_PROMPT: &str = "You are a cybersecurity training expert.
You provide clear, concise, and helpful information.
The user will provide a psychological factor.
You MUST respond ONLY with a JSON object matching the requested schema.";

/// Slightly creative so the example scenarios vary
pub const DETAIL_TEMPERATURE: f32 = 0.5;

pub fn user_prompt(factor_name: &str) -> String {
  format!(
    "For the social engineering principle \"{factor_name}\", please provide:
1. A brief 'definition' (1-2 sentences).
2. A realistic 'example' attack scenario (as a short paragraph, email, or script).
3. A list of 3-5 scannable 'defense_tips' for an end-user."
  )
}

/// Response schema mirroring `FactorDetail`
pub fn response_schema() -> serde_json::Value {
  json!({
    "type": "OBJECT",
    "properties": {
      "definition": { "type": "STRING" },
      "example": { "type": "STRING" },
      "defense_tips": {
        "type": "ARRAY",
        "items": { "type": "STRING" }
      }
    },
    "required": ["definition", "example", "defense_tips"]
  })
}

pub struct DetailQueryService {
  executor: Arc<dyn RequestExecutor>,
  endpoint: Url,
}

impl DetailQueryService {
  pub fn new(executor: Arc<dyn RequestExecutor>, endpoint: Url) -> Self {
    Self { executor, endpoint }
  }

  pub fn build_payload(factor_name: &str) -> GenerateRequest {
    GenerateRequest {
      contents: vec![Content::user(user_prompt(factor_name))],
      system_instruction: Some(Content::from_text(DETAIL_SYSTEM_PROMPT)),
      tools: None,
      generation_config: Some(GenerationConfig {
        response_mime_type: "application/json".to_string(),
        response_schema: response_schema(),
        temperature: DETAIL_TEMPERATURE,
      }),
    }
  }

  pub async fn run(&self, factor_name: &str) -> RequestOutcome<FactorDetail> {
    let payload = Self::build_payload(factor_name);
    let raw = self.executor.execute(&self.endpoint, &payload).await?;
    let candidate = extract_candidate(raw)?;
    to_factor_detail(&candidate)
  }
}
