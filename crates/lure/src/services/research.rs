//! Grounded web research on a free-text question.

use std::sync::Arc;
use url::Url;

use crate::api::normalize::{extract_candidate, to_grounded_answer};
use crate::api::types::{Content, GenerateRequest, GoogleSearch, Tool};
use crate::api::RequestExecutor;
use crate::error::{Failure, RequestOutcome};
use crate::model::{GroundedAnswer, SearchQuery};

pub const NO_RESULTS: &str = "no relevant results found for this specific query";

pub const RESEARCH_SYSTEM_PROMPT: &str = "You are an academic cybersecurity research assistant.
Your purpose is to find and summarize scholarly articles, conference papers, and reports from known cybersecurity institutions (e.g., NIST, ENISA, ACM, IEEE).
You MUST follow these rules:
1. Your summary MUST be a direct synthesis of the information found in the provided Google Search sources.
2. **This is the most important rule:** You MUST cite your sources using inline notations like [Source 1], [Source 2], etc.
3. Each notation must correspond to the numbered source in the 'Grounded Sources' list.
4. **When listing sources:** Prioritize academic papers and official reports. If a source is from a known academic database (e.g., 'ACM Digital Library', 'IEEE Xplore', 'Springer') or institution ('NIST', 'ENISA'), you MUST name it in the source title.
5. Example of a good source title: \"[IEEE Xplore] A new framework for deepfake detection.\"
6. If no academic sources are found, you may use high-quality, reputable news reports as a secondary option.
7. Focus on:
   a) Clear definitions of psychological factors.
   b) Specific cases of financial or data loss from these attacks.";

pub struct ResearchQueryService {
  executor: Arc<dyn RequestExecutor>,
  endpoint: Url,
}

impl ResearchQueryService {
  pub fn new(executor: Arc<dyn RequestExecutor>, endpoint: Url) -> Self {
    Self { executor, endpoint }
  }

  /// Request body: the query as the only message, search grounding enabled
  pub fn build_payload(query: &SearchQuery) -> GenerateRequest {
    GenerateRequest {
      contents: vec![Content::from_text(query.text())],
      system_instruction: Some(Content::from_text(RESEARCH_SYSTEM_PROMPT)),
      tools: Some(vec![Tool { google_search: GoogleSearch {} }]),
      generation_config: None,
    }
  }

  pub async fn run(&self, query: &SearchQuery) -> RequestOutcome<GroundedAnswer> {
    let payload = Self::build_payload(query);
    let raw = self.executor.execute(&self.endpoint, &payload).await?;
    let candidate = extract_candidate(raw)?;
    let answer = to_grounded_answer(&candidate);

    if answer.is_empty() {
      return Err(Failure::no_results(NO_RESULTS));
    }

    tracing::debug!(sources = answer.sources.len(), "grounded answer ready");
    Ok(answer)
  }
}
