//! Turn raw `generateContent` responses into typed results.

use super::types::{Candidate, RawServiceResponse};
use crate::error::{Failure, RequestOutcome};
use crate::model::{FactorDetail, GroundedAnswer, SourceRef};

pub const INVALID_STRUCTURE: &str = "invalid response structure";
pub const SAFETY_BLOCK: &str = "response blocked for safety or recitation reasons";

const BLOCKING_FINISH_REASONS: [&str; 2] = ["SAFETY", "RECITATION"];

/// Pick the first candidate, or say why there is none
pub fn extract_candidate(raw: RawServiceResponse) -> RequestOutcome<Candidate> {
  let candidate = raw.candidates.and_then(|candidates| candidates.into_iter().next());

  let Some(candidate) = candidate else {
    let block_reason = raw
      .prompt_feedback
      .and_then(|feedback| feedback.block_reason)
      .filter(|reason| !reason.is_empty());

    return Err(match block_reason {
      Some(reason) => Failure::blocked(format!("Query blocked: {reason}")),
      None => Failure::malformed(INVALID_STRUCTURE),
    });
  };

  let blocked_finish = candidate
    .finish_reason
    .as_deref()
    .is_some_and(|reason| BLOCKING_FINISH_REASONS.contains(&reason));
  if blocked_finish {
    return Err(Failure::blocked(SAFETY_BLOCK));
  }

  Ok(candidate)
}

fn primary_text(candidate: &Candidate) -> Option<&str> {
  candidate.content.as_ref()?.first_text().filter(|text| !text.is_empty())
}

/// Summary text and cited sources; either may be empty
pub fn to_grounded_answer(candidate: &Candidate) -> GroundedAnswer {
  let summary_text = primary_text(candidate).map(str::to_string);

  let sources = candidate
    .grounding_metadata
    .as_ref()
    .and_then(|metadata| metadata.grounding_attributions.as_ref())
    .map(|attributions| {
      attributions
        .iter()
        .filter_map(|attribution| {
          let web = attribution.web.as_ref()?;
          let uri = web.uri.as_deref().filter(|uri| !uri.is_empty())?;
          let title = web.title.as_deref().filter(|title| !title.is_empty())?;
          Some(SourceRef { uri: uri.to_string(), title: title.to_string() })
        })
        .collect()
    })
    .unwrap_or_default();

  GroundedAnswer { summary_text, sources }
}

/// Parse the candidate's JSON text as a factor explanation
pub fn to_factor_detail(candidate: &Candidate) -> RequestOutcome<FactorDetail> {
  let text = primary_text(candidate).ok_or_else(|| Failure::malformed(INVALID_STRUCTURE))?;
  FactorDetail::from_json(text)
}
