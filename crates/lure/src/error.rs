//! Failure values returned by every request path.

use serde::Serialize;
use thiserror::Error;

/// Why a request did not produce a usable result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
  /// Retries exhausted on rate limiting, server faults or transport errors
  Transient,
  /// Non-retryable rejection from the service (4xx other than 429)
  ApiError,
  /// Prompt or response stopped by the service's safety layer
  Blocked,
  /// Response shape or embedded JSON could not be understood
  MalformedResponse,
  /// Well-formed answer with nothing to show
  NoResults,
}

impl FailureKind {
  pub fn label(&self) -> &'static str {
    match self {
      FailureKind::Transient => "transient",
      FailureKind::ApiError => "api error",
      FailureKind::Blocked => "blocked",
      FailureKind::MalformedResponse => "malformed response",
      FailureKind::NoResults => "no results",
    }
  }
}

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{message}")]
pub struct Failure {
  pub kind: FailureKind,
  pub message: String,
}

impl Failure {
  pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
    Self { kind, message: message.into() }
  }

  pub fn transient(message: impl Into<String>) -> Self {
    Self::new(FailureKind::Transient, message)
  }

  pub fn api_error(message: impl Into<String>) -> Self {
    Self::new(FailureKind::ApiError, message)
  }

  pub fn blocked(message: impl Into<String>) -> Self {
    Self::new(FailureKind::Blocked, message)
  }

  pub fn malformed(message: impl Into<String>) -> Self {
    Self::new(FailureKind::MalformedResponse, message)
  }

  pub fn no_results(message: impl Into<String>) -> Self {
    Self::new(FailureKind::NoResults, message)
  }
}

/// Outcome of one logical request, atomic from the caller's side
pub type RequestOutcome<T> = std::result::Result<T, Failure>;
