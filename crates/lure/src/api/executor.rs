//! Resilient POST executor for the generative-language service.
//!
//! Each attempt is reported as a `tracing` event carrying `request_id` and
//! `attempt` fields. The executor itself keeps no state between requests.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;
use url::Url;

use super::retry::{transition, AttemptOutcome, RetryPolicy, RetryState};
use super::types::{ErrorEnvelope, GenerateRequest, RawServiceResponse};
use crate::config::ApiConfig;
use crate::error::{Failure, RequestOutcome};

/// Raised when no HTTP response was obtained at all
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Request failed: {0}")]
pub struct TransportError(pub String);

/// Status line and body of one HTTP exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
  pub status: u16,
  pub status_text: String,
  pub body: String,
}

/// One network round trip. Implementations must not retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
  async fn post_json(&self, url: &Url, body: &serde_json::Value)
    -> Result<HttpReply, TransportError>;
}

pub struct ReqwestTransport {
  client: Client,
}

impl ReqwestTransport {
  pub fn new(timeout: Duration) -> Result<Self, TransportError> {
    let client = Client::builder()
      .timeout(timeout)
      .build()
      .map_err(|e| TransportError(format!("Failed to create HTTP client: {e}")))?;
    Ok(Self { client })
  }
}

#[async_trait]
impl Transport for ReqwestTransport {
  async fn post_json(
    &self,
    url: &Url,
    body: &serde_json::Value,
  ) -> Result<HttpReply, TransportError> {
    let response = self
      .client
      .post(url.clone())
      .json(body)
      .send()
      .await
      .map_err(|e| TransportError(e.without_url().to_string()))?;

    let status = response.status();
    let body = response.text().await.map_err(|e| TransportError(e.without_url().to_string()))?;

    Ok(HttpReply {
      status: status.as_u16(),
      status_text: status.canonical_reason().unwrap_or_default().to_string(),
      body,
    })
  }
}

/// Seam the query services depend on
#[async_trait]
pub trait RequestExecutor: Send + Sync {
  async fn execute(
    &self,
    endpoint: &Url,
    payload: &GenerateRequest,
  ) -> RequestOutcome<RawServiceResponse>;
}

/// Sort one HTTP reply into success, retryable, or terminal
pub fn classify(reply: HttpReply) -> AttemptOutcome<RawServiceResponse> {
  let status = reply.status;

  if status == 429 || (500..600).contains(&status) {
    return AttemptOutcome::Transient(format!("Server error (status {status})"));
  }

  if !(200..300).contains(&status) {
    let message = ErrorEnvelope::message_from(&reply.body).unwrap_or_else(|| {
      if reply.status_text.is_empty() {
        format!("HTTP {status}")
      } else {
        reply.status_text.clone()
      }
    });
    return AttemptOutcome::Terminal(Failure::api_error(message));
  }

  match serde_json::from_str::<RawServiceResponse>(&reply.body) {
    Ok(raw) => AttemptOutcome::Success(raw),
    Err(e) => AttemptOutcome::Terminal(Failure::malformed(format!(
      "Failed to parse service response: {e}"
    ))),
  }
}

pub struct ResilientExecutor {
  transport: Box<dyn Transport>,
  policy: RetryPolicy,
}

impl ResilientExecutor {
  /// Executor backed by a real HTTP client built from `config`
  pub fn from_config(config: &ApiConfig) -> Result<Self, TransportError> {
    let transport = ReqwestTransport::new(config.timeout())?;
    let policy = RetryPolicy::new(config.max_attempts, config.base_delay());
    Ok(Self::with_transport(Box::new(transport), policy))
  }

  /// Executor over an injected transport (used by tests)
  pub fn with_transport(transport: Box<dyn Transport>, policy: RetryPolicy) -> Self {
    Self { transport, policy }
  }

  async fn attempt(
    &self,
    endpoint: &Url,
    body: &serde_json::Value,
    attempt: u32,
    request_id: &str,
  ) -> AttemptOutcome<RawServiceResponse> {
    tracing::trace!(attempt, path = endpoint.path(), "sending generateContent request");

    let outcome = match self.transport.post_json(endpoint, body).await {
      Ok(reply) => classify(reply),
      Err(e) => AttemptOutcome::Transient(e.to_string()),
    };

    match &outcome {
      AttemptOutcome::Success(_) => tracing::info!(request_id, attempt, "ok"),
      AttemptOutcome::Transient(message) => tracing::warn!(request_id, attempt, "{message}"),
      AttemptOutcome::Terminal(failure) => {
        tracing::info!(request_id, attempt, kind = failure.kind.label(), "{}", failure.message)
      }
    }

    outcome
  }
}

#[async_trait]
impl RequestExecutor for ResilientExecutor {
  async fn execute(
    &self,
    endpoint: &Url,
    payload: &GenerateRequest,
  ) -> RequestOutcome<RawServiceResponse> {
    let body = serde_json::to_value(payload)
      .map_err(|e| Failure::malformed(format!("Failed to encode request: {e}")))?;
    let request_id = uuid::Uuid::new_v4().to_string();

    let mut state = RetryState::start();
    loop {
      state = match state {
        RetryState::Attempting { attempt } => {
          let outcome = self.attempt(endpoint, &body, attempt, &request_id).await;
          transition(RetryState::Attempting { attempt }, outcome, &self.policy)
        }
        backing_off @ RetryState::BackingOff { .. } => {
          sleep(backing_off.backoff_delay()).await;
          backing_off.wake()
        }
        RetryState::Succeeded(raw) => return Ok(raw),
        RetryState::FailedTerminal(failure) => return Err(failure),
      };
    }
  }
}
