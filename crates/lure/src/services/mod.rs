pub mod detail;
pub mod research;

pub use detail::DetailQueryService;
pub use research::ResearchQueryService;

#[cfg(test)]
pub(crate) mod testing {
  use async_trait::async_trait;
  use std::sync::Mutex;
  use url::Url;

  use crate::api::types::{GenerateRequest, RawServiceResponse};
  use crate::api::RequestExecutor;
  use crate::error::RequestOutcome;

  /// Executor that answers every request with the same canned outcome
  pub struct StubExecutor {
    outcome: RequestOutcome<RawServiceResponse>,
    endpoints: Mutex<Vec<Url>>,
  }

  impl StubExecutor {
    pub fn replying(outcome: RequestOutcome<RawServiceResponse>) -> Self {
      Self { outcome, endpoints: Mutex::new(Vec::new()) }
    }

    pub fn calls(&self) -> usize {
      self.endpoints.lock().unwrap().len()
    }

    pub fn last_endpoint(&self) -> Option<Url> {
      self.endpoints.lock().unwrap().last().cloned()
    }
  }

  #[async_trait]
  impl RequestExecutor for StubExecutor {
    async fn execute(
      &self,
      endpoint: &Url,
      _payload: &GenerateRequest,
    ) -> RequestOutcome<RawServiceResponse> {
      self.endpoints.lock().unwrap().push(endpoint.clone());
      self.outcome.clone()
    }
  }
}
