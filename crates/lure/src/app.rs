//! Command dispatch: one input value in, one render call out.

use std::sync::Arc;

use crate::api::RequestExecutor;
use crate::config::{ApiConfig, ConfigError};
use crate::factors::{FactorProvider, FactorTable};
use crate::model::SearchQuery;
use crate::report::ShareReport;
use crate::services::{DetailQueryService, ResearchQueryService};
use crate::view::{FailureContext, RenderSink};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
  ListFactors,
  Lookup { factor: String },
  Explain { factor: String },
  Research { query: String, share: bool },
}

pub struct App {
  factors: FactorTable,
  research: ResearchQueryService,
  detail: DetailQueryService,
  share_url: String,
}

impl App {
  pub fn new(
    factors: FactorTable,
    executor: Arc<dyn RequestExecutor>,
    config: &ApiConfig,
  ) -> Result<Self, ConfigError> {
    let endpoint = config.endpoint()?;
    Ok(Self {
      factors,
      research: ResearchQueryService::new(Arc::clone(&executor), endpoint.clone()),
      detail: DetailQueryService::new(executor, endpoint),
      share_url: config.share_url.clone(),
    })
  }

  /// Run one command, rendering its result. Returns whether it succeeded.
  pub async fn dispatch(&self, command: Command, view: &mut impl RenderSink) -> bool {
    match command {
      Command::ListFactors => {
        view.factors(self.factors.records());
        true
      }
      Command::Lookup { factor } => match self.factors.find(&factor) {
        Some(record) => {
          view.lookup(record);
          true
        }
        None => {
          view.unknown_factor(&factor, &self.factors.names());
          false
        }
      },
      Command::Explain { factor } => {
        let Some(record) = self.factors.find(&factor) else {
          view.unknown_factor(&factor, &self.factors.names());
          return false;
        };

        match self.detail.run(&record.name).await {
          Ok(detail) => {
            view.detail(&record.name, &detail);
            true
          }
          Err(failure) => {
            view.failure(FailureContext::Detail, &failure);
            false
          }
        }
      }
      Command::Research { query, share } => {
        let Some(query) = SearchQuery::new(&query) else {
          view.empty_query();
          return false;
        };

        match self.research.run(&query).await {
          Ok(answer) => {
            view.answer(query.text(), &answer);
            if share {
              view.report(&ShareReport::build(&answer, query.text(), &self.share_url));
            }
            true
          }
          Err(failure) => {
            view.failure(FailureContext::Research, &failure);
            false
          }
        }
      }
    }
  }
}
