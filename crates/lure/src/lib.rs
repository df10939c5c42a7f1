//! Lure - social engineering factor lookup and grounded research
//!
//! Looks up how often each psychological factor appears in social engineering
//! incidents, and asks a generative-language service for cited research
//! summaries and structured factor explanations.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod factors;
pub mod model;
pub mod report;
pub mod services;
pub mod view;

pub use error::{Failure, FailureKind, RequestOutcome};
pub use model::{FactorDetail, GroundedAnswer, SearchQuery, SourceRef};
