//! Client side of the generative-language service contract.

pub mod executor;
pub mod normalize;
pub mod retry;
pub mod types;

pub use executor::{
  classify, HttpReply, ReqwestTransport, RequestExecutor, ResilientExecutor, Transport,
  TransportError,
};
pub use retry::{AttemptOutcome, RetryPolicy, RetryState, MAX_ATTEMPTS};
pub use types::{GenerateRequest, RawServiceResponse};
