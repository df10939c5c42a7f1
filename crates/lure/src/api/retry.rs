//! Retry as an explicit state machine.
//!
//! `transition` is pure: it never sleeps and never performs I/O, so the whole
//! retry schedule can be checked without a network or a clock. The executor
//! drives it, sleeping on `BackingOff` and attempting on `Attempting`.

use std::time::Duration;

use crate::error::Failure;

/// Hard ceiling on attempts per request, including the first
pub const MAX_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
  max_attempts: u32,
  base_delay: Duration,
}

impl Default for RetryPolicy {
  fn default() -> Self {
    Self { max_attempts: MAX_ATTEMPTS, base_delay: Duration::from_secs(1) }
  }
}

impl RetryPolicy {
  /// `max_attempts` is clamped to `1..=MAX_ATTEMPTS`
  pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
    Self { max_attempts: max_attempts.clamp(1, MAX_ATTEMPTS), base_delay }
  }

  pub fn max_attempts(&self) -> u32 {
    self.max_attempts
  }

  /// Delay slept after failed attempt `attempt` (1-based): base, 2×base, 4×base, ...
  pub fn delay_after(&self, attempt: u32) -> Duration {
    let exponent = attempt.saturating_sub(1).min(31);
    self.base_delay.saturating_mul(1u32 << exponent)
  }
}

/// What a single attempt produced
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptOutcome<T> {
  Success(T),
  /// Worth retrying; carries the message reported if retries run out
  Transient(String),
  /// Not worth retrying
  Terminal(Failure),
}

#[derive(Debug, Clone, PartialEq)]
pub enum RetryState<T> {
  Attempting { attempt: u32 },
  BackingOff { next_attempt: u32, delay: Duration, last_error: String },
  Succeeded(T),
  FailedTerminal(Failure),
}

impl<T> RetryState<T> {
  pub fn start() -> Self {
    RetryState::Attempting { attempt: 1 }
  }

  pub fn is_finished(&self) -> bool {
    matches!(self, RetryState::Succeeded(_) | RetryState::FailedTerminal(_))
  }

  /// How long to wait before the next attempt; zero outside `BackingOff`
  pub fn backoff_delay(&self) -> Duration {
    match self {
      RetryState::BackingOff { delay, .. } => *delay,
      _ => Duration::ZERO,
    }
  }

  /// Leave `BackingOff` once its delay has elapsed; other states are returned as-is
  pub fn wake(self) -> Self {
    match self {
      RetryState::BackingOff { next_attempt, .. } => {
        RetryState::Attempting { attempt: next_attempt }
      }
      other => other,
    }
  }
}

/// Apply the outcome of an attempt to the current state.
///
/// Outcomes only move an `Attempting` state; any other state is returned unchanged.
pub fn transition<T>(
  state: RetryState<T>,
  outcome: AttemptOutcome<T>,
  policy: &RetryPolicy,
) -> RetryState<T> {
  let attempt = match state {
    RetryState::Attempting { attempt } => attempt,
    other => return other,
  };

  match outcome {
    AttemptOutcome::Success(value) => RetryState::Succeeded(value),
    AttemptOutcome::Terminal(failure) => RetryState::FailedTerminal(failure),
    AttemptOutcome::Transient(message) if attempt >= policy.max_attempts => {
      RetryState::FailedTerminal(Failure::transient(message))
    }
    AttemptOutcome::Transient(message) => RetryState::BackingOff {
      next_attempt: attempt + 1,
      delay: policy.delay_after(attempt),
      last_error: message,
    },
  }
}
