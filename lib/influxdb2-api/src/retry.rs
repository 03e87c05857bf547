//! Retry decisions for API requests.
//!
//! After every attempt the request builder asks its [`RetryHook`] whether to
//! try again. [`RetryPolicy`] is the stock hook: bounded, with a backoff.
//!
//! ```
//! use std::time::Duration;
//! use influxdb2_api::retry::{Backoff, RetryPolicy};
//!
//! let policy = RetryPolicy::new(3).with_backoff(Backoff::Exponential {
//!     initial: Duration::from_millis(100),
//!     max: Duration::from_secs(2),
//! });
//! assert_eq!(policy.max_retries(), 3);
//! ```

use std::time::Duration;

use crate::{RawResponse, TransportError};

/// What to do after an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Send the request again after the delay.
    Retry(Duration),
    /// Keep this outcome.
    Stop,
}

/// Decides whether an attempt is retried.
///
/// `attempt` counts from 1 for the first call. Closures
/// `Fn(u32, &RawResponse) -> RetryDecision` implement this trait.
pub trait RetryHook: Send + Sync + 'static {
    /// Decide after `attempt` produced `outcome`.
    fn decide(&self, attempt: u32, outcome: &RawResponse) -> RetryDecision;
}

impl<F> RetryHook for F
where
    F: Fn(u32, &RawResponse) -> RetryDecision + Send + Sync + 'static,
{
    fn decide(&self, attempt: u32, outcome: &RawResponse) -> RetryDecision {
        self(attempt, outcome)
    }
}

/// Delay between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backoff {
    /// Retry immediately.
    #[default]
    None,
    /// Same delay every time.
    Fixed(Duration),
    /// `initial * 2^(retry - 1)`, capped at `max`.
    Exponential {
        /// Delay before the first retry.
        initial: Duration,
        /// Upper bound.
        max: Duration,
    },
}

impl Backoff {
    /// Delay before retry number `retry` (1-based).
    #[must_use]
    pub fn delay(&self, retry: u32) -> Duration {
        match *self {
            Self::None => Duration::ZERO,
            Self::Fixed(delay) => delay,
            Self::Exponential { initial, max } => {
                let factor = 2_u32.saturating_pow(retry.saturating_sub(1));
                initial.saturating_mul(factor).min(max)
            }
        }
    }
}

/// Bounded retry policy.
///
/// Retries:
/// - connection errors and timeouts
/// - 5xx server errors
/// - 429 Too Many Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
    backoff: Backoff,
}

impl RetryPolicy {
    /// Create a policy allowing `max_retries` retries, without delay.
    #[must_use]
    pub const fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            backoff: Backoff::None,
        }
    }

    /// Set the backoff.
    #[must_use]
    pub const fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    /// Maximum number of retries.
    #[must_use]
    pub const fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Returns `true` if the status should be retried.
    fn should_retry_status(status: u16) -> bool {
        status >= 500 || status == 429
    }

    /// Returns `true` if the error should be retried.
    fn should_retry_error(error: &TransportError) -> bool {
        matches!(error, TransportError::Connection(_) | TransportError::Timeout)
    }
}

impl RetryHook for RetryPolicy {
    fn decide(&self, attempt: u32, outcome: &RawResponse) -> RetryDecision {
        if attempt > self.max_retries {
            return RetryDecision::Stop;
        }

        let should_retry = match (outcome.error(), outcome.status()) {
            (Some(error), _) => Self::should_retry_error(error),
            (None, Some(status)) => Self::should_retry_status(status),
            (None, None) => false,
        };

        if should_retry {
            RetryDecision::Retry(self.backoff.delay(attempt))
        } else {
            RetryDecision::Stop
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use bytes::Bytes;

    use super::*;
    use crate::Response;

    fn status(code: u16) -> RawResponse {
        RawResponse::completed(Response::new(code, HashMap::new(), Bytes::new()))
    }

    #[test]
    fn retries_5xx_and_429() {
        let policy = RetryPolicy::new(3);
        assert_eq!(policy.decide(1, &status(500)), RetryDecision::Retry(Duration::ZERO));
        assert_eq!(policy.decide(1, &status(503)), RetryDecision::Retry(Duration::ZERO));
        assert_eq!(policy.decide(1, &status(429)), RetryDecision::Retry(Duration::ZERO));
    }

    #[test]
    fn does_not_retry_success_or_client_errors() {
        let policy = RetryPolicy::new(3);
        assert_eq!(policy.decide(1, &status(200)), RetryDecision::Stop);
        assert_eq!(policy.decide(1, &status(400)), RetryDecision::Stop);
        assert_eq!(policy.decide(1, &status(404)), RetryDecision::Stop);
    }

    #[test]
    fn transport_errors() {
        let policy = RetryPolicy::new(1);
        let refused = RawResponse::failed(TransportError::Connection("refused".into()));
        assert!(matches!(policy.decide(1, &refused), RetryDecision::Retry(_)));
        assert!(matches!(
            policy.decide(1, &RawResponse::failed(TransportError::Timeout)),
            RetryDecision::Retry(_)
        ));
        assert_eq!(
            policy.decide(1, &RawResponse::failed(TransportError::Tls("bad cert".into()))),
            RetryDecision::Stop
        );
        assert_eq!(
            policy.decide(1, &RawResponse::failed(TransportError::Cancelled)),
            RetryDecision::Stop
        );
        assert_eq!(policy.decide(1, &RawResponse::default()), RetryDecision::Stop);
    }

    #[test]
    fn bounded() {
        let policy = RetryPolicy::new(2);
        assert!(matches!(policy.decide(2, &status(500)), RetryDecision::Retry(_)));
        assert_eq!(policy.decide(3, &status(500)), RetryDecision::Stop);

        assert_eq!(RetryPolicy::new(0).decide(1, &status(500)), RetryDecision::Stop);
    }

    #[test]
    fn exponential_backoff() {
        let backoff = Backoff::Exponential {
            initial: Duration::from_millis(100),
            max: Duration::from_millis(350),
        };
        assert_eq!(backoff.delay(1), Duration::from_millis(100));
        assert_eq!(backoff.delay(2), Duration::from_millis(200));
        assert_eq!(backoff.delay(3), Duration::from_millis(350));
        assert_eq!(backoff.delay(40), Duration::from_millis(350));
    }

    #[test]
    fn closures_are_hooks() {
        let hook = |attempt: u32, _: &RawResponse| {
            if attempt < 2 {
                RetryDecision::Retry(Duration::from_millis(5))
            } else {
                RetryDecision::Stop
            }
        };
        assert_eq!(hook.decide(1, &status(200)), RetryDecision::Retry(Duration::from_millis(5)));
        assert_eq!(hook.decide(2, &status(200)), RetryDecision::Stop);
    }
}
