//! Attempt loop: call the transport until success, a fatal failure, or the
//! attempt budget runs out.

use super::classify::classify;
use super::error::{DeliverError, TransportError};
use super::policy::{RetryDecision, RetryPolicy};
use crate::sink::ResultSink;
use crate::transport::Transport;
use std::time::Duration;
use url::Url;

/// Outcome of a successful `deliver` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delivery {
    /// Transport calls made, including the successful one.
    pub attempts: u32,
    /// Timeout that was in effect for the successful attempt.
    pub timeout: Duration,
}

/// Mutable loop state; lives for one `deliver` call only.
#[derive(Debug)]
struct AttemptState {
    attempts_made: u32,
    current_timeout: Duration,
}

impl AttemptState {
    fn new(policy: &RetryPolicy) -> Self {
        Self {
            attempts_made: 0,
            current_timeout: policy.initial_timeout,
        }
    }

    fn record_failure(&mut self, policy: &RetryPolicy) {
        self.attempts_made += 1;
        self.current_timeout = self
            .current_timeout
            .saturating_add(policy.timeout_increment);
    }
}

/// Sequential retry engine over a [`Transport`].
///
/// Each `deliver` call is independent; the engine itself holds no per-call
/// state, so one engine can serve concurrent calls for different targets.
#[derive(Debug, Clone)]
pub struct RetryEngine<T> {
    transport: T,
    policy: RetryPolicy,
}

impl<T: Transport> RetryEngine<T> {
    pub fn new(transport: T, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch `target` and hand the body to `sink` exactly once on success.
    ///
    /// Attempt `i` (1-based) uses `initial_timeout + (i - 1) * timeout_increment`.
    /// Policy and target are validated before the first transport call. The
    /// sink is never invoked on error, nor if this future is dropped early.
    pub async fn deliver<S>(&self, target: &str, sink: &mut S) -> Result<Delivery, DeliverError>
    where
        S: ResultSink + ?Sized,
    {
        self.policy.validate().map_err(DeliverError::InvalidPolicy)?;
        let url = parse_target(target)?;

        let mut state = AttemptState::new(&self.policy);
        loop {
            let attempt = state.attempts_made + 1;
            tracing::debug!(
                "GET {} attempt {}/{} timeout={:?}",
                url,
                attempt,
                self.policy.max_attempts,
                state.current_timeout
            );

            let err = match self.transport.get(&url, state.current_timeout).await {
                Ok(resp) if resp.is_success() => {
                    tracing::info!(
                        "GET {} succeeded on attempt {} (HTTP {}, {} bytes)",
                        url,
                        attempt,
                        resp.status,
                        resp.body.len()
                    );
                    sink.accept(resp.body);
                    return Ok(Delivery {
                        attempts: attempt,
                        timeout: state.current_timeout,
                    });
                }
                Ok(resp) => TransportError::Http(resp.status),
                Err(e) => e,
            };

            let kind = classify(&err);
            if self.policy.decide(kind) == RetryDecision::Fatal {
                tracing::error!(
                    "GET {} attempt {} not retryable ({:?}): {}",
                    url,
                    attempt,
                    kind,
                    err
                );
                return Err(DeliverError::Rejected { attempt, last: err });
            }

            state.record_failure(&self.policy);
            if state.attempts_made >= self.policy.max_attempts {
                tracing::error!(
                    "GET {} failed after {} attempts: {}",
                    url,
                    state.attempts_made,
                    err
                );
                return Err(DeliverError::Exhausted {
                    attempts: state.attempts_made,
                    last: err,
                });
            }
            tracing::warn!(
                "GET {} attempt {} failed ({:?}): {}; next timeout {:?}",
                url,
                attempt,
                kind,
                err,
                state.current_timeout
            );
        }
    }
}

/// Accept only absolute http(s) URLs.
fn parse_target(target: &str) -> Result<Url, DeliverError> {
    let invalid = |reason: String| DeliverError::InvalidTarget {
        target: target.to_string(),
        reason,
    };
    let url = Url::parse(target.trim()).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(format!("unsupported scheme {other:?}"))),
    }
}

#[cfg(test)]
mod tests;
