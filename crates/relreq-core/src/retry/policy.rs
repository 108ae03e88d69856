use std::time::Duration;

/// High-level classification of a failed attempt.
///
/// Callers map curl errors and HTTP status codes into these kinds; the
/// policy decides what each kind means for the attempt loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Operation timed out (connect or total transfer).
    Timeout,
    /// Network-level failure (connection refused/reset, DNS, etc.).
    Connection,
    /// Server error (5xx).
    Http5xx(u16),
    /// Client error (4xx).
    Http4xx(u16),
    /// Any other non-2xx status (1xx, 3xx left unfollowed).
    HttpOther(u16),
    /// Any other transport failure.
    Other,
}

/// Decision returned by the retry policy for a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Consume one attempt, escalate the timeout, try again.
    Retry,
    /// Stop immediately and surface the failure.
    Fatal,
}

/// Attempt budget and timeout escalation for one `deliver` call.
///
/// There is no sleep between attempts: the per-attempt timeout grows by
/// `timeout_increment` after every failure, and that growth is the backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first). Must be >= 1.
    pub max_attempts: u32,
    /// Timeout of the first attempt. Must be non-zero.
    pub initial_timeout: Duration,
    /// Added to the timeout after each failed attempt.
    pub timeout_increment: Duration,
    /// Whether 4xx responses consume an attempt (true) or end the call (false).
    pub retry_client_errors: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            initial_timeout: Duration::from_secs(1),
            timeout_increment: Duration::from_secs(5),
            retry_client_errors: true,
        }
    }
}

impl RetryPolicy {
    /// Check the invariants. Returns a human-readable reason on failure.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_attempts < 1 {
            return Err(format!(
                "max_attempts must be at least 1, got {}",
                self.max_attempts
            ));
        }
        if self.initial_timeout.is_zero() {
            return Err("initial_timeout must be positive".to_string());
        }
        Ok(())
    }

    /// Timeout used for the given attempt (1-based):
    /// `initial_timeout + (attempt - 1) * timeout_increment`, saturating.
    pub fn timeout_for(&self, attempt: u32) -> Duration {
        let steps = attempt.saturating_sub(1);
        self.initial_timeout
            .saturating_add(self.timeout_increment.saturating_mul(steps))
    }

    /// Decide what a failed attempt of the given kind means for the loop.
    pub fn decide(&self, kind: ErrorKind) -> RetryDecision {
        match kind {
            ErrorKind::Http4xx(_) if !self.retry_client_errors => RetryDecision::Fatal,
            ErrorKind::Timeout
            | ErrorKind::Connection
            | ErrorKind::Http5xx(_)
            | ErrorKind::Http4xx(_)
            | ErrorKind::HttpOther(_)
            | ErrorKind::Other => RetryDecision::Retry,
        }
    }
}
