//! Error types for transport attempts and for the `deliver` call as a whole.

/// Failure of a single attempt. Absorbed by the retry loop unless it is the last one.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Curl reported an error (timeout, connection, etc.).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// Response had a non-2xx status.
    #[error("HTTP {0}")]
    Http(u32),
    /// The blocking task running the transfer panicked or was cancelled.
    #[error("transfer task failed: {0}")]
    Join(String),
}

/// Terminal outcome of a failed `deliver` call.
#[derive(Debug, thiserror::Error)]
pub enum DeliverError {
    /// Policy invariants do not hold; no attempt was made.
    #[error("invalid retry policy: {0}")]
    InvalidPolicy(String),
    /// Target is not an absolute http(s) URL; no attempt was made.
    #[error("invalid target {target:?}: {reason}")]
    InvalidTarget { target: String, reason: String },
    /// Every permitted attempt failed.
    #[error("gave up after {attempts} attempts, last error: {last}")]
    Exhausted {
        attempts: u32,
        #[source]
        last: TransportError,
    },
    /// An attempt failed in a way the policy does not retry (4xx with
    /// `retry_client_errors` off).
    #[error("attempt {attempt} failed without retry: {last}")]
    Rejected {
        attempt: u32,
        #[source]
        last: TransportError,
    },
}

impl DeliverError {
    /// Number of transport calls made before this error was returned.
    pub fn attempts(&self) -> u32 {
        match self {
            DeliverError::InvalidPolicy(_) | DeliverError::InvalidTarget { .. } => 0,
            DeliverError::Exhausted { attempts, .. } => *attempts,
            DeliverError::Rejected { attempt, .. } => *attempt,
        }
    }
}
