//! Retry engine with timeout escalation.
//!
//! This module owns the attempt loop, error classification (timeouts,
//! connection failures, HTTP status) and the policy that decides what each
//! failure means. There is no sleep between attempts; instead every failure
//! raises the next attempt's timeout by a fixed increment.

mod classify;
mod error;
mod policy;
mod run;

pub use classify::{classify, classify_curl_error, classify_http_status};
pub use error::{DeliverError, TransportError};
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::{Delivery, RetryEngine};
