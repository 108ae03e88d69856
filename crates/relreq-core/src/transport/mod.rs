//! Single-attempt HTTP GET.
//!
//! The retry engine only sees the [`Transport`] trait; production code uses
//! [`CurlTransport`] (libcurl on tokio's blocking pool), tests plug in
//! scripted transports.

mod easy;

pub use easy::{CurlOptions, CurlTransport};

use crate::retry::TransportError;
use std::future::Future;
use std::time::Duration;
use url::Url;

/// Status and fully read body of one attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u32,
    pub body: Vec<u8>,
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs exactly one network call per `get`.
///
/// Implementations must give up once `timeout` has elapsed and report that as
/// an error. Non-2xx statuses are returned as a `Response`; the caller decides
/// what they mean.
pub trait Transport {
    fn get(
        &self,
        target: &Url,
        timeout: Duration,
    ) -> impl Future<Output = Result<Response, TransportError>> + Send;
}
