//! libcurl-backed transport: one Easy handle per attempt.

use super::{Response, Transport};
use crate::retry::TransportError;
use std::future::Future;
use std::time::Duration;
use url::Url;

/// libcurl rounds timeouts to milliseconds and treats 0 as "no timeout".
const MIN_TIMEOUT: Duration = Duration::from_millis(1);

/// Per-transfer curl settings that do not change between attempts.
#[derive(Debug, Clone)]
pub struct CurlOptions {
    /// Connect phase limit. Capped at the attempt timeout.
    pub connect_timeout: Option<Duration>,
    pub follow_redirects: bool,
    pub max_redirections: u32,
    pub user_agent: Option<String>,
}

impl Default for CurlOptions {
    fn default() -> Self {
        Self {
            connect_timeout: None,
            follow_redirects: true,
            max_redirections: 10,
            user_agent: Some(concat!("relreq/", env!("CARGO_PKG_VERSION")).to_string()),
        }
    }
}

/// Runs each GET on tokio's blocking pool.
///
/// If the awaiting future is dropped, the transfer keeps running on the
/// blocking thread until curl's own timeout fires; its result is discarded.
#[derive(Debug, Clone, Default)]
pub struct CurlTransport {
    opts: CurlOptions,
}

impl CurlTransport {
    pub fn new(opts: CurlOptions) -> Self {
        Self { opts }
    }

    pub fn options(&self) -> &CurlOptions {
        &self.opts
    }
}

impl Transport for CurlTransport {
    fn get(
        &self,
        target: &Url,
        timeout: Duration,
    ) -> impl Future<Output = Result<Response, TransportError>> + Send {
        let url = target.to_string();
        let opts = self.opts.clone();
        async move {
            tokio::task::spawn_blocking(move || get_blocking(&url, timeout, &opts))
                .await
                .map_err(|e| TransportError::Join(e.to_string()))?
        }
    }
}

/// Performs a GET and reads the whole body. The easy handle is dropped on every exit path.
fn get_blocking(
    url: &str,
    timeout: Duration,
    opts: &CurlOptions,
) -> Result<Response, TransportError> {
    let timeout = timeout.max(MIN_TIMEOUT);
    let mut body = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.get(true)?;
    easy.follow_location(opts.follow_redirects)?;
    easy.max_redirections(opts.max_redirections)?;
    if let Some(connect) = opts.connect_timeout {
        easy.connect_timeout(connect.min(timeout).max(MIN_TIMEOUT))?;
    }
    easy.timeout(timeout)?;
    if let Some(ua) = &opts.user_agent {
        easy.useragent(ua)?;
    }

    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform()?;
    }

    let status = easy.response_code()?;
    tracing::trace!("GET {} -> HTTP {} ({} bytes)", url, status, body.len());
    Ok(Response { status, body })
}
