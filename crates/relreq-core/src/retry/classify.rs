//! Classify HTTP status and curl errors into retry policy error kinds.

use super::error::TransportError;
use super::policy::ErrorKind;

/// Classify a non-2xx HTTP status code.
pub fn classify_http_status(code: u32) -> ErrorKind {
    let status = u16::try_from(code).unwrap_or(u16::MAX);
    match code {
        500..=599 => ErrorKind::Http5xx(status),
        400..=499 => ErrorKind::Http4xx(status),
        _ => ErrorKind::HttpOther(status),
    }
}

/// Classify a curl error.
pub fn classify_curl_error(e: &curl::Error) -> ErrorKind {
    if e.is_operation_timedout() {
        return ErrorKind::Timeout;
    }
    if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_read_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
    {
        return ErrorKind::Connection;
    }
    ErrorKind::Other
}

/// Classify a transport error into an ErrorKind.
pub fn classify(e: &TransportError) -> ErrorKind {
    match e {
        TransportError::Curl(ce) => classify_curl_error(ce),
        TransportError::Http(code) => classify_http_status(*code),
        TransportError::Join(_) => ErrorKind::Other,
    }
}
