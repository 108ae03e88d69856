//! Result sinks: where a successful payload ends up.

use std::io::{self, Write};

/// Receives the payload of a successful delivery.
///
/// `deliver` calls `accept` at most once per call, and only after an attempt
/// returned a 2xx status with a fully read body.
pub trait ResultSink {
    fn accept(&mut self, payload: Vec<u8>);
}

impl<F> ResultSink for F
where
    F: FnMut(Vec<u8>),
{
    fn accept(&mut self, payload: Vec<u8>) {
        self(payload)
    }
}

/// Keeps the delivered payload in memory.
#[derive(Debug, Default)]
pub struct CollectSink {
    payload: Option<Vec<u8>>,
}

impl CollectSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn payload(&self) -> Option<&[u8]> {
        self.payload.as_deref()
    }

    pub fn into_payload(self) -> Option<Vec<u8>> {
        self.payload
    }
}

impl ResultSink for CollectSink {
    fn accept(&mut self, payload: Vec<u8>) {
        self.payload = Some(payload);
    }
}

/// Writes the payload to stdout. Write failures are logged, not returned.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl ResultSink for StdoutSink {
    fn accept(&mut self, payload: Vec<u8>) {
        let mut out = io::stdout().lock();
        if let Err(e) = out.write_all(&payload).and_then(|_| out.flush()) {
            tracing::warn!("writing payload to stdout failed: {}", e);
        }
    }
}
