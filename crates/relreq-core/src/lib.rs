//! relreq core: reliable request delivery with timeout escalation, plus the
//! item storage used alongside it.

pub mod config;
pub mod logging;

pub mod items_db;
pub mod retry;
pub mod sink;
pub mod transport;

pub use retry::{DeliverError, Delivery, RetryEngine, RetryPolicy};
pub use sink::ResultSink;
pub use transport::{CurlTransport, Transport};
