//! HTTP transport used by remote token counters.

mod http;

pub use http::{HttpReply, HttpTransport, TransportError};
