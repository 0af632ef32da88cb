//! Outbound HTTP plumbing.

mod http;

pub use http::{HttpResponse, HttpTransport, TransportError, API_KEY_HEADER};
