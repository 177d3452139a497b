//! 传输层：基于 reqwest 的 HTTP 传输。
//!
//! HTTP transport for the completion endpoint.

pub mod http;

pub use http::{HttpTransport, TransportError};
