//! HTTP client adapter: one JSON request in, status code and raw body out.

pub mod client;
pub mod method;
pub mod request;
pub mod response;

#[cfg(test)]
pub(crate) mod fake;

pub use client::{ReqwestTransport, Transport};
pub use method::HttpMethod;
pub use request::RequestInput;
pub use response::HttpResponse;
